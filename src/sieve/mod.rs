// SPDX-License-Identifier: MIT

//! Caller-side pieces for the `sieve` binary
//!
//! - `definition` - file schema for (field, operator, value) triples
//! - `loader` - reads definitions and record sets from disk
//! - `builder` - turns definitions into engine filters

pub mod builder;
pub mod definition;
pub mod loader;
