// SPDX-License-Identifier: MIT

//! sieve-rs: a condition/operator rule engine for structured records.
//!
//! [`engine`] holds the evaluator itself; [`sieve`] holds the caller-side
//! pieces used by the `sieve` binary (definition files, loading, building).

pub mod engine;
pub mod sieve;
