// SPDX-License-Identifier: MIT

//! Condition/operator evaluation engine
//!
//! Records are [`Value`]s. A [`Condition`] resolves a dot-separated field
//! path, then applies an [`Operator`] against a target. A [`Filter`]
//! combines conditions with AND/OR and filters sequences of records.
//!
//! ```
//! use sieve_rs::engine::{Filter, Logic, OperatorKind, Value};
//! use serde_json::json;
//!
//! let mut filter = Filter::new(Logic::And);
//! filter
//!     .add_condition("category", OperatorKind::Equals, "electronics")?
//!     .add_condition("price", OperatorKind::LessThan, 100)?;
//!
//! let products: Vec<Value> = vec![
//!     json!({"name": "Laptop", "price": 999, "category": "electronics"}).into(),
//!     json!({"name": "Mouse", "price": 25, "category": "electronics"}).into(),
//! ];
//! let cheap = filter.filter_list(&products);
//! assert_eq!(cheap.len(), 1);
//! # Ok::<(), sieve_rs::engine::RuleError>(())
//! ```

pub mod condition;
pub mod error;
pub mod filter;
pub mod operator;
pub mod path;
pub mod rules;
pub mod value;

pub use condition::Condition;
pub use error::{EvalError, RuleError};
pub use filter::{Filter, Logic};
pub use operator::{Operator, OperatorKind, PatternCache};
pub use path::FieldPath;
pub use rules::{evaluate_rule, RulesEngine};
pub use value::{Map, Value, ValueKind};
