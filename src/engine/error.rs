// SPDX-License-Identifier: MIT

//! Typed error handling for the rule engine
//!
//! Two layers, split by when they can happen:
//! - `RuleError` covers construction and I/O (unknown operator, bad path,
//!   unreadable definition files). These always reach the caller.
//! - `EvalError` covers anomalies discovered while evaluating a record
//!   (type mismatch, malformed target, bad regex). Lenient evaluation folds
//!   them into `false`; the `try_*` methods surface them.

use thiserror::Error;

use super::operator::OperatorKind;
use super::value::ValueKind;

/// Top-level error type for sieve-rs
#[derive(Debug, Error)]
pub enum RuleError {
    /// Operator name outside the closed set
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),

    /// Empty or malformed field path
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Logic mode other than AND/OR
    #[error("Logic must be 'AND' or 'OR', got '{0}'")]
    InvalidLogic(String),

    /// Evaluation anomaly surfaced by strict evaluation
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// Configuration errors (bad definition shape, missing input)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Anomalies found while evaluating one record
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The resolved value has a kind the operator does not accept
    #[error("'{operator}' expects {expected}, found {found}")]
    TypeMismatch {
        operator: OperatorKind,
        expected: &'static str,
        found: ValueKind,
    },

    /// The condition's target has the wrong shape for the operator
    #[error("Invalid target for '{operator}': {reason}")]
    InvalidTarget {
        operator: OperatorKind,
        reason: String,
    },

    /// Regex pattern text failed to compile
    #[error("Invalid regex pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleError {
    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl EvalError {
    /// Create a type mismatch error
    pub fn mismatch(operator: OperatorKind, expected: &'static str, found: ValueKind) -> Self {
        Self::TypeMismatch {
            operator,
            expected,
            found,
        }
    }

    /// Create an invalid target error
    pub fn invalid_target(operator: OperatorKind, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            operator,
            reason: reason.into(),
        }
    }
}

// `OperatorKind` itself converts infallibly; this lets construction APIs take
// either a kind or a name through one `TryInto` bound.
impl From<std::convert::Infallible> for RuleError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
