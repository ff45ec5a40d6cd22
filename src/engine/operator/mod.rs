// SPDX-License-Identifier: MIT

//! Comparison operators
//!
//! The operator set is closed: `OperatorKind` enumerates every kind and
//! `evaluator::evaluate` dispatches over it with a `match`. An `Operator`
//! binds a kind to the `PatternCache` its regex kinds should use.

mod evaluator;
mod kind;
mod pattern;

pub use evaluator::evaluate;
pub use kind::OperatorKind;
pub use pattern::PatternCache;

use std::fmt;
use std::sync::Arc;

use super::error::{EvalError, RuleError};
use super::value::Value;

/// A pure `(value, target) -> bool` evaluator for one `OperatorKind`
#[derive(Clone)]
pub struct Operator {
    kind: OperatorKind,
    patterns: Arc<PatternCache>,
}

impl Operator {
    pub fn new(kind: OperatorKind, patterns: Arc<PatternCache>) -> Self {
        Self { kind, patterns }
    }

    /// Build an operator from its symbolic name (e.g. `"greater_than"`)
    pub fn from_name(name: &str, patterns: Arc<PatternCache>) -> Result<Self, RuleError> {
        Ok(Self::new(name.parse()?, patterns))
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    /// Cache shared by this operator's regex evaluation
    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// Evaluate against a resolved value.
    ///
    /// Type mismatches and bad patterns come back as `Err`; callers decide
    /// whether that means `false` or a hard failure.
    pub fn evaluate(&self, value: &Value, target: &Value) -> Result<bool, EvalError> {
        evaluator::evaluate(self.kind, value, target, &self.patterns)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operator").field(&self.kind).finish()
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

// Quick lenient predicates; anomalies read as `false`.

fn quick(kind: OperatorKind, value: &Value, target: &Value) -> bool {
    evaluator::evaluate(kind, value, target, &PatternCache::new()).unwrap_or(false)
}

/// `value == target`
pub fn equals(value: &Value, target: &Value) -> bool {
    quick(OperatorKind::Equals, value, target)
}

/// Substring, list membership, or map key presence
pub fn contains(value: &Value, target: &Value) -> bool {
    quick(OperatorKind::Contains, value, target)
}

pub fn greater_than(value: &Value, target: &Value) -> bool {
    quick(OperatorKind::GreaterThan, value, target)
}

pub fn less_than(value: &Value, target: &Value) -> bool {
    quick(OperatorKind::LessThan, value, target)
}

/// One-off regex search. Compiles every call; use an `Operator` with a
/// shared `PatternCache` for repeated patterns.
pub fn regex_match(value: &Value, pattern: &str) -> bool {
    quick(OperatorKind::Regex, value, &Value::from(pattern))
}

pub fn in_list(value: &Value, options: &[Value]) -> bool {
    options.contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_from_kind() {
        let op = Operator::new(OperatorKind::Equals, PatternCache::shared());
        assert_eq!(op.kind(), OperatorKind::Equals);
        assert!(op.evaluate(&Value::from("a"), &Value::from("a")).unwrap());
    }

    #[test]
    fn test_create_from_name() {
        let op = Operator::from_name("less_than_or_equal", PatternCache::shared()).unwrap();
        assert_eq!(op.kind(), OperatorKind::LessThanOrEqual);
    }

    #[test]
    fn test_create_all_operators() {
        let patterns = PatternCache::shared();
        for kind in OperatorKind::ALL {
            let op = Operator::from_name(kind.name(), Arc::clone(&patterns)).unwrap();
            assert_eq!(op.kind(), kind);
        }
    }

    #[test]
    fn test_create_invalid_operator() {
        assert!(matches!(
            Operator::from_name("invalid_operator", PatternCache::shared()),
            Err(RuleError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_operators_share_cache() {
        let patterns = PatternCache::shared();
        let regex = Operator::new(OperatorKind::Regex, Arc::clone(&patterns));
        let not_regex = Operator::new(OperatorKind::NotRegex, Arc::clone(&patterns));
        let pattern = Value::from(r"\d+");

        assert!(regex.evaluate(&Value::from("test123"), &pattern).unwrap());
        assert!(not_regex.evaluate(&Value::from("test"), &pattern).unwrap());
        assert_eq!(patterns.compile_count(), 1);
        assert!(Arc::ptr_eq(regex.patterns(), not_regex.patterns()));
    }

    #[test]
    fn test_convenience_functions() {
        assert!(equals(&Value::from(5), &Value::from(5)));
        assert!(!equals(&Value::from(5), &Value::from(6)));

        assert!(contains(&Value::from("hello world"), &Value::from("world")));
        assert!(contains(&json!([1, 2, 3]).into(), &Value::from(2)));
        assert!(!contains(&Value::from(123), &Value::from("1")));

        assert!(greater_than(&Value::from(10), &Value::from(5)));
        assert!(!greater_than(&Value::from(5), &Value::from(10)));
        assert!(less_than(&Value::from(5), &Value::from(10)));
        assert!(!less_than(&Value::from(10), &Value::from(5)));

        assert!(regex_match(&Value::from("test123"), r"\d+"));
        assert!(!regex_match(&Value::from("test"), r"\d+"));
        assert!(!regex_match(&Value::from("test"), "("));

        let options = [Value::from(1), Value::from(2), Value::from(3)];
        assert!(in_list(&Value::from(2), &options));
        assert!(!in_list(&Value::from(5), &options));
    }
}
