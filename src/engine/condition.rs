// SPDX-License-Identifier: MIT

//! A single field/operator/target check

use std::fmt;
use std::sync::Arc;

use super::error::{EvalError, RuleError};
use super::operator::{Operator, OperatorKind, PatternCache};
use super::path::FieldPath;
use super::value::Value;

/// Binds a field path, an operator and a target value.
///
/// Immutable once built. The path and operator name are validated here, so a
/// constructed condition can always be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: FieldPath,
    operator: Operator,
    target: Value,
}

impl Condition {
    /// Build a condition with its own pattern cache.
    ///
    /// `operator` may be an `OperatorKind` or its symbolic name.
    pub fn new<K>(field: &str, operator: K, target: impl Into<Value>) -> Result<Self, RuleError>
    where
        K: TryInto<OperatorKind>,
        RuleError: From<K::Error>,
    {
        Self::with_patterns(field, operator, target, PatternCache::shared())
    }

    /// Build a condition whose regex evaluation uses `patterns`
    pub fn with_patterns<K>(
        field: &str,
        operator: K,
        target: impl Into<Value>,
        patterns: Arc<PatternCache>,
    ) -> Result<Self, RuleError>
    where
        K: TryInto<OperatorKind>,
        RuleError: From<K::Error>,
    {
        let kind = operator.try_into()?;
        Ok(Self {
            field: FieldPath::parse(field)?,
            operator: Operator::new(kind, patterns),
            target: target.into(),
        })
    }

    /// Build from an already constructed operator
    pub fn from_operator(field: &str, operator: Operator, target: impl Into<Value>) -> Result<Self, RuleError> {
        Ok(Self {
            field: FieldPath::parse(field)?,
            operator,
            target: target.into(),
        })
    }

    pub fn field_path(&self) -> &FieldPath {
        &self.field
    }

    pub fn operator(&self) -> OperatorKind {
        self.operator.kind()
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Evaluate against one record.
    ///
    /// A missing field is `false`, except under `is_empty` where it counts as
    /// empty. Type mismatches and bad patterns are logged and read as `false`,
    /// so one malformed record cannot abort a batch.
    pub fn evaluate(&self, record: &Value) -> bool {
        self.try_evaluate(record).unwrap_or_else(|e| {
            log::debug!("Condition {} treated as false: {}", self, e);
            false
        })
    }

    /// Strict evaluation: type mismatches and bad patterns are returned.
    /// Missing fields still follow the `evaluate` rules.
    pub fn try_evaluate(&self, record: &Value) -> Result<bool, EvalError> {
        match self.field.resolve(record) {
            Some(value) => self.operator.evaluate(value, &self.target),
            None => Ok(self.operator.kind() == OperatorKind::IsEmpty),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator.kind(), self.target)
    }
}
