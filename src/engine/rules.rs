// SPDX-License-Identifier: MIT

//! Multi-filter rules engine
//!
//! Holds several filters ("rule sets") and combines their verdicts with a
//! per-call `Logic`. All filters built through the engine share one
//! pattern cache.

use std::sync::Arc;

use super::condition::Condition;
use super::error::{EvalError, RuleError};
use super::filter::{Filter, Logic};
use super::operator::{OperatorKind, PatternCache};
use super::value::Value;

#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    filters: Vec<Filter>,
    patterns: Arc<PatternCache>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose `add_rule` / `filter_builder` share `patterns`
    pub fn with_patterns(patterns: Arc<PatternCache>) -> Self {
        Self {
            filters: Vec::new(),
            patterns,
        }
    }

    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// An empty filter wired to this engine's pattern cache
    pub fn filter_builder(&self, logic: Logic) -> Filter {
        Filter::with_patterns(logic, Arc::clone(&self.patterns))
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Add a single condition as its own filter
    pub fn add_rule<K>(&mut self, field: &str, operator: K, target: impl Into<Value>) -> Result<(), RuleError>
    where
        K: TryInto<OperatorKind>,
        RuleError: From<K::Error>,
    {
        let mut filter = self.filter_builder(Logic::And);
        filter.push(Condition::with_patterns(
            field,
            operator,
            target,
            Arc::clone(&self.patterns),
        )?);
        self.add_filter(filter);
        Ok(())
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Remove every filter; the pattern cache is kept
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Combine filter verdicts for one record.
    ///
    /// Same rules as within a `Filter`: AND stops at the first miss, OR at
    /// the first hit; no filters means true under AND, false under OR.
    pub fn evaluate(&self, record: &Value, logic: Logic) -> bool {
        logic.combine(&self.filters, |f| f.evaluate(record))
    }

    /// Strict `evaluate`
    pub fn try_evaluate(&self, record: &Value, logic: Logic) -> Result<bool, EvalError> {
        logic.try_combine(&self.filters, |f| f.try_evaluate(record))
    }

    /// Matching records, cloned, in input order
    pub fn filter(&self, records: &[Value], logic: Logic) -> Vec<Value> {
        records
            .iter()
            .filter(|r| self.evaluate(r, logic))
            .cloned()
            .collect()
    }

    /// Strict `filter`
    pub fn try_filter(&self, records: &[Value], logic: Logic) -> Result<Vec<Value>, EvalError> {
        let mut matched = Vec::new();
        for record in records {
            if self.try_evaluate(record, logic)? {
                matched.push(record.clone());
            }
        }
        Ok(matched)
    }
}

/// One-off evaluation of a single condition
pub fn evaluate_rule<K>(record: &Value, field: &str, operator: K, target: impl Into<Value>) -> Result<bool, RuleError>
where
    K: TryInto<OperatorKind>,
    RuleError: From<K::Error>,
{
    Ok(Condition::new(field, operator, target)?.evaluate(record))
}
