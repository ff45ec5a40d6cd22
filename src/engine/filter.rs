// SPDX-License-Identifier: MIT

//! AND/OR composition of conditions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::condition::Condition;
use super::error::{EvalError, RuleError};
use super::operator::{OperatorKind, PatternCache};
use super::value::Value;

/// How a filter combines its conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Logic {
    /// Every condition must match; empty set matches
    #[default]
    And,
    /// Any condition must match; empty set does not match
    Or,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    /// Combine lazily, short-circuiting on the first decisive result
    pub(crate) fn combine<I, F>(self, items: I, mut test: F) -> bool
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> bool,
    {
        match self {
            Logic::And => items.into_iter().all(|item| test(item)),
            Logic::Or => items.into_iter().any(|item| test(item)),
        }
    }

    /// Fallible `combine`; the first error aborts
    pub(crate) fn try_combine<I, F>(self, items: I, mut test: F) -> Result<bool, EvalError>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Result<bool, EvalError>,
    {
        for item in items {
            match (self, test(item)?) {
                (Logic::And, false) => return Ok(false),
                (Logic::Or, true) => return Ok(true),
                _ => {}
            }
        }
        Ok(self == Logic::And)
    }
}

impl FromStr for Logic {
    type Err = RuleError;

    /// Case-insensitive `AND` / `OR`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            _ => Err(RuleError::InvalidLogic(s.to_string())),
        }
    }
}

impl TryFrom<String> for Logic {
    type Error = RuleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Logic> for &'static str {
    fn from(logic: Logic) -> Self {
        logic.as_str()
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered conditions combined under a fixed `Logic`
#[derive(Debug, Clone)]
pub struct Filter {
    conditions: Vec<Condition>,
    logic: Logic,
    patterns: Arc<PatternCache>,
}

impl Filter {
    /// Empty filter with its own pattern cache
    pub fn new(logic: Logic) -> Self {
        Self::with_patterns(logic, PatternCache::shared())
    }

    /// Empty filter whose `add_condition` calls share `patterns`
    pub fn with_patterns(logic: Logic, patterns: Arc<PatternCache>) -> Self {
        Self {
            conditions: Vec::new(),
            logic,
            patterns,
        }
    }

    /// Filter over already built conditions.
    ///
    /// The conditions keep the caches they were built with; the filter gets a
    /// fresh one for later `add_condition` calls. Use
    /// `with_conditions_and_patterns` to keep those on a shared cache.
    pub fn with_conditions(conditions: Vec<Condition>, logic: Logic) -> Self {
        Self::with_conditions_and_patterns(conditions, logic, PatternCache::shared())
    }

    /// Filter over already built conditions whose `add_condition` calls share
    /// `patterns`
    pub fn with_conditions_and_patterns(
        conditions: Vec<Condition>,
        logic: Logic,
        patterns: Arc<PatternCache>,
    ) -> Self {
        Self {
            conditions,
            logic,
            patterns,
        }
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// Append a built condition
    pub fn push(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Build and append a condition using this filter's pattern cache.
    ///
    /// ```
    /// use sieve_rs::engine::{Filter, Logic, OperatorKind, Value};
    /// use serde_json::json;
    ///
    /// let mut filter = Filter::new(Logic::And);
    /// filter
    ///     .add_condition("age", "greater_than_or_equal", 18)?
    ///     .add_condition("status", OperatorKind::Equals, "active")?;
    ///
    /// let record: Value = json!({"age": 21, "status": "active"}).into();
    /// assert!(filter.evaluate(&record));
    /// # Ok::<(), sieve_rs::engine::RuleError>(())
    /// ```
    pub fn add_condition<K>(
        &mut self,
        field: &str,
        operator: K,
        target: impl Into<Value>,
    ) -> Result<&mut Self, RuleError>
    where
        K: TryInto<OperatorKind>,
        RuleError: From<K::Error>,
    {
        let condition = Condition::with_patterns(field, operator, target, Arc::clone(&self.patterns))?;
        Ok(self.push(condition))
    }

    /// Whether `record` satisfies the filter
    pub fn evaluate(&self, record: &Value) -> bool {
        self.logic.combine(&self.conditions, |c| c.evaluate(record))
    }

    /// Strict evaluation; the first type mismatch or bad pattern aborts
    pub fn try_evaluate(&self, record: &Value) -> Result<bool, EvalError> {
        self.logic
            .try_combine(&self.conditions, |c| c.try_evaluate(record))
    }

    /// Matching records, cloned, in input order
    pub fn filter_list(&self, records: &[Value]) -> Vec<Value> {
        self.filter_iter(records).cloned().collect()
    }

    /// Lazily yield matching records, borrowed, in input order
    pub fn filter_iter<'a, I>(&'a self, records: I) -> impl Iterator<Item = &'a Value> + 'a
    where
        I: IntoIterator<Item = &'a Value>,
        I::IntoIter: 'a,
    {
        records.into_iter().filter(move |r| self.evaluate(r))
    }

    /// Strict `filter_list`
    pub fn try_filter_list(&self, records: &[Value]) -> Result<Vec<Value>, EvalError> {
        let mut matched = Vec::new();
        for record in records {
            if self.try_evaluate(record)? {
                matched.push(record.clone());
            }
        }
        Ok(matched)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(Logic::And)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joiner = format!(" {} ", self.logic);
        let parts: Vec<String> = self.conditions.iter().map(|c| format!("({})", c)).collect();
        write!(f, "Filter[{}]", parts.join(&joiner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Value {
        json.into()
    }

    fn records(json: serde_json::Value) -> Vec<Value> {
        match Value::from(json) {
            Value::List(items) => items,
            other => vec![other],
        }
    }

    #[test]
    fn test_filter_and_logic() {
        let mut filter = Filter::new(Logic::And);
        filter
            .add_condition("age", OperatorKind::GreaterThan, 18)
            .unwrap()
            .add_condition("status", OperatorKind::Equals, "active")
            .unwrap();

        assert!(filter.evaluate(&record(json!({"age": 25, "status": "active"}))));
        assert!(!filter.evaluate(&record(json!({"age": 25, "status": "inactive"}))));
        assert!(!filter.evaluate(&record(json!({"age": 15, "status": "active"}))));
    }

    #[test]
    fn test_filter_or_logic() {
        let mut filter = Filter::new(Logic::Or);
        filter
            .add_condition("age", OperatorKind::GreaterThan, 18)
            .unwrap()
            .add_condition("status", OperatorKind::Equals, "premium")
            .unwrap();

        assert!(filter.evaluate(&record(json!({"age": 25, "status": "basic"}))));
        assert!(filter.evaluate(&record(json!({"age": 15, "status": "premium"}))));
        assert!(!filter.evaluate(&record(json!({"age": 15, "status": "basic"}))));
    }

    #[test]
    fn test_empty_filter() {
        let data = record(json!({"any": "data"}));
        assert!(Filter::new(Logic::And).evaluate(&data));
        assert!(!Filter::new(Logic::Or).evaluate(&data));
        assert!(Filter::default().evaluate(&data));

        assert!(Filter::new(Logic::And).try_evaluate(&data).unwrap());
        assert!(!Filter::new(Logic::Or).try_evaluate(&data).unwrap());
    }

    #[test]
    fn test_single_condition_matches_condition() {
        let condition = Condition::new("score", OperatorKind::GreaterThan, 50).unwrap();
        let and = Filter::with_conditions(vec![condition.clone()], Logic::And);
        let or = Filter::with_conditions(vec![condition.clone()], Logic::Or);

        for data in [json!({"score": 70}), json!({"score": 10}), json!({}), json!({"score": "x"})] {
            let data = record(data);
            assert_eq!(and.evaluate(&data), condition.evaluate(&data));
            assert_eq!(or.evaluate(&data), condition.evaluate(&data));
        }
    }

    #[test]
    fn test_and_short_circuits_before_bad_condition() {
        let mut filter = Filter::new(Logic::And);
        filter
            .add_condition("kind", OperatorKind::Equals, "log")
            .unwrap()
            .add_condition("message", OperatorKind::Regex, "(bad")
            .unwrap();

        // First condition fails, so the bad pattern is never reached.
        let data = record(json!({"kind": "metric", "message": "x"}));
        assert!(!filter.try_evaluate(&data).unwrap());
        assert!(filter.patterns().is_empty());

        let data = record(json!({"kind": "log", "message": "x"}));
        assert!(filter.try_evaluate(&data).is_err());
        assert!(!filter.evaluate(&data));
    }

    #[test]
    fn test_or_short_circuits_before_bad_condition() {
        let mut filter = Filter::new(Logic::Or);
        filter
            .add_condition("level", OperatorKind::Equals, "ERROR")
            .unwrap()
            .add_condition("level", OperatorKind::GreaterThan, 3)
            .unwrap();

        assert!(filter.try_evaluate(&record(json!({"level": "ERROR"}))).unwrap());
        assert!(filter.try_evaluate(&record(json!({"level": "INFO"}))).is_err());
        assert!(!filter.evaluate(&record(json!({"level": "INFO"}))));
    }

    #[test]
    fn test_filter_list_preserves_order() {
        let mut filter = Filter::new(Logic::And);
        filter
            .add_condition("age", OperatorKind::GreaterThanOrEqual, 18)
            .unwrap()
            .add_condition("status", OperatorKind::Equals, "active")
            .unwrap();

        let data = records(json!([
            {"name": "Alice", "age": 25, "status": "active"},
            {"name": "Bob", "age": 17, "status": "active"},
            {"name": "Charlie", "age": 30, "status": "inactive"},
            {"name": "Diana", "age": 22, "status": "active"},
        ]));

        let result = filter.filter_list(&data);
        let names: Vec<&str> = result.iter().filter_map(|r| r.get("name")?.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Diana"]);
    }

    #[test]
    fn test_filter_list_keeps_duplicates_and_is_idempotent() {
        let mut filter = Filter::new(Logic::And);
        filter.add_condition("n", OperatorKind::LessThan, 3).unwrap();

        let data = records(json!([{"n": 1}, {"n": 5}, {"n": 1}, {"n": 2}]));
        let once = filter.filter_list(&data);
        assert_eq!(once, records(json!([{"n": 1}, {"n": 1}, {"n": 2}])));
        assert_eq!(filter.filter_list(&once), once);
    }

    #[test]
    fn test_filter_list_survives_bad_records() {
        let mut filter = Filter::new(Logic::And);
        filter.add_condition("price", OperatorKind::LessThan, 100).unwrap();

        let data = records(json!([{"price": 10}, {"price": "cheap"}, {}, {"price": 50}]));
        assert_eq!(filter.filter_list(&data), records(json!([{"price": 10}, {"price": 50}])));
        assert!(filter.try_filter_list(&data).is_err());
    }

    #[test]
    fn test_filter_iter_borrows() {
        let mut filter = Filter::new(Logic::And);
        filter.add_condition("ok", OperatorKind::Equals, true).unwrap();

        let data = records(json!([{"ok": true, "id": 1}, {"ok": false, "id": 2}]));
        let matched: Vec<&Value> = filter.filter_iter(&data).collect();
        assert_eq!(matched.len(), 1);
        assert!(std::ptr::eq(matched[0], &data[0]));
    }

    #[test]
    fn test_add_condition_rejects_unknown_operator() {
        let mut filter = Filter::new(Logic::And);
        assert!(matches!(
            filter.add_condition("x", "approximately", 1),
            Err(RuleError::UnknownOperator(_))
        ));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_add_condition_shares_filter_cache() {
        let mut filter = Filter::new(Logic::Or);
        filter
            .add_condition("a", OperatorKind::Regex, r"^\w+$")
            .unwrap()
            .add_condition("b", OperatorKind::Regex, r"^\w+$")
            .unwrap();

        filter.evaluate(&record(json!({"a": "!!", "b": "word"})));
        assert_eq!(filter.patterns().compile_count(), 1);
    }

    #[test]
    fn test_with_conditions_and_patterns_keeps_one_cache() {
        let patterns = PatternCache::shared();
        let existing = Condition::with_patterns("a", OperatorKind::Regex, "^x", Arc::clone(&patterns)).unwrap();

        let mut filter = Filter::with_conditions_and_patterns(vec![existing], Logic::And, Arc::clone(&patterns));
        filter.add_condition("b", OperatorKind::Regex, "^x").unwrap();

        assert!(filter.evaluate(&record(json!({"a": "xa", "b": "xb"}))));
        assert!(Arc::ptr_eq(filter.patterns(), &patterns));
        assert_eq!(patterns.compile_count(), 1);
    }

    #[test]
    fn test_with_conditions_gets_fresh_cache() {
        let patterns = PatternCache::shared();
        let existing = Condition::with_patterns("a", OperatorKind::Regex, "^x", Arc::clone(&patterns)).unwrap();

        let filter = Filter::with_conditions(vec![existing], Logic::And);
        assert!(!Arc::ptr_eq(filter.patterns(), &patterns));
        assert!(filter.patterns().is_empty());
    }

    #[test]
    fn test_logic_parse() {
        assert_eq!("AND".parse::<Logic>().unwrap(), Logic::And);
        assert_eq!("or".parse::<Logic>().unwrap(), Logic::Or);
        assert_eq!(" Or ".parse::<Logic>().unwrap(), Logic::Or);
        assert!(matches!("INVALID".parse::<Logic>(), Err(RuleError::InvalidLogic(_))));
    }

    #[test]
    fn test_logic_serde() {
        let logic: Logic = serde_json::from_str(r#""or""#).unwrap();
        assert_eq!(logic, Logic::Or);
        assert_eq!(serde_json::to_string(&Logic::And).unwrap(), r#""AND""#);
        assert!(serde_json::from_str::<Logic>(r#""xor""#).is_err());
    }

    #[test]
    fn test_display() {
        let mut filter = Filter::new(Logic::Or);
        filter
            .add_condition("a", OperatorKind::Equals, 1)
            .unwrap()
            .add_condition("b", OperatorKind::IsEmpty, Value::Null)
            .unwrap();
        assert_eq!(filter.to_string(), "Filter[(a equals 1) OR (b is_empty null)]");
    }
}
