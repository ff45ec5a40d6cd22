// SPDX-License-Identifier: MIT

//! Schema types for rule definition files
//!
//! A definition file carries the (field, operator, value) triples of each
//! condition plus the logic that combines them. Operator names stay plain
//! strings here and are checked when the builder turns a definition into
//! engine objects.

use serde::{Deserialize, Serialize};

use crate::engine::{Logic, Value};

/// One condition triple
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConditionDefinition {
    /// Dot-separated field path
    pub field: String,
    /// Symbolic operator name, e.g. `greater_than`
    pub operator: String,
    /// Target value; omitted means `null` (fine for `is_empty`)
    #[serde(default)]
    pub value: Value,
}

/// Conditions combined under one logic mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub logic: Logic,
    pub conditions: Vec<ConditionDefinition>,
}

/// Several filters combined under one logic mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RulesDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub logic: Logic,
    pub filters: Vec<FilterDefinition>,
}

/// Either file shape accepted by the loader.
///
/// Both shapes reject unknown keys and require their list key, so a
/// misspelled `filters:` or `conditions:` fails to parse instead of
/// yielding an empty filter.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DefinitionFile {
    Rules(RulesDefinition),
    Filter(FilterDefinition),
}

impl DefinitionFile {
    /// Normalize to the multi-filter shape.
    ///
    /// A lone filter becomes a rules definition with that single filter; the
    /// outer logic is then irrelevant and left at the default.
    pub fn into_rules(self) -> RulesDefinition {
        match self {
            DefinitionFile::Rules(rules) => rules,
            DefinitionFile::Filter(filter) => RulesDefinition {
                name: filter.name.clone(),
                logic: Logic::default(),
                filters: vec![filter],
            },
        }
    }
}

impl RulesDefinition {
    /// Total number of conditions across all filters
    pub fn condition_count(&self) -> usize {
        self.filters.iter().map(|f| f.conditions.len()).sum()
    }
}
