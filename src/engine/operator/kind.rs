// SPDX-License-Identifier: MIT

//! The closed set of operator kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::error::RuleError;

/// Comparison operators, addressable by their symbolic names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OperatorKind {
    /// equals
    Equals,
    /// not_equals
    NotEquals,
    /// contains (substring, list membership, map key)
    Contains,
    /// not_contains
    NotContains,
    /// starts_with
    StartsWith,
    /// ends_with
    EndsWith,
    /// greater_than
    GreaterThan,
    /// greater_than_or_equal
    GreaterThanOrEqual,
    /// less_than
    LessThan,
    /// less_than_or_equal
    LessThanOrEqual,
    /// regex (unanchored search)
    Regex,
    /// not_regex
    NotRegex,
    /// in_list
    InList,
    /// not_in_list
    NotInList,
    /// is_empty
    IsEmpty,
    /// is_not_empty
    IsNotEmpty,
    /// between (inclusive)
    Between,
}

impl OperatorKind {
    /// Every kind, in declaration order
    pub const ALL: [OperatorKind; 17] = [
        OperatorKind::Equals,
        OperatorKind::NotEquals,
        OperatorKind::Contains,
        OperatorKind::NotContains,
        OperatorKind::StartsWith,
        OperatorKind::EndsWith,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterThanOrEqual,
        OperatorKind::LessThan,
        OperatorKind::LessThanOrEqual,
        OperatorKind::Regex,
        OperatorKind::NotRegex,
        OperatorKind::InList,
        OperatorKind::NotInList,
        OperatorKind::IsEmpty,
        OperatorKind::IsNotEmpty,
        OperatorKind::Between,
    ];

    /// Symbolic name used in definitions and error messages
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Equals => "equals",
            OperatorKind::NotEquals => "not_equals",
            OperatorKind::Contains => "contains",
            OperatorKind::NotContains => "not_contains",
            OperatorKind::StartsWith => "starts_with",
            OperatorKind::EndsWith => "ends_with",
            OperatorKind::GreaterThan => "greater_than",
            OperatorKind::GreaterThanOrEqual => "greater_than_or_equal",
            OperatorKind::LessThan => "less_than",
            OperatorKind::LessThanOrEqual => "less_than_or_equal",
            OperatorKind::Regex => "regex",
            OperatorKind::NotRegex => "not_regex",
            OperatorKind::InList => "in_list",
            OperatorKind::NotInList => "not_in_list",
            OperatorKind::IsEmpty => "is_empty",
            OperatorKind::IsNotEmpty => "is_not_empty",
            OperatorKind::Between => "between",
        }
    }

    /// Whether the operator uses the shared pattern cache
    pub fn uses_patterns(self) -> bool {
        matches!(self, OperatorKind::Regex | OperatorKind::NotRegex)
    }
}

impl FromStr for OperatorKind {
    type Err = RuleError;

    /// Exact, case-sensitive match on the symbolic name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RuleError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<&str> for OperatorKind {
    type Error = RuleError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for OperatorKind {
    type Error = RuleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OperatorKind> for &'static str {
    fn from(kind: OperatorKind) -> Self {
        kind.name()
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
