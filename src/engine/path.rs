// SPDX-License-Identifier: MIT

//! Dot-notation field paths

use std::fmt;
use std::str::FromStr;

use super::error::RuleError;
use super::value::Value;

/// A validated, pre-split field path such as `user.profile.age`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse and validate a dot-separated path.
    ///
    /// Empty paths and empty segments (`a..b`, `.a`, `a.`) are rejected.
    pub fn parse(path: &str) -> Result<Self, RuleError> {
        if path.is_empty() {
            return Err(RuleError::invalid_path(path, "path is empty"));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(RuleError::invalid_path(
                path,
                format!("segment {} is empty", pos + 1),
            ));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The path as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Walk the path through nested maps.
    ///
    /// Returns `None` (missing) when a key is absent or an intermediate value
    /// is not a map. A key present with a `Null` value resolves to `Null`.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(record, |current, key| current.get(key))
    }
}

impl FromStr for FieldPath {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
