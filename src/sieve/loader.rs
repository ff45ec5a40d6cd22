//! Definition and record file loading
//!
//! Formats are picked by extension: `.json` is JSON, `.jsonl`/`.ndjson` is
//! JSON Lines (records only), anything else is YAML.

use std::fs;
use std::path::Path;

use super::definition::{DefinitionFile, RulesDefinition};
use crate::engine::{RuleError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            Some("jsonl") | Some("ndjson") => Format::JsonLines,
            _ => Format::Yaml,
        }
    }
}

/// Loads rule definitions and record sets from disk
pub struct RulesLoader;

impl RulesLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a rules definition (either file shape) from disk
    pub fn load_rules<P: AsRef<Path>>(&self, path: P) -> Result<RulesDefinition, RuleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let rules = match Format::of(path) {
            Format::Json => Self::parse_json(&content)?,
            Format::JsonLines => {
                return Err(RuleError::config(format!(
                    "{}: rule definitions must be JSON or YAML, not JSON Lines",
                    path.display()
                )))
            }
            Format::Yaml => Self::parse_yaml(&content)?,
        };
        log::info!(
            "Loaded rules from {}: {} filters, {} conditions",
            path.display(),
            rules.filters.len(),
            rules.condition_count()
        );
        Ok(rules)
    }

    /// Parse a rules definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<RulesDefinition, RuleError> {
        let def: DefinitionFile = serde_yaml::from_str(content)?;
        Ok(def.into_rules())
    }

    /// Parse a rules definition from a JSON string
    pub fn parse_json(content: &str) -> Result<RulesDefinition, RuleError> {
        let def: DefinitionFile = serde_json::from_str(content)?;
        Ok(def.into_rules())
    }

    /// Load records from a JSON array, JSON Lines, or YAML sequence file
    pub fn load_records<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Value>, RuleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let records = match Format::of(path) {
            Format::Json => Self::parse_records_json(&content)?,
            Format::JsonLines => Self::parse_records_json_lines(&content)?,
            Format::Yaml => Self::parse_records_yaml(&content)?,
        };
        log::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn parse_records_json(content: &str) -> Result<Vec<Value>, RuleError> {
        Ok(serde_json::from_str(content)?)
    }

    /// One JSON document per non-blank line
    pub fn parse_records_json_lines(content: &str) -> Result<Vec<Value>, RuleError> {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(RuleError::from))
            .collect()
    }

    pub fn parse_records_yaml(content: &str) -> Result<Vec<Value>, RuleError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Default for RulesLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Logic;
    use std::io::Write;

    #[test]
    fn test_parse_yaml_rules() {
        let yaml = r#"
logic: and
filters:
  - conditions:
      - { field: age, operator: greater_than, value: 18 }
"#;
        let rules = RulesLoader::parse_yaml(yaml).unwrap();
        assert_eq!(rules.logic, Logic::And);
        assert_eq!(rules.filters[0].conditions[0].field, "age");
    }

    #[test]
    fn test_parse_json_rules() {
        let json = r#"{"logic": "or", "conditions": [{"field": "a", "operator": "is_empty"}]}"#;
        let rules = RulesLoader::parse_json(json).unwrap();
        assert_eq!(rules.filters.len(), 1);
        assert_eq!(rules.filters[0].logic, Logic::Or);
    }

    #[test]
    fn test_misspelled_filters_key_rejected() {
        let yaml = r#"
name: alerts
filter:
  - conditions:
      - { field: level, operator: equals, value: ERROR }
"#;
        assert!(matches!(RulesLoader::parse_yaml(yaml), Err(RuleError::Yaml(_))));
    }

    #[test]
    fn test_misspelled_conditions_key_rejected() {
        let yaml = r#"
filters:
  - condition:
      - { field: level, operator: equals, value: ERROR }
"#;
        assert!(matches!(RulesLoader::parse_yaml(yaml), Err(RuleError::Yaml(_))));

        let single = "logic: and\ncondition:\n  - { field: level, operator: equals, value: ERROR }\n";
        assert!(matches!(RulesLoader::parse_yaml(single), Err(RuleError::Yaml(_))));
    }

    #[test]
    fn test_misspelled_value_key_rejected() {
        let yaml = "conditions:\n  - { field: level, operator: equals, valu: ERROR }\n";
        assert!(matches!(RulesLoader::parse_yaml(yaml), Err(RuleError::Yaml(_))));

        let json = r#"{"conditions": [{"field": "level", "operator": "equals", "valu": "ERROR"}]}"#;
        assert!(matches!(RulesLoader::parse_json(json), Err(RuleError::Json(_))));
    }

    #[test]
    fn test_omitted_value_still_defaults_to_null() {
        let yaml = "conditions:\n  - { field: tags, operator: is_empty }\n";
        let rules = RulesLoader::parse_yaml(yaml).unwrap();
        assert_eq!(rules.filters[0].conditions[0].value, Value::Null);
    }

    #[test]
    fn test_parse_records_json_lines() {
        let content = "{\"a\": 1}\n\n{\"a\": 2}\n";
        let records = RulesLoader::parse_records_json_lines(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("a"), Some(&Value::from(2)));
    }

    #[test]
    fn test_parse_records_json_lines_bad_line() {
        let content = "{\"a\": 1}\nnot json\n";
        assert!(matches!(
            RulesLoader::parse_records_json_lines(content),
            Err(RuleError::Json(_))
        ));
    }

    #[test]
    fn test_parse_records_yaml() {
        let content = "- name: Mouse\n  price: 25\n- name: Desk\n  price: 299\n";
        let records = RulesLoader::parse_records_yaml(content).unwrap();
        assert_eq!(records[0].get("price"), Some(&Value::from(25)));
    }

    #[test]
    fn test_load_records_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"id": 1}}, {{"id": 2}}]"#).unwrap();

        let records = RulesLoader::new().load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_rules_rejects_json_lines() {
        let file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        assert!(matches!(
            RulesLoader::new().load_rules(file.path()),
            Err(RuleError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RulesLoader::new().load_rules("/nonexistent/rules.yaml"),
            Err(RuleError::Io(_))
        ));
    }
}
