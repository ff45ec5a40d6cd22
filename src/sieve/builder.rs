// SPDX-License-Identifier: MIT

//! Rules builder - turns definitions into engine objects
//!
//! All filters produced by one `Builder` share its pattern cache, so a regex
//! used in several definition files compiles once per process run.

use std::path::Path;
use std::sync::Arc;

use super::definition::{ConditionDefinition, FilterDefinition, RulesDefinition};
use super::loader::RulesLoader;
use crate::engine::{Condition, Filter, PatternCache, RuleError, RulesEngine};

pub struct Builder {
    loader: RulesLoader,
    patterns: Arc<PatternCache>,
}

impl Builder {
    pub fn new() -> Self {
        Self::with_patterns(PatternCache::shared())
    }

    pub fn with_patterns(patterns: Arc<PatternCache>) -> Self {
        Self {
            loader: RulesLoader::new(),
            patterns,
        }
    }

    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// Load a definition file and build an engine from it
    pub fn build_engine_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(RulesEngine, RulesDefinition), RuleError> {
        let def = self.loader.load_rules(path)?;
        let engine = self.build_engine(&def)?;
        Ok((engine, def))
    }

    /// Build an engine; unknown operators or bad paths fail here
    pub fn build_engine(&self, def: &RulesDefinition) -> Result<RulesEngine, RuleError> {
        let mut engine = RulesEngine::with_patterns(Arc::clone(&self.patterns));
        for filter_def in &def.filters {
            engine.add_filter(self.build_filter(filter_def)?);
        }

        log::info!(
            "Built rules '{}' with {} filters combined by {}",
            def.name.as_deref().unwrap_or("unnamed"),
            engine.len(),
            def.logic
        );
        Ok(engine)
    }

    pub fn build_filter(&self, def: &FilterDefinition) -> Result<Filter, RuleError> {
        let mut filter = Filter::with_patterns(def.logic, Arc::clone(&self.patterns));
        for condition_def in &def.conditions {
            filter.push(self.build_condition(condition_def)?);
        }
        Ok(filter)
    }

    pub fn build_condition(&self, def: &ConditionDefinition) -> Result<Condition, RuleError> {
        Condition::with_patterns(
            &def.field,
            def.operator.as_str(),
            def.value.clone(),
            Arc::clone(&self.patterns),
        )
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
