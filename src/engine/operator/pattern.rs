// SPDX-License-Identifier: MIT

//! Shared compiled-pattern cache for the regex operators

use regex::Regex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::error::EvalError;

/// Pattern text -> compiled regex, populated lazily and never evicted.
///
/// Construct one and share it through `Arc` with every operator that should
/// see the same compiled handles. Compilation happens under the write lock
/// after a second lookup, so each pattern text compiles at most once per
/// cache even when many threads miss at the same time.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: RwLock<HashMap<String, Arc<Regex>>>,
    compiled: AtomicUsize,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to a fresh cache
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Return the compiled handle for `pattern`, compiling it on first use.
    ///
    /// Malformed patterns are not cached; every attempt reports the error.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, EvalError> {
        {
            let patterns = self.patterns.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(re) = patterns.get(pattern) {
                return Ok(Arc::clone(re));
            }
        }

        let mut patterns = self.patterns.write().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have compiled it while we waited for the lock.
        if let Some(re) = patterns.get(pattern) {
            return Ok(Arc::clone(re));
        }

        let compiled = Regex::new(pattern).map_err(|source| EvalError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.compiled.fetch_add(1, Ordering::Relaxed);
        log::debug!("Compiled regex pattern: {}", pattern);

        let re = patterns
            .entry(pattern.to_string())
            .or_insert_with(|| Arc::new(compiled));
        Ok(Arc::clone(re))
    }

    /// Whether `pattern` already has a compiled handle
    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(pattern)
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total successful compilations performed by this cache
    pub fn compile_count(&self) -> usize {
        self.compiled.load(Ordering::Relaxed)
    }
}
