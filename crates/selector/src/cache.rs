use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{SelectorError, SelectorResult};

/// Lookup counters, reset whenever the cache contents are replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized selector compilations keyed by the trimmed selector branch.
///
/// The cache is unbounded and never evicts on its own; owners that process
/// many distinct selectors are expected to call [`CompilationCache::clear`] or
/// replace the contents between sessions.
#[derive(Debug, Clone, Default)]
pub struct CompilationCache {
    entries: HashMap<String, String>,
    stats: CacheStats,
}

impl CompilationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached XPath for `branch` and records a hit or miss.
    pub fn lookup(&mut self, branch: &str) -> Option<&str> {
        match self.entries.get(branch) {
            Some(xpath) => {
                self.stats.hits += 1;
                Some(xpath.as_str())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Read without touching the counters.
    pub fn get(&self, branch: &str) -> Option<&str> {
        self.entries.get(branch).map(String::as_str)
    }

    pub fn insert(&mut self, branch: impl Into<String>, xpath: impl Into<String>) {
        self.entries.insert(branch.into(), xpath.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// Swap in a complete mapping; the previous one is returned.
    pub fn replace(&mut self, entries: HashMap<String, String>) -> HashMap<String, String> {
        self.stats = CacheStats::default();
        std::mem::replace(&mut self.entries, entries)
    }

    /// Restore a cache persisted with [`CompilationCache::to_json`].
    ///
    /// Anything other than an object of string values is rejected with
    /// `InvalidArgument`.
    pub fn from_json(value: &Value) -> SelectorResult<Self> {
        let Value::Object(map) = value else {
            return Err(SelectorError::invalid_argument(format!(
                "compiled cache must be a JSON object, got {}",
                json_kind(value)
            )));
        };
        let mut entries = HashMap::with_capacity(map.len());
        for (branch, xpath) in map {
            let Value::String(xpath) = xpath else {
                return Err(SelectorError::invalid_argument(format!(
                    "compiled cache entry {branch:?} must be a string, got {}",
                    json_kind(xpath)
                )));
            };
            entries.insert(branch.clone(), xpath.clone());
        }
        Ok(Self { entries, stats: CacheStats::default() })
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> =
            self.entries.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect();
        Value::Object(map)
    }
}

impl From<HashMap<String, String>> for CompilationCache {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries, stats: CacheStats::default() }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
