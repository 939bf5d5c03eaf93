//! In-memory analysis memoization.

use crate::domain::{FileAnalysis, FileRecord};
use std::collections::HashMap;

type CacheKey = (String, u64, usize);

/// Memoizes [`FileAnalysis`] values by `(path, size, lines)`.
///
/// Owned by the caller (usually a [`crate::engine::PromptEngine`]) and
/// scoped to its lifetime. Purely an optimization: a cleared cache produces
/// the same output.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<CacheKey, FileAnalysis>,
    hits: usize,
    misses: usize,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(record: &FileRecord) -> CacheKey {
        (record.path.clone(), record.size, record.lines)
    }

    /// Look up a record, counting the hit or miss.
    pub fn get(&mut self, record: &FileRecord) -> Option<FileAnalysis> {
        match self.entries.get(&Self::key(record)) {
            Some(analysis) => {
                self.hits += 1;
                Some(analysis.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, record: &FileRecord, analysis: FileAnalysis) {
        self.entries.insert(Self::key(record), analysis);
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_file;

    #[test]
    fn cache_counts_hits_and_misses() {
        let mut cache = AnalysisCache::new();
        let record = FileRecord::new("src/index.ts", "export default 1;");

        assert!(cache.get(&record).is_none());
        cache.insert(&record, analyze_file(&record));
        assert_eq!(cache.get(&record).map(|a| a.path), Some("src/index.ts".to_string()));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_includes_size_and_lines() {
        let mut cache = AnalysisCache::new();
        let record = FileRecord::new("a.ts", "one");
        cache.insert(&record, analyze_file(&record));

        let grown = FileRecord::new("a.ts", "one\ntwo");
        assert!(cache.get(&grown).is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = AnalysisCache::new();
        let record = FileRecord::new("a.ts", "x");
        cache.insert(&record, analyze_file(&record));
        let _ = cache.get(&record);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }
}
