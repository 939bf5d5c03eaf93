//! Per-file analysis: classification, metadata extraction and scoring.

use crate::classify::{classify_file_type, infer_role};
use crate::domain::{FileAnalysis, FileRecord};
use crate::rank::RelevanceScorer;
use crate::utils::{estimate_tokens, estimate_tokens_from_size, normalize_path};

pub mod cache;
pub mod content;

pub use cache::AnalysisCache;
pub use content::analyze_content;

/// Analyze a single record with the default scoring weights.
pub fn analyze_file(record: &FileRecord) -> FileAnalysis {
    analyze_file_with(record, &RelevanceScorer::new())
}

/// Analyze a single record. Reads nothing but the record itself, so calls
/// for different files are independent and may run in parallel.
pub fn analyze_file_with(record: &FileRecord, scorer: &RelevanceScorer) -> FileAnalysis {
    let path = normalize_path(&record.path);
    let file_type = classify_file_type(&path);
    let role = infer_role(&path, &record.content, file_type);
    let relevance_score = scorer.score(&path, &record.content, file_type, role);
    let priority = scorer.priority(relevance_score, file_type, role);

    // Content can be empty when the upstream fetch failed; fall back to the size.
    let estimated_tokens = if record.content.is_empty() {
        estimate_tokens_from_size(record.size, record.lines)
    } else {
        estimate_tokens(&record.content)
    };

    FileAnalysis {
        path,
        file_type,
        role,
        relevance_score,
        priority,
        estimated_tokens,
        metadata: analyze_content(&record.content, record.size, record.lines),
    }
}
