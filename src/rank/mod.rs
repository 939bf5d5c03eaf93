//! File ranking by relevance

use crate::domain::FileAnalysis;

pub mod scorer;

pub use scorer::{priority_for, relevance_score, RelevanceScorer, ScoreWeights};

/// Sort analyses by priority, highest first. Stable: ties keep input order.
pub fn sort_by_priority(analyses: &mut [FileAnalysis]) {
    analyses.sort_by(|a, b| b.priority.cmp(&a.priority));
}
