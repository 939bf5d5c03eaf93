//! Additive relevance scoring and priority derivation.

use crate::domain::{FileRole, FileType, MAX_RELEVANCE_SCORE};

const BASE_SCORE: i64 = 50;
const PRIORITY_KEYWORDS: &[&str] = &["index", "main", "app", "core", "api", "server", "client"];
const DOC_KEYWORDS: &[&str] = &["readme", "doc", "guide", "tutorial", "api"];

/// Weights applied by the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    pub path_keyword_bonus: i64,
    pub doc_keyword_bonus: i64,
    pub export_default_bonus: i64,
    pub export_class_bonus: i64,
    pub export_interface_bonus: i64,
    pub entry_multiplier: f64,
    pub core_multiplier: f64,
    pub documentation_multiplier: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            path_keyword_bonus: 20,
            doc_keyword_bonus: 25,
            export_default_bonus: 15,
            export_class_bonus: 10,
            export_interface_bonus: 8,
            entry_multiplier: 1.5,
            core_multiplier: 1.3,
            documentation_multiplier: 1.4,
        }
    }
}

fn type_bonus(file_type: FileType) -> i64 {
    match file_type {
        FileType::Documentation => 100,
        FileType::Config => 80,
        FileType::Source => 70,
        FileType::Test => 40,
        FileType::Style => 30,
        FileType::Asset => 10,
        FileType::Build => 5,
        FileType::Other => 20,
    }
}

fn role_bonus(role: FileRole) -> i64 {
    match role {
        FileRole::Entry => 100,
        FileRole::Core => 80,
        FileRole::Service => 70,
        FileRole::Component | FileRole::Model => 60,
        FileRole::Utility => 40,
        FileRole::Config => 50,
        FileRole::Documentation => 90,
        FileRole::Other => 20,
    }
}

/// Pure scorer over `(path, content, type, role)`.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    weights: ScoreWeights,
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Relevance score, capped at [`MAX_RELEVANCE_SCORE`].
    pub fn score(&self, path: &str, content: &str, file_type: FileType, role: FileRole) -> i64 {
        let w = &self.weights;
        let lower = path.to_lowercase();

        let mut score = BASE_SCORE + type_bonus(file_type) + role_bonus(role);

        let keyword_hits = PRIORITY_KEYWORDS.iter().filter(|k| lower.contains(*k)).count() as i64;
        score += keyword_hits * w.path_keyword_bonus;

        if content.contains("export default") {
            score += w.export_default_bonus;
        }
        if content.contains("export class") {
            score += w.export_class_bonus;
        }
        if content.contains("export interface") {
            score += w.export_interface_bonus;
        }

        let doc_hits = DOC_KEYWORDS.iter().filter(|k| lower.contains(*k)).count() as i64;
        score += doc_hits * w.doc_keyword_bonus;

        score.min(MAX_RELEVANCE_SCORE)
    }

    /// Priority = round(score x role multiplier x type multiplier).
    pub fn priority(&self, score: i64, file_type: FileType, role: FileRole) -> i64 {
        let w = &self.weights;
        let role_multiplier = match role {
            FileRole::Entry => w.entry_multiplier,
            FileRole::Core => w.core_multiplier,
            _ => 1.0,
        };
        let type_multiplier =
            if file_type == FileType::Documentation { w.documentation_multiplier } else { 1.0 };
        (score as f64 * role_multiplier * type_multiplier).round() as i64
    }
}

/// Score with the default weights.
pub fn relevance_score(path: &str, content: &str, file_type: FileType, role: FileRole) -> i64 {
    RelevanceScorer::new().score(path, content, file_type, role)
}

/// Priority with the default multipliers.
pub fn priority_for(score: i64, file_type: FileType, role: FileRole) -> i64 {
    RelevanceScorer::new().priority(score, file_type, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_source_file_scores_all_bonuses() {
        // 50 base + 70 source + 100 entry + 20 "index" + 15 export default
        let score = relevance_score(
            "src/index.ts",
            "export default function App() {}",
            FileType::Source,
            FileRole::Entry,
        );
        assert_eq!(score, 255);
        assert_eq!(priority_for(score, FileType::Source, FileRole::Entry), 383);
    }

    #[test]
    fn readme_gets_documentation_multiplier() {
        // 50 + 100 + 90 + 25 ("readme")
        let score =
            relevance_score("README.md", "# Hello", FileType::Documentation, FileRole::Documentation);
        assert_eq!(score, 265);
        assert_eq!(priority_for(score, FileType::Documentation, FileRole::Documentation), 371);
    }

    #[test]
    fn multipliers_compose() {
        assert_eq!(priority_for(100, FileType::Documentation, FileRole::Entry), 210);
        assert_eq!(priority_for(100, FileType::Source, FileRole::Core), 130);
        assert_eq!(priority_for(100, FileType::Style, FileRole::Other), 100);
    }

    #[test]
    fn export_bonuses_are_independent() {
        let base = relevance_score("src/x.ts", "", FileType::Source, FileRole::Other);
        let all = relevance_score(
            "src/x.ts",
            "export default 1\nexport class A {}\nexport interface B {}",
            FileType::Source,
            FileRole::Other,
        );
        assert_eq!(all - base, 15 + 10 + 8);
    }

    #[test]
    fn score_is_capped_and_deterministic() {
        let path = "docs/api/server/client/core/main/app/index-guide-tutorial.md";
        let content = "export default x; export class Y {} export interface Z {}";
        let first = relevance_score(path, content, FileType::Documentation, FileRole::Entry);
        let second = relevance_score(path, content, FileType::Documentation, FileRole::Entry);
        assert_eq!(first, MAX_RELEVANCE_SCORE);
        assert_eq!(first, second);
    }

    #[test]
    fn keywords_count_once_each() {
        let once = relevance_score("src/server.ts", "", FileType::Source, FileRole::Other);
        let twice = relevance_score("src/server/server.ts", "", FileType::Source, FileRole::Other);
        assert_eq!(once, twice);
    }
}
