//! Render-mode selection per file.

use crate::domain::{
    FileAnalysis, FileRole, FileType, FormatTemplate, GenerationOptions, OptimizationStrategy,
};

/// Decide how a file should be rendered. Pure function of its inputs.
///
/// The decision table is evaluated top-down, first match wins.
/// `include_full_content` and `summarize` are never both set.
///
/// Without adaptive compression every file is rendered verbatim except test
/// files, which keep their table strategy.
pub fn select_strategy(analysis: &FileAnalysis, options: &GenerationOptions) -> OptimizationStrategy {
    if !options.adaptive_compression && analysis.file_type != FileType::Test {
        return OptimizationStrategy::full();
    }

    let mut strategy = table_strategy(analysis);

    if !options.extract_code_signatures {
        strategy.extract_key_elements = false;
        if !strategy.include_full_content && !strategy.summarize {
            strategy.summarize = true;
        }
    }

    strategy
}

fn table_strategy(analysis: &FileAnalysis) -> OptimizationStrategy {
    let tokens = analysis.estimated_tokens;

    if analysis.file_type == FileType::Documentation {
        return OptimizationStrategy::full();
    }

    if analysis.file_type == FileType::Config {
        let full = tokens < 500;
        return OptimizationStrategy {
            include_full_content: full,
            summarize: false,
            extract_key_elements: !full,
            max_tokens: Some(500),
            format_template: FormatTemplate::Structured,
        };
    }

    if matches!(analysis.role, FileRole::Entry | FileRole::Core) {
        let full = tokens < 2000;
        return OptimizationStrategy {
            include_full_content: full,
            summarize: !full,
            extract_key_elements: true,
            max_tokens: Some(3000),
            format_template: FormatTemplate::Structured,
        };
    }

    if analysis.file_type == FileType::Test {
        return OptimizationStrategy {
            include_full_content: false,
            summarize: true,
            extract_key_elements: true,
            max_tokens: Some(800),
            format_template: FormatTemplate::Summary,
        };
    }

    if analysis.file_type == FileType::Source {
        return if tokens < 1000 {
            OptimizationStrategy::full()
        } else if tokens < 2500 {
            OptimizationStrategy {
                include_full_content: true,
                summarize: false,
                extract_key_elements: true,
                max_tokens: None,
                format_template: FormatTemplate::Structured,
            }
        } else {
            OptimizationStrategy {
                include_full_content: false,
                summarize: true,
                extract_key_elements: true,
                max_tokens: Some(2000),
                format_template: FormatTemplate::Summary,
            }
        };
    }

    let full = tokens < 800;
    OptimizationStrategy {
        include_full_content: full,
        summarize: !full,
        extract_key_elements: true,
        max_tokens: Some(1000),
        format_template: FormatTemplate::Compact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileMetadata;

    fn analysis(file_type: FileType, role: FileRole, estimated_tokens: usize) -> FileAnalysis {
        FileAnalysis {
            path: "x".to_string(),
            file_type,
            role,
            relevance_score: 100,
            priority: 100,
            estimated_tokens,
            metadata: FileMetadata::default(),
        }
    }

    fn select(file_type: FileType, role: FileRole, tokens: usize) -> OptimizationStrategy {
        select_strategy(&analysis(file_type, role, tokens), &GenerationOptions::default())
    }

    #[test]
    fn documentation_is_always_full() {
        let s = select(FileType::Documentation, FileRole::Documentation, 50_000);
        assert_eq!(s, OptimizationStrategy::full());
    }

    #[test]
    fn config_switches_to_extraction_when_large() {
        let small = select(FileType::Config, FileRole::Config, 499);
        assert!(small.include_full_content && !small.extract_key_elements);
        let large = select(FileType::Config, FileRole::Config, 500);
        assert!(!large.include_full_content && large.extract_key_elements && !large.summarize);
        assert_eq!(large.max_tokens, Some(500));
        assert_eq!(large.format_template, FormatTemplate::Structured);
    }

    #[test]
    fn entry_and_core_summarize_above_threshold() {
        let small = select(FileType::Source, FileRole::Entry, 1999);
        assert!(small.include_full_content && small.extract_key_elements);
        let large = select(FileType::Source, FileRole::Core, 2000);
        assert!(large.summarize && !large.include_full_content);
        assert_eq!(large.max_tokens, Some(3000));
    }

    #[test]
    fn entry_role_beats_test_type() {
        let s = select(FileType::Test, FileRole::Entry, 10);
        assert!(s.include_full_content);
    }

    #[test]
    fn tests_are_never_full() {
        for tokens in [0, 10, 100_000] {
            let s = select(FileType::Test, FileRole::Other, tokens);
            assert!(!s.include_full_content && s.summarize && s.extract_key_elements);
            assert_eq!(s.max_tokens, Some(800));
            assert_eq!(s.format_template, FormatTemplate::Summary);
        }
    }

    #[test]
    fn source_has_three_tiers() {
        assert_eq!(select(FileType::Source, FileRole::Utility, 999).format_template, FormatTemplate::Full);
        let mid = select(FileType::Source, FileRole::Utility, 1000);
        assert!(mid.include_full_content && mid.extract_key_elements);
        assert_eq!(mid.format_template, FormatTemplate::Structured);
        let big = select(FileType::Source, FileRole::Utility, 2500);
        assert!(big.summarize && big.max_tokens == Some(2000));
    }

    #[test]
    fn fallback_uses_compact_template() {
        let small = select(FileType::Style, FileRole::Other, 799);
        assert!(small.include_full_content);
        let large = select(FileType::Other, FileRole::Other, 800);
        assert!(large.summarize);
        assert_eq!(large.format_template, FormatTemplate::Compact);
        assert_eq!(large.max_tokens, Some(1000));
    }

    #[test]
    fn full_and_summarize_are_exclusive() {
        let types = [
            FileType::Source,
            FileType::Config,
            FileType::Documentation,
            FileType::Test,
            FileType::Style,
            FileType::Asset,
            FileType::Build,
            FileType::Other,
        ];
        let roles = [FileRole::Entry, FileRole::Core, FileRole::Utility, FileRole::Other];
        for file_type in types {
            for role in roles {
                for tokens in [0, 499, 500, 999, 1999, 2000, 2500, 10_000] {
                    let s = select(file_type, role, tokens);
                    assert!(!(s.include_full_content && s.summarize), "{file_type}/{role}/{tokens}");
                }
            }
        }
    }

    #[test]
    fn options_adjust_the_table() {
        let large_config = analysis(FileType::Config, FileRole::Config, 5_000);
        let no_signatures =
            GenerationOptions { extract_code_signatures: false, ..GenerationOptions::default() };
        let s = select_strategy(&large_config, &no_signatures);
        assert!(s.summarize && !s.extract_key_elements && !s.include_full_content);

        let verbatim =
            GenerationOptions { adaptive_compression: false, ..GenerationOptions::default() };
        let source_file = analysis(FileType::Source, FileRole::Utility, 5_000);
        assert_eq!(select_strategy(&source_file, &verbatim), OptimizationStrategy::full());
    }

    #[test]
    fn tests_stay_summarized_without_compression() {
        let verbatim =
            GenerationOptions { adaptive_compression: false, ..GenerationOptions::default() };
        for tokens in [10, 5_000] {
            let s = select_strategy(&analysis(FileType::Test, FileRole::Other, tokens), &verbatim);
            assert!(!s.include_full_content && s.summarize && s.extract_key_elements);
            assert_eq!(s.max_tokens, Some(800));
        }
    }
}
