//! End-to-end tests for the prompt generation pipeline

use prompt_pack::budget::{BudgetOptimizer, BudgetPolicy, PlannedFile};
use prompt_pack::domain::{FileRole, FileType, GenerationOptions, OutputFormat, PromptContext};
use prompt_pack::fetch::{FileSource, InMemorySource};
use prompt_pack::render::{format_file, OMITTED_NOTE};
use prompt_pack::strategy::select_strategy;
use prompt_pack::{generate_prompt, FileRecord, PromptEngine, PromptError, ReferencedDoc};

fn context() -> PromptContext {
    PromptContext::new("demo")
}

#[test]
fn test_readme_is_included_verbatim_and_mapped() {
    let files = vec![FileRecord::new("README.md", "# Hello")];
    let options = GenerationOptions::default();

    let mut engine = PromptEngine::new();
    let analyses = engine.analyze(&files);
    assert_eq!(analyses[0].file_type, FileType::Documentation);
    assert_eq!(analyses[0].role, FileRole::Documentation);
    assert!(select_strategy(&analyses[0], &options).include_full_content);

    let output = engine.generate(&files, &options, &context()).expect("generate");
    assert!(output.content.contains("# Hello"));
    assert!(output.content.contains("### Documentation (1)"));
    assert!(output.content.contains("`README.md`"));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_entry_file_renders_full_with_high_priority() {
    let content = "export default function App() {}";
    let files = vec![FileRecord::new("src/index.ts", content)];

    let analyses = PromptEngine::new().analyze(&files);
    let analysis = &analyses[0];
    assert_eq!(analysis.role, FileRole::Entry);
    assert!(analysis.priority >= 100);

    let output =
        generate_prompt(&files, &GenerationOptions::default(), &context()).expect("generate");
    assert!(output.content.contains(content));
    assert!(output.content.contains(&format!("Priority: !!! ({})", analysis.priority)));
}

#[test]
fn test_budget_admits_exactly_twenty_of_fifty() {
    // 25_000 chars -> 6_250 tokens -> 5_000 discounted cost per verbatim file
    let files: Vec<FileRecord> = (0..50)
        .map(|i| FileRecord::new(format!("lib/part_{i:02}.rs"), "x".repeat(25_000)))
        .collect();
    let options = GenerationOptions { adaptive_compression: false, ..GenerationOptions::default() };

    let output = generate_prompt(&files, &options, &context()).expect("generate");
    assert_eq!(output.metrics.files_included, 20);
    assert!(output.content.contains("### lib/part_19.rs"));
    assert!(!output.content.contains("### lib/part_20.rs"));
    assert!(output
        .warnings
        .contains(&"30 file(s) excluded due to token budget constraints".to_string()));
}

#[test]
fn test_budget_optimizer_with_capped_strategies() {
    let analyses = PromptEngine::new().analyze(
        &(0..50)
            .map(|i| FileRecord::new(format!("lib/part_{i:02}.rs"), "y".repeat(20_000)))
            .collect::<Vec<_>>(),
    );
    let planned: Vec<PlannedFile> = analyses
        .into_iter()
        .map(|analysis| {
            let mut strategy = select_strategy(&analysis, &GenerationOptions::default());
            strategy.max_tokens = Some(5_000);
            PlannedFile::new(analysis, strategy)
        })
        .collect();

    let selection = BudgetOptimizer::new(BudgetPolicy {
        max_tokens: 100_000,
        prioritize_documentation: true,
    })
    .select(planned);

    assert_eq!(selection.selected.len(), 20);
    assert_eq!(selection.excluded.len(), 30);
    assert!(selection.total_cost() <= 100_000.0);
}

#[test]
fn test_test_file_is_never_verbatim() {
    let content = "import { foo } from './foo';\n\nexport function testFoo() {\n  return foo();\n}\n";
    let files = vec![FileRecord::new("foo.test.ts", content)];

    let analyses = PromptEngine::new().analyze(&files);
    let analysis = &analyses[0];
    assert_eq!(analysis.file_type, FileType::Test);
    assert_eq!(analysis.metadata.exports, vec!["testFoo".to_string()]);

    let strategy = select_strategy(analysis, &GenerationOptions::default());
    assert!(strategy.summarize && strategy.extract_key_elements);
    assert!(!strategy.include_full_content);

    let block = format_file(analysis, &strategy, content);
    assert_ne!(block, content);
    assert!(block.contains(OMITTED_NOTE));
}

fn fence_line_count(text: &str) -> usize {
    text.lines().filter(|line| line.trim_start().starts_with("```")).count()
}

#[test]
fn test_truncated_extraction_keeps_prompt_fences_balanced() {
    let settings: String =
        (0..45).map(|i| format!("option_{i:02} = \"{}\"\n", "v".repeat(80))).collect();
    let files = vec![
        FileRecord::new("settings.ini", settings),
        FileRecord::new("src/zz.ts", "export const zz = 1;\n"),
    ];

    let output =
        generate_prompt(&files, &GenerationOptions::default(), &context()).expect("generate");
    assert!(output.content.contains("[truncated to ~500 tokens]"));
    assert_eq!(fence_line_count(&output.content) % 2, 0);
    assert!(output.content.contains("### src/zz.ts"));
}

#[test]
fn test_test_files_stay_summarized_without_compression() {
    let content = "import { foo } from './foo';\n\nexport function testFoo() {\n  return foo();\n}\n";
    let files = vec![FileRecord::new("foo.test.ts", content)];
    let options = GenerationOptions { adaptive_compression: false, ..GenerationOptions::default() };

    let output = generate_prompt(&files, &options, &context()).expect("generate");
    assert!(output.content.contains(OMITTED_NOTE));
    assert!(!output.content.contains("return foo();"));
}

#[test]
fn test_documentation_is_forced_past_the_budget() {
    let files = vec![
        FileRecord::new("src/app.ts", "export const app = 1;\n".repeat(200)),
        FileRecord::new("docs/guide.md", "Guide text.\n".repeat(2_000)),
    ];
    let options = GenerationOptions { max_total_tokens: 100, ..GenerationOptions::default() };

    let output = generate_prompt(&files, &options, &context()).expect("generate");
    assert!(output.content.contains("### docs/guide.md"));
    assert!(output.warnings.iter().any(|w| w.contains("exceeding the budget of 100")));

    let options = GenerationOptions { prioritize_documentation: false, ..options };
    let output = generate_prompt(&files, &options, &context()).expect("generate");
    assert!(!output.content.contains("### docs/guide.md"));
}

#[test]
fn test_sections_follow_canonical_order() {
    let files = vec![FileRecord::new("src/main.ts", "console.log('hi');")];
    let options = GenerationOptions {
        include_chain_of_thought: true,
        include_constraints: true,
        ..GenerationOptions::default()
    };
    let ctx = PromptContext {
        project_name: "demo".to_string(),
        preamble: Some("You are reviewing a small CLI.".to_string()),
        goal: Some("Explain the entry point.".to_string()),
        referenced_docs: vec![ReferencedDoc {
            title: "API".to_string(),
            content: "The API is stable.".to_string(),
            url: "https://example.com/api".to_string(),
        }],
    };

    let output = generate_prompt(&files, &options, &ctx).expect("generate");
    let ids: Vec<&str> = output.sections.iter().map(|s| s.id.as_str()).collect();
    similar_asserts::assert_eq!(
        ids,
        vec![
            "system-instructions",
            "preamble",
            "reference-docs",
            "project-overview",
            "structure-map",
            "goal",
            "constraints",
            "file-contents",
        ]
    );
    assert!(!output.content.contains("## System Instructions"));
    assert!(output.content.contains("## Goal\n\nExplain the entry point."));
}

#[test]
fn test_generation_is_deterministic() {
    let files = vec![
        FileRecord::new("README.md", "# Demo\n"),
        FileRecord::new("src/a.ts", "export const a = 1;\n"),
        FileRecord::new("src/b.ts", "export const b = 2;\n"),
        FileRecord::new("package.json", "{\"name\": \"demo\"}\n"),
    ];
    let options = GenerationOptions::default();

    let first = generate_prompt(&files, &options, &context()).expect("first");
    let second = generate_prompt(&files, &options, &context()).expect("second");
    similar_asserts::assert_eq!(first.content, second.content);
}

#[test]
fn test_json_and_xml_outputs() {
    let files = vec![FileRecord::new("src/util.ts", "export const x = ']]>';\n")];

    let options = GenerationOptions { output_format: OutputFormat::Json, ..Default::default() };
    let output = generate_prompt(&files, &options, &context()).expect("json");
    let value: serde_json::Value = serde_json::from_str(&output.content).expect("valid json");
    assert_eq!(value["project"], "demo");
    assert!(value["sections"].as_array().is_some_and(|s| !s.is_empty()));

    let options = GenerationOptions { output_format: OutputFormat::Xml, ..Default::default() };
    let output = generate_prompt(&files, &options, &context()).expect("xml");
    assert!(output.content.starts_with("<prompt project=\"demo\">"));
    assert!(output.content.contains("<file_contents>"));
    assert!(output.content.trim_end().ends_with("</prompt>"));
}

#[test]
fn test_cache_is_reused_across_runs() {
    let files = vec![FileRecord::new("src/a.ts", "export const a = 1;\n")];
    let options = GenerationOptions::default();
    let mut engine = PromptEngine::new();

    let first = engine.generate(&files, &options, &context()).expect("first");
    assert_eq!((first.metrics.cache_hits, first.metrics.cache_misses), (0, 1));

    let second = engine.generate(&files, &options, &context()).expect("second");
    assert_eq!((second.metrics.cache_hits, second.metrics.cache_misses), (1, 0));

    engine.clear_cache();
    assert!(engine.cache().is_empty());
}

struct FailingSource;

impl FileSource for FailingSource {
    fn load(&self) -> anyhow::Result<Vec<FileRecord>> {
        anyhow::bail!("connection reset while downloading src/a.ts")
    }
}

#[test]
fn test_source_failure_aborts_generation() {
    let err = PromptEngine::new()
        .generate_from_source(&FailingSource, &GenerationOptions::default(), &context())
        .unwrap_err();

    assert!(matches!(err, PromptError::Generation(_)));
    let message = err.to_string();
    assert!(message.starts_with("Prompt generation failed:"));
    assert!(message.contains("connection reset"));
}

#[test]
fn test_in_memory_source_feeds_engine() {
    let source = InMemorySource::new(vec![FileRecord::new("README.md", "# Hello")]);
    let output = PromptEngine::new()
        .generate_from_source(&source, &GenerationOptions::default(), &context())
        .expect("generate");
    assert_eq!(output.metrics.total_files, 1);
    assert_eq!(output.metrics.files_included, 1);
}
