//! Generate command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use super::utils::{parse_csv, parse_output_format};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{GenerationMetrics, PromptContext};
use crate::engine::PromptEngine;
use crate::fetch::{load_referenced_docs, LocalDirectorySource};
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct GenerateArgs {
    /// Local directory to pack
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Path to config file (prompt-pack.toml or prompt-pack.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Token budget for the selected files
    #[arg(short = 't', long, value_name = "N")]
    pub max_tokens: Option<usize>,

    /// Output format: markdown, xml, json or plain
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Task the prompt should accomplish
    #[arg(long, value_name = "TEXT")]
    pub goal: Option<String>,

    /// Free text placed before the project overview
    #[arg(long, value_name = "TEXT")]
    pub preamble: Option<String>,

    /// Project name (defaults to the directory name)
    #[arg(long, value_name = "NAME")]
    pub project_name: Option<String>,

    /// Reference documents to include verbatim
    #[arg(long = "doc", value_name = "FILE", num_args = 1..)]
    pub docs: Vec<PathBuf>,

    /// Omit the project structure map
    #[arg(long)]
    pub no_structure_map: bool,

    /// Do not force documentation files past the budget
    #[arg(long)]
    pub no_doc_priority: bool,

    /// Do not extract code signatures from large source files
    #[arg(long)]
    pub no_signatures: bool,

    /// Render every selected file in full
    #[arg(long)]
    pub no_compression: bool,

    /// Add step-by-step reasoning instructions
    #[arg(long)]
    pub chain_of_thought: bool,

    /// Add a worked example answer
    #[arg(long)]
    pub few_shot: bool,

    /// Add a constraints section
    #[arg(long)]
    pub constraints: bool,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,

    /// Write the prompt to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print generation statistics to stderr
    #[arg(long)]
    pub stats: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", args.path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let output_format = parse_output_format(&args.format)?;
    let config = load_config(&root, args.config.as_deref())?;

    let overrides = CliOverrides {
        max_total_tokens: args.max_tokens,
        output_format,
        project_name: args.project_name.clone(),
        preamble: args.preamble.clone(),
        goal: args.goal.clone(),
        exclude_globs: parse_csv(&args.exclude_glob),
        no_structure_map: args.no_structure_map,
        no_doc_priority: args.no_doc_priority,
        no_signatures: args.no_signatures,
        no_compression: args.no_compression,
        chain_of_thought: args.chain_of_thought,
        few_shot: args.few_shot,
        constraints: args.constraints,
        no_gitignore: args.no_gitignore,
    };
    let config = merge_cli_with_config(config, &overrides);

    let source = LocalDirectorySource::new(root.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(args.max_file_bytes.unwrap_or(config.max_file_bytes))
        .respect_gitignore(config.respect_gitignore);

    let context = PromptContext {
        project_name: config.project_name.clone().unwrap_or_else(|| directory_name(&root)),
        preamble: config.preamble.clone(),
        goal: config.goal.clone(),
        referenced_docs: load_referenced_docs(args.docs.as_slice())?,
    };

    let mut engine = PromptEngine::new();
    let output = engine.generate_from_source(&source, &config.generation, &context)?;

    for warning in &output.warnings {
        eprintln!("Warning: {warning}");
    }

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &output.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote prompt to {}", path.display());
        }
        None => println!("{}", output.content),
    }

    if args.stats {
        print_stats(&output.metrics, config.generation.max_total_tokens);
    }

    Ok(())
}

fn directory_name(root: &Path) -> String {
    root.file_name().and_then(|n| n.to_str()).unwrap_or("project").to_string()
}

fn print_stats(metrics: &GenerationMetrics, budget: usize) {
    eprintln!("Statistics:");
    eprintln!("  Files found:     {}", metrics.total_files);
    eprintln!("  Files analyzed:  {}", metrics.files_processed);
    eprintln!("  Files included:  {}", metrics.files_included);
    eprintln!(
        "  Prompt tokens:   {} (budget {})",
        format_with_commas(metrics.total_tokens as u64),
        format_with_commas(budget as u64)
    );
    eprintln!("  Cache:           {} hits, {} misses", metrics.cache_hits, metrics.cache_misses);
    eprintln!("  Time:            {} ms", metrics.processing_time_ms);
}
