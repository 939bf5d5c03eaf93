//! Analyze command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::parse_csv;
use crate::config::load_config;
use crate::engine::PromptEngine;
use crate::fetch::{FileSource, LocalDirectorySource};
use crate::rank::sort_by_priority;
use crate::render::{generate_structure_map, priority_indicator};
use crate::strategy::select_strategy;
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Local directory path to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Path to config file (prompt-pack.toml or prompt-pack.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of top-priority files to list
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub top: usize,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", args.path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let mut config = load_config(&root, args.config.as_deref())?;
    if let Some(globs) = parse_csv(&args.exclude_glob) {
        config.exclude_globs.extend(globs);
    }

    let records = LocalDirectorySource::new(root.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(config.max_file_bytes)
        .respect_gitignore(config.respect_gitignore && !args.no_gitignore)
        .load()?;

    let total_bytes: u64 = records.iter().map(|r| r.size).sum();
    let mut analyses = PromptEngine::new().analyze(&records);
    let total_tokens: usize = analyses.iter().map(|a| a.estimated_tokens).sum();
    sort_by_priority(&mut analyses);

    let repo_name = root.file_name().and_then(|n| n.to_str()).unwrap_or("");
    println!("Repository: {}", repo_name);
    println!("Statistics:");
    println!("  Files analyzed:   {}", analyses.len());
    println!("  Total bytes:      {}", format_with_commas(total_bytes));
    println!("  Estimated tokens: {}", format_with_commas(total_tokens as u64));
    println!("  Budget:           {}", format_with_commas(config.generation.max_total_tokens as u64));

    if !analyses.is_empty() {
        println!("Top priority files:");
        for a in analyses.iter().take(args.top) {
            let strategy = select_strategy(a, &config.generation);
            println!(
                "  {:<3} {:>4} (score {:>3})  {:<13} {:<13} {:>7} tok  {:<10} {}",
                priority_indicator(a.priority),
                a.priority,
                a.relevance_score,
                a.file_type,
                a.role,
                format_with_commas(a.estimated_tokens as u64),
                strategy.format_template.as_str(),
                a.path
            );
        }
        println!();
        println!("{}", generate_structure_map(&analyses));
    }

    Ok(())
}
