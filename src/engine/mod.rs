//! Prompt generation pipeline: analyze, plan, select, render, assemble.

use crate::analysis::{analyze_file_with, AnalysisCache};
use crate::budget::{BudgetOptimizer, BudgetPolicy, BudgetSelection, PlannedFile};
use crate::domain::{
    FileAnalysis, FileRecord, FileType, GenerationMetrics, GenerationOptions, PromptContext,
    PromptOutput,
};
use crate::error::{PromptError, Result};
use crate::fetch::FileSource;
use crate::rank::RelevanceScorer;
use crate::render::assembler::{constraints_text, reference_docs_text, system_instructions};
use crate::render::{format_file, generate_structure_map, PromptAssembler, SectionKind};
use crate::strategy::select_strategy;
use crate::utils::{estimate_tokens, normalize_path};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Files analyzed concurrently per batch; batches run one after another.
pub const ANALYSIS_BATCH_SIZE: usize = 10;

/// Owns the analysis cache and runs the generation pipeline.
#[derive(Debug, Default)]
pub struct PromptEngine {
    cache: AnalysisCache,
    scorer: RelevanceScorer,
}

impl PromptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: AnalysisCache) -> Self {
        Self { cache, scorer: RelevanceScorer::new() }
    }

    /// Replace the scorer. Cached analyses carry the old scores, so the
    /// cache is cleared.
    pub fn with_scorer(mut self, scorer: RelevanceScorer) -> Self {
        self.scorer = scorer;
        self.cache.clear();
        self
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Analyze every record, in input order, consulting the cache first.
    pub fn analyze(&mut self, files: &[FileRecord]) -> Vec<FileAnalysis> {
        let mut analyses = Vec::with_capacity(files.len());

        for (batch_idx, batch) in files.chunks(ANALYSIS_BATCH_SIZE).enumerate() {
            let cached: Vec<Option<FileAnalysis>> =
                batch.iter().map(|record| self.cache.get(record)).collect();

            let scorer = &self.scorer;
            let results: Vec<(FileAnalysis, bool)> = batch
                .par_iter()
                .zip(cached.into_par_iter())
                .map(|(record, hit)| match hit {
                    Some(analysis) => (analysis, true),
                    None => (analyze_file_with(record, scorer), false),
                })
                .collect();

            debug!(batch = batch_idx, files = batch.len(), "analyzed batch");

            for (record, (analysis, was_cached)) in batch.iter().zip(results) {
                if !was_cached {
                    self.cache.insert(record, analysis.clone());
                }
                analyses.push(analysis);
            }
        }

        analyses
    }

    /// Pair each analysis with its strategy for the given options.
    pub fn plan(analyses: Vec<FileAnalysis>, options: &GenerationOptions) -> Vec<PlannedFile> {
        analyses
            .into_iter()
            .map(|analysis| {
                let strategy = select_strategy(&analysis, options);
                PlannedFile::new(analysis, strategy)
            })
            .collect()
    }

    /// Run the whole pipeline over in-memory records.
    pub fn generate(
        &mut self,
        files: &[FileRecord],
        options: &GenerationOptions,
        context: &PromptContext,
    ) -> Result<PromptOutput> {
        let start = Instant::now();
        let hits_before = self.cache.hits();
        let misses_before = self.cache.misses();
        let mut warnings = Vec::new();

        if files.is_empty() {
            warnings.push("No files were provided for prompt generation".to_string());
        }

        let analyses = self.analyze(files);
        let files_processed = analyses.len();

        let optimizer = BudgetOptimizer::new(BudgetPolicy {
            max_tokens: options.max_total_tokens,
            prioritize_documentation: options.prioritize_documentation,
        });
        let selection = optimizer.select(Self::plan(analyses.clone(), options));

        if !selection.excluded.is_empty() {
            let message = format!(
                "{} file(s) excluded due to token budget constraints",
                selection.excluded.len()
            );
            warn!("{}", message);
            warnings.push(message);
        }
        let total_cost = selection.total_cost().round() as usize;
        if total_cost > options.max_total_tokens {
            let message = format!(
                "Selected files use {} estimated tokens, exceeding the budget of {}",
                total_cost, options.max_total_tokens
            );
            warn!("{}", message);
            warnings.push(message);
        }

        let contents: HashMap<String, &str> =
            files.iter().map(|f| (normalize_path(&f.path), f.content.as_str())).collect();
        let rendered: Vec<String> = selection
            .selected
            .iter()
            .map(|planned| {
                let content = contents.get(&planned.analysis.path).copied().unwrap_or_default();
                format_file(&planned.analysis, &planned.strategy, content)
            })
            .collect();

        let assembler =
            build_sections(options, context, &analyses, &selection, &rendered.join("\n\n"));
        let content = assembler.render(options.output_format)?;

        let metrics = GenerationMetrics {
            total_files: files.len(),
            files_processed,
            files_included: selection.selected.len(),
            total_tokens: estimate_tokens(&content),
            processing_time_ms: start.elapsed().as_millis() as u64,
            cache_hits: self.cache.hits() - hits_before,
            cache_misses: self.cache.misses() - misses_before,
        };
        info!(
            files = metrics.total_files,
            included = metrics.files_included,
            tokens = metrics.total_tokens,
            elapsed_ms = metrics.processing_time_ms,
            "prompt generated"
        );

        Ok(PromptOutput { content, sections: assembler.sections(), metrics, warnings })
    }

    /// Load records from `source`, then generate. A loading failure aborts
    /// the run with [`PromptError::Generation`]; no partial prompt is returned.
    pub fn generate_from_source(
        &mut self,
        source: &dyn FileSource,
        options: &GenerationOptions,
        context: &PromptContext,
    ) -> Result<PromptOutput> {
        let files = source.load().map_err(|err| PromptError::Generation(format!("{err:#}")))?;
        self.generate(&files, options, context)
    }
}

/// One-shot generation with a fresh engine.
pub fn generate_prompt(
    files: &[FileRecord],
    options: &GenerationOptions,
    context: &PromptContext,
) -> Result<PromptOutput> {
    PromptEngine::new().generate(files, options, context)
}

fn build_sections(
    options: &GenerationOptions,
    context: &PromptContext,
    analyses: &[FileAnalysis],
    selection: &BudgetSelection,
    file_blocks: &str,
) -> PromptAssembler {
    let mut assembler = PromptAssembler::new(context.project_name.clone());

    if let Some(instructions) =
        system_instructions(options.include_chain_of_thought, options.include_few_shot_examples)
    {
        assembler.add(SectionKind::SystemInstructions, instructions);
    }
    if let Some(preamble) = &context.preamble {
        assembler.add(SectionKind::Preamble, preamble.clone());
    }
    assembler.add(SectionKind::ReferenceDocs, reference_docs_text(&context.referenced_docs));
    assembler.add(SectionKind::ProjectOverview, overview_text(options, context, analyses, selection));
    if options.include_structure_map {
        assembler.add(SectionKind::StructureMap, generate_structure_map(analyses));
    }
    if let Some(goal) = &context.goal {
        assembler.add(SectionKind::Goal, goal.clone());
    }
    if options.include_constraints {
        assembler.add(SectionKind::Constraints, constraints_text(options.max_total_tokens));
    }
    assembler.add(SectionKind::FileContents, file_blocks.to_string());

    assembler
}

fn overview_text(
    options: &GenerationOptions,
    context: &PromptContext,
    analyses: &[FileAnalysis],
    selection: &BudgetSelection,
) -> String {
    let name = if context.project_name.trim().is_empty() {
        "Untitled project"
    } else {
        context.project_name.as_str()
    };

    let mut lines = vec![
        format!("Project: {name}"),
        format!("Files included: {} of {}", selection.selected.len(), analyses.len()),
        format!(
            "Estimated file tokens: {} (budget {})",
            selection.total_cost().round() as usize,
            options.max_total_tokens
        ),
    ];

    let order = [
        FileType::Documentation,
        FileType::Config,
        FileType::Source,
        FileType::Test,
        FileType::Style,
        FileType::Asset,
        FileType::Build,
        FileType::Other,
    ];
    let counts: Vec<String> = order
        .iter()
        .filter_map(|file_type| {
            let count = analyses.iter().filter(|a| a.file_type == *file_type).count();
            (count > 0).then(|| format!("{file_type} {count}"))
        })
        .collect();
    if !counts.is_empty() {
        lines.push(format!("File types: {}", counts.join(", ")));
    }

    lines.join("\n")
}
