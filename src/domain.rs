//! Core domain types shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default token budget for an assembled prompt.
pub const DEFAULT_MAX_TOTAL_TOKENS: usize = 100_000;

/// Soft cap applied to every relevance score.
pub const MAX_RELEVANCE_SCORE: i64 = 300;

/// Caps on extracted metadata lists.
pub const MAX_EXPORTS: usize = 10;
pub const MAX_IMPORTS: usize = 15;
pub const MAX_MAIN_FUNCTIONS: usize = 10;

/// A candidate file handed to the engine by the file-selection layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// POSIX-style relative path, unique within a run.
    pub path: String,
    pub content: String,
    /// Byte length; may differ from `content.len()` when content was not fully fetched.
    pub size: u64,
    pub lines: usize,
}

impl FileRecord {
    /// Build a record whose size and line count are derived from `content`.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let size = content.len() as u64;
        let lines = content.lines().count();
        Self { path: path.into(), content, size, lines }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Source,
    Config,
    Documentation,
    Test,
    Style,
    Asset,
    Build,
    Other,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Config => "config",
            Self::Documentation => "documentation",
            Self::Test => "test",
            Self::Style => "style",
            Self::Asset => "asset",
            Self::Build => "build",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Entry,
    Core,
    Utility,
    Component,
    Service,
    Model,
    Config,
    Documentation,
    Other,
}

impl FileRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Core => "core",
            Self::Utility => "utility",
            Self::Component => "component",
            Self::Service => "service",
            Self::Model => "model",
            Self::Config => "config",
            Self::Documentation => "documentation",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lightweight structural facts pulled from a file's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size: u64,
    pub lines: usize,
    pub exports: Vec<String>,
    pub imports: Vec<String>,
    pub main_functions: Vec<String>,
    pub complexity: u32,
}

/// Classification, scoring and metadata for one file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub file_type: FileType,
    pub role: FileRole,
    pub relevance_score: i64,
    /// Sole ranking key for display and budget admission.
    pub priority: i64,
    pub estimated_tokens: usize,
    pub metadata: FileMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTemplate {
    Full,
    Compact,
    Summary,
    Structured,
}

impl FormatTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
            Self::Summary => "summary",
            Self::Structured => "structured",
        }
    }
}

/// How a single file should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStrategy {
    pub include_full_content: bool,
    pub summarize: bool,
    pub extract_key_elements: bool,
    pub max_tokens: Option<usize>,
    pub format_template: FormatTemplate,
}

impl OptimizationStrategy {
    pub fn full() -> Self {
        Self {
            include_full_content: true,
            summarize: false,
            extract_key_elements: false,
            max_tokens: None,
            format_template: FormatTemplate::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Xml,
    Json,
    Plain,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "plain" | "text" | "txt" => Some(Self::Plain),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Plain => "plain",
        }
    }
}

/// Knobs controlling a single prompt generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub max_total_tokens: usize,
    pub prioritize_documentation: bool,
    pub include_structure_map: bool,
    pub extract_code_signatures: bool,
    pub adaptive_compression: bool,
    pub include_chain_of_thought: bool,
    pub include_few_shot_examples: bool,
    pub include_constraints: bool,
    pub output_format: OutputFormat,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_total_tokens: DEFAULT_MAX_TOTAL_TOKENS,
            prioritize_documentation: true,
            include_structure_map: true,
            extract_code_signatures: true,
            adaptive_compression: true,
            include_chain_of_thought: false,
            include_few_shot_examples: false,
            include_constraints: false,
            output_format: OutputFormat::Markdown,
        }
    }
}

/// A documentation reference supplied alongside the files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedDoc {
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    pub project_name: String,
    pub preamble: Option<String>,
    pub goal: Option<String>,
    pub referenced_docs: Vec<ReferencedDoc>,
}

impl PromptContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), ..Self::default() }
    }
}

/// One titled block of the assembled prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSection {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Canonical ordering key; higher sorts first.
    pub priority: u32,
    pub tokens: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub total_files: usize,
    pub files_processed: usize,
    pub files_included: usize,
    pub total_tokens: usize,
    pub processing_time_ms: u64,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOutput {
    pub content: String,
    pub sections: Vec<PromptSection>,
    pub metrics: GenerationMetrics,
    pub warnings: Vec<String>,
}

/// File-level configuration: generation options, prompt defaults and local-scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub generation: GenerationOptions,
    pub project_name: Option<String>,
    pub preamble: Option<String>,
    pub goal: Option<String>,
    pub exclude_globs: Vec<String>,
    pub max_file_bytes: u64,
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationOptions::default(),
            project_name: None,
            preamble: None,
            goal: None,
            exclude_globs: default_exclude_globs().iter().map(|s| s.to_string()).collect(),
            max_file_bytes: 1_048_576,
            respect_gitignore: true,
        }
    }
}

pub fn default_exclude_globs() -> &'static [&'static str] {
    &[
        "**/node_modules/**",
        "**/.git/**",
        "**/dist/**",
        "**/target/**",
        "**/__pycache__/**",
        "**/*.min.js",
        "**/package-lock.json",
        "**/yarn.lock",
    ]
}
