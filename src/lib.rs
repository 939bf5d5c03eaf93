//! prompt-pack: build token-budgeted prompts from repository files
//!
//! Files are classified, scored and ranked, each gets a rendering strategy,
//! a greedy budget pass picks what fits, and the survivors are assembled into
//! a sectioned prompt in markdown, XML, JSON or plain text.

pub mod analysis;
pub mod budget;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod rank;
pub mod render;
pub mod strategy;
pub mod utils;

pub use domain::{
    FileAnalysis, FileRecord, GenerationOptions, OutputFormat, PromptContext, PromptOutput,
    ReferencedDoc,
};
pub use engine::{generate_prompt, PromptEngine};
pub use error::PromptError;
