//! Library error type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Raised when the file-loading collaborator fails; aborts the run.
    #[error("Prompt generation failed: {0}")]
    Generation(String),

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to render prompt: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PromptError>;
