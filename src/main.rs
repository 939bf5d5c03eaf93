//! prompt-pack: pack repository files into a token-budgeted LLM prompt
//!
//! Scans a local directory, ranks what it finds, and writes a prompt that
//! fits the requested token budget.

use anyhow::Result;

fn main() -> Result<()> {
    prompt_pack::cli::run()
}
