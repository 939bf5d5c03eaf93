//! Config file loading

use crate::domain::Config;
use crate::error::PromptError;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables with this prefix override file values
/// (e.g. `PROMPT_PACK_MAX_TOTAL_TOKENS=50000`).
pub const ENV_PREFIX: &str = "PROMPT_PACK_";

/// Table name that may wrap the settings inside a shared config file.
const NESTED_SECTION: &str = "prompt-pack";

pub fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(repo_root),
    };

    let Some(config_file) = discovered else {
        return extract(Figment::new());
    };

    let parsed = read_file_layer(&config_file).and_then(|layer| {
        extract(Figment::new().merge(Serialized::defaults(layer)))
    });

    match parsed {
        Ok(cfg) => Ok(cfg),
        Err(e) if config_path_provided => Err(PromptError::Config {
            path: config_file.clone(),
            message: format!("{e:#}"),
        }
        .into()),
        Err(e) => {
            // Auto-discovered: warn and keep going with defaults
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            extract(Figment::new())
        }
    }
}

/// Defaults, then the given file layer, then environment overrides.
fn extract(layers: Figment) -> Result<Config> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(layers)
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Invalid configuration")
}

/// Parse the file into a generic value, unwrapping a `[prompt-pack]` table.
fn read_file_layer(config_file: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let raw: serde_json::Value = match ext.as_str() {
        "toml" => {
            let value: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;
            serde_json::to_value(value)?
        }
        "yaml" | "yml" => {
            let value: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;
            serde_json::to_value(value)?
        }
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    };

    // Empty YAML documents parse to null
    let raw = if raw.is_null() { serde_json::Value::Object(Default::default()) } else { raw };

    Ok(match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    })
}

fn discover_config(repo_root: &Path) -> Option<PathBuf> {
    let candidates = [
        "prompt-pack.toml",
        ".prompt-pack.toml",
        "prompt-pack.yml",
        ".prompt-pack.yml",
        "prompt-pack.yaml",
        ".prompt-pack.yaml",
    ];

    candidates.iter().map(|candidate| repo_root.join(candidate)).find(|path| path.exists())
}
