//! Local directory source with gitignore support

use super::FileSource;
use crate::domain::FileRecord;
use crate::utils::normalize_path;
use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const BINARY_SAMPLE_SIZE: usize = 8192;

/// Walks a directory and loads every text file as a [`FileRecord`].
pub struct LocalDirectorySource {
    root_path: PathBuf,
    exclude_globs: Vec<String>,
    max_file_bytes: u64,
    respect_gitignore: bool,
}

impl LocalDirectorySource {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            exclude_globs: crate::domain::default_exclude_globs()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_bytes: 1_048_576,
            respect_gitignore: true,
        }
    }

    /// Set glob patterns to exclude
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Set maximum file size in bytes
    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Set whether to respect gitignore files
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn build_exclude_globset(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => tracing::warn!("Ignoring invalid exclude glob '{}': {}", pattern, err),
            }
        }
        Ok(builder.build()?)
    }

    fn read_record(&self, path: &Path, relative: String) -> Result<Option<FileRecord>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        if is_binary(&bytes) {
            tracing::debug!("Skipping binary file {}", relative);
            return Ok(None);
        }

        // Lossy decode; strips a UTF-8 BOM when present.
        let (content, _, _) = UTF_8.decode(&bytes);
        let content = content.into_owned();
        let lines = content.lines().count();
        Ok(Some(FileRecord { path: relative, content, size: bytes.len() as u64, lines }))
    }
}

impl FileSource for LocalDirectorySource {
    fn load(&self) -> Result<Vec<FileRecord>> {
        if !self.root_path.is_dir() {
            anyhow::bail!("Path is not a directory: {}", self.root_path.display());
        }

        let excludes = self.build_exclude_globset()?;
        let walker = WalkBuilder::new(&self.root_path)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .require_git(false)
            .build();

        let mut records = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            let Some(relative) = path
                .strip_prefix(&self.root_path)
                .ok()
                .and_then(|p| p.to_str())
                .map(normalize_path)
            else {
                continue;
            };

            if excludes.is_match(&relative) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > self.max_file_bytes {
                tracing::debug!("Skipping {} ({} bytes > limit)", relative, size);
                continue;
            }

            if let Some(record) = self.read_record(path, relative)? {
                records.push(record);
            }
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("Loaded {} files from {}", records.len(), self.root_path.display());
        Ok(records)
    }
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SAMPLE_SIZE)].contains(&0)
}
