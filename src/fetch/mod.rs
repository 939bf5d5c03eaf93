//! File-loading collaborators that feed the engine.
//!
//! The engine itself never touches the filesystem; these sources materialize
//! [`FileRecord`]s up front.

use crate::domain::{FileRecord, ReferencedDoc};
use anyhow::{Context, Result};
use std::path::Path;

pub mod local;

pub use local::LocalDirectorySource;

/// Something that can produce the candidate file list for a run.
pub trait FileSource {
    fn load(&self) -> Result<Vec<FileRecord>>;
}

/// Records that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<FileRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }
}

impl FileSource for InMemorySource {
    fn load(&self) -> Result<Vec<FileRecord>> {
        Ok(self.records.clone())
    }
}

/// Read local documents for the reference-docs section.
///
/// The title is the file name and the url is the path as given.
pub fn load_referenced_docs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ReferencedDoc>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read reference doc: {}", path.display()))?;
            let title = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            Ok(ReferencedDoc { title, content, url: path.display().to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn in_memory_source_returns_records() {
        let source = InMemorySource::new(vec![FileRecord::new("a.ts", "x")]);
        let records = source.load().expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "a.ts");
    }

    #[test]
    fn referenced_docs_use_file_name_as_title() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("GUIDE.md");
        fs::write(&path, "# Guide\n").expect("write");

        let docs = load_referenced_docs(&[&path]).expect("docs");
        assert_eq!(docs[0].title, "GUIDE.md");
        assert_eq!(docs[0].content, "# Guide\n");
        assert!(docs[0].url.ends_with("GUIDE.md"));
    }

    #[test]
    fn missing_referenced_doc_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = load_referenced_docs(&[tmp.path().join("nope.md")]).unwrap_err();
        assert!(err.to_string().contains("Failed to read reference doc"));
    }
}
