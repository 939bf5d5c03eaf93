//! Role inference from path and content.

use crate::domain::{FileRole, FileType};
use once_cell::sync::Lazy;
use regex::Regex;

static EXPORTED_DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(?:default|class|const)\b").expect("valid exported declaration regex")
});

/// Ordered path checks; the first hit decides the role.
const PATH_ROLE_RULES: &[(FileRole, &[&str])] = &[
    (FileRole::Entry, &["index", "main", "app."]),
    (FileRole::Component, &["component", ".tsx", ".jsx"]),
    (FileRole::Service, &["service", "api"]),
    (FileRole::Model, &["model", "type", "interface"]),
    (FileRole::Utility, &["util", "helper"]),
];

/// Infer the role a file plays. Path checks always take precedence over
/// content checks; `Other` is the terminal fallback.
pub fn infer_role(path: &str, content: &str, file_type: FileType) -> FileRole {
    match file_type {
        FileType::Documentation => return FileRole::Documentation,
        FileType::Config => return FileRole::Config,
        _ => {}
    }

    let lower = path.to_lowercase();
    for (role, needles) in PATH_ROLE_RULES {
        let matched = needles.iter().any(|needle| {
            // Component suffixes are extension checks, everything else is a substring.
            if needle.starts_with('.') && *role == FileRole::Component {
                lower.ends_with(needle)
            } else {
                lower.contains(needle)
            }
        });
        if matched {
            return *role;
        }
    }

    if EXPORTED_DECLARATION_RE.is_match(content) {
        return FileRole::Core;
    }

    FileRole::Other
}
