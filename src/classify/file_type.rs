//! Path-based file type detection.

use crate::domain::FileType;
use crate::utils::normalize_path;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered type table. The first type with any matching pattern wins;
/// anything unmatched falls through to [`FileType::Other`].
static TYPE_PATTERNS: Lazy<Vec<(FileType, Vec<Regex>)>> = Lazy::new(|| {
    let compile = |patterns: &[&str]| -> Vec<Regex> {
        patterns.iter().map(|p| Regex::new(p).expect("valid file type regex")).collect()
    };
    vec![
        (
            FileType::Documentation,
            compile(&[
                r"(?i)\.(md|mdx|txt|rst|adoc)$",
                r"(?i)(^|/)(readme|changelog|contributing|license|authors)([._-][^/]*)?$",
                r"(?i)(^|/)docs?/",
            ]),
        ),
        (
            FileType::Test,
            compile(&[
                r"(?i)\.(test|spec)\.[a-z0-9]+$",
                r"(?i)_(test|spec)\.[a-z0-9]+$",
                r"(?i)(^|/)test_[^/]+\.py$",
                r"(?i)(^|/)(__tests__|tests?|specs?)/",
            ]),
        ),
        (
            FileType::Build,
            compile(&[
                r"(?i)(^|/)(makefile|dockerfile|rakefile|justfile|jenkinsfile|build\.rs)$",
                r"(?i)\.(gradle|lock|mk|cmake|bazel|bzl)$",
            ]),
        ),
        (
            FileType::Config,
            compile(&[
                r"(?i)\.(json|jsonc|ya?ml|toml|ini|cfg|conf|properties|xml)$",
                r"(?i)\.config\.[a-z]+$",
                r"(?i)(^|/)\.[a-z_-]+rc(\.[a-z]+)?$",
                r"(?i)(^|/)\.(env[^/]*|editorconfig|gitignore|gitattributes|dockerignore)$",
            ]),
        ),
        (FileType::Style, compile(&[r"(?i)\.(css|scss|sass|less|styl|pcss)$"])),
        (
            FileType::Source,
            compile(&[
                r"(?i)\.(ts|tsx|js|jsx|mjs|cjs|py|rs|go|java|kt|kts|swift|c|cc|cpp|h|hpp|cs|rb|php|vue|svelte|dart|scala|sh|bash|lua|ex|exs|sql)$",
            ]),
        ),
        (
            FileType::Asset,
            compile(&[
                r"(?i)\.(png|jpe?g|gif|svg|ico|webp|bmp|woff2?|ttf|eot|otf|mp3|mp4|wav|webm|pdf|zip)$",
            ]),
        ),
    ]
});

/// Classify a file by its path alone. Never fails.
pub fn classify_file_type(path: &str) -> FileType {
    let path = normalize_path(path);
    TYPE_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&path)))
        .map(|(file_type, _)| *file_type)
        .unwrap_or(FileType::Other)
}
