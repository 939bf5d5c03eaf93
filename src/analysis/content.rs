//! Heuristic structural extraction from raw text.
//!
//! This is a textual scan, not a parser: exports inside comments count, and
//! multi-line destructured exports may be missed.

use crate::domain::{FileMetadata, MAX_EXPORTS, MAX_IMPORTS, MAX_MAIN_FUNCTIONS};
use crate::utils::push_unique;
use once_cell::sync::Lazy;
use regex::Regex;

static NAMED_EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bexport\s+(?:default\s+)?(?:async\s+)?(?:class|function\*?|const|let|var)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("valid named export regex")
});
static EXPORT_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s*\{([^}]*)\}").expect("valid export list regex"));
static EXPORT_STAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bexport\s*\*\s*from\s*['"]([^'"]+)['"]"#).expect("valid export star regex")
});
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+[^;]*?\s*from\s*['"]([^'"]+)['"]"#).expect("valid import regex")
});
static FUNCTION_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunction\s*\*?\s*([A-Za-z_$][\w$]*)").expect("valid function regex")
});
static ARROW_FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>",
    )
    .expect("valid arrow function regex")
});
static METHOD_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*\{").expect("valid method regex")
});

/// Call-shaped keywords the method pattern would otherwise report.
const NOT_FUNCTION_NAMES: &[&str] =
    &["for", "while", "switch", "catch", "return", "function", "else", "typeof", "await"];

static COMPLEXITY_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bif\s*\(",
        r"\bfor\s*\(",
        r"\bwhile\s*\(",
        r"\bswitch\s*\(",
        r"\bcatch\s*\(",
        // `?` not part of `?.`, `??` or `?:`
        r"(?:^|[^?])\?[^.?:]",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid complexity regex"))
    .collect()
});

/// Exported names in scan order, deduplicated, at most [`MAX_EXPORTS`].
pub fn extract_exports(content: &str) -> Vec<String> {
    let mut exports = Vec::new();

    for cap in NAMED_EXPORT_RE.captures_iter(content) {
        push_unique(&mut exports, &cap[1]);
    }

    for cap in EXPORT_LIST_RE.captures_iter(content) {
        for entry in cap[1].split(',') {
            let entry = entry.trim();
            // `a as b` is exported under `b`
            let name = entry.rsplit(" as ").next().unwrap_or(entry).trim();
            push_unique(&mut exports, name);
        }
    }

    for cap in EXPORT_STAR_RE.captures_iter(content) {
        push_unique(&mut exports, &format!("* from {}", &cap[1]));
    }

    exports.truncate(MAX_EXPORTS);
    exports
}

/// Imported module specifiers, deduplicated, at most [`MAX_IMPORTS`].
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut imports = Vec::new();
    for cap in IMPORT_RE.captures_iter(content) {
        push_unique(&mut imports, &cap[1]);
    }
    imports.truncate(MAX_IMPORTS);
    imports
}

/// Function-like names longer than two characters, at most [`MAX_MAIN_FUNCTIONS`].
pub fn extract_main_functions(content: &str) -> Vec<String> {
    let mut functions = Vec::new();
    for re in [&*FUNCTION_DECL_RE, &*ARROW_FN_RE, &*METHOD_DECL_RE] {
        for cap in re.captures_iter(content) {
            let name = &cap[1];
            if name.chars().count() > 2 && !NOT_FUNCTION_NAMES.contains(&name) {
                push_unique(&mut functions, name);
            }
        }
    }
    functions.truncate(MAX_MAIN_FUNCTIONS);
    functions
}

/// Cyclomatic-complexity proxy: 1 plus one per control-flow token.
///
/// Any `?` outside optional chaining, nullish coalescing and optional
/// members counts as a ternary, including ones inside strings and comments.
pub fn complexity(content: &str) -> u32 {
    let branches: usize = COMPLEXITY_RES.iter().map(|re| re.find_iter(content).count()).sum();
    1 + branches as u32
}

/// Build the metadata block for a file.
pub fn analyze_content(content: &str, size: u64, lines: usize) -> FileMetadata {
    FileMetadata {
        size,
        lines,
        exports: extract_exports(content),
        imports: extract_imports(content),
        main_functions: extract_main_functions(content),
        complexity: complexity(content),
    }
}
