//! Per-file rendering according to an [`OptimizationStrategy`].

use crate::domain::{FileAnalysis, OptimizationStrategy};
use crate::utils::{estimate_tokens, extension};
use once_cell::sync::Lazy;
use regex::Regex;

/// Appended to every summarized file.
pub const OMITTED_NOTE: &str = "[Full content omitted to conserve tokens]";

const HEADER_EXPORT_LIMIT: usize = 5;
const SUMMARY_LIST_LIMIT: usize = 8;
const FALLBACK_LINES: usize = 50;

static DOC_COMMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)/\*.*?\*/|""".*?"""|'''.*?'''"#).expect("valid doc comment regex")
});
static INTERFACE_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(?:declare\s+)?interface\s+[A-Za-z_$][\w$]*")
        .expect("valid interface regex")
});
static TYPE_ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(?:declare\s+)?type\s+[A-Za-z_$][\w$]*(?:<[^>]*>)?\s*=[^;]+;?")
        .expect("valid type alias regex")
});
static CLASS_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(?:default\s+)?(?:abstract\s+)?class\s+[A-Za-z_$][\w$]*")
        .expect("valid class regex")
});

/// Map a priority to its display marker.
pub fn priority_indicator(priority: i64) -> &'static str {
    match priority {
        p if p >= 250 => "!!!",
        p if p >= 200 => "!!",
        p if p >= 150 => "!",
        p if p >= 100 => "~",
        _ => ".",
    }
}

/// Render one file: a header followed by a body chosen by the strategy.
///
/// Verbatim bodies are never truncated. Summaries and extractions are cut
/// to `strategy.max_tokens` when one is set.
pub fn format_file(analysis: &FileAnalysis, strategy: &OptimizationStrategy, content: &str) -> String {
    let header = render_header(analysis, strategy);

    let body = if strategy.include_full_content {
        render_full(&analysis.path, content)
    } else if strategy.summarize {
        let summary = apply_ceiling(render_summary(analysis, content), strategy.max_tokens);
        format!("{summary}\n\n{OMITTED_NOTE}")
    } else if strategy.extract_key_elements {
        render_key_elements(&analysis.path, content, strategy.max_tokens)
    } else {
        render_full(&analysis.path, content)
    };

    format!("{header}\n\n{body}")
}

fn render_header(analysis: &FileAnalysis, strategy: &OptimizationStrategy) -> String {
    let meta = &analysis.metadata;
    let mut lines = vec![
        format!("### {}", analysis.path),
        format!(
            "Type: {} | Role: {} | Priority: {} ({})",
            analysis.file_type,
            analysis.role,
            priority_indicator(analysis.priority),
            analysis.priority
        ),
    ];

    if meta.size > 0 || meta.lines > 0 {
        lines.push(format!(
            "Size: {} bytes | Lines: {} | Complexity: {}",
            meta.size, meta.lines, meta.complexity
        ));
    }

    if !meta.exports.is_empty() {
        let shown: Vec<&str> =
            meta.exports.iter().take(HEADER_EXPORT_LIMIT).map(String::as_str).collect();
        let extra = meta.exports.len().saturating_sub(HEADER_EXPORT_LIMIT);
        let suffix = if extra > 0 { format!(" (+{extra} more)") } else { String::new() };
        lines.push(format!("Exports: {}{}", shown.join(", "), suffix));
    }

    lines.push(format!("Rendering: {}", strategy.format_template.as_str()));
    lines.join("\n")
}

fn render_full(path: &str, content: &str) -> String {
    fenced(path, content)
}

fn render_summary(analysis: &FileAnalysis, content: &str) -> String {
    let meta = &analysis.metadata;
    let mut out = String::from("#### Summary");

    let mut push_list = |label: &str, items: &[String], suffix: &str| {
        if items.is_empty() {
            return;
        }
        out.push_str(&format!("\n\n**{label}:**"));
        for item in items.iter().take(SUMMARY_LIST_LIMIT) {
            out.push_str(&format!("\n- {item}{suffix}"));
        }
    };
    push_list("Imports", &meta.imports, "");
    push_list("Exports", &meta.exports, "");
    push_list("Functions", &meta.main_functions, "()");

    if let Some(doc) = DOC_COMMENT_RE.find(content) {
        out.push_str("\n\n**Description:**\n");
        out.push_str(doc.as_str());
    }

    out
}

/// Exported interfaces, type aliases and classes as fenced blocks. The
/// ceiling is applied to the raw text so every fence stays closed.
fn render_key_elements(path: &str, content: &str, max_tokens: Option<usize>) -> String {
    let interfaces: Vec<&str> =
        INTERFACE_START_RE.find_iter(content).map(|m| braced_block(content, m.start())).collect();
    let types: Vec<&str> = TYPE_ALIAS_RE.find_iter(content).map(|m| m.as_str()).collect();
    let classes: Vec<&str> =
        CLASS_START_RE.find_iter(content).map(|m| braced_block(content, m.start())).collect();

    let found_groups = [("Interfaces", interfaces), ("Types", types), ("Classes", classes)];
    let groups: Vec<(&str, String)> = found_groups
        .into_iter()
        .filter(|(_, found)| !found.is_empty())
        .map(|(label, found)| (label, found.join("\n\n")))
        .collect();

    if groups.is_empty() {
        return render_leading_lines(path, content, max_tokens);
    }

    let mut remaining = max_tokens;
    let mut truncated = false;
    let mut blocks = Vec::new();
    for (label, mut raw) in groups {
        if remaining == Some(0) {
            truncated = true;
            break;
        }
        if let Some(end) = remaining.and_then(|budget| ceiling_cut(&raw, budget)) {
            raw.truncate(end);
            truncated = true;
        }
        remaining = remaining.map(|budget| budget.saturating_sub(estimate_tokens(&raw)));
        blocks.push(format!("**{label}:**\n{}", fenced(path, &raw)));
        if truncated {
            break;
        }
    }

    if let (true, Some(max)) = (truncated, max_tokens) {
        blocks.push(truncation_marker(max));
    }
    blocks.join("\n\n")
}

fn render_leading_lines(path: &str, content: &str, max_tokens: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let hidden = lines.len().saturating_sub(FALLBACK_LINES);
    let mut head =
        if hidden > 0 { lines[..FALLBACK_LINES].join("\n") } else { content.to_string() };

    let cut = max_tokens.and_then(|max| ceiling_cut(&head, max));
    if let Some(end) = cut {
        head.truncate(end);
    }

    let mut out = fenced(path, &head);
    if hidden > 0 {
        out.push_str(&format!("\n... ({hidden} more lines truncated)"));
    }
    if let (Some(_), Some(max)) = (cut, max_tokens) {
        out.push('\n');
        out.push_str(&truncation_marker(max));
    }
    out
}

/// Slice from `start` through the brace that closes the first `{` after it.
/// Unbalanced input yields the rest of the text.
fn braced_block(content: &str, start: usize) -> &str {
    let rest = &content[start..];
    let Some(open) = rest.find('{') else {
        return rest.lines().next().unwrap_or(rest);
    };
    let mut depth = 0usize;
    for (offset, ch) in rest[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..open + offset + 1];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Only for unfenced text; fenced bodies are cut before fencing.
fn apply_ceiling(mut body: String, max_tokens: Option<usize>) -> String {
    let Some(max) = max_tokens else {
        return body;
    };
    if let Some(end) = ceiling_cut(&body, max) {
        body.truncate(end);
        body.push('\n');
        body.push_str(&truncation_marker(max));
    }
    body
}

/// Byte length to keep so `text` fits roughly `max_tokens`, ending on a line
/// boundary when one exists. `None` when it already fits.
fn ceiling_cut(text: &str, max_tokens: usize) -> Option<usize> {
    if estimate_tokens(text) <= max_tokens {
        return None;
    }
    let max_chars = max_tokens.saturating_mul(4);
    let limit = text.char_indices().nth(max_chars).map_or(text.len(), |(idx, _)| idx);
    Some(text[..limit].rfind('\n').unwrap_or(limit))
}

fn truncation_marker(max_tokens: usize) -> String {
    format!("... [truncated to ~{max_tokens} tokens]")
}

/// Wrap text in a code fence longer than any backtick run it contains.
fn fenced(path: &str, content: &str) -> String {
    let longest_run = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let body = content.strip_suffix('\n').unwrap_or(content);
    format!("{fence}{}\n{body}\n{fence}", fence_language(path))
}

fn fence_language(path: &str) -> &'static str {
    match extension(path).as_str() {
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "py" => "python",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "php" => "php",
        "cs" => "csharp",
        "c" | "h" => "c",
        "cc" | "cpp" | "hpp" => "cpp",
        "sh" | "bash" => "bash",
        "md" | "mdx" => "markdown",
        "json" | "jsonc" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "css" => "css",
        "scss" => "scss",
        "html" => "html",
        "sql" => "sql",
        _ => "",
    }
}
