//! Grouped project overview with priority markers.

use crate::domain::{FileAnalysis, FileRole, FileType};
use crate::render::formatter::priority_indicator;

const GROUP_LIMIT: usize = 10;
const EXPORT_LIMIT: usize = 3;

/// Display groups in output order.
const GROUPS: &[(FileType, &str)] = &[
    (FileType::Documentation, "Documentation"),
    (FileType::Config, "Configuration"),
    (FileType::Source, "Source Code"),
    (FileType::Test, "Tests"),
    (FileType::Style, "Styles"),
    (FileType::Other, "Other"),
];

fn group_of(file_type: FileType) -> FileType {
    match file_type {
        FileType::Asset | FileType::Build => FileType::Other,
        other => other,
    }
}

/// Render the structure map. Empty groups are skipped; empty input yields
/// an empty string.
pub fn generate_structure_map(analyses: &[FileAnalysis]) -> String {
    let mut sections = Vec::new();

    for (group, label) in GROUPS {
        let mut members: Vec<&FileAnalysis> =
            analyses.iter().filter(|a| group_of(a.file_type) == *group).collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut lines = vec![format!("### {} ({})", label, members.len())];
        for analysis in members.iter().take(GROUP_LIMIT) {
            lines.push(render_entry(analysis));
        }
        if members.len() > GROUP_LIMIT {
            lines.push(format!("  ... +{} more", members.len() - GROUP_LIMIT));
        }
        sections.push(lines.join("\n"));
    }

    sections.join("\n\n")
}

fn render_entry(analysis: &FileAnalysis) -> String {
    let mut line = format!("- {} `{}`", priority_indicator(analysis.priority), analysis.path);
    if analysis.role != FileRole::Other {
        line.push_str(&format!(" ({})", analysis.role));
    }
    let exports = &analysis.metadata.exports;
    if !exports.is_empty() {
        let shown: Vec<&str> = exports.iter().take(EXPORT_LIMIT).map(String::as_str).collect();
        line.push_str(&format!(" | exports: {}", shown.join(", ")));
    }
    line
}
