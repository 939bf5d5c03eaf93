//! Final prompt assembly in markdown, XML, JSON or plain text.

use crate::domain::{OutputFormat, PromptSection, ReferencedDoc};
use crate::error::{PromptError, Result};
use crate::utils::estimate_tokens;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::io::Cursor;

/// Canonical prompt sections. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    SystemInstructions,
    Preamble,
    ReferenceDocs,
    ProjectOverview,
    StructureMap,
    Goal,
    Constraints,
    FileContents,
}

impl SectionKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::SystemInstructions => "system-instructions",
            Self::Preamble => "preamble",
            Self::ReferenceDocs => "reference-docs",
            Self::ProjectOverview => "project-overview",
            Self::StructureMap => "structure-map",
            Self::Goal => "goal",
            Self::Constraints => "constraints",
            Self::FileContents => "file-contents",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SystemInstructions => "System Instructions",
            Self::Preamble => "Preamble",
            Self::ReferenceDocs => "Reference Documentation",
            Self::ProjectOverview => "Project Overview",
            Self::StructureMap => "Project Structure",
            Self::Goal => "Goal",
            Self::Constraints => "Constraints",
            Self::FileContents => "File Contents",
        }
    }

    pub fn priority(self) -> u32 {
        match self {
            Self::SystemInstructions => 100,
            Self::Preamble => 90,
            Self::ReferenceDocs => 80,
            Self::ProjectOverview => 70,
            Self::StructureMap => 60,
            Self::Goal => 50,
            Self::Constraints => 40,
            Self::FileContents => 30,
        }
    }
}

const CHAIN_OF_THOUGHT: &str = "Before answering, reason step by step:\n\
1. Restate the goal in your own words.\n\
2. Identify the files and symbols that matter for it.\n\
3. Work through the change or explanation one piece at a time.\n\
4. Check the result against the goal and the provided code before finalizing.";

const FEW_SHOT_EXAMPLES: &str = "Example of a well-formed answer:\n\
Question: Where is the configuration loaded?\n\
Answer: `src/config/loader.rs` reads the config file in `load_config`, falling back to \
defaults when no file is found. The CLI merges flags on top in `src/cli/mod.rs`.";

/// Collects sections and renders them in canonical order.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    project_name: String,
    sections: Vec<PromptSection>,
}

impl PromptAssembler {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), sections: Vec::new() }
    }

    /// Add a section. Blank content is ignored.
    pub fn add(&mut self, kind: SectionKind, content: impl Into<String>) {
        let content = content.into();
        if content.trim().is_empty() {
            return;
        }
        self.sections.push(PromptSection {
            id: kind.id().to_string(),
            title: kind.title().to_string(),
            tokens: estimate_tokens(&content),
            content,
            priority: kind.priority(),
        });
    }

    /// Sections sorted by priority, highest first.
    pub fn sections(&self) -> Vec<PromptSection> {
        let mut sorted = self.sections.clone();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let sections = self.sections();
        match format {
            OutputFormat::Markdown => Ok(render_markdown(&sections)),
            OutputFormat::Plain => Ok(render_plain(&sections)),
            OutputFormat::Json => render_json(&self.project_name, &sections),
            OutputFormat::Xml => render_xml(&self.project_name, &sections),
        }
    }
}

/// Instruction block for the system-instructions section, or `None` when
/// neither aid is requested.
pub fn system_instructions(chain_of_thought: bool, few_shot: bool) -> Option<String> {
    let mut parts = Vec::new();
    if chain_of_thought {
        parts.push(CHAIN_OF_THOUGHT);
    }
    if few_shot {
        parts.push(FEW_SHOT_EXAMPLES);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

pub fn constraints_text(max_total_tokens: usize) -> String {
    [
        "- Base answers only on the files and documentation provided; say so when something is missing.".to_string(),
        "- Keep existing code style, naming and public interfaces unless the goal requires changing them.".to_string(),
        "- Files marked as summarized were shortened; ask for the full file before editing it.".to_string(),
        format!("- The context was packed to fit a budget of {max_total_tokens} tokens."),
    ]
    .join("\n")
}

pub fn reference_docs_text(docs: &[ReferencedDoc]) -> String {
    docs.iter()
        .map(|doc| {
            let mut block = format!("### {}", doc.title);
            if !doc.url.is_empty() {
                block.push_str(&format!("\nSource: {}", doc.url));
            }
            block.push_str("\n\n");
            block.push_str(doc.content.trim_end());
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_markdown(sections: &[PromptSection]) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .map(|section| {
            if section.id == SectionKind::SystemInstructions.id() {
                section.content.clone()
            } else {
                format!("## {}\n\n{}", section.title, section.content)
            }
        })
        .collect();
    format!("{}\n", blocks.join("\n\n"))
}

fn render_plain(sections: &[PromptSection]) -> String {
    let blocks: Vec<String> = sections
        .iter()
        .map(|section| {
            if section.id == SectionKind::SystemInstructions.id() {
                section.content.clone()
            } else {
                format!("{}\n\n{}", section.title.to_uppercase(), section.content)
            }
        })
        .collect();
    format!("{}\n", blocks.join("\n\n"))
}

#[derive(Serialize)]
struct JsonPrompt<'a> {
    project: &'a str,
    sections: Vec<JsonSection<'a>>,
}

#[derive(Serialize)]
struct JsonSection<'a> {
    id: &'a str,
    title: &'a str,
    content: &'a str,
    tokens: usize,
}

fn render_json(project: &str, sections: &[PromptSection]) -> Result<String> {
    let prompt = JsonPrompt {
        project,
        sections: sections
            .iter()
            .map(|s| JsonSection {
                id: &s.id,
                title: &s.title,
                content: &s.content,
                tokens: s.tokens,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&prompt).map_err(|e| PromptError::Render(e.to_string()))
}

fn xml_tag(id: &str) -> String {
    id.replace('-', "_")
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_xml(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|e| PromptError::Render(e.to_string()))
}

fn render_xml(project: &str, sections: &[PromptSection]) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut root = BytesStart::new("prompt");
    if !project.is_empty() {
        root.push_attribute(("project", project));
    }
    write_xml(&mut writer, Event::Start(root))?;

    for section in sections {
        let tag = xml_tag(&section.id);
        write_xml(&mut writer, Event::Text(BytesText::new("\n")))?;
        write_xml(&mut writer, Event::Start(BytesStart::new(tag.as_str())))?;
        for segment in cdata_segments(&section.content) {
            write_xml(&mut writer, Event::CData(BytesCData::new(segment)))?;
        }
        write_xml(&mut writer, Event::End(BytesEnd::new(tag.as_str())))?;
    }

    write_xml(&mut writer, Event::Text(BytesText::new("\n")))?;
    write_xml(&mut writer, Event::End(BytesEnd::new("prompt")))?;

    let bytes = writer.into_inner().into_inner();
    let mut xml = String::from_utf8(bytes).map_err(|e| PromptError::Render(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Split text so that no segment contains the CDATA terminator.
fn cdata_segments(content: &str) -> Vec<String> {
    let parts: Vec<&str> = content.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let mut segment = String::new();
            if idx > 0 {
                segment.push('>');
            }
            segment.push_str(part);
            if idx < last {
                segment.push_str("]]");
            }
            segment
        })
        .collect()
}
