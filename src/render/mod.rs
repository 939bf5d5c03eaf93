//! Output rendering (per-file blocks, structure map, final prompt)

pub mod assembler;
pub mod formatter;
pub mod structure_map;

pub use assembler::{PromptAssembler, SectionKind};
pub use formatter::{format_file, priority_indicator, OMITTED_NOTE};
pub use structure_map::generate_structure_map;
