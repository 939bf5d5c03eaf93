//! File classification: what kind of file it is and what part it plays.

pub mod file_type;
pub mod role;

pub use file_type::classify_file_type;
pub use role::infer_role;
