//! Shared helpers

pub mod paths;
pub mod tokens;

pub use paths::{extension, file_name, normalize_path};
pub use tokens::{estimate_tokens, estimate_tokens_from_size};

/// Format an integer with thousands separators (e.g. `12,345`).
pub fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Push `item` unless an equal value is already present, preserving scan order.
pub(crate) fn push_unique(items: &mut Vec<String>, item: &str) {
    if !item.is_empty() && !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}
