//! Path normalization

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and drop a leading "./"
    let normalized = path.replace('\\', "/");
    normalized.strip_prefix("./").map(str::to_string).unwrap_or(normalized)
}

/// Final path component, or the whole path when there is no separator.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lowercased extension without the dot, empty when absent.
pub fn extension(path: &str) -> String {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}
