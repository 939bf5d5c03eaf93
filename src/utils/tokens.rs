//! Token estimation

/// Estimate tokens using a simple heuristic (chars / 4).
///
/// Counts Unicode scalar values rather than bytes so multi-byte text
/// (CJK, emoji) is not over-counted.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Estimate tokens for content that is only known by its size.
///
/// Rounds up so that any non-empty file costs at least one token. The line
/// count is accepted for callers that track it but does not change the result.
pub fn estimate_tokens_from_size(size_bytes: u64, _lines: usize) -> usize {
    size_bytes.div_ceil(4) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_counts_chars() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(&"x".repeat(400)), 100);
        // 4 emoji are 16 bytes but 4 chars
        assert_eq!(estimate_tokens("🚀🚀🚀🚀"), 1);
    }

    #[test]
    fn test_estimate_tokens_from_size_rounds_up() {
        assert_eq!(estimate_tokens_from_size(0, 0), 0);
        assert_eq!(estimate_tokens_from_size(1, 1), 1);
        assert_eq!(estimate_tokens_from_size(20_000, 400), 5000);
        assert_eq!(estimate_tokens_from_size(20_001, 400), 5001);
    }
}
