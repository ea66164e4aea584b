//! Token estimation

/// Estimate tokens for a rendered text: `ceil(chars / 4)`.
///
/// Counts Unicode scalar values rather than bytes so multi-byte content
/// (CJK text, emoji) is not over-counted.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Estimate tokens from a byte size: `ceil(bytes / 4)`.
pub fn estimate_tokens_for_bytes(bytes: u64) -> u64 {
    bytes.div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("🚀🚀🚀🚀"), 1);
        assert_eq!(estimate_tokens_for_bytes(21), 6);
    }
}
