//! Shared helpers: text decoding, token estimates, paths, hashing.

pub mod encoding;
pub mod hashing;
pub mod paths;
pub mod tokens;

pub use encoding::{decode_text, read_text_file};
pub use hashing::stable_id;
pub use paths::{parse_repo_ref, RepoRef};
pub use tokens::{estimate_tokens, estimate_tokens_for_bytes};

/// Format an integer with thousands separators (`12345` → `12,345`).
pub fn format_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::format_with_commas;

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1234567), "1,234,567");
    }
}
