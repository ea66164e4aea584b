//! Stable hashing for content identities

use sha2::{Digest, Sha256};

/// SHA-256 of a repository-relative path, first 16 hex chars.
pub fn stable_id(relative_path: &str) -> String {
    let hash = Sha256::digest(relative_path.as_bytes());
    format!("{:x}", hash)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_is_deterministic_and_short() {
        let a = stable_id("src/main.rs");
        assert_eq!(a, stable_id("src/main.rs"));
        assert_eq!(a.len(), 16);
        assert_ne!(a, stable_id("src/lib.rs"));
    }
}
