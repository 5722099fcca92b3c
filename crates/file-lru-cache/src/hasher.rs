//! Key hashing

use sha2::{Digest, Sha256};

/// Length of an identifier: hex-encoded SHA-256
pub const IDENTIFIER_LEN: usize = 64;

/// Derive the on-disk identifier for a cache key
pub fn identifier(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether a file name has the shape of an identifier
pub fn is_identifier(name: &str) -> bool {
    name.len() == IDENTIFIER_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
