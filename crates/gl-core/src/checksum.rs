//! SHA-256 checksum utility for trace deduplication.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const CHECKSUM_LEN: usize = 64;

/// Compute the lower-case hex SHA256 checksum of raw file content
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Whether `s` looks like a checksum produced by [`compute_checksum`].
pub fn is_valid_checksum(s: &str) -> bool {
    s.len() == CHECKSUM_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
