//! Content checksums for migration identity and drift detection.
//!
//! A cryptographic hash is used so that any byte difference in a migration's
//! content changes the digest with overwhelming probability. Collision
//! resistance here guards against accidental false "unchanged"
//! classification, not against an adversary.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of `content` as a lowercase 64-character hex
/// string.
///
/// Pure and deterministic: byte-identical content always yields an identical
/// digest.
pub fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
