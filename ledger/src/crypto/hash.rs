//! # Hash Functions
//!
//! Thin wrappers around the two digest functions EMBER uses, returning
//! fixed-size arrays so callers never guess at output lengths.
//!
//! The split of responsibilities is deliberate and narrow:
//!
//! - **Double SHA-256** fingerprints transaction content. The signed
//!   payload of a transfer is `double_sha256(signable_bytes)`, the same
//!   construction Bitcoin uses for transaction ids, which also closes the
//!   door on length-extension tricks.
//! - **BLAKE3** hashes blocks. The proof-of-work search recomputes a block
//!   hash millions of times, and BLAKE3 is the fastest cryptographic hash
//!   on every architecture that matters.
//!
//! Nothing here is hand-rolled. These are wrappers over audited
//! implementations, and they should stay that way.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `data` as a fixed 32-byte array.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256: `SHA256(SHA256(data))`.
///
/// Used for transaction content hashes. The outer application hides the
/// inner state, so an attacker cannot extend a valid payload into another
/// valid payload.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// BLAKE3 digest of `data` as a fixed 32-byte array.
///
/// Used for block hashes, where the mining loop makes throughput the
/// dominating concern.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}
