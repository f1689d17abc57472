//! # Cryptographic Primitives for EMBER
//!
//! Everything security-related in the ledger flows through this module:
//! the digests that content-address transactions and blocks, and the
//! Ed25519 keys that authorize transfers.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures: fast, deterministic, and nobody has
//!   broken it.
//! - **Double SHA-256** for transaction content hashes: the construction
//!   the rest of the world already trusts for transaction ids.
//! - **BLAKE3** for block hashes: the proof-of-work loop recomputes these
//!   in a hot path, and BLAKE3 lives in the future.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, please
//! reconsider. Then reconsider again. Then go read about timing attacks
//! and come back when you've lost the urge.

pub mod hash;
pub mod keys;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use hash::{blake3_hash, double_sha256, sha256};
pub use keys::{EmberKeypair, EmberPublicKey, EmberSignature, KeyError};
