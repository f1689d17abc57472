//! # Ledger Configuration & Constants
//!
//! Every magic number in EMBER lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values define the shape of the chain. Changing the difficulty or
//! the reward after a chain has been built does not invalidate old blocks
//! (validation recomputes hashes, not targets), but it does change every
//! balance going forward, so treat them as launch-time decisions.

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Ledger magic tag, "EMBR" in ASCII hex. Printed by the node's `version`
/// command so humans and scripts can tell an EMBER build apart at a glance.
pub const EMBER_MAGIC: u32 = 0x454D4252;

/// Human-readable ledger fingerprint for version output and logs.
pub const LEDGER_FINGERPRINT: &str = "ALAS-EMBER-2026";

/// Ledger semantic version. Bump the minor for any change that alters
/// hashes or balances; old chains will not validate against it.
pub const LEDGER_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Proof of Work
// ---------------------------------------------------------------------------

/// Default mining difficulty: the number of leading zero hex digits a block
/// hash must show before the block counts as mined. Each extra digit
/// multiplies the expected search work by 16, so keep this small on
/// anything that isn't a dedicated rig. Two digits resolve in well under a
/// second on a laptop.
pub const DEFAULT_DIFFICULTY: usize = 2;

/// Upper bound on a meaningful difficulty. A 32-byte digest renders as 64
/// hex digits; demanding more leading zeros than digits exist can never be
/// satisfied, and the search loop would spin forever.
pub const MAX_DIFFICULTY: usize = 64;

/// How many nonce attempts the cancellable search performs between polls of
/// its cancellation flag. Small enough to stop promptly, large enough that
/// the atomic load disappears into the hashing cost.
pub const CANCEL_CHECK_INTERVAL: u64 = 4_096;

// ---------------------------------------------------------------------------
// Mining Reward
// ---------------------------------------------------------------------------

/// Amount credited to a miner per mined block, in cinders (the smallest
/// EMBER denomination; every ledger needs a cute name for its dust). The
/// reward is queued as a system transaction and only lands in a balance
/// once a later round mines it.
pub const DEFAULT_MINING_REWARD: u64 = 100;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public (verifying) key length in bytes. The hex rendering of
/// these 32 bytes is a ledger address.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length for both hash functions in use. SHA-256 and BLAKE3 each
/// produce 32 bytes; 64 hex digits.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Fixed timestamp of the genesis block: 2022-03-02T00:00:00Z in Unix
/// milliseconds. The date is the ledger's birth certificate; pinning it
/// (together with the empty transaction batch and zeroed parent hash)
/// makes the genesis block identical for every ledger mined at the same
/// difficulty.
pub const GENESIS_TIMESTAMP_MS: u64 = 1_646_179_200_000;

/// Parent hash of the genesis block. There is no block before the first
/// one, so the pointer is the zero digest.
pub const GENESIS_PREVIOUS_HASH: [u8; 32] = [0u8; 32];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_is_valid_ascii() {
        // The magic bytes should decode to a readable 4-char ASCII tag.
        let bytes = EMBER_MAGIC.to_be_bytes();
        assert!(bytes.iter().all(|b| b.is_ascii_alphanumeric()));
        assert_eq!(&bytes, b"EMBR");
    }

    #[test]
    fn fingerprint_names_the_ledger() {
        assert!(!LEDGER_FINGERPRINT.is_empty());
        assert!(LEDGER_FINGERPRINT.contains("EMBER"));
    }

    #[test]
    fn default_difficulty_is_reachable() {
        // A default above MAX_DIFFICULTY would make every ledger constructor
        // hang while mining its genesis block.
        assert!(DEFAULT_DIFFICULTY <= MAX_DIFFICULTY);
        assert_eq!(MAX_DIFFICULTY, HASH_OUTPUT_LENGTH * 2);
    }

    #[test]
    fn reward_is_nonzero() {
        // A zero reward would make every mining round a charity event.
        assert!(DEFAULT_MINING_REWARD > 0);
    }

    #[test]
    fn crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }

    #[test]
    fn genesis_constants_are_pinned() {
        // 2022-03-02T00:00:00Z. If this moves, every genesis hash moves.
        assert_eq!(GENESIS_TIMESTAMP_MS, 1_646_179_200_000);
        assert_eq!(GENESIS_PREVIOUS_HASH, [0u8; 32]);
    }

    #[test]
    fn cancel_interval_is_practical() {
        // Zero would poll the flag before the first attempt and never hash.
        assert!(CANCEL_CHECK_INTERVAL > 0);
    }
}
