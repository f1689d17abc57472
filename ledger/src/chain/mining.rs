//! # Proof-of-Work Mining
//!
//! The nonce search that seals a block. Mining is a brute-force walk over
//! nonce values until the block hash shows the required number of leading
//! zero hex digits.
//!
//! ## Difficulty
//!
//! A difficulty of `d` means the first `d` hex digits of the hash are
//! zero. Each extra digit multiplies the expected work by 16. The check
//! runs on the raw digest nibbles, so no hex string is allocated per
//! attempt. Difficulties above [`MAX_DIFFICULTY`] can never be satisfied
//! (the digest only has 64 digits) and fail the check outright.
//!
//! ## Search
//!
//! [`find_valid_nonce`] is a pure function from search inputs to a
//! [`PowSolution`]. It never touches a live block, so a miner cannot leak
//! a half-mined nonce into observable state. [`mine_block`] wraps the
//! search and hands back a fully sealed [`Block`].
//!
//! ## Cancellation
//!
//! The plain search runs until it wins. [`find_valid_nonce_cancellable`]
//! additionally polls an [`AtomicBool`] every [`CANCEL_CHECK_INTERVAL`]
//! attempts and bails out with `None` when the flag is raised, which is
//! what a node wants when a competing block arrives mid-search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::chain::block::{compute_block_hash, Block};
use crate::config::{
    CANCEL_CHECK_INTERVAL, GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP_MS, MAX_DIFFICULTY,
};
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// PowSolution
// ---------------------------------------------------------------------------

/// The result of a successful nonce search.
///
/// Carries both the winning nonce and the hash it produces, so callers
/// never need to rehash to learn what they just mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowSolution {
    /// The nonce under which the block hash meets the difficulty target.
    pub nonce: u64,
    /// The block hash at that nonce.
    pub hash: [u8; 32],
}

// ---------------------------------------------------------------------------
// Difficulty Target
// ---------------------------------------------------------------------------

/// Check whether a hash meets a difficulty target.
///
/// The target is the number of leading zero hex digits, checked nibble by
/// nibble on the raw digest. A difficulty of 0 accepts every hash; a
/// difficulty above [`MAX_DIFFICULTY`] accepts none.
pub fn meets_difficulty(hash: &[u8; 32], difficulty: usize) -> bool {
    if difficulty > MAX_DIFFICULTY {
        return false;
    }
    for digit in 0..difficulty {
        let byte = hash[digit / 2];
        let nibble = if digit % 2 == 0 { byte >> 4 } else { byte & 0x0F };
        if nibble != 0 {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Nonce Search
// ---------------------------------------------------------------------------

/// Search nonces from zero upward until the block hash meets the target.
///
/// Pure: the same inputs always yield the same solution, and nothing is
/// mutated along the way. The search is CPU-bound and unbounded; callers
/// are responsible for handing in a satisfiable difficulty (at most
/// [`MAX_DIFFICULTY`]), since an unsatisfiable one would never return.
pub fn find_valid_nonce(
    previous_hash: &[u8; 32],
    transactions: &[Transaction],
    difficulty: usize,
) -> PowSolution {
    let mut nonce = 0u64;
    loop {
        let hash = compute_block_hash(previous_hash, transactions, nonce);
        if meets_difficulty(&hash, difficulty) {
            return PowSolution { nonce, hash };
        }
        nonce += 1;
    }
}

/// Like [`find_valid_nonce`], but abandons the search when `cancel` is
/// raised.
///
/// The flag is polled every [`CANCEL_CHECK_INTERVAL`] attempts, including
/// once before the first hash, so a search that is cancelled before it
/// starts does no work at all. Returns `None` on cancellation.
pub fn find_valid_nonce_cancellable(
    previous_hash: &[u8; 32],
    transactions: &[Transaction],
    difficulty: usize,
    cancel: &AtomicBool,
) -> Option<PowSolution> {
    let mut nonce = 0u64;
    loop {
        if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            debug!(nonce, "nonce search cancelled");
            return None;
        }
        let hash = compute_block_hash(previous_hash, transactions, nonce);
        if meets_difficulty(&hash, difficulty) {
            return Some(PowSolution { nonce, hash });
        }
        nonce += 1;
    }
}

// ---------------------------------------------------------------------------
// Block Assembly
// ---------------------------------------------------------------------------

/// Mine a block: assemble it from a batch and a parent hash, then run the
/// nonce search and seal the winning solution into it.
pub fn mine_block(
    transactions: &[Transaction],
    previous_hash: [u8; 32],
    difficulty: usize,
) -> Block {
    let mut block = Block::new(transactions, previous_hash);
    let started = Instant::now();
    let solution = find_valid_nonce(&block.previous_hash, &block.transactions, difficulty);
    block.nonce = solution.nonce;
    block.hash = solution.hash;
    info!(
        difficulty,
        nonce = block.nonce,
        tx_count = block.tx_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        hash = %block.hash_hex(),
        "block mined"
    );
    block
}

/// Mine the genesis block.
///
/// Genesis seals an empty batch against the zero parent hash at the
/// pinned [`GENESIS_TIMESTAMP_MS`]. Because the timestamp is outside the
/// hash preimage and every other input is fixed, two ledgers mined at the
/// same difficulty produce byte-identical genesis blocks.
pub fn mine_genesis(difficulty: usize) -> Block {
    let mut block = Block::with_timestamp(&[], GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP_MS);
    let solution = find_valid_nonce(&block.previous_hash, &block.transactions, difficulty);
    block.nonce = solution.nonce;
    block.hash = solution.hash;
    debug!(
        difficulty,
        nonce = block.nonce,
        hash = %block.hash_hex(),
        "genesis block mined"
    );
    block
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Sender;

    fn reward_batch() -> Vec<Transaction> {
        vec![
            Transaction::new(Sender::System, "aa11", 100),
            Transaction::new(Sender::System, "bb22", 100),
        ]
    }

    // -- Difficulty target --------------------------------------------------

    #[test]
    fn difficulty_zero_accepts_everything() {
        assert!(meets_difficulty(&[0xFF; 32], 0));
        assert!(meets_difficulty(&[0x00; 32], 0));
    }

    #[test]
    fn difficulty_counts_whole_hex_digits() {
        // 0x0A...: digits are 0, A, F, F, ...
        let mut hash = [0xFF; 32];
        hash[0] = 0x0A;
        assert!(meets_difficulty(&hash, 1));
        assert!(!meets_difficulty(&hash, 2));
    }

    #[test]
    fn odd_difficulty_checks_the_high_nibble_of_the_next_byte() {
        // 0x00 0x0F...: digits are 0, 0, 0, F, ...
        let mut hash = [0xFF; 32];
        hash[0] = 0x00;
        hash[1] = 0x0F;
        assert!(meets_difficulty(&hash, 3));
        assert!(!meets_difficulty(&hash, 4));
    }

    #[test]
    fn difficulty_beyond_the_digest_is_unsatisfiable() {
        let zero = [0u8; 32];
        assert!(meets_difficulty(&zero, MAX_DIFFICULTY));
        assert!(!meets_difficulty(&zero, MAX_DIFFICULTY + 1));
    }

    // -- Nonce search -------------------------------------------------------

    #[test]
    fn found_nonce_satisfies_the_target() {
        let batch = reward_batch();
        let solution = find_valid_nonce(&[0u8; 32], &batch, 1);

        assert!(meets_difficulty(&solution.hash, 1));
        assert_eq!(
            solution.hash,
            compute_block_hash(&[0u8; 32], &batch, solution.nonce)
        );
    }

    #[test]
    fn search_is_deterministic() {
        let batch = reward_batch();
        let a = find_valid_nonce(&[0u8; 32], &batch, 1);
        let b = find_valid_nonce(&[0u8; 32], &batch, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn pre_cancelled_search_does_no_work() {
        let cancel = AtomicBool::new(true);
        let solution = find_valid_nonce_cancellable(&[0u8; 32], &reward_batch(), 4, &cancel);
        assert_eq!(solution, None);
    }

    #[test]
    fn uncancelled_search_matches_the_plain_search() {
        let batch = reward_batch();
        let cancel = AtomicBool::new(false);

        let cancellable = find_valid_nonce_cancellable(&[0u8; 32], &batch, 1, &cancel);
        let plain = find_valid_nonce(&[0u8; 32], &batch, 1);
        assert_eq!(cancellable, Some(plain));
    }

    // -- Block assembly -----------------------------------------------------

    #[test]
    fn mined_block_is_internally_consistent() {
        let batch = reward_batch();
        let block = mine_block(&batch, [7u8; 32], 1);

        assert!(meets_difficulty(&block.hash, 1));
        assert_eq!(block.hash, block.compute_hash());
        assert_eq!(block.previous_hash, [7u8; 32]);
        assert_eq!(block.transactions, batch);
    }

    #[test]
    fn mined_hash_renders_with_the_zero_prefix() {
        let block = mine_block(&reward_batch(), [0u8; 32], 2);
        assert!(block.hash_hex().starts_with("00"));
    }

    #[test]
    fn genesis_is_deterministic() {
        let a = mine_genesis(2);
        let b = mine_genesis(2);
        assert_eq!(a, b);
    }

    #[test]
    fn genesis_seals_an_empty_batch_against_nothing() {
        let genesis = mine_genesis(1);

        assert!(genesis.transactions.is_empty());
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.timestamp, GENESIS_TIMESTAMP_MS);
        assert!(meets_difficulty(&genesis.hash, 1));
    }
}
