//! # Block Structure
//!
//! A block is the atomic unit of the EMBER ledger. Each block seals an
//! ordered batch of transactions behind a proof-of-work hash and links to
//! the block before it, forming the chain.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Block                                      │
//! │  ├── timestamp: u64      (ms, recorded only)│
//! │  ├── previous_hash: [u8; 32]                │
//! │  ├── hash: [u8; 32]      (BLAKE3, PoW)      │
//! │  ├── nonce: u64                             │
//! │  └── transactions: Vec<Transaction>         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! The block hash covers: `previous_hash || tx_count || transactions ||
//! nonce`, with each transaction contributing its full canonical bytes,
//! signature included. The timestamp is recorded metadata and is NOT part
//! of the preimage, so mining a given batch against a given parent is
//! reproducible and the pinned genesis block hashes identically on every
//! node that builds it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::hash::blake3_hash;
use crate::transaction::{verify_transaction, Transaction};

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A sealed batch of transactions with chain linkage and proof-of-work.
///
/// Blocks are plain data. Finding a nonce that satisfies a difficulty
/// target lives in [`crate::chain::mining`]; a `Block` merely stores the
/// result and can recompute its own hash to detect tampering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unix timestamp (milliseconds) when this block was assembled.
    pub timestamp: u64,
    /// Hash of the previous block. All zeros for genesis.
    pub previous_hash: [u8; 32],
    /// BLAKE3 hash of this block's contents under the current nonce.
    pub hash: [u8; 32],
    /// Ordered transactions sealed in this block.
    pub transactions: Vec<Transaction>,
    /// Proof-of-work counter. Incremented until `hash` meets the target.
    pub nonce: u64,
}

impl Block {
    /// Assemble a block from a transaction batch and a parent hash.
    ///
    /// The batch is copied, so later changes to the caller's buffer cannot
    /// reach into a sealed block. The nonce starts at zero and `hash` is
    /// initialized to match, which almost certainly does not meet any
    /// difficulty target yet. Mining does that.
    pub fn new(transactions: &[Transaction], previous_hash: [u8; 32]) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        Self::with_timestamp(transactions, previous_hash, timestamp)
    }

    /// Assemble a block with an explicit timestamp.
    ///
    /// Regular blocks record the wall clock via [`Block::new`]; the genesis
    /// block pins a fixed timestamp so every node constructs the same one.
    pub fn with_timestamp(
        transactions: &[Transaction],
        previous_hash: [u8; 32],
        timestamp: u64,
    ) -> Self {
        let transactions = transactions.to_vec();
        let hash = compute_block_hash(&previous_hash, &transactions, 0);
        Block {
            timestamp,
            previous_hash,
            hash,
            transactions,
            nonce: 0,
        }
    }

    /// Recompute the block hash from the fields as they are now.
    ///
    /// Use this to verify that `hash` matches the actual content. Any edit
    /// to the transactions, the linkage, or the nonce shows up here.
    pub fn compute_hash(&self) -> [u8; 32] {
        compute_block_hash(&self.previous_hash, &self.transactions, self.nonce)
    }

    /// Check every transaction's signature in this block.
    ///
    /// Returns `false` when any transaction fails: a signature that does
    /// not verify, a sender address that does not decode, or a participant
    /// transaction with no signature at all. Mint-sent reward transactions
    /// pass without a signature check. The scan always visits the whole
    /// batch, so the logs name every offender rather than only the first.
    pub fn transactions_valid(&self) -> bool {
        let mut all_valid = true;
        for (index, tx) in self.transactions.iter().enumerate() {
            match verify_transaction(tx) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        tx_index = index,
                        sender = %tx.sender,
                        "transaction signature failed verification"
                    );
                    all_valid = false;
                }
                Err(err) => {
                    debug!(tx_index = index, sender = %tx.sender, error = %err,
                        "transaction rejected during block validation");
                    all_valid = false;
                }
            }
        }
        all_valid
    }

    /// Return the number of transactions sealed in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Return the block hash as a hex string.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Return the previous block's hash as a hex string.
    pub fn previous_hash_hex(&self) -> String {
        hex::encode(self.previous_hash)
    }
}

// ---------------------------------------------------------------------------
// Hash Computation
// ---------------------------------------------------------------------------

/// Compute the BLAKE3 hash of a block from its constituent fields.
///
/// The preimage is `previous_hash || tx_count (u32 LE) || for each tx:
/// (len (u32 LE) || canonical bytes) || nonce (u64 LE)`. Length-prefixing
/// each transaction keeps batch boundaries unambiguous, so no two distinct
/// batches can serialize to the same preimage.
pub fn compute_block_hash(
    previous_hash: &[u8; 32],
    transactions: &[Transaction],
    nonce: u64,
) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(64 + transactions.len() * 128);
    preimage.extend_from_slice(previous_hash);
    preimage.extend_from_slice(&(transactions.len() as u32).to_le_bytes());
    for tx in transactions {
        let bytes = tx.canonical_bytes();
        preimage.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        preimage.extend_from_slice(&bytes);
    }
    preimage.extend_from_slice(&nonce.to_le_bytes());
    blake3_hash(&preimage)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
