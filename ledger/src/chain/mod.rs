//! # Chain Module
//!
//! The block structure, the proof-of-work search, and the ledger that
//! ties them together. This module is what makes EMBER a chain and not
//! just a signed list of IOUs.
//!
//! ## Architecture
//!
//! ```text
//! block.rs   Block structure, canonical block hashing, batch validation
//! mining.rs  Difficulty target, nonce search, block/genesis assembly
//! ledger.rs  Append-only chain, pending buffer, balances, validation
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Transaction → pending buffer → mine_pending_transactions → Block
//!                                                              ↓
//!                              balance_of / is_chain_valid ← chain
//! ```
//!
//! ## Design Decisions
//!
//! 1. **BLAKE3 for block hashes.** The proof-of-work loop recomputes the
//!    block hash millions of times; BLAKE3 is the fastest option with a
//!    comparable security margin. Transaction content hashes stay on
//!    double SHA-256, so the two hash domains can never collide.
//!
//! 2. **The nonce search is a pure function.** Mining never mutates a
//!    live block mid-search, so there is no observable half-mined state
//!    and the search is trivially testable.
//!
//! 3. **Validation recomputes, never trusts.** `is_chain_valid` rehashes
//!    every block and re-verifies every sealed signature on each call.
//!    At this chain's scale, recomputation is cheaper than cache
//!    invalidation bugs.

pub mod block;
pub mod ledger;
pub mod mining;

pub use block::{compute_block_hash, Block};
pub use ledger::{Ledger, LedgerConfig, LedgerError};
pub use mining::{
    find_valid_nonce, find_valid_nonce_cancellable, meets_difficulty, mine_block, mine_genesis,
    PowSolution,
};
