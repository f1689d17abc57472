// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # EMBER Ledger Core Library
//!
//! EMBER is a deliberately small proof-of-work ledger: signed transfers,
//! brute-force mining, full-scan balances, and nothing it cannot explain
//! in one sitting. It keeps the whole chain in memory and recomputes what
//! bigger systems would cache, because at this scale honesty is cheaper
//! than infrastructure.
//!
//! The cryptography takes no chances: Ed25519 for signatures (because
//! we're not barbarians), double SHA-256 for transaction identity, and
//! BLAKE3 where the mining loop needs every cycle back.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! ledger:
//!
//! - **crypto**: hashing and Ed25519 keys. Don't roll your own.
//! - **transaction**: signed transfers, from construction to verification.
//! - **chain**: blocks, proof-of-work mining, and the ledger itself.
//! - **config**: ledger constants. Every magic number, one place.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (the mining loop is still tight).
//! 2. No unsafe code anywhere; we sleep at night.
//! 3. Recompute instead of cache. A stale cache costs more than CPU.
//! 4. If it touches balances, it has tests. Plural.

pub mod chain;
pub mod config;
pub mod crypto;
pub mod transaction;
