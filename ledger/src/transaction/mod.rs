//! # Transaction Module
//!
//! Construction, signing, and verification for EMBER transactions. Every
//! transfer of cinders between addresses, including the mining reward the
//! ledger mints for itself, is represented as a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs         Transaction and Sender value types, canonical encodings
//! signing.rs       Transaction signing with Ed25519 keypairs
//! verification.rs  Cryptographic verification of signed transactions
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: construct the transaction with [`Transaction::new`].
//! 2. **Sign**: call [`sign_transaction`] with the sender's keypair.
//! 3. **Submit**: hand the signed transaction to the ledger's pending buffer.
//! 4. **Verify**: [`verify_transaction`] runs at submission and again during
//!    chain validation.
//! 5. **Mine**: a mined block snapshots the pending buffer and seals it.
//!
//! ## Design Decisions
//!
//! - Content hashes are `double_sha256` of the canonical byte representation
//!   excluding the signature, matching Bitcoin's approach to transaction IDs.
//!   A transaction therefore hashes the same before and after signing.
//! - The sender is an enum, not a magic string. [`Sender::System`] marks
//!   mint-sent reward transactions and can never collide with a participant
//!   address, empty or otherwise.
//! - All amounts are `u64` cinders. No floating point anywhere near
//!   monetary values.
//! - Authorization is enforced at signing time: a keypair may only sign for
//!   the address it controls. The mint is the one exception, since it has
//!   no keypair of its own.

pub mod signing;
pub mod types;
pub mod verification;

pub use signing::sign_transaction;
pub use types::{Sender, Transaction};
pub use verification::{verify_transaction, TransactionError};
