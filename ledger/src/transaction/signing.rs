//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from construction because the keypair may not
//! be available when the transfer is assembled. The signed message is the
//! transaction content hash, which excludes the signature field itself.

use super::types::Transaction;
use super::verification::TransactionError;
use crate::crypto::keys::EmberKeypair;

/// Signs a transaction in place with the provided keypair.
///
/// A party may only sign as itself: when the sender is a participant
/// address, the keypair must derive exactly that address or the call fails
/// with [`TransactionError::SignerMismatch`] and the transaction is left
/// untouched. Mint-sent transactions (mining rewards) have no owning
/// address, so any keypair may countersign them; the ledger uses its
/// authority keypair for that.
///
/// On success the `signature` field holds the 64-byte Ed25519 signature
/// over [`Transaction::content_hash`]. Re-signing overwrites a previous
/// signature.
///
/// # Example
///
/// ```
/// use ember_ledger::crypto::keys::EmberKeypair;
/// use ember_ledger::transaction::{sign_transaction, Sender, Transaction};
///
/// let keypair = EmberKeypair::generate();
/// let mut tx = Transaction::new(Sender::Address(keypair.address()), "bb22", 250);
///
/// sign_transaction(&mut tx, &keypair).expect("keypair controls the sender");
/// assert!(tx.is_signed());
/// ```
pub fn sign_transaction(
    tx: &mut Transaction,
    keypair: &EmberKeypair,
) -> Result<(), TransactionError> {
    if let Some(sender) = tx.sender.as_address() {
        if sender != keypair.address() {
            return Err(TransactionError::SignerMismatch {
                sender: sender.to_string(),
            });
        }
    }

    let digest = tx.content_hash();
    let signature = keypair.sign(&digest);
    tx.signature = signature.as_bytes().to_vec();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
