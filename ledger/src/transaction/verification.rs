//! Signature verification for transactions.
//!
//! The verdict shape follows the submission rules of the ledger: a missing
//! signature on a participant transaction is a hard error (the transaction
//! should never have existed in that state), while a signature that fails
//! to verify is an ordinary boolean `false` that chain validation folds
//! into its own verdict.

use thiserror::Error;

use super::types::Transaction;
use crate::crypto::keys::{EmberPublicKey, EmberSignature};

/// Protocol violations around transaction authorization.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A keypair tried to sign for an address it does not control.
    #[error("signing key does not control sender address {sender}")]
    SignerMismatch { sender: String },

    /// A participant-sent transaction carries no signature at all.
    #[error("transaction is unsigned")]
    MissingSignature,
}

/// Checks whether a transaction's signature authorizes it.
///
/// The rules, cheapest first:
///
/// 1. A mint-sent transaction (mining reward) is always valid. The mint
///    has no keypair, so there is nothing to verify.
/// 2. A participant transaction with an empty signature is a hard
///    [`TransactionError::MissingSignature`] error.
/// 3. Otherwise the Ed25519 signature must verify against the sender
///    address over [`Transaction::content_hash`]. A signature that does
///    not verify, a sender address that does not decode to a public key,
///    or malformed signature bytes all yield `Ok(false)`, never an error.
pub fn verify_transaction(tx: &Transaction) -> Result<bool, TransactionError> {
    // 1. Mint-sent transactions are valid without a signature check.
    let sender_address = match tx.sender.as_address() {
        None => return Ok(true),
        Some(addr) => addr,
    };

    // 2. Absence of a signature is a protocol violation, not a failed check.
    if tx.signature.is_empty() {
        return Err(TransactionError::MissingSignature);
    }

    // 3. The signature decides. Undecodable sender addresses cannot have
    //    authorized anything, so they fail as a boolean.
    let public_key = match EmberPublicKey::from_hex(sender_address) {
        Ok(pk) => pk,
        Err(_) => return Ok(false),
    };
    let signature = EmberSignature::from_slice(&tx.signature);
    Ok(public_key.verify(&tx.content_hash(), &signature))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::EmberKeypair;
    use crate::transaction::signing::sign_transaction;
    use crate::transaction::types::Sender;

    fn signed_transfer(keypair: &EmberKeypair, amount: u64) -> Transaction {
        let mut tx = Transaction::new(Sender::Address(keypair.address()), "bb22", amount);
        sign_transaction(&mut tx, keypair).expect("keypair controls the sender");
        tx
    }

    // -- Mint transactions --------------------------------------------------

    #[test]
    fn unsigned_mint_transaction_is_valid() {
        let reward = Transaction::new(Sender::System, "bb22", 100);
        assert!(verify_transaction(&reward).expect("no hard error"));
    }

    #[test]
    fn signed_mint_transaction_is_valid() {
        let kp = EmberKeypair::generate();
        let mut reward = Transaction::new(Sender::System, "bb22", 100);
        sign_transaction(&mut reward, &kp).expect("sign");
        assert!(verify_transaction(&reward).expect("no hard error"));
    }

    // -- Participant transactions -------------------------------------------

    #[test]
    fn signed_transfer_verifies() {
        let kp = EmberKeypair::generate();
        let tx = signed_transfer(&kp, 500);
        assert!(verify_transaction(&tx).expect("no hard error"));
    }

    #[test]
    fn unsigned_participant_transaction_is_hard_error() {
        let kp = EmberKeypair::generate();
        let tx = Transaction::new(Sender::Address(kp.address()), "bb22", 500);

        match verify_transaction(&tx) {
            Err(TransactionError::MissingSignature) => {}
            other => panic!("expected MissingSignature, got {:?}", other),
        }
    }

    #[test]
    fn tampered_amount_fails_as_boolean() {
        let kp = EmberKeypair::generate();
        let mut tx = signed_transfer(&kp, 500);

        tx.amount = 5_000;
        assert!(!verify_transaction(&tx).expect("tampering is not a hard error"));
    }

    #[test]
    fn tampered_recipient_fails_as_boolean() {
        let kp = EmberKeypair::generate();
        let mut tx = signed_transfer(&kp, 500);

        tx.recipient = "attacker".to_string();
        assert!(!verify_transaction(&tx).expect("tampering is not a hard error"));
    }

    #[test]
    fn signature_from_wrong_key_fails_as_boolean() {
        let owner = EmberKeypair::generate();
        let forger = EmberKeypair::generate();
        let mut tx = Transaction::new(Sender::Address(owner.address()), "bb22", 500);

        // Forge a structurally valid signature with the wrong key.
        tx.signature = forger.sign(&tx.content_hash()).as_bytes().to_vec();
        assert!(!verify_transaction(&tx).expect("a wrong key is not a hard error"));
    }

    #[test]
    fn undecodable_sender_address_fails_as_boolean() {
        let mut tx = Transaction::new(Sender::Address("definitely-not-hex".into()), "bb22", 500);
        tx.signature = vec![0xAA; 64];
        assert!(!verify_transaction(&tx).expect("bad address is not a hard error"));
    }

    #[test]
    fn malformed_signature_bytes_fail_as_boolean() {
        let kp = EmberKeypair::generate();
        let mut tx = Transaction::new(Sender::Address(kp.address()), "bb22", 500);
        tx.signature = vec![0x01, 0x02, 0x03]; // nowhere near 64 bytes
        assert!(!verify_transaction(&tx).expect("short signature is not a hard error"));
    }
}
