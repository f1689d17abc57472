//! Core transaction types: the sender tag and the transfer record itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::double_sha256;

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Originator of a transaction.
///
/// Mining rewards are minted by the ledger rather than sent from a funded
/// address, and the mint has no keypair. Modeling it as its own variant
/// (instead of a magic address string) makes every consumer handle the mint
/// case explicitly: verification skips the signature check, balance scans
/// never debit it, and no participant can collide with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The ledger mint. Carries no key material and never debits a balance.
    System,

    /// A participant: the hex rendering of an Ed25519 public key.
    Address(String),
}

impl Sender {
    /// Returns the address string when this sender is a participant.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            Sender::System => None,
            Sender::Address(addr) => Some(addr.as_str()),
        }
    }

    /// True when this sender is the ledger mint.
    pub fn is_system(&self) -> bool {
        matches!(self, Sender::System)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::System => write!(f, "system"),
            Sender::Address(addr) => write!(f, "{}", addr),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A single value transfer: sender, recipient, amount, and an Ed25519
/// signature once the sender has authorized it.
///
/// The signature starts empty and is attached by
/// [`sign_transaction`](super::signing::sign_transaction). Once the
/// transaction is embedded in a mined block it is immutable data; chain
/// validation recomputes hashes to catch anyone who disagrees.
///
/// # Canonical Byte Format
///
/// Hashing and signing use [`Transaction::signable_bytes`], a deterministic
/// concatenation with null-byte separators and fixed-width little-endian
/// integers. JSON/serde is intentionally avoided for hashing because field
/// ordering is not guaranteed across serialization formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Who the value moves from.
    pub sender: Sender,

    /// Address of the receiving party (hex-encoded public key).
    pub recipient: String,

    /// Transfer amount in cinders, the smallest EMBER unit. No floating
    /// point anywhere near monetary values.
    pub amount: u64,

    /// Ed25519 signature over [`Transaction::content_hash`]. Empty until
    /// the transaction is signed.
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Constructs an unsigned transfer.
    pub fn new(sender: Sender, recipient: &str, amount: u64) -> Self {
        Self {
            sender,
            recipient: recipient.to_string(),
            amount,
            signature: Vec::new(),
        }
    }

    /// Returns the canonical byte representation of the signed payload:
    /// sender, recipient, and amount. The signature is excluded, otherwise
    /// the signature would have to cover itself.
    ///
    /// The sender is encoded as a variant tag byte (0x00 mint, 0x01
    /// participant) followed by the address bytes, so an empty participant
    /// address can never alias the mint.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(160);

        // Sender: variant tag, then the address for participants.
        match &self.sender {
            Sender::System => buf.push(0x00),
            Sender::Address(addr) => {
                buf.push(0x01);
                buf.extend_from_slice(addr.as_bytes());
            }
        }
        buf.push(0x00);

        // Recipient address.
        buf.extend_from_slice(self.recipient.as_bytes());
        buf.push(0x00);

        // Amount as little-endian u64.
        buf.extend_from_slice(&self.amount.to_le_bytes());

        buf
    }

    /// The digest a sender signs: `double_sha256(signable_bytes)`.
    ///
    /// Stable across signing, so it can be computed before or after the
    /// signature is attached and the answer never changes.
    pub fn content_hash(&self) -> [u8; 32] {
        double_sha256(&self.signable_bytes())
    }

    /// Full canonical encoding including the signature, length-prefixed.
    ///
    /// This is the per-transaction input to a block's hash preimage. Unlike
    /// [`signable_bytes`](Self::signable_bytes) it covers the signature, so
    /// swapping or stripping signatures inside a mined block changes the
    /// block hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = self.signable_bytes();
        buf.extend_from_slice(&(self.signature.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.signature);
        buf
    }

    /// Returns `true` once a signature has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}
