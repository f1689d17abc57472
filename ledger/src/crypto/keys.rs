//! # Key Management
//!
//! Ed25519 keypair generation and handling for EMBER identities.
//!
//! An address on the ledger is nothing more than the hex rendering of an
//! Ed25519 public key: 64 characters, comparable for equality, derivable
//! only by the holder of the matching secret key. This module owns that
//! mapping and the sign/verify primitives built on it.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact and sufficient.
//! - Constant-time implementations exist and are well-audited.
//! - Fast verification, which matters when chain validation re-checks
//!   every transaction in every block.
//!
//! ## Security considerations
//!
//! - Secret keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS RNG (`OsRng`). If that is broken, you have
//!   bigger problems than this ledger.
//! - Secret bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised while parsing key material.
///
/// Intentionally vague about *why* something failed. Leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or malformed hex")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An EMBER identity keypair wrapping an Ed25519 signing key.
///
/// Whoever holds one of these can spend from the address it derives.
/// Guard it accordingly.
///
/// ## Serialization
///
/// `EmberKeypair` intentionally does NOT implement `Serialize` or
/// `Deserialize`. Exporting a secret key should be a deliberate act through
/// [`secret_key_bytes`](Self::secret_key_bytes), not something that happens
/// because a keypair ended up inside a JSON response.
///
/// # Examples
///
/// ```
/// use ember_ledger::crypto::keys::EmberKeypair;
///
/// let kp = EmberKeypair::generate();
/// let sig = kp.sign(b"send 100 cinders to alice");
/// assert!(kp.verify(b"send 100 cinders to alice", &sig));
/// ```
pub struct EmberKeypair {
    signing_key: SigningKey,
}

/// The public half of an EMBER identity, safe to share with the world.
///
/// Its hex rendering is the address other parties send value to and verify
/// signatures against.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmberPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message.
///
/// Stored as `Vec<u8>` for serde compatibility, but a genuine signature is
/// always exactly 64 bytes. Anything else simply fails verification with a
/// boolean `false`; no panics, no undefined behavior.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmberSignature {
    bytes: Vec<u8>,
}

impl EmberKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed, so this doubles as
    /// the from-raw-bytes constructor. Test fixtures lean on it heavily.
    ///
    /// **Warning**: a weak seed gives a weak key. Feed it CSPRNG or KDF
    /// output, nothing less.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    ///
    /// This exists so the node binary can accept fixture keys on the
    /// command line. Please do not keep raw hex keys lying around beyond
    /// demos and tests.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let mut arr = [0u8; SECRET_KEY_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self::from_seed(&arr))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> EmberPublicKey {
        EmberPublicKey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Returns this keypair's ledger address: the hex rendering of its
    /// public key. This is the identity that appears as a sender or
    /// recipient on-chain. Safe to share, log, tattoo on your arm, etc.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign a message and return the signature.
    ///
    /// Ed25519 signatures are deterministic: the same (key, message) pair
    /// always produces the same signature. No nonce games, no sleepless
    /// nights wondering whether the RNG was seeded during signing.
    pub fn sign(&self, message: &[u8]) -> EmberSignature {
        EmberSignature::from_bytes(self.signing_key.sign(message).to_bytes())
    }

    /// Verify a signature against this keypair's own public key.
    pub fn verify(&self, message: &[u8], signature: &EmberSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Exports the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** This is the only secret standing
    /// between an attacker and the associated address. Don't log it, don't
    /// ship it over a network, don't park it in a file called `my_keys.txt`.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for EmberKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a secret key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for EmberKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even
        // "partially". Grepping logs for hex fragments is trivial.
        write!(f, "EmberKeypair(address={})", self.address())
    }
}

impl PartialEq for EmberKeypair {
    /// Two keypairs are equal when their public keys match. Comparing
    /// secret material in a non-constant-time way is a bad habit, and for
    /// identity purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for EmberKeypair {}

// ---------------------------------------------------------------------------
// EmberPublicKey
// ---------------------------------------------------------------------------

impl EmberPublicKey {
    /// Wrap raw public key bytes without validating the point.
    ///
    /// Keypair-derived bytes are always a valid point; untrusted input
    /// should come through [`from_hex`](Self::from_hex), which refuses
    /// anything that does not decode to one. [`verify`](Self::verify)
    /// answers `false` for junk bytes either way.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns a plain boolean because callers only ever want a yes/no
    /// answer here. Malformed key bytes or a signature that isn't 64 bytes
    /// verify as `false`.
    pub fn verify(&self, message: &[u8], signature: &EmberSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation: 64 characters, the on-ledger address.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key (an address string).
    ///
    /// Validates that the bytes form a real Ed25519 point, not just any 32
    /// bytes. Low-order and otherwise degenerate points are refused.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self::from_bytes(arr))
    }
}

impl Hash for EmberPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for EmberPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for EmberPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EmberPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// EmberSignature
// ---------------------------------------------------------------------------

impl EmberSignature {
    /// Create a signature from the canonical 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Wrap arbitrary signature bytes, valid or not.
    ///
    /// Transactions store their signature as an opaque byte string; this
    /// turns that back into a verifiable value. A slice that isn't 64 bytes
    /// produces a signature that fails verification, which is exactly the
    /// answer such input deserves.
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            bytes: slice.to_vec(),
        }
    }

    /// Returns the raw signature bytes (64 for a genuine signature).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature string. 128 characters for a valid signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for EmberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for EmberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "EmberSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "EmberSignature({})", hex_str)
        }
    }
}
