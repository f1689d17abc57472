//! # The Ledger
//!
//! The append-only chain, the pending transaction buffer, and every query
//! EMBER answers. This is the type the node binary actually drives; the
//! rest of the crate exists so this module can stay small.
//!
//! ## Lifecycle
//!
//! ```text
//! submit_transaction ──▶ pending buffer ──▶ mine_pending_transactions
//!                                                     │
//!                   ┌─────────────────────────────────┘
//!                   ▼
//!            chain (append-only)  ◀── balance_of / is_chain_valid read here
//! ```
//!
//! ## Design Decisions
//!
//! - The mining reward is queued, not paid. Mining a block replaces the
//!   pending buffer with a single system-sent reward transaction, so the
//!   reward only lands in a balance once a later round seals it. Miners
//!   are paid one round late, exactly like the chain this design follows.
//! - Balances are signed, 128 bits wide. Nothing stops a participant from
//!   spending cinders they do not have; `balance_of` reports the honest
//!   negative number instead of pretending otherwise, and sums in `i128`
//!   so a `u64::MAX` amount cannot wrap it.
//! - `is_chain_valid` is a verdict, not an error. A tampered chain is a
//!   finding the caller asked about, so it comes back as `false` with the
//!   details in the logs.
//! - The mining authority keypair is handed to the constructor. There is
//!   no process-wide key material, so two ledgers in one process cannot
//!   contaminate each other and tests never share secrets.

use thiserror::Error;
use tracing::{debug, info};

use crate::chain::block::Block;
use crate::chain::mining::{mine_block, mine_genesis};
use crate::config::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD};
use crate::crypto::keys::EmberKeypair;
use crate::transaction::{
    sign_transaction, verify_transaction, Sender, Transaction, TransactionError,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong at the ledger surface.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The transaction is structurally unusable and was never queued.
    #[error("malformed transaction: {reason}")]
    MalformedTransaction { reason: &'static str },

    /// The transaction carries a signature that does not verify.
    #[error("invalid signature from sender {sender}")]
    InvalidSignature { sender: String },

    /// The chain has no blocks. Unreachable on any constructed ledger,
    /// which always starts with genesis.
    #[error("the chain is empty")]
    EmptyChain,

    /// A transaction-level protocol violation, surfaced unchanged.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable ledger parameters, fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct LedgerConfig {
    /// Proof-of-work target in leading zero hex digits.
    pub difficulty: usize,
    /// Cinders credited per mined block.
    pub mining_reward: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// An in-memory EMBER ledger: the chain, the pending buffer, and the
/// mining authority that signs reward transactions.
///
/// The ledger owns its blocks outright. Everything handed out by the
/// accessors is a borrow; nothing outside this type can push, pop, or
/// reorder the chain.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: usize,
    mining_reward: u64,
    authority: EmberKeypair,
}

impl Ledger {
    /// Create a ledger with default parameters and mine its genesis block.
    ///
    /// The authority keypair signs the system-sent reward transactions
    /// this ledger mints. It is an ordinary keypair; what makes it the
    /// authority is only that the ledger holds it.
    pub fn new(authority: EmberKeypair) -> Self {
        Self::with_config(LedgerConfig::default(), authority)
    }

    /// Create a ledger with explicit parameters and mine its genesis block.
    ///
    /// Construction blocks until the genesis proof-of-work resolves, so
    /// the chain is never observable in an empty state. The difficulty is
    /// taken as given; a target past what the digest can show would search
    /// forever, and bounding that is the caller's job.
    pub fn with_config(config: LedgerConfig, authority: EmberKeypair) -> Self {
        let genesis = mine_genesis(config.difficulty);
        info!(
            difficulty = config.difficulty,
            mining_reward = config.mining_reward,
            genesis = %genesis.hash_hex(),
            "ledger initialized"
        );
        Ledger {
            chain: vec![genesis],
            pending: Vec::new(),
            difficulty: config.difficulty,
            mining_reward: config.mining_reward,
            authority,
        }
    }

    // -- Chain access -------------------------------------------------------

    /// Return the most recently appended block.
    pub fn latest_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Return the hash of the most recently appended block.
    pub fn latest_block_hash(&self) -> Result<[u8; 32], LedgerError> {
        Ok(self.latest_block()?.hash)
    }

    /// Return the full chain, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Return the chain height (number of blocks, genesis included).
    pub fn height(&self) -> u64 {
        self.chain.len() as u64
    }

    /// Return the transactions waiting for the next mining round.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Return the configured proof-of-work difficulty.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Return the configured per-block mining reward in cinders.
    pub fn mining_reward(&self) -> u64 {
        self.mining_reward
    }

    /// Return the address of the keypair that signs reward transactions.
    pub fn authority_address(&self) -> String {
        self.authority.address()
    }

    // -- Submission ---------------------------------------------------------

    /// Queue a transaction for the next mining round.
    ///
    /// The transaction must name both parties and carry a signature that
    /// verifies. Nothing else is checked: no duplicate detection, no
    /// balance-sufficiency test. On any error the pending buffer is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::MalformedTransaction`] when the sender address or
    ///   the recipient is an empty string.
    /// - [`LedgerError::InvalidSignature`] when the signature fails to
    ///   verify against the sender address.
    /// - [`LedgerError::Transaction`] when a participant transaction
    ///   carries no signature at all.
    pub fn submit_transaction(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        if let Some(sender) = tx.sender.as_address() {
            if sender.is_empty() {
                return Err(LedgerError::MalformedTransaction {
                    reason: "sender address is empty",
                });
            }
        }
        if tx.recipient.is_empty() {
            return Err(LedgerError::MalformedTransaction {
                reason: "recipient is empty",
            });
        }
        if !verify_transaction(&tx)? {
            return Err(LedgerError::InvalidSignature {
                sender: tx.sender.to_string(),
            });
        }

        debug!(
            sender = %tx.sender,
            recipient = %tx.recipient,
            amount = tx.amount,
            pending = self.pending.len() + 1,
            "transaction queued"
        );
        self.pending.push(tx);
        Ok(())
    }

    // -- Mining -------------------------------------------------------------

    /// Mine the pending buffer into a new block and queue the reward.
    ///
    /// Seals everything currently pending, even an empty buffer, into a
    /// block linked to the chain tip, then replaces the buffer with a
    /// single authority-signed system transaction crediting
    /// `reward_address`. The reward therefore matures one round late: it
    /// counts toward a balance only after the NEXT mined block seals it.
    pub fn mine_pending_transactions(
        &mut self,
        reward_address: &str,
    ) -> Result<&Block, LedgerError> {
        let previous_hash = self.latest_block_hash()?;

        let mut reward = Transaction::new(Sender::System, reward_address, self.mining_reward);
        sign_transaction(&mut reward, &self.authority)?;

        let block = mine_block(&self.pending, previous_hash, self.difficulty);
        info!(
            height = self.chain.len(),
            nonce = block.nonce,
            tx_count = block.tx_count(),
            hash = %block.hash_hex(),
            "block appended"
        );
        self.chain.push(block);
        self.pending = vec![reward];

        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    // -- Queries ------------------------------------------------------------

    /// Compute the net balance of an address in cinders.
    ///
    /// Walks every transaction in every block: a debit where the address
    /// is the sender, a credit where it is the recipient. The result is
    /// signed and starts from zero, so an address that spent more than it
    /// received reports a negative balance. System-sent rewards credit
    /// their recipient without debiting anyone. Pending transactions do
    /// not count until they are mined.
    ///
    /// The sum is carried in `i128`. Amounts run all the way to
    /// `u64::MAX`, which no 64-bit accumulator can negate; 128 bits hold
    /// the net of any chain that fits in memory.
    pub fn balance_of(&self, address: &str) -> i128 {
        let mut balance = 0i128;
        for block in &self.chain {
            for tx in &block.transactions {
                if tx.sender.as_address() == Some(address) {
                    balance -= i128::from(tx.amount);
                }
                if tx.recipient == address {
                    balance += i128::from(tx.amount);
                }
            }
        }
        balance
    }

    /// Audit the whole chain for tampering.
    ///
    /// Every block above genesis must pass three checks: all its sealed
    /// signatures still verify, its stored hash matches its recomputed
    /// hash, and its parent pointer matches the previous block's hash.
    /// Genesis is the fixed anchor and is not re-validated. The verdict
    /// is a plain boolean; the failing block and check land in the logs.
    pub fn is_chain_valid(&self) -> bool {
        Self::validate_blocks(&self.chain)
    }

    /// Run the chain audit over any block sequence, owned or not.
    ///
    /// This is the same check [`Ledger::is_chain_valid`] applies to its
    /// own chain, exposed so a copy received from elsewhere can be
    /// audited before anyone trusts it.
    pub fn validate_blocks(blocks: &[Block]) -> bool {
        for index in 1..blocks.len() {
            let block = &blocks[index];
            let previous = &blocks[index - 1];

            if !block.transactions_valid() {
                debug!(height = index, "chain invalid: block seals an invalid transaction");
                return false;
            }
            if block.hash != block.compute_hash() {
                debug!(height = index, "chain invalid: stored hash does not match content");
                return false;
            }
            if block.previous_hash != previous.hash {
                debug!(height = index, "chain invalid: parent pointer is broken");
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Difficulty 1 keeps proof-of-work near-instant in tests.
    fn test_ledger() -> Ledger {
        let config = LedgerConfig {
            difficulty: 1,
            mining_reward: 100,
        };
        Ledger::with_config(config, EmberKeypair::generate())
    }

    fn signed_transfer(keypair: &EmberKeypair, recipient: &str, amount: u64) -> Transaction {
        let mut tx = Transaction::new(Sender::Address(keypair.address()), recipient, amount);
        sign_transaction(&mut tx, keypair).expect("keypair controls the sender");
        tx
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn fresh_ledger_holds_only_genesis() {
        let ledger = test_ledger();

        assert_eq!(ledger.height(), 1);
        assert!(ledger.pending().is_empty());
        let genesis = ledger.latest_block().expect("genesis present");
        assert!(genesis.transactions.is_empty());
        assert_eq!(genesis.previous_hash, [0u8; 32]);
    }

    #[test]
    fn two_ledgers_agree_on_genesis() {
        let a = test_ledger();
        let b = test_ledger();
        assert_eq!(a.blocks()[0], b.blocks()[0]);
    }

    #[test]
    fn config_defaults_come_from_the_constants() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(config.mining_reward, DEFAULT_MINING_REWARD);
    }

    #[test]
    fn empty_chain_is_reported_not_panicked() {
        // Not constructible through the public API; assembled directly to
        // pin the error path.
        let ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
            difficulty: 1,
            mining_reward: 100,
            authority: EmberKeypair::generate(),
        };

        match ledger.latest_block() {
            Err(LedgerError::EmptyChain) => {}
            other => panic!("expected EmptyChain, got {:?}", other),
        }
    }

    // -- Submission ---------------------------------------------------------

    #[test]
    fn submitted_transactions_wait_in_the_pending_buffer() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();

        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 30))
            .expect("valid transaction");

        assert_eq!(ledger.pending().len(), 1);
        assert_eq!(ledger.height(), 1, "submission must not mine anything");
    }

    #[test]
    fn empty_recipient_is_rejected_as_malformed() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();

        match ledger.submit_transaction(signed_transfer(&alice, "", 30)) {
            Err(LedgerError::MalformedTransaction { .. }) => {}
            other => panic!("expected MalformedTransaction, got {:?}", other),
        }
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn empty_sender_address_is_rejected_as_malformed() {
        let mut ledger = test_ledger();
        let mut tx = Transaction::new(Sender::Address(String::new()), "bb22", 30);
        tx.signature = vec![0xAA; 64];

        match ledger.submit_transaction(tx) {
            Err(LedgerError::MalformedTransaction { .. }) => {}
            other => panic!("expected MalformedTransaction, got {:?}", other),
        }
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn unsigned_transaction_is_rejected_before_queueing() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        let tx = Transaction::new(Sender::Address(alice.address()), "bb22", 30);

        match ledger.submit_transaction(tx) {
            Err(LedgerError::Transaction(TransactionError::MissingSignature)) => {}
            other => panic!("expected MissingSignature, got {:?}", other),
        }
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn tampered_transaction_is_rejected_with_its_sender() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        let mut tx = signed_transfer(&alice, "bb22", 30);
        tx.amount = 30_000;

        match ledger.submit_transaction(tx) {
            Err(LedgerError::InvalidSignature { sender }) => {
                assert_eq!(sender, alice.address());
            }
            other => panic!("expected InvalidSignature, got {:?}", other),
        }
        assert!(ledger.pending().is_empty());
    }

    // -- Mining -------------------------------------------------------------

    #[test]
    fn mining_seals_the_pending_buffer_in_order() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        let first = signed_transfer(&alice, "bb22", 10);
        let second = signed_transfer(&alice, "cc33", 20);

        ledger.submit_transaction(first.clone()).expect("queue");
        ledger.submit_transaction(second.clone()).expect("queue");
        let genesis_hash = ledger.latest_block_hash().expect("genesis");

        let block = ledger.mine_pending_transactions("miner").expect("mine");
        assert_eq!(block.transactions, vec![first, second]);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(ledger.height(), 2);
    }

    #[test]
    fn mining_replaces_pending_with_the_signed_reward() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 10))
            .expect("queue");

        ledger.mine_pending_transactions("miner").expect("mine");

        let pending = ledger.pending();
        assert_eq!(pending.len(), 1, "buffer is replaced, not appended to");
        assert_eq!(pending[0].sender, Sender::System);
        assert_eq!(pending[0].recipient, "miner");
        assert_eq!(pending[0].amount, 100);
        assert!(pending[0].is_signed(), "authority signs the queued reward");
        assert!(verify_transaction(&pending[0]).expect("no hard error"));
    }

    #[test]
    fn mining_an_empty_buffer_produces_an_empty_block() {
        let mut ledger = test_ledger();
        let block = ledger.mine_pending_transactions("miner").expect("mine");
        assert!(block.transactions.is_empty());
        assert_eq!(ledger.height(), 2);
    }

    #[test]
    fn reward_matures_one_round_late() {
        let mut ledger = test_ledger();

        ledger.mine_pending_transactions("miner").expect("round 1");
        assert_eq!(ledger.balance_of("miner"), 0, "reward is queued, not paid");

        ledger.mine_pending_transactions("other").expect("round 2");
        assert_eq!(ledger.balance_of("miner"), 100, "round 2 seals round 1's reward");
        assert_eq!(ledger.balance_of("other"), 0);
    }

    #[test]
    fn each_round_rewards_its_own_miner() {
        let mut ledger = test_ledger();

        ledger.mine_pending_transactions("m1").expect("round 1");
        ledger.mine_pending_transactions("m2").expect("round 2");
        ledger.mine_pending_transactions("m3").expect("round 3");

        assert_eq!(ledger.balance_of("m1"), 100);
        assert_eq!(ledger.balance_of("m2"), 100);
        assert_eq!(ledger.balance_of("m3"), 0, "the newest reward is still pending");
    }

    #[test]
    fn custom_reward_amount_is_honored() {
        let config = LedgerConfig {
            difficulty: 1,
            mining_reward: 250,
        };
        let mut ledger = Ledger::with_config(config, EmberKeypair::generate());

        ledger.mine_pending_transactions("miner").expect("round 1");
        ledger.mine_pending_transactions("miner").expect("round 2");
        assert_eq!(ledger.balance_of("miner"), 250);
    }

    // -- Balances -----------------------------------------------------------

    #[test]
    fn balances_are_net_of_debits_and_credits() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        let bob = EmberKeypair::generate();

        ledger
            .submit_transaction(signed_transfer(&alice, &bob.address(), 30))
            .expect("queue");
        ledger
            .submit_transaction(signed_transfer(&bob, &alice.address(), 12))
            .expect("queue");
        ledger.mine_pending_transactions("miner").expect("mine");

        assert_eq!(ledger.balance_of(&alice.address()), -18);
        assert_eq!(ledger.balance_of(&bob.address()), 18);
    }

    #[test]
    fn overspending_yields_an_honest_negative_balance() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();

        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 1_000))
            .expect("no funding check at submission");
        ledger.mine_pending_transactions("miner").expect("mine");

        assert_eq!(ledger.balance_of(&alice.address()), -1_000);
        assert_eq!(ledger.balance_of("bb22"), 1_000);
    }

    #[test]
    fn amounts_past_i64_keep_their_sign() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        let bob = EmberKeypair::generate();

        // u64::MAX is a legal amount, and nothing deduplicates the buffer,
        // so one block can move more cinders than a u64 holds. The sender
        // must land exactly that far below zero, not wrap back around.
        ledger
            .submit_transaction(signed_transfer(&alice, &bob.address(), u64::MAX))
            .expect("queue");
        ledger
            .submit_transaction(signed_transfer(&alice, &bob.address(), u64::MAX))
            .expect("queue");
        ledger.mine_pending_transactions("miner").expect("mine");

        let moved = 2 * i128::from(u64::MAX);
        assert_eq!(ledger.balance_of(&alice.address()), -moved);
        assert_eq!(ledger.balance_of(&bob.address()), moved);
    }

    #[test]
    fn unknown_address_balance_is_zero() {
        let ledger = test_ledger();
        assert_eq!(ledger.balance_of("nobody"), 0);
    }

    #[test]
    fn pending_transactions_do_not_count_toward_balances() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();

        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 30))
            .expect("queue");
        assert_eq!(ledger.balance_of("bb22"), 0);
    }

    #[test]
    fn rewards_credit_without_debiting_anyone() {
        let mut ledger = test_ledger();

        ledger.mine_pending_transactions("miner").expect("round 1");
        ledger.mine_pending_transactions("miner").expect("round 2");
        ledger.mine_pending_transactions("miner").expect("round 3");

        // Two matured rewards, nothing anywhere below zero.
        assert_eq!(ledger.balance_of("miner"), 200);
        assert_eq!(ledger.balance_of(&ledger.authority_address()), 0);
    }

    // -- Chain validation ---------------------------------------------------

    #[test]
    fn untampered_chain_is_valid() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();

        assert!(ledger.is_chain_valid(), "fresh chain");

        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 30))
            .expect("queue");
        ledger.mine_pending_transactions("miner").expect("mine");
        ledger.mine_pending_transactions("miner").expect("mine");
        assert!(ledger.is_chain_valid(), "grown chain");
    }

    #[test]
    fn tampered_amount_invalidates_the_chain() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 30))
            .expect("queue");
        ledger.mine_pending_transactions("miner").expect("mine");

        ledger.chain[1].transactions[0].amount = 30_000;
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn recomputing_the_hash_does_not_hide_tip_tampering() {
        let mut ledger = test_ledger();
        let alice = EmberKeypair::generate();
        ledger
            .submit_transaction(signed_transfer(&alice, "bb22", 30))
            .expect("queue");
        ledger.mine_pending_transactions("miner").expect("mine");

        // Cover the edit with a fresh hash. The sealed signature still
        // refers to the old amount, so validation catches it anyway.
        ledger.chain[1].transactions[0].amount = 30_000;
        ledger.chain[1].hash = ledger.chain[1].compute_hash();
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn recomputing_the_hash_does_not_hide_interior_tampering() {
        let mut ledger = test_ledger();
        ledger.mine_pending_transactions("miner").expect("round 1");
        ledger.mine_pending_transactions("miner").expect("round 2");
        ledger.mine_pending_transactions("miner").expect("round 3");

        // Block 2 seals round 1's reward, a system-sent tx whose signature
        // is never checked. Rewrite the recipient and re-cover the hash;
        // block 3's parent pointer now disagrees.
        ledger.chain[2].transactions[0].recipient = "thief".to_string();
        ledger.chain[2].hash = ledger.chain[2].compute_hash();
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn broken_linkage_invalidates_the_chain() {
        let mut ledger = test_ledger();
        ledger.mine_pending_transactions("miner").expect("round 1");
        ledger.mine_pending_transactions("miner").expect("round 2");

        ledger.chain[1].previous_hash[0] ^= 0xFF;
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn external_chain_copies_can_be_audited() {
        let mut ledger = test_ledger();
        ledger.mine_pending_transactions("miner").expect("round 1");
        ledger.mine_pending_transactions("miner").expect("round 2");

        let mut copy = ledger.blocks().to_vec();
        assert!(Ledger::validate_blocks(&copy));

        // Block 2 seals round 1's reward. Redirect it in the copy.
        copy[2].transactions[0].recipient = "thief".to_string();
        assert!(!Ledger::validate_blocks(&copy));
        assert!(ledger.is_chain_valid(), "the owned chain is untouched");
    }
}
