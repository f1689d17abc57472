//! Minimal tour of the EMBER ledger API.
//!
//! Creates two wallets, moves some cinders between them, mines a couple
//! of rounds, and prints the resulting balances and chain verdict.
//!
//! Run with:
//!   cargo run --example quickstart

use ember_ledger::chain::{Ledger, LedgerConfig, LedgerError};
use ember_ledger::crypto::keys::EmberKeypair;
use ember_ledger::transaction::{sign_transaction, Sender, Transaction};

fn main() -> Result<(), LedgerError> {
    // A ledger needs an authority keypair to sign its mining rewards.
    let authority = EmberKeypair::generate();
    let config = LedgerConfig {
        difficulty: 2,
        mining_reward: 100,
    };
    let mut ledger = Ledger::with_config(config, authority);

    let alice = EmberKeypair::generate();
    let bob = EmberKeypair::generate();
    println!("alice : {}", alice.address());
    println!("bob   : {}", bob.address());

    // Alice sends Bob 250 cinders. The transfer waits in the pending
    // buffer until a mining round seals it.
    let mut tx = Transaction::new(Sender::Address(alice.address()), &bob.address(), 250);
    sign_transaction(&mut tx, &alice)?;
    ledger.submit_transaction(tx)?;

    // Round 1 seals the transfer and queues Alice's mining reward.
    let block = ledger.mine_pending_transactions(&alice.address())?;
    println!("mined block {} with nonce {}", block.hash_hex(), block.nonce);

    // Round 2 seals that reward, so it finally counts.
    ledger.mine_pending_transactions(&bob.address())?;

    println!("alice balance : {}", ledger.balance_of(&alice.address()));
    println!("bob balance   : {}", ledger.balance_of(&bob.address()));
    println!("chain height  : {}", ledger.height());
    println!("chain valid   : {}", ledger.is_chain_valid());

    Ok(())
}
