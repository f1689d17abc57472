//! Scripted demo of the full EMBER ledger lifecycle.
//!
//! Walks through wallet generation, genesis mining, signed transfers,
//! proof-of-work rounds, balance queries, a JSON dump of the chain, and a
//! tampering walkthrough that shows the audit catching a rewritten block.
//! The output uses ANSI escape codes for colored, storytelling-style
//! terminal rendering.
//!
//! Run with:
//!   cargo run --bin ember-node -- demo

use std::time::Instant;

use anyhow::{Context, Result};

use ember_ledger::chain::{Ledger, LedgerConfig};
use ember_ledger::config::{DEFAULT_DIFFICULTY, LEDGER_FINGERPRINT};
use ember_ledger::crypto::keys::EmberKeypair;
use ember_ledger::transaction::{sign_transaction, Sender, Transaction};

use crate::cli::DemoArgs;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    EMBER LEDGER  --  Proof-of-Work Lifecycle Demo                  {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    {LEDGER_FINGERPRINT}  |  Ed25519 + double SHA-256 + BLAKE3                {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!(
        "{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}"
    );
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!(
        "{CYAN}------------------------------------------------------------------------{RESET}"
    );
}

fn subsection(text: &str) {
    println!("{DIM}{CYAN}  >> {text}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn rejected(text: &str) {
    println!("{MAGENTA}  [REJECTED] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

fn address_display(name: &str, addr: &str, color: &str) {
    let prefix = &addr[..8];
    let suffix = &addr[addr.len().saturating_sub(8)..];
    println!(
        "  {color}{BOLD}{name}{RESET}  {DIM}{prefix}...{suffix}{RESET}  {DIM}({} chars){RESET}",
        addr.len()
    );
}

fn balance_row(name: &str, balance: i128, color: &str) {
    println!("  {color}{BOLD}{name:<10}{RESET}  {WHITE}{balance:>12}{RESET} {DIM}cinders{RESET}");
}

fn separator() {
    println!(
        "{DIM}{CYAN}  . . . . . . . . . . . . . . . . . . . . . . . . . . . . . . . . . {RESET}"
    );
}

fn balances_table(ledger: &Ledger, title: &str, rows: &[(&str, &str, &str)]) {
    println!();
    println!("  {BOLD}{WHITE}--- {title} ---{RESET}");
    for (name, addr, color) in rows {
        balance_row(name, ledger.balance_of(addr), color);
    }
    println!();
}

// ---------------------------------------------------------------------------
// Demo scenario
// ---------------------------------------------------------------------------

pub fn run(args: DemoArgs) -> Result<()> {
    let demo_start = Instant::now();
    let difficulty = args.difficulty as usize;

    banner();

    // -----------------------------------------------------------------------
    // Step 1: Wallets
    // -----------------------------------------------------------------------

    section(1, "Wallet Generation");
    subsection("Generating Ed25519 keypairs; the hex public key is the address...");

    let t = Instant::now();
    let alice = EmberKeypair::generate();
    let bob = EmberKeypair::generate();
    let miner = EmberKeypair::generate();
    let authority = EmberKeypair::generate();
    timing("keygen x4", t.elapsed());

    let alice_addr = alice.address();
    let bob_addr = bob.address();
    let miner_addr = miner.address();

    println!();
    address_display("Alice    ", &alice_addr, BLUE);
    address_display("Bob      ", &bob_addr, GREEN);
    address_display("Miner    ", &miner_addr, MAGENTA);
    address_display("Authority", &authority.address(), YELLOW);
    println!();
    success("Four keypairs generated; no two ledgers ever share the authority key");

    // -----------------------------------------------------------------------
    // Step 2: Ledger bootstrap
    // -----------------------------------------------------------------------

    section(2, "Ledger Bootstrap (Genesis Mining)");
    subsection("Constructing the ledger; genesis proof-of-work runs inline...");

    let config = LedgerConfig {
        difficulty,
        mining_reward: args.reward,
    };
    let t = Instant::now();
    let mut ledger = Ledger::with_config(config, authority);
    timing("genesis proof-of-work", t.elapsed());

    let genesis = &ledger.blocks()[0];
    let genesis_time = chrono::DateTime::from_timestamp_millis(genesis.timestamp as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info("Genesis hash", &genesis.hash_hex());
    info("Genesis timestamp", &genesis_time);
    info("Difficulty", &format!("{difficulty} leading zero hex digits"));
    info("Mining reward", &format!("{} cinders", args.reward));
    success("Ledger initialized with a deterministic genesis block");

    // -----------------------------------------------------------------------
    // Step 3: Signed transfers
    // -----------------------------------------------------------------------

    section(3, "Signed Transfers");
    subsection("Building, signing, and submitting two transfers...");

    let mut tx1 = Transaction::new(Sender::Address(alice_addr.clone()), &bob_addr, 100);
    sign_transaction(&mut tx1, &alice).context("signing Alice's transfer")?;
    info("Alice -> Bob", "100 cinders");
    info("  content digest", &hex::encode(tx1.content_hash())[..16]);

    let mut tx2 = Transaction::new(Sender::Address(bob_addr.clone()), &alice_addr, 50);
    sign_transaction(&mut tx2, &bob).context("signing Bob's transfer")?;
    info("Bob -> Alice", "50 cinders");
    info("  content digest", &hex::encode(tx2.content_hash())[..16]);

    ledger
        .submit_transaction(tx1.clone())
        .context("submitting Alice's transfer")?;
    ledger
        .submit_transaction(tx2)
        .context("submitting Bob's transfer")?;
    info("Pending transactions", &ledger.pending().len().to_string());

    // A forged transaction bounces off the signature check.
    subsection("Submitting a forged copy with an inflated amount...");
    let mut forged = tx1;
    forged.amount = 1_000_000;
    match ledger.submit_transaction(forged) {
        Err(err) => rejected(&err.to_string()),
        Ok(()) => anyhow::bail!("forged transaction was accepted"),
    }
    info("Pending transactions", &ledger.pending().len().to_string());
    success("Valid transfers queued; the forgery never reached the buffer");

    // -----------------------------------------------------------------------
    // Step 4: Mining rounds
    // -----------------------------------------------------------------------

    section(4, &format!("Mining {} Rounds", args.rounds));
    subsection("Each round seals the pending buffer and queues the miner's reward...");

    for round in 1..=args.rounds {
        println!();
        println!("  {BOLD}{WHITE}Round {round}{RESET}");

        let t = Instant::now();
        let (hash, nonce, tx_count) = {
            let block = ledger
                .mine_pending_transactions(&miner_addr)
                .context("mining the pending buffer")?;
            (block.hash_hex(), block.nonce, block.tx_count())
        };
        timing("proof-of-work", t.elapsed());

        info("Block hash", &hash);
        info("Nonce", &nonce.to_string());
        info("Transactions sealed", &tx_count.to_string());

        balances_table(
            &ledger,
            &format!("Balances After Round {round}"),
            &[
                ("Alice", alice_addr.as_str(), BLUE),
                ("Bob", bob_addr.as_str(), GREEN),
                ("Miner", miner_addr.as_str(), MAGENTA),
            ],
        );
    }

    separator();
    println!(
        "  {ITALIC}{DIM}The newest reward is still pending; it matures when the next round seals it.{RESET}"
    );
    success(&format!(
        "{} rounds mined; chain height is now {}",
        args.rounds,
        ledger.height()
    ));

    // -----------------------------------------------------------------------
    // Step 5: Chain dump
    // -----------------------------------------------------------------------

    section(5, "Serialized Chain");

    let json = serde_json::to_string_pretty(ledger.blocks()).context("serializing the chain")?;
    info("Chain height", &ledger.height().to_string());
    info("Serialized size", &format!("{} bytes", json.len()));
    if args.no_chain_dump {
        subsection("Dump skipped (--no-chain-dump)");
    } else {
        println!("{DIM}{json}{RESET}");
    }
    success("Chain serializes cleanly; hashes are byte arrays, amounts are integers");

    // -----------------------------------------------------------------------
    // Step 6: Audit and tampering walkthrough
    // -----------------------------------------------------------------------

    section(6, "Chain Audit & Tampering Walkthrough");
    subsection("Auditing the owned chain...");

    let t = Instant::now();
    let verdict = ledger.is_chain_valid();
    timing("full chain audit", t.elapsed());
    anyhow::ensure!(verdict, "freshly mined chain failed its own audit");
    success("Owned chain passes: signatures, hashes, and linkage all hold");

    subsection("Forking a copy and inflating a sealed amount...");
    let mut forked = ledger.blocks().to_vec();
    let target = forked
        .iter()
        .position(|b| !b.transactions.is_empty())
        .context("no block with transactions to tamper with")?;
    forked[target].transactions[0].amount = 1_000_000;

    println!(
        "  {MAGENTA}[TAMPERED]{RESET} block {target}: stored hash {DIM}{}…{RESET} no longer matches content hash {DIM}{}…{RESET}",
        &forked[target].hash_hex()[..12],
        &hex::encode(forked[target].compute_hash())[..12],
    );

    anyhow::ensure!(
        !Ledger::validate_blocks(&forked),
        "tampered fork passed the audit"
    );
    success("The audit rejects the tampered fork");

    // Recomputing the hash does not help either: the Ed25519 signature
    // sealed inside the block still disagrees with the new amount.
    forked[target].hash = forked[target].compute_hash();
    anyhow::ensure!(
        !Ledger::validate_blocks(&forked),
        "re-hashed tampered fork passed the audit"
    );
    anyhow::ensure!(ledger.is_chain_valid(), "owned chain was disturbed");
    success("Re-hashing the tampered block changes nothing; the owned chain is untouched");

    // -----------------------------------------------------------------------
    // Final summary
    // -----------------------------------------------------------------------

    let total_elapsed = demo_start.elapsed();

    println!();
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}    DEMO COMPLETE -- Final Summary                                  {RESET}"
    );
    println!(
        "{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}"
    );
    println!();

    println!("  {BOLD}{WHITE}Ledger Statistics:{RESET}");
    println!("  {DIM}----------------------------------------------{RESET}");
    info("Blocks", &format!("{} (genesis + {} mined)", ledger.height(), args.rounds));
    info("Transfers sealed", "2 (plus the matured mining rewards)");
    info("Rewards matured", &format!("{}", i64::from(args.rounds) - 1));
    info("Signing algorithm", "Ed25519 (ed25519-dalek 2.1)");
    info("Hash functions", "double SHA-256 (tx identity), BLAKE3 (blocks)");
    info(
        "Difficulty",
        &format!("{difficulty} hex digits (default {DEFAULT_DIFFICULTY})"),
    );
    println!();

    println!("  {BOLD}{WHITE}Final Balances:{RESET}");
    println!("  {DIM}----------------------------------------------{RESET}");
    balance_row("Alice", ledger.balance_of(&alice_addr), BLUE);
    balance_row("Bob", ledger.balance_of(&bob_addr), GREEN);
    balance_row("Miner", ledger.balance_of(&miner_addr), MAGENTA);

    let conserved = ledger.balance_of(&alice_addr) + ledger.balance_of(&bob_addr);
    println!();
    println!(
        "  {ITALIC}{DIM}Conservation check: Alice + Bob = {conserved} (transfers net to zero; only rewards mint new cinders){RESET}"
    );

    println!();
    println!(
        "  {BOLD}{GREEN}Total demo time: {:.2}s{RESET}",
        total_elapsed.as_secs_f64()
    );
    println!();

    Ok(())
}
