//! # CLI Interface
//!
//! Defines the command-line argument structure for `ember-node` using
//! `clap` derive. Supports three subcommands: `demo`, `keygen`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EMBER ledger node.
///
/// A single-process EMBER ledger with a scripted demo scenario. Builds
/// the chain in memory, mines with real proof-of-work, and prints what
/// it finds.
#[derive(Parser, Debug)]
#[command(
    name = "ember-node",
    about = "EMBER ledger node",
    version,
    propagate_version = true
)]
pub struct EmberNodeCli {
    /// Default log level when RUST_LOG is not set.
    ///
    /// Accepts EnvFilter directives, e.g. "debug" or
    /// "ember_node=debug,ember_ledger=info".
    #[arg(long, global = true, env = "EMBER_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, env = "EMBER_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the EMBER node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scripted ledger demo: wallets, transfers, mining rounds,
    /// balances, the serialized chain, and a tampering walkthrough.
    Demo(DemoArgs),
    /// Generate a fresh keypair and print the secret key and address.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Proof-of-work difficulty in leading zero hex digits.
    ///
    /// Each extra digit multiplies the expected mining work by 16, so
    /// anything above 8 is rejected before it can melt a laptop.
    #[arg(
        long,
        env = "EMBER_DIFFICULTY",
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(0..=8)
    )]
    pub difficulty: u8,

    /// Mining reward per block, in cinders.
    #[arg(long, env = "EMBER_REWARD", default_value_t = 100)]
    pub reward: u64,

    /// Number of mining rounds to run after the transfers are queued.
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(1..=16)
    )]
    pub rounds: u8,

    /// Skip the pretty-printed JSON dump of the full chain.
    #[arg(long)]
    pub no_chain_dump: bool,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Write the hex secret key to this file (mode 0600) instead of
    /// printing it to stdout. The address is always printed.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}
