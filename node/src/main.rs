// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # EMBER Node
//!
//! Entry point for the `ember-node` binary. Parses CLI arguments,
//! initializes logging, and dispatches to one of three subcommands:
//!
//! - `demo`    : scripted end-to-end ledger scenario with colored output
//! - `keygen`  : generate a fresh Ed25519 keypair for use as an address
//! - `version` : print build and ledger version information

mod cli;
mod demo;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Commands, EmberNodeCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = EmberNodeCli::parse();

    let format = LogFormat::from_str_lossy(&cli.log_format);
    let directives = format!(
        "ember_node={level},ember_ledger={level}",
        level = cli.log_level
    );

    match cli.command {
        Commands::Demo(args) => {
            logging::init_logging(&directives, format);
            demo::run(args)
        }
        Commands::Keygen(args) => {
            logging::init_logging(&directives, format);
            generate_key(args)
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Generates a fresh Ed25519 keypair and either prints the secret to stdout
/// or writes it to a file with owner-only permissions.
fn generate_key(args: cli::KeygenArgs) -> Result<()> {
    let keypair = ember_ledger::crypto::keys::EmberKeypair::generate();
    let address = keypair.address();
    let secret_hex = hex::encode(keypair.secret_key_bytes());

    match args.out {
        Some(path) => {
            std::fs::write(&path, &secret_hex)
                .with_context(|| format!("failed to write secret key to {}", path.display()))?;

            // Owner-only read/write on Unix. A world-readable secret key is
            // not a secret key.
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
            }

            tracing::info!(address = %address, path = %path.display(), "keypair generated");

            println!("Keypair generated.");
            println!("  Address    : {}", address);
            println!("  Secret key : {} (mode 0600)", path.display());
        }
        None => {
            println!("Keypair generated.");
            println!("  Address    : {}", address);
            println!("  Secret key : {}", secret_hex);
            println!();
            println!("Anyone holding the secret key can spend from this address. Store it well.");
        }
    }

    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("ember-node {}", env!("CARGO_PKG_VERSION"));
    println!("ledger     {}", ember_ledger::config::LEDGER_VERSION);
    println!(
        "network    {} (magic 0x{:08X})",
        ember_ledger::config::LEDGER_FINGERPRINT,
        ember_ledger::config::EMBER_MAGIC,
    );
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
