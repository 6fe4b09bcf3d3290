mod cmd;

use crate::cmd::*;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

/// Hierarchical deterministic wallet for Ethereum.
#[derive(Debug, Parser)]
#[clap(name = "ethwallet", version)]
enum Options {
    /// Generate a new mnemonic phrase.
    New(new::Options),
    /// Generate a new random private key.
    Random(random::Options),
    /// Print the address of an account.
    Address(address::Options),
    /// Print the addresses for explicit derivation paths.
    Derive(derive::Options),
    /// Export an account's private key.
    Export(export::Options),
    /// Print an account's uncompressed public key.
    PublicKey(public_key::Options),
    /// Print the extended public key for a derivation path.
    Xpub(xpub::Options),
    /// Sign a message, transaction or raw digest.
    Sign(sign::Options),
    /// Verify a personal message signature.
    Verify(verify::Options),
    /// Recover the signer of a message or raw transaction.
    Recover(recover::Options),
    /// Compute the Keccak-256 digest of some data.
    Hash(hash::Options),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = match Options::parse() {
        Options::New(options) => new::run(options),
        Options::Random(options) => random::run(options),
        Options::Address(options) => address::run(options),
        Options::Derive(options) => derive::run(options),
        Options::Export(options) => export::run(options),
        Options::PublicKey(options) => public_key::run(options),
        Options::Xpub(options) => xpub::run(options),
        Options::Sign(options) => sign::run(options),
        Options::Verify(options) => verify::run(options),
        Options::Recover(options) => recover::run(options),
        Options::Hash(options) => hash::run(options),
    } {
        if cfg!(debug_assertions) {
            eprintln!("ERROR: {err:?}");
        } else {
            eprintln!("ERROR: {err:#}");
        }
        process::exit(-1);
    }
}
