//! Module implementing the `derive` subcommand for printing the addresses at
//! explicit derivation paths.

use crate::cmd::AccountOptions;
use anyhow::{Context as _, Result};
use clap::Parser;
use ethwallet::hdk::{ExtendedKey, Path};

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(flatten)]
    account: AccountOptions,

    /// Derive from an extended public or private key instead of the mnemonic.
    /// Paths are then relative to that key.
    #[clap(long)]
    xkey: Option<ExtendedKey>,

    /// The derivation paths to print addresses for.
    #[clap(name = "PATH", required = true)]
    paths: Vec<Path>,
}

pub fn run(options: Options) -> Result<()> {
    let root = match options.xkey {
        Some(xkey) => xkey,
        None => options.account.root()?,
    };

    for path in &options.paths {
        let key = root
            .derive_path(path)
            .with_context(|| format!("failed to derive '{path}'"))?;
        println!("{path} {}", key.public_key().address());
    }
    Ok(())
}
