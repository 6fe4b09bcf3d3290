//! Module implementing the `xpub` subcommand for exporting extended public
//! keys for watch-only derivation.

use crate::cmd::AccountOptions;
use anyhow::Result;
use clap::Parser;
use ethwallet::hdk::Path;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(flatten)]
    account: AccountOptions,

    /// The derivation path of the extended key.
    #[clap(name = "PATH", default_value = "m/44'/60'/0'/0")]
    path: Path,

    /// Export the extended private key instead.
    #[clap(long)]
    private: bool,
}

pub fn run(options: Options) -> Result<()> {
    let key = options.account.root()?.derive_path(&options.path)?;
    if options.private {
        println!("{key}");
    } else {
        println!("{}", key.public());
    }
    Ok(())
}
