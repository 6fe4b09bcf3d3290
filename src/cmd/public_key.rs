//! Module implementing the `public-key` subcommand for displaying an account's
//! public key.

use crate::cmd::AccountOptions;
use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(flatten)]
    account: AccountOptions,

    /// Print the 33-byte SEC1 compressed encoding.
    #[clap(long)]
    compressed: bool,
}

pub fn run(options: Options) -> Result<()> {
    let public_key = options.account.account()?.public_key();
    if options.compressed {
        println!("0x{}", hex::encode(public_key.encode_compressed()));
    } else {
        println!("0x{}", hex::encode(public_key.encode_uncompressed()));
    }
    Ok(())
}
