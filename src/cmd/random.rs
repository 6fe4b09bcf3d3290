//! Module implementing the `random` subcommand for generating a standalone
//! wallet from a fresh private key.

use anyhow::Result;
use clap::Parser;
use ethwallet::account::Account;

#[derive(Debug, Parser)]
pub struct Options {
    /// Only print the address, without the key material.
    #[clap(long)]
    address_only: bool,
}

pub fn run(options: Options) -> Result<()> {
    let account = Account::random()?;
    if options.address_only {
        println!("{}", account.address());
        return Ok(());
    }

    println!(
        "private key: 0x{}",
        hex::encode(&account.private_key().secret()[..])
    );
    println!("public key:  {}", account.public_key());
    println!("address:     {}", account.address());
    Ok(())
}
