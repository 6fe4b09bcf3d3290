//! Module implementing the `address` subcommand for displaying the public
//! address for corresponding account.

use crate::cmd::AccountOptions;
use anyhow::{ensure, Result};
use clap::Parser;
use ethwallet::account;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(flatten)]
    account: AccountOptions,

    /// Number of consecutive accounts to print, starting at the account
    /// index.
    #[clap(short = 'n', long, default_value_t = 1)]
    count: u32,
}

pub fn run(options: Options) -> Result<()> {
    if options.count == 1 {
        println!("{}", options.account.account()?.address());
        return Ok(());
    }

    ensure!(
        !options.account.has_custom_path(),
        "`--count` only applies to BIP-0044 account indices",
    );
    let start = options.account.account_index();
    let end = start
        .checked_add(options.count)
        .filter(|end| *end <= ethwallet::hdk::HARDENED)
        .ok_or_else(|| anyhow::anyhow!("account range exceeds non-hardened indices"))?;

    let root = options.account.root()?;
    for account in account::accounts(&root, start..end)? {
        if let Some(path) = account.path() {
            println!("{path} {}", account.address());
        }
    }
    Ok(())
}
