//! Module implementing the `hash` subcommand for `keccak256` hashing data.

use crate::cmd;
use anyhow::Result;
use clap::Parser;
use ethwallet::{hash, message};
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Options {
    /// Path to the data to hash. Use `-` for standard in.
    #[clap(name = "DATA", default_value = "-")]
    data: PathBuf,

    /// Hash the data as an EIP-191 personal message.
    #[clap(long)]
    personal: bool,
}

pub fn run(options: Options) -> Result<()> {
    let data = cmd::read_input(&options.data)?;
    let digest = if options.personal {
        message::digest(data)
    } else {
        hash::keccak256(data)
    };
    println!("0x{}", hex::encode(digest));
    Ok(())
}
