//! Module implementing the `verify` subcommand for checking personal message
//! signatures.

use crate::cmd;
use anyhow::Result;
use clap::{Parser, Subcommand};
use ethwallet::{
    account::{Address, Signature},
    message,
};
use std::{path::PathBuf, process};

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(subcommand)]
    input: Input,
}

#[derive(Debug, Subcommand)]
#[clap(rename_all = "lowercase")]
enum Input {
    /// Verify an EIP-191 personal message signature.
    Message {
        /// Path to the signed message. Use `-` for standard in.
        #[clap(name = "MESSAGE", default_value = "-")]
        message: PathBuf,

        /// The 65-byte hex encoded signature.
        #[clap(short, long)]
        signature: Signature,

        /// The address expected to have signed the message.
        #[clap(short, long)]
        address: Address,
    },
}

pub fn run(options: Options) -> Result<()> {
    match options.input {
        Input::Message {
            message,
            signature,
            address,
        } => {
            let data = cmd::read_input(&message)?;
            let valid = message::verify(data, &signature, address)?;
            println!("{valid}");
            if !valid {
                process::exit(1);
            }
        }
    }
    Ok(())
}
