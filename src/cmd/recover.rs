//! Module implementing the `recover` subcommand for recovering signer
//! addresses.

use crate::cmd;
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use ethwallet::{account::Signature, message::EthereumMessage, transaction::SignedTransaction};
use std::{path::PathBuf, str};

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(subcommand)]
    input: Input,
}

#[derive(Debug, Subcommand)]
#[clap(rename_all = "lowercase")]
enum Input {
    /// Recover the signer of an EIP-191 personal message.
    Message {
        /// Path to the signed message. Use `-` for standard in.
        #[clap(name = "MESSAGE", default_value = "-")]
        message: PathBuf,

        /// The 65-byte hex encoded signature.
        #[clap(short, long)]
        signature: Signature,
    },

    /// Recover the signer of a raw signed transaction.
    Transaction {
        /// Path to the hex encoded raw transaction. Use `-` for standard in.
        #[clap(name = "TRANSACTION", default_value = "-")]
        transaction: PathBuf,

        /// Fail unless the transaction is bound to this chain ID.
        #[clap(long)]
        chain_id: Option<u64>,
    },
}

pub fn run(options: Options) -> Result<()> {
    match options.input {
        Input::Message { message, signature } => {
            let message = EthereumMessage(cmd::read_input(&message)?);
            println!("{}", message.recover(&signature)?);
        }
        Input::Transaction {
            transaction,
            chain_id,
        } => {
            let input = cmd::read_input(&transaction)?;
            let raw = cmd::permissive_hex(
                str::from_utf8(&input).context("raw transaction is not valid UTF-8")?,
            )?;
            let signed = SignedTransaction::decode(&raw)?;
            if let Some(chain_id) = chain_id {
                signed.verify_chain_id(chain_id)?;
            }
            println!("{}", signed.recover()?);
        }
    }
    Ok(())
}
