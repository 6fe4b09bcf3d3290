//! Module implementing the `sign` subcommand for generating ECDSA signatures.

use crate::cmd::{self, AccountOptions};
use anyhow::{ensure, Context as _, Result};
use clap::{Parser, Subcommand};
use ethwallet::{
    message::EthereumMessage,
    transaction::{Transaction, TransactionKind},
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(subcommand)]
    input: Input,

    #[clap(flatten)]
    account: AccountOptions,
}

#[derive(Debug, Subcommand)]
#[clap(rename_all = "lowercase")]
enum Input {
    /// Sign an Ethereum transaction.
    Transaction {
        /// Path to transaction to sign in JSON format. Use `-` for standard in.
        #[clap(name = "TRANSACTION", default_value = "-")]
        transaction: PathBuf,

        /// Encode the transaction as the specified kind instead of inferring
        /// it from the JSON fields.
        #[clap(long)]
        kind: Option<TransactionKind>,

        /// Only output the transaction signature instead of the RLP-encoded
        /// signed transaction.
        #[clap(long)]
        signature_only: bool,

        /// Also print the transaction hash of the signed transaction.
        #[clap(long)]
        hash: bool,

        /// Force allowing legacy transactions without a chain ID for replay
        /// protection. Use this with care!
        #[clap(long)]
        allow_missing_replay_protection: bool,
    },

    /// Sign an Ethereum message.
    Message {
        /// Path to the message to sign in the "eth_sign" scheme. This message
        /// will be prefixed with "\x19Ethereum Signed Message:\n" and its
        /// length before hashing and signing. Use `-` for standard in.
        #[clap(name = "MESSAGE", default_value = "-")]
        message: PathBuf,

        /// Print the message hash, signer and signature components alongside
        /// the signature.
        #[clap(long)]
        details: bool,
    },

    /// Sign a raw 32-byte digest.
    Raw {
        /// The 32 byte message to sign specified as a hexadecimal string.
        #[clap(name = "BYTES", value_parser = permissive_hex_digest)]
        message: [u8; 32],
    },
}

pub fn run(options: Options) -> Result<()> {
    let key = options.account.private_key()?;
    match options.input {
        Input::Transaction {
            transaction,
            kind,
            signature_only,
            hash,
            allow_missing_replay_protection,
        } => {
            let mut transaction =
                serde_json::from_slice::<Transaction>(&cmd::read_input(&transaction)?)
                    .context("invalid transaction JSON")?;
            if let Some(kind) = kind {
                transaction = transaction.convert(kind)?;
            }
            if transaction.chain_id().is_none() {
                ensure!(
                    allow_missing_replay_protection,
                    "Signed legacy transaction without chain ID. \
                     Use `--allow-missing-replay-protection` if this was intentional.",
                );
            }

            let signed = transaction.sign(&key);
            if signature_only {
                println!("{}", signed.signature);
            } else {
                println!("0x{}", hex::encode(signed.encode()));
            }
            if hash {
                println!("0x{}", hex::encode(signed.hash()));
            }
        }
        Input::Message { message, details } => {
            let message = EthereumMessage(cmd::read_input(&message)?);
            let signed = message.sign(&key);
            if details {
                let signature = signed.signature;
                println!("message hash: 0x{}", hex::encode(signed.message_hash));
                println!("signer:       {}", signed.signer);
                println!("r:            0x{}", hex::encode(signature.r().to_be_bytes()));
                println!("s:            0x{}", hex::encode(signature.s().to_be_bytes()));
                println!("v:            {}", signature.v(None));
                println!("signature:    {signature}");
            } else {
                println!("{}", signed.signature);
            }
        }
        Input::Raw { message } => {
            println!("{}", key.sign(message));
        }
    }
    Ok(())
}

fn permissive_hex_digest(s: &str) -> Result<[u8; 32]> {
    cmd::permissive_hex(s)?[..]
        .try_into()
        .context("message for signing must be exactly 32 bytes long")
}
