//! Module containing subcommands.

pub mod address;
pub mod derive;
pub mod export;
pub mod hash;
pub mod new;
pub mod public_key;
pub mod random;
pub mod recover;
pub mod sign;
pub mod verify;
pub mod xpub;

use anyhow::{ensure, Context as _, Result};
use clap::Args;
use ethwallet::{
    account::{Account, PrivateKey},
    hdk::{ExtendedKey, Path},
    mnemonic::Mnemonic,
};
use std::{
    fs,
    io::{self, Read as _},
    path::Path as FsPath,
};

/// Shared account options.
#[derive(Debug, Args)]
pub struct AccountOptions {
    /// The BIP-0039 mnemonic phrase for seeding the HD wallet.
    #[clap(short, long, env, hide_env_values = true)]
    mnemonic: Option<Mnemonic>,

    /// Optional BIP-0039 passphrase used when stretching the mnemonic into a
    /// seed.
    #[clap(long, env, default_value = "", hide_default_value = true, hide_env_values = true)]
    passphrase: String,

    /// The BIP-0044 account index for deriving a private key from the
    /// mnemonic seed phrase.
    #[clap(short = 'i', long, env, default_value_t = 0)]
    account_index: u32,

    /// Custom BIP-0032 derivation path, overriding the account index.
    #[clap(long, env)]
    hd_path: Option<Path>,

    /// Use a raw private key instead of deriving one from the mnemonic.
    #[clap(long, env, hide_env_values = true)]
    private_key: Option<PrivateKey>,
}

impl AccountOptions {
    /// Returns the account for the specified options. A raw private key
    /// takes precedence over the mnemonic.
    pub fn account(&self) -> Result<Account> {
        if let Some(private_key) = &self.private_key {
            tracing::debug!("using raw private key");
            return Ok(Account::from_private_key(private_key.clone()));
        }

        let path = self.path()?;
        Ok(Account::from_mnemonic(self.mnemonic()?, &self.passphrase, &path)?)
    }

    /// Returns the private key for the specified account options.
    pub fn private_key(&self) -> Result<PrivateKey> {
        Ok(self.account()?.private_key().clone())
    }

    /// Returns the root extended private key for the mnemonic.
    pub fn root(&self) -> Result<ExtendedKey> {
        ensure!(
            self.private_key.is_none(),
            "a raw private key cannot be used for hierarchical derivation",
        );
        let seed = self.mnemonic()?.seed(&self.passphrase);
        Ok(ExtendedKey::master(seed)?)
    }

    /// Returns the derivation path selected by the options.
    pub fn path(&self) -> Result<Path> {
        match &self.hd_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Path::for_index(self.account_index)?),
        }
    }

    /// Returns whether a custom derivation path was specified.
    pub fn has_custom_path(&self) -> bool {
        self.hd_path.is_some() || self.private_key.is_some()
    }

    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    fn mnemonic(&self) -> Result<&Mnemonic> {
        self.mnemonic
            .as_ref()
            .context("missing mnemonic, specify one with `--mnemonic` or `MNEMONIC`")
    }
}

/// Reads input data from a file path, with `-` meaning standard in.
pub fn read_input(path: &FsPath) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read standard input")?;
        Ok(buffer)
    } else {
        fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))
    }
}

/// Decodes a hexadecimal string, allowing surrounding whitespace and an
/// optional `0x` prefix.
pub fn permissive_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s)).context("invalid hex data")?;
    Ok(bytes)
}
