//! Error type shared by the wallet and signing engine.

use thiserror::Error;

/// Result alias using the crate [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by mnemonic, key derivation, signing and transaction
/// operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid entropy length of {0} bits, must be one of 128, 160, 192, 224 or 256")]
    InvalidEntropyLength(usize),

    #[error("failed to read entropy from the operating system")]
    Entropy(#[source] rand_core::Error),

    #[error("unsupported mnemonic language '{0}'")]
    UnsupportedLanguage(String),

    #[error("invalid mnemonic length {0}, must be one of 12, 15, 18, 21 or 24 words")]
    InvalidWordCount(usize),

    #[error("word #{position} is not in the BIP-0039 {language} word list")]
    UnknownWord {
        language: &'static str,
        position: usize,
    },

    #[error("mnemonic checksum verification failure")]
    InvalidChecksum,

    #[error("malformed BIP-0032 path '{path}': {reason}")]
    MalformedPath { path: String, reason: &'static str },

    #[error("child index {0} has the hardened bit set")]
    ChildIndexOutOfRange(u32),

    #[error("seed yields an invalid BIP-0032 master key")]
    InvalidMasterKey,

    #[error("child {index} at depth {depth} yields an invalid key")]
    InvalidChildKey { depth: u8, index: u32 },

    #[error("hardened child {index} cannot be derived from a public key")]
    HardenedDerivationFromPublicKey { index: u32 },

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(&'static str),

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid address: {0}")]
    InvalidAddress(&'static str),

    #[error("invalid signature: {0}")]
    InvalidSignature(&'static str),

    #[error("invalid transaction encoding: {0}")]
    InvalidTransaction(&'static str),

    #[error("transaction chain ID {actual:?} does not match expected chain ID {expected}")]
    ChainIdMismatch { expected: u64, actual: Option<u64> },

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
}
