//! Ethereum hierarchical deterministic wallet and signing engine.
//!
//! This crate implements generating and parsing BIP-0039 mnemonic phrases,
//! BIP-0032 key derivation with BIP-0044 account paths, and signing EIP-191
//! personal messages as well as legacy, EIP-2930 and EIP-1559 transactions
//! with the derived keys.

pub mod account;
pub mod error;
pub mod hash;
pub mod hdk;
pub mod message;
pub mod mnemonic;
pub mod provider;
pub mod rand;
mod serialization;
pub mod transaction;

#[cfg(test)]
mod fixtures;

pub use self::error::{Error, Result};
