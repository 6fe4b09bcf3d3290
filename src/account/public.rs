//! Module implementing public key operations.

use crate::{
    account::Address,
    error::{Error, Result},
    hash,
};
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use std::fmt::{self, Display, Formatter};

/// A public key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PublicKey(pub k256::PublicKey);

impl PublicKey {
    /// Parses a public key from its 64-byte raw, 65-byte uncompressed or
    /// 33-byte compressed encoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key = match bytes.len() {
            64 => {
                let mut tagged = [0x04; 65];
                tagged[1..].copy_from_slice(bytes);
                k256::PublicKey::from_sec1_bytes(&tagged)
            }
            33 | 65 => k256::PublicKey::from_sec1_bytes(bytes),
            _ => return Err(Error::InvalidPublicKey),
        };
        key.map(Self).map_err(|_| Error::InvalidPublicKey)
    }

    /// Returns an uncompressed encoded bytes for the public key.
    pub fn encode_uncompressed(&self) -> [u8; 65] {
        self.0
            .to_encoded_point(false)
            .as_bytes()
            .try_into()
            .expect("unexpected uncompressed public key length")
    }

    /// Returns the SEC1 compressed encoding used by BIP-0032.
    pub fn encode_compressed(&self) -> [u8; 33] {
        self.0
            .to_encoded_point(true)
            .as_bytes()
            .try_into()
            .expect("unexpected compressed public key length")
    }

    /// Returns the 64-byte `x || y` encoding without the SEC1 tag byte.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0; 64];
        bytes.copy_from_slice(&self.encode_uncompressed()[1..]);
        bytes
    }

    /// Returns the Ethereum address for the public key.
    ///
    /// An address is the last 20 bytes of the Keccak-256 hash of the raw
    /// public key coordinates.
    pub fn address(&self) -> Address {
        let hash = hash::keccak256(self.to_bytes());
        Address::from_slice(&hash[12..])
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}
