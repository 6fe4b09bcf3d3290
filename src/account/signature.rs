//! Module containing signature data model.

use crate::{
    account::{Address, PublicKey},
    error::{Error, Result},
};
use ethnum::{AsU256 as _, U256};
use k256::ecdsa::{self, RecoveryId, VerifyingKey};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A recoverable secp256k1 signature.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Signature {
    y_parity: bool,
    r: U256,
    s: U256,
}

impl Signature {
    /// Creates a signature from its raw parts.
    ///
    /// The parts are not validated until the signature is used for recovery.
    pub fn from_parts(y_parity: bool, r: U256, s: U256) -> Self {
        Self { y_parity, r, s }
    }

    pub(crate) fn from_ecdsa(signature: &ecdsa::Signature, recovery_id: RecoveryId) -> Self {
        let (r, s) = signature.split_bytes();
        Self {
            y_parity: recovery_id.is_y_odd(),
            r: U256::from_be_bytes(r.into()),
            s: U256::from_be_bytes(s.into()),
        }
    }

    /// Returns the y-parity of the signature's `R` point, `true` when odd.
    pub fn y_parity(&self) -> bool {
        self.y_parity
    }

    /// Returns the signature's V value with optional EIP-155 chain replay
    /// protection.
    pub fn v(&self, chain_id: Option<u64>) -> U256 {
        let parity = U256::new(self.y_parity as _);
        match chain_id {
            Some(chain_id) => parity + chain_id.as_u256() * 2 + 35,
            None => parity + 27,
        }
    }

    /// Splits a legacy transaction V value into the y-parity and the EIP-155
    /// chain ID, if any.
    pub fn parse_v(v: U256) -> Result<(bool, Option<u64>)> {
        let v = u64::try_from(v).map_err(|_| Error::InvalidSignature("V value out of range"))?;
        match v {
            27 => Ok((false, None)),
            28 => Ok((true, None)),
            v if v >= 35 => Ok(((v - 35) % 2 == 1, Some((v - 35) / 2))),
            _ => Err(Error::InvalidSignature("invalid V value")),
        }
    }

    /// Returns the signature's 32-byte R-value.
    pub fn r(&self) -> U256 {
        self.r
    }

    /// Returns the signature's 32-byte S-value.
    pub fn s(&self) -> U256 {
        self.s
    }

    /// Returns the 65-byte `r || s || v` encoding with `v` in `{27, 28}`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0; 65];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes());
        bytes[64] = 27 + self.y_parity as u8;
        bytes
    }

    /// Converts the signature into its `ecdsa` representation, checking that
    /// `r` and `s` are in range and that `s` is canonical.
    fn to_ecdsa(self) -> Result<(ecdsa::Signature, RecoveryId)> {
        let signature = self.to_ecdsa_unchecked()?;
        if signature.normalize_s().is_some() {
            return Err(Error::InvalidSignature("non-canonical high S value"));
        }
        Ok((signature, RecoveryId::new(self.y_parity, false)))
    }

    fn to_ecdsa_unchecked(self) -> Result<ecdsa::Signature> {
        ecdsa::Signature::from_scalars(self.r.to_be_bytes(), self.s.to_be_bytes())
            .map_err(|_| Error::InvalidSignature("R or S value out of range"))
    }

    /// Returns the equivalent signature with a low S value.
    ///
    /// Signatures produced by other software may carry a high S value, which
    /// recovery rejects. Normalizing is an explicit opt-in.
    pub fn normalize_s(&self) -> Result<Self> {
        let signature = self.to_ecdsa_unchecked()?;
        Ok(match signature.normalize_s() {
            Some(normalized) => {
                let (r, s) = normalized.split_bytes();
                Self {
                    y_parity: !self.y_parity,
                    r: U256::from_be_bytes(r.into()),
                    s: U256::from_be_bytes(s.into()),
                }
            }
            None => *self,
        })
    }

    /// Recovers the public key that produced this signature for a digest.
    pub fn recover_public_key(&self, digest: [u8; 32]) -> Result<PublicKey> {
        let (signature, recovery_id) = self.to_ecdsa()?;
        let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
            .map_err(|_| Error::InvalidSignature("public key recovery failed"))?;
        Ok(PublicKey(key.into()))
    }

    /// Recovers the address of the signer of a digest.
    pub fn recover(&self, digest: [u8; 32]) -> Result<Address> {
        let address = self.recover_public_key(digest)?.address();
        tracing::trace!(%address, digest = %hex::encode(digest), "recovered signer");
        Ok(address)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut signature = [0; 65];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut signature)
            .map_err(|_| Error::InvalidSignature("expected 65 hex encoded bytes"))?;

        let y_parity = match signature[64] {
            0 | 27 => false,
            1 | 28 => true,
            _ => return Err(Error::InvalidSignature("V value must be 0, 1, 27 or 28")),
        };

        Ok(Self::from_parts(
            y_parity,
            U256::from_be_bytes(signature[0..32].try_into().expect("32 byte slice")),
            U256::from_be_bytes(signature[32..64].try_into().expect("32 byte slice")),
        ))
    }
}
