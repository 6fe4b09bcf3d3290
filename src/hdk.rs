//! Module implementing the hierachical deterministic key derivation scheme.

mod path;

pub use self::path::{Component, Path, HARDENED};
use crate::{
    account::{PrivateKey, PublicKey},
    error::{Error, Result},
    hash,
};
use hmac::{Hmac, Mac as _};
use k256::{elliptic_curve::PrimeField as _, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};
use sha2::Sha512;
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};
use zeroize::{Zeroize as _, Zeroizing};

/// BIP-0032 mainnet version bytes for extended private keys (`xprv`).
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
/// BIP-0032 mainnet version bytes for extended public keys (`xpub`).
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
/// Length of a serialized extended key without its checksum.
const SERIALIZED_LEN: usize = 78;

/// Derives the private key at `path` from a BIP-0039 seed.
pub fn derive(seed: impl AsRef<[u8]>, path: &Path) -> Result<PrivateKey> {
    let key = ExtendedKey::master(seed)?.derive_path(path)?;
    key.private_key()
        .ok_or(Error::InvalidExtendedKey("missing private key"))
}

/// The key material of an extended key.
#[derive(Clone)]
enum Key {
    Private(k256::SecretKey),
    Public(k256::PublicKey),
}

/// A BIP-0032 extended key: a private or public key paired with a chain code
/// and its position in the key tree.
#[derive(Clone)]
pub struct ExtendedKey {
    key: Key,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedKey {
    /// Creates the master extended private key for a seed.
    pub fn master(seed: impl AsRef<[u8]>) -> Result<Self> {
        let digest = hmac_sha512(b"Bitcoin seed", &[seed.as_ref()]);
        let (secret, chain_code) = digest.split_at(32);

        let secret =
            k256::SecretKey::from_slice(secret).map_err(|_| Error::InvalidMasterKey)?;
        let mut key = Self {
            key: Key::Private(secret),
            chain_code: [0; 32],
            depth: 0,
            parent_fingerprint: [0; 4],
            child_number: 0,
        };
        key.chain_code.copy_from_slice(chain_code);

        tracing::debug!(fingerprint = %hex::encode(key.fingerprint()), "derived master key");
        Ok(key)
    }

    /// Derives a child key.
    ///
    /// Hardened children can only be derived from extended private keys.
    pub fn derive_child(&self, component: Component) -> Result<Self> {
        if !component.is_valid() {
            return Err(Error::ChildIndexOutOfRange(component.value()));
        }
        let index = component.index();
        let depth = self
            .depth
            .checked_add(1)
            .ok_or(Error::InvalidExtendedKey("maximum depth exceeded"))?;
        let invalid = || Error::InvalidChildKey { depth, index };

        let parent_public = self.public_key();
        let parent_compressed = parent_public.encode_compressed();
        let digest = match (&self.key, component) {
            (Key::Private(secret), Component::Hardened(_)) => {
                let secret_bytes = Zeroizing::new(secret.to_bytes());
                hmac_sha512(
                    &self.chain_code,
                    &[&[0u8][..], &secret_bytes[..], &index.to_be_bytes()[..]],
                )
            }
            (Key::Public(_), Component::Hardened(_)) => {
                return Err(Error::HardenedDerivationFromPublicKey { index });
            }
            (_, Component::Normal(_)) => hmac_sha512(
                &self.chain_code,
                &[&parent_compressed[..], &index.to_be_bytes()[..]],
            ),
        };
        let (tweak, chain_code) = digest.split_at(32);

        // NOTE: BIP-0032 requires rejecting `IL >= n` instead of reducing it.
        let tweak = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(
            tweak,
        )))
        .ok_or_else(invalid)?;

        let key = match &self.key {
            Key::Private(secret) => {
                let child = tweak + secret.to_nonzero_scalar().as_ref();
                let child = Option::<NonZeroScalar>::from(NonZeroScalar::new(child))
                    .ok_or_else(invalid)?;
                Key::Private(k256::SecretKey::from(child))
            }
            Key::Public(public) => {
                let child = ProjectivePoint::GENERATOR * tweak + public.to_projective();
                let child = k256::PublicKey::from_affine(child.to_affine())
                    .map_err(|_| invalid())?;
                Key::Public(child)
            }
        };

        let mut child = Self {
            key,
            chain_code: [0; 32],
            depth,
            parent_fingerprint: fingerprint(&parent_compressed),
            child_number: index,
        };
        child.chain_code.copy_from_slice(chain_code);

        tracing::trace!(%component, depth, "derived child key");
        Ok(child)
    }

    /// Derives a child key, skipping over indices that yield invalid keys.
    ///
    /// Returns the component that was actually used alongside the key. The
    /// search never crosses from normal into hardened indices.
    pub fn derive_next_valid(&self, component: Component) -> Result<(Component, Self)> {
        let mut component = component;
        loop {
            match self.derive_child(component) {
                Err(err @ Error::InvalidChildKey { .. }) => {
                    tracing::debug!(%component, "skipping invalid child key");
                    component = retry_component(component, err)?;
                }
                result => return result.map(|key| (component, key)),
            }
        }
    }

    /// Derives the key at `path` relative to this key.
    pub fn derive_path(&self, path: &Path) -> Result<Self> {
        path.components()
            .try_fold(self.clone(), |key, component| key.derive_child(component))
    }

    /// Returns the neutered, public only, version of this key.
    pub fn public(&self) -> Self {
        let mut key = self.clone();
        key.key = Key::Public(self.public_key().0);
        key
    }

    /// Returns `true` if this key carries private key material.
    pub fn is_private(&self) -> bool {
        matches!(self.key, Key::Private(_))
    }

    /// Returns the private key, or `None` for public extended keys.
    pub fn private_key(&self) -> Option<PrivateKey> {
        match &self.key {
            Key::Private(secret) => Some(PrivateKey::from(secret)),
            Key::Public(_) => None,
        }
    }

    /// Returns the public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.key {
            Key::Private(secret) => PublicKey(secret.public_key()),
            Key::Public(public) => PublicKey(*public),
        }
    }

    /// Returns the key's chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Returns the depth of the key in the tree; 0 for the master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Returns the raw child index this key was derived with.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Returns the fingerprint of the parent key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Returns this key's fingerprint, the first 4 bytes of the HASH160 of
    /// its compressed public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.public_key().encode_compressed())
    }

    fn serialize(&self) -> Zeroizing<[u8; SERIALIZED_LEN]> {
        let mut buf = Zeroizing::new([0; SERIALIZED_LEN]);
        buf[4] = self.depth;
        buf[5..9].copy_from_slice(&self.parent_fingerprint);
        buf[9..13].copy_from_slice(&self.child_number.to_be_bytes());
        buf[13..45].copy_from_slice(&self.chain_code);
        match &self.key {
            Key::Private(secret) => {
                buf[0..4].copy_from_slice(&XPRV_VERSION);
                let secret_bytes = Zeroizing::new(secret.to_bytes());
                buf[46..].copy_from_slice(&secret_bytes);
            }
            Key::Public(_) => {
                buf[0..4].copy_from_slice(&XPUB_VERSION);
                buf[45..].copy_from_slice(&self.public_key().encode_compressed());
            }
        }
        buf
    }

    fn deserialize(buf: &[u8]) -> Result<Self> {
        if buf.len() != SERIALIZED_LEN {
            return Err(Error::InvalidExtendedKey("invalid length"));
        }

        let depth = buf[4];
        let version: [u8; 4] = buf[0..4].try_into().expect("4 byte slice");
        let parent_fingerprint: [u8; 4] = buf[5..9].try_into().expect("4 byte slice");
        let child_number = u32::from_be_bytes(buf[9..13].try_into().expect("4 byte slice"));
        if depth == 0 && (parent_fingerprint != [0; 4] || child_number != 0) {
            return Err(Error::InvalidExtendedKey(
                "master key with parent fingerprint or child number",
            ));
        }

        let key = match version {
            XPRV_VERSION => {
                if buf[45] != 0 {
                    return Err(Error::InvalidExtendedKey("invalid private key prefix"));
                }
                let secret = k256::SecretKey::from_slice(&buf[46..])
                    .map_err(|_| Error::InvalidExtendedKey("invalid private key"))?;
                Key::Private(secret)
            }
            XPUB_VERSION => {
                if !matches!(buf[45], 0x02 | 0x03) {
                    return Err(Error::InvalidExtendedKey("invalid public key prefix"));
                }
                let public = k256::PublicKey::from_sec1_bytes(&buf[45..])
                    .map_err(|_| Error::InvalidExtendedKey("invalid public key"))?;
                Key::Public(public)
            }
            _ => return Err(Error::InvalidExtendedKey("unknown version bytes")),
        };

        let mut chain_code = [0; 32];
        chain_code.copy_from_slice(&buf[13..45]);

        Ok(Self {
            key,
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
        })
    }
}

impl Debug for ExtendedKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("private", &self.is_private())
            .field("address", &self.public_key().address())
            .field("depth", &self.depth)
            .field("child_number", &Component::from_index(self.child_number))
            .finish_non_exhaustive()
    }
}

/// Formats the key as a Base58Check `xprv` or `xpub` string.
impl Display for ExtendedKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let encoded = Zeroizing::new(bs58::encode(&*self.serialize()).with_check().into_string());
        f.write_str(&encoded)
    }
}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let buf = Zeroizing::new(
            bs58::decode(s.trim())
                .with_check(None)
                .into_vec()
                .map_err(|_| Error::InvalidExtendedKey("invalid Base58Check encoding"))?,
        );
        Self::deserialize(&buf)
    }
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

/// Returns the component following one that yielded an invalid key, or the
/// original error once the next value would set the hardened bit.
fn retry_component(component: Component, err: Error) -> Result<Component> {
    let next = component
        .value()
        .checked_add(1)
        .filter(|next| *next < HARDENED)
        .ok_or(err)?;
    Ok(match component {
        Component::Hardened(_) => Component::Hardened(next),
        Component::Normal(_) => Component::Normal(next),
    })
}

fn fingerprint(compressed: &[u8; 33]) -> [u8; 4] {
    let hash = hash::hash160(compressed);
    [hash[0], hash[1], hash[2], hash[3]]
}

fn hmac_sha512(key: &[u8], data: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts keys of any length");
    for chunk in data {
        hmac.update(chunk);
    }
    let mut digest = Zeroizing::new([0; 64]);
    digest.copy_from_slice(&hmac.finalize().into_bytes());
    digest
}
