//! Module implementing `secp256k1` private keys and derived Ethereum accounts.

mod address;
mod public;
mod signature;

pub use self::{address::Address, public::PublicKey, signature::Signature};
use crate::{
    error::{Error, Result},
    hdk::{Component, ExtendedKey, Path, HARDENED},
    mnemonic::Mnemonic,
    rand::{EntropySource, OsEntropy},
};
use k256::ecdsa::SigningKey;
use std::{
    fmt::{self, Debug, Formatter},
    ops::Range,
    str::FromStr,
};
use zeroize::Zeroizing;

/// A struct representing an Ethereum private key.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Creates a private key from a 32-byte secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.len() != 32 {
            return Err(Error::InvalidPrivateKey);
        }
        let key = SigningKey::from_slice(secret).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self(key))
    }

    /// Generates a new random private key from the operating system's
    /// entropy source.
    pub fn random() -> Result<Self> {
        Self::random_with(&OsEntropy)
    }

    /// Generates a new random private key drawing from `source`.
    pub fn random_with<S>(source: &S) -> Result<Self>
    where
        S: EntropySource + ?Sized,
    {
        let mut secret = Zeroizing::new([0u8; 32]);
        loop {
            source.fill(&mut secret[..])?;
            // NOTE: Only zero and values past the curve order are rejected, so
            // this loop practically never runs more than once.
            if let Ok(key) = Self::new(&*secret) {
                return Ok(key);
            }
            tracing::debug!("drew out of range private key, retrying");
        }
    }

    /// Returns the raw 32-byte secret.
    pub fn secret(&self) -> Zeroizing<[u8; 32]> {
        let bytes = Zeroizing::new(self.0.to_bytes());
        let mut secret = Zeroizing::new([0; 32]);
        secret.copy_from_slice(&bytes);
        secret
    }

    /// Returns the public key for the private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey((*self.0.verifying_key()).into())
    }

    /// Returns the public address for the private key.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Generate a deterministic RFC-6979 signature for the specified 32-byte
    /// digest. The signature always has a low S value.
    pub fn sign(&self, digest: [u8; 32]) -> Signature {
        let (signature, recovery_id) = self
            .0
            .sign_prehash_recoverable(&digest)
            .expect("signing a 32-byte prehash is infallible");
        let signature = Signature::from_ecdsa(&signature, recovery_id);

        tracing::debug!(
            signer = %self.address(),
            digest = %hex::encode(digest),
            "signed digest"
        );
        signature
    }
}

impl From<&k256::SecretKey> for PrivateKey {
    fn from(secret: &k256::SecretKey) -> Self {
        Self(SigningKey::from(secret))
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut secret = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut secret[..])
            .map_err(|_| Error::InvalidPrivateKey)?;
        Self::new(&*secret)
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&self.address()).finish()
    }
}

/// An Ethereum account: a private key alongside its public key and address,
/// and the derivation path it was derived with, if any.
#[derive(Clone)]
pub struct Account {
    path: Option<Path>,
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl Account {
    /// Derives the account at `path` from a root extended private key.
    pub fn derive(root: &ExtendedKey, path: &Path) -> Result<Self> {
        let key = root.derive_path(path)?;
        let private_key = key
            .private_key()
            .ok_or(Error::InvalidExtendedKey("cannot derive account from public key"))?;

        let account = Self::with_path(Some(path.clone()), private_key);
        tracing::debug!(%path, address = %account.address, "derived account");
        Ok(account)
    }

    /// Derives the account at `path` for a mnemonic and passphrase.
    pub fn from_mnemonic(mnemonic: &Mnemonic, passphrase: &str, path: &Path) -> Result<Self> {
        let root = ExtendedKey::master(mnemonic.seed(passphrase))?;
        Self::derive(&root, path)
    }

    /// Creates a non-derived account for a private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self::with_path(None, private_key)
    }

    /// Creates a new account with a fresh random private key.
    pub fn random() -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::random()?))
    }

    fn with_path(path: Option<Path>, private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            path,
            address: public_key.address(),
            public_key,
            private_key,
        }
    }

    /// Returns the derivation path of the account.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Returns the account's private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the account's public key.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Returns the account's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs a 32-byte digest with the account's private key.
    pub fn sign(&self, digest: [u8; 32]) -> Signature {
        self.private_key.sign(digest)
    }
}

impl Debug for Account {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("path", &self.path.as_ref().map(ToString::to_string))
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derives the consecutive accounts `m/44'/60'/0'/0/{index}` for every index
/// in `range` from a root extended private key.
pub fn accounts(root: &ExtendedKey, range: Range<u32>) -> Result<Vec<Account>> {
    if range.end > HARDENED {
        return Err(Error::ChildIndexOutOfRange(range.end - 1));
    }
    let parent_path = "m/44'/60'/0'/0".parse::<Path>()?;
    let parent = root.derive_path(&parent_path)?;

    range
        .map(|index| {
            let component = Component::Normal(index);
            let private_key = parent
                .derive_child(component)?
                .private_key()
                .ok_or(Error::InvalidExtendedKey("cannot derive account from public key"))?;
            Ok(Account::with_path(
                Some(parent_path.child(component)),
                private_key,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, hash, rand::tests::FixedEntropy};
    use ethnum::U256;
    use hex_literal::hex;

    #[test]
    fn ganache_determinitic_address() {
        let key = PrivateKey::new(fixtures::GANACHE_PRIVATE_KEY).unwrap();
        assert_eq!(
            *key.address(),
            hex!("90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"),
        );
    }

    #[test]
    fn ganache_deterministic_signature() {
        let key = PrivateKey::new(fixtures::GANACHE_PRIVATE_KEY).unwrap();
        let message = hash::keccak256(b"\x19Ethereum Signed Message:\n12Hello World!");
        assert_eq!(
            key.sign(message),
            Signature::from_parts(
                true,
                U256::from_be_bytes(hex!(
                    "408790f153cbfa2722fc708a57d97a43b24429724cf060df7c915d468c43bd84"
                )),
                U256::from_be_bytes(hex!(
                    "61c96aac95ce37d7a31087b6634f4a3ea439a9f704b5c818584fa2a32fa83859"
                )),
            ),
        );
    }

    #[test]
    fn signatures_are_deterministic() {
        let key = PrivateKey::new(fixtures::EXAMPLE_PRIVATE_KEY).unwrap();
        let digest = hash::keccak256("deterministic");
        assert_eq!(key.sign(digest), key.sign(digest));
    }

    #[test]
    fn parses_private_keys() {
        let key = "0x4c0883a69102937d6231471b5dbb6204fe512961708279f8c1c9f2e1f9c0e8a7"
            .parse::<PrivateKey>()
            .unwrap();
        assert_eq!(
            key.address().to_string(),
            "0xE091624C6467e0F36E2E17861F64406Fd1f67C55"
        );
        let unprefixed = "4c0883a69102937d6231471b5dbb6204fe512961708279f8c1c9f2e1f9c0e8a7"
            .parse::<PrivateKey>()
            .unwrap();
        assert_eq!(*unprefixed.secret(), fixtures::EXAMPLE_PRIVATE_KEY);
    }

    #[test]
    fn rejects_invalid_private_keys() {
        for input in [
            "",
            "0x1234",
            "0x0000000000000000000000000000000000000000000000000000000000000000",
            "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            "0xzz0883a69102937d6231471b5dbb6204fe512961708279f8c1c9f2e1f9c0e8a7",
        ] {
            assert!(
                matches!(input.parse::<PrivateKey>(), Err(Error::InvalidPrivateKey)),
                "{input} should be rejected",
            );
        }
    }

    #[test]
    fn debug_shows_address_only() {
        let key = PrivateKey::new(fixtures::GANACHE_PRIVATE_KEY).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("0x90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"));
        assert!(!debug.contains("4f3edf98"));
    }

    #[test]
    fn random_keys_retry_out_of_range_entropy() {
        // The all-ones pattern exceeds the curve order, so the first draw is
        // rejected and the second one is used.
        struct Alternating(std::sync::atomic::AtomicBool);
        impl EntropySource for Alternating {
            fn fill(&self, buf: &mut [u8]) -> Result<()> {
                let valid = self.0.fetch_xor(true, std::sync::atomic::Ordering::SeqCst);
                let byte = if valid { 0x42 } else { 0xff };
                FixedEntropy(vec![byte]).fill(buf)
            }
        }

        let key = PrivateKey::random_with(&Alternating(false.into())).unwrap();
        assert_eq!(*key.secret(), [0x42; 32]);
    }

    #[test]
    fn hardhat_accounts() {
        let mnemonic = fixtures::HARDHAT_MNEMONIC.parse::<Mnemonic>().unwrap();
        let root = ExtendedKey::master(mnemonic.seed("")).unwrap();

        let derived = accounts(&root, 0..2).unwrap();
        assert_eq!(derived.len(), 2);
        assert_eq!(
            derived[0].address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(
            *derived[0].private_key().secret(),
            hex!("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"),
        );
        assert_eq!(
            derived[1].address().to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
        assert_eq!(
            derived[1].path().unwrap().to_string(),
            "m/44'/60'/0'/0/1"
        );
    }

    #[test]
    fn abandon_account() {
        let mnemonic = fixtures::ABANDON_MNEMONIC.parse::<Mnemonic>().unwrap();
        let path = Path::for_index(0).unwrap();
        let account = Account::from_mnemonic(&mnemonic, "", &path).unwrap();
        assert_eq!(
            account.address().to_string(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
        assert_eq!(
            *account.private_key().secret(),
            hex!("1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"),
        );
        assert_eq!(account.public_key().address(), account.address());
    }

    #[test]
    fn ganache_second_account() {
        let mnemonic = fixtures::GANACHE_MNEMONIC.parse::<Mnemonic>().unwrap();
        let path = Path::for_index(1).unwrap();
        let account = Account::from_mnemonic(&mnemonic, "", &path).unwrap();
        assert_eq!(
            account.address().to_string(),
            "0xFFcf8FDEE72ac11b5c542428B35EEF5769C409f0"
        );
    }

    #[test]
    fn accounts_from_public_root_fail() {
        let mnemonic = fixtures::GANACHE_MNEMONIC.parse::<Mnemonic>().unwrap();
        let root = ExtendedKey::master(mnemonic.seed("")).unwrap().public();
        assert!(matches!(
            accounts(&root, 0..1),
            Err(Error::HardenedDerivationFromPublicKey { .. })
        ));
    }

    #[test]
    fn account_ranges_stop_at_hardened_indices() {
        let mnemonic = fixtures::HARDHAT_MNEMONIC.parse::<Mnemonic>().unwrap();
        let root = ExtendedKey::master(mnemonic.seed("")).unwrap();

        assert!(matches!(
            accounts(&root, HARDENED - 1..HARDENED + 1),
            Err(Error::ChildIndexOutOfRange(index)) if index == HARDENED,
        ));

        let last = accounts(&root, HARDENED - 1..HARDENED).unwrap();
        let path = last[0].path().unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/2147483647");
        assert_eq!(path.to_string().parse::<Path>().unwrap(), *path);
    }

    #[test]
    fn private_key_account_has_no_path() {
        let account =
            Account::from_private_key(PrivateKey::new(fixtures::EXAMPLE_PRIVATE_KEY).unwrap());
        assert!(account.path().is_none());
        assert_eq!(
            account.address().to_string(),
            "0xE091624C6467e0F36E2E17861F64406Fd1f67C55"
        );
    }
}
