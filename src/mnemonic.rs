//! BIP-0039 mnemonic phrase implementation.

mod language;
mod wordlist;

pub use self::{language::Language, wordlist::WORD_COUNT};
use crate::{
    error::{Error, Result},
    hash,
    rand::{EntropySource, OsEntropy},
};
use hmac::Hmac;
use sha2::Sha512;
use std::{
    fmt::{self, Debug, Display, Formatter},
    mem,
    str::FromStr,
};
use unicode_normalization::UnicodeNormalization as _;
use zeroize::{Zeroize as _, Zeroizing};

/// A BIP-0039 mnemonic used for seeding an HD wallet.
#[derive(Clone)]
pub struct Mnemonic {
    /// The language for the mnemonic phrase.
    language: Language,
    /// A buffer containing the mnemonic's entropy followed by its SHA-256 hash
    /// used for checksums.
    buf: [u8; 64],
    /// The length of the entropy in bytes.
    len: usize,
}

/// Masking value for a mnemonic word.
const WORD_MASK: usize = WORD_COUNT - 1;
/// The number of bits represented by each mnemonic word.
const WORD_BITS: usize = WORD_MASK.count_ones() as _;

/// The supported entropy strengths in bits.
pub const STRENGTHS: [usize; 5] = [128, 160, 192, 224, 256];

impl Mnemonic {
    /// Generates a new mnemonic with the specified entropy strength in bits
    /// using the operating system's entropy source.
    pub fn generate(language: Language, strength: usize) -> Result<Self> {
        Self::generate_with(language, strength, &OsEntropy)
    }

    /// Generates a new mnemonic with the specified entropy strength in bits,
    /// drawing entropy from `source`.
    pub fn generate_with<S>(language: Language, strength: usize, source: &S) -> Result<Self>
    where
        S: EntropySource + ?Sized,
    {
        let len = strength_to_byte_length(strength)?;
        let mut entropy = Zeroizing::new([0u8; 32]);
        source.fill(&mut entropy[..len])?;
        Self::from_entropy(language, &entropy[..len])
    }

    /// Generates a new cryptographically random mnemonic with the specified
    /// number of words.
    pub fn random(language: Language, mnemonic_length: usize) -> Result<Self> {
        let len = mnemonic_to_byte_length(mnemonic_length)?;
        Self::generate(language, len * 8)
    }

    /// Creates a mnemonic from raw entropy.
    pub fn from_entropy(language: Language, entropy: &[u8]) -> Result<Self> {
        let len = strength_to_byte_length(entropy.len() * 8)?;

        let mut buf = [0u8; 64];
        let (seed, hash) = buf.split_at_mut(len);
        seed.copy_from_slice(entropy);
        hash[..32].copy_from_slice(&hash::sha256(seed));

        Ok(Self { language, buf, len })
    }

    /// Parses a mnemonic from a phrase.
    pub fn from_phrase(mnemonic: impl AsRef<str>) -> Result<Self> {
        let normalized = Zeroizing::new(mnemonic.as_ref().nfkd().collect::<String>());
        let (language, words) = Language::split(&normalized);

        let len = mnemonic_to_byte_length(words.len())?;
        let wordlist = language.wordlist();

        let mut buf = [0u8; 64];
        let (seed, hash) = buf.split_at_mut(len);

        let mut acc = 0usize;
        let mut bit_offset = 0;
        let mut byte_offset = 0;
        for (position, word) in words.iter().enumerate() {
            let index = wordlist.search(word).ok_or(Error::UnknownWord {
                language: language.name(),
                position: position + 1,
            })?;
            acc = (acc << WORD_BITS) | index;

            bit_offset += WORD_BITS;
            while bit_offset > 8 {
                bit_offset -= 8;
                seed[byte_offset] = ((acc >> bit_offset) & 0xff) as _;
                byte_offset += 1;
            }
        }

        // NOTE: The remaining bits are checksum bits that we need to verify.
        debug_assert_eq!(len * 8 + bit_offset, words.len() * WORD_BITS);
        debug_assert_eq!(byte_offset, len);

        hash[..32].copy_from_slice(&hash::sha256(seed));

        let checksum_mask = (1 << bit_offset) - 1;
        let valid = hash[0] >> (8 - bit_offset) == (acc & checksum_mask) as u8;
        acc.zeroize();
        if !valid {
            buf.zeroize();
            return Err(Error::InvalidChecksum);
        }

        Ok(Self { language, buf, len })
    }

    /// Returns the mnemonic's language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the entropy encoded by the mnemonic.
    pub fn entropy(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Gets the BIP-0039 mnemonic word length.
    pub fn mnemonic_length(&self) -> usize {
        ((self.len * 8) / WORD_BITS) + 1
    }

    /// Returns the BIP-0039 mnemonic phrase.
    pub fn to_phrase(&self) -> String {
        let wordlist = self.language.wordlist();
        let separator = self.language.separator();

        let mut buf = String::new();
        for i in 0..self.mnemonic_length() {
            let bit_offset = i * WORD_BITS;

            let offset = bit_offset / 8;
            let shift = mem::size_of::<usize>() * 8 - WORD_BITS - bit_offset % 8;
            let mut chunk = [0u8; mem::size_of::<usize>()];
            chunk.copy_from_slice(&self.buf[offset..][..mem::size_of::<usize>()]);
            let index = (usize::from_be_bytes(chunk) >> shift) & WORD_MASK;
            chunk.zeroize();

            buf.push_str(wordlist.word(index));
            buf.push(separator);
        }

        buf.pop();
        buf
    }

    /// Gets the PBKDF2 stretched binary seed for this mnemonic and an optional
    /// passphrase (use `""` for none).
    pub fn seed(&self, passphrase: &str) -> Seed {
        const ROUNDS: u32 = 2048;

        let password = Zeroizing::new(self.to_phrase());
        let mut salt = Zeroizing::new(String::from("mnemonic"));
        salt.extend(passphrase.nfkd());

        let mut buf = [0u8; 64];
        pbkdf2::pbkdf2::<Hmac<Sha512>>(password.as_bytes(), salt.as_bytes(), ROUNDS, &mut buf)
            .expect("HMAC accepts keys of any length");

        tracing::trace!(words = self.mnemonic_length(), "stretched mnemonic seed");
        Seed(buf)
    }
}

impl Debug for Mnemonic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("language", &self.language)
            .field("words", &self.mnemonic_length())
            .finish_non_exhaustive()
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.to_phrase())
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_phrase(s)
    }
}

impl PartialEq for Mnemonic {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language && self.entropy() == other.entropy()
    }
}

impl Eq for Mnemonic {}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}

/// A 64-byte BIP-0039 seed. Zeroed when dropped.
#[derive(Clone)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Returns the raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Seed {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn strength_to_byte_length(strength: usize) -> Result<usize> {
    if !STRENGTHS.contains(&strength) {
        return Err(Error::InvalidEntropyLength(strength));
    }
    Ok(strength / 8)
}

fn mnemonic_to_byte_length(len: usize) -> Result<usize> {
    if !matches!(len, 12 | 15 | 18 | 21 | 24) {
        return Err(Error::InvalidWordCount(len));
    }

    // NOTE: Derived from the BIP-0039 spec where `CS` is the checksum bit
    // length, `ENT` is the entropy bit length (so `8 * byte_length`) and `MS`
    // is the mnemonic word length.
    // ```
    // CS = ENT / 32
    // MS = (ENT + CS) / 11
    // ```
    // <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki#generating-the-mnemonic>
    Ok((len * WORD_BITS * 32 / 33) / 8)
}
