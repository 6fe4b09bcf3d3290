//! Cryptographically secure randomness.

use crate::error::{Error, Result};
use rand_core::{OsRng, RngCore as _};

/// A source of cryptographically strong entropy.
///
/// Implementations must be safe to share between threads; wallet generation
/// may draw from the same source concurrently.
pub trait EntropySource: Send + Sync {
    /// Populates the provided slice with entropy.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// Entropy read from the operating system's secure random number generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(buf).map_err(Error::Entropy)
    }
}

/// Populates the provided slice with entropy from the operating system.
pub fn get_entropy(mut buf: impl AsMut<[u8]>) -> Result<()> {
    OsEntropy.fill(buf.as_mut())
}
