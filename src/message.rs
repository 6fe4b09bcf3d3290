//! EIP-191 personal messages for signing.

use crate::{
    account::{Address, PrivateKey, Signature},
    error::Result,
    hash,
};
use std::io::Write as _;

/// The EIP-191 version `0x45` prefix prepended to personal messages.
const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// A message to be signed with an Ethereum specific prefix.
pub struct EthereumMessage<T>(pub T);

impl<T> EthereumMessage<T>
where
    T: AsRef<[u8]>,
{
    /// Computes the 32-byte message used for ECDSA signing with a private key.
    pub fn signing_message(&self) -> [u8; 32] {
        digest(self.0.as_ref())
    }

    /// Signs the message.
    pub fn sign(&self, key: &PrivateKey) -> SignedMessage {
        let message_hash = self.signing_message();
        SignedMessage {
            message_hash,
            signature: key.sign(message_hash),
            signer: key.address(),
        }
    }

    /// Recovers the address that signed this message.
    pub fn recover(&self, signature: &Signature) -> Result<Address> {
        signature.recover(self.signing_message())
    }
}

/// The result of signing a personal message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignedMessage {
    /// The EIP-191 digest that was signed.
    pub message_hash: [u8; 32],
    /// The recoverable signature.
    pub signature: Signature,
    /// The address of the signing account.
    pub signer: Address,
}

/// Computes the EIP-191 personal message digest:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`
/// where the length is in decimal ASCII.
pub fn digest(message: impl AsRef<[u8]>) -> [u8; 32] {
    let message = message.as_ref();
    let mut buffer = Vec::with_capacity(PREFIX.len() + 20 + message.len());
    buffer.extend_from_slice(PREFIX);
    // Display implementation for `usize` should not error when writing to an
    // in memory buffer.
    write!(buffer, "{}", message.len()).expect("unexpected error writing number");
    buffer.extend_from_slice(message);

    hash::keccak256(buffer)
}

/// Verifies that `signature` over the personal `message` was produced by the
/// `expected` address.
///
/// A well-formed signature by a different signer yields `Ok(false)`, while
/// structurally invalid signatures are reported as errors.
pub fn verify(message: impl AsRef<[u8]>, signature: &Signature, expected: Address) -> Result<bool> {
    let signer = signature.recover(digest(message))?;
    let valid = signer == expected;
    tracing::debug!(%signer, %expected, valid, "verified personal message");
    Ok(valid)
}
