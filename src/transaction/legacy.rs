//! Legacy Ethereum transaction type definition and RLP encoding.

use crate::{
    account::{Address, Signature},
    error::{Error, Result},
    serialization,
    transaction::rlp,
};
use ethnum::U256;
use serde::Deserialize;

/// A Legacy Ethereum transaction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct LegacyTransaction {
    /// The nonce for the transaction.
    #[serde(with = "serialization::uint64")]
    pub nonce: u64,
    /// The gas price in Wei for the transaction.
    #[serde(rename = "gasPrice", with = "serialization::u256")]
    pub gas_price: U256,
    /// The gas limit for the transaction.
    #[serde(rename = "gas", alias = "gasLimit", with = "serialization::uint64")]
    pub gas_limit: u64,
    /// The target address for the transaction. This can also be `None` to
    /// indicate a contract creation transaction.
    #[serde(default)]
    pub to: Option<Address>,
    /// The amount of Ether to send with the transaction.
    #[serde(with = "serialization::u256")]
    pub value: U256,
    /// The calldata to use for the transaction.
    #[serde(default, with = "serialization::bytes")]
    pub data: Vec<u8>,
    /// Optional chain ID for EIP-155 replay protection.
    #[serde(default, rename = "chainId", with = "serialization::uint64::option")]
    pub chain_id: Option<u64>,
}

impl LegacyTransaction {
    /// Returns the RLP encoded transaction with an optional signature.
    ///
    /// Unsigned transactions with a chain ID carry the EIP-155
    /// `chain_id, 0, 0` tail.
    pub fn rlp_encode(&self, signature: Option<Signature>) -> Vec<u8> {
        let fields = [
            rlp::uint(self.nonce),
            rlp::uint(self.gas_price),
            rlp::uint(self.gas_limit),
            rlp::address(self.to),
            rlp::uint(self.value),
            rlp::bytes(&self.data),
        ];

        let tail = signature
            .map(|signature| (signature.v(self.chain_id), signature.r(), signature.s()))
            .or_else(|| Some((self.chain_id?.into(), U256::ZERO, U256::ZERO)))
            .map(|(v, r, s)| [rlp::uint(v), rlp::uint(r), rlp::uint(s)]);

        rlp::iter(fields.iter().chain(tail.iter().flatten()))
    }

    /// Decodes a signed legacy transaction, recovering its chain ID from the
    /// signature V value.
    pub fn rlp_decode(raw: &[u8]) -> Result<(Self, Signature)> {
        let mut fields = rlp::Fields::new(raw, 9)?;

        let mut tx = Self {
            nonce: fields.field()?.uint64()?,
            gas_price: fields.field()?.uint()?,
            gas_limit: fields.field()?.uint64()?,
            to: fields.field()?.address()?,
            value: fields.field()?.uint()?,
            data: fields.field()?.bytes()?.to_vec(),
            chain_id: None,
        };

        let (y_parity, chain_id) = Signature::parse_v(fields.field()?.uint()?)
            .map_err(|_| Error::InvalidTransaction("invalid legacy signature V value"))?;
        tx.chain_id = chain_id;
        let r = fields.field()?.uint()?;
        let s = fields.field()?.uint()?;

        Ok((tx, Signature::from_parts(y_parity, r, s)))
    }
}
