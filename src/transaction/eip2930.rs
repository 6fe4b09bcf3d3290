//! EIP-2930 Ethereum transaction with access list type definition and RLP encoding.

use crate::{
    account::{Address, Signature},
    error::{Error, Result},
    serialization,
    transaction::{accesslist::AccessList, rlp},
};
use ethnum::U256;
use serde::Deserialize;

/// The EIP-2718 transaction type byte for EIP-2930 transactions.
pub const TYPE: u8 = 0x01;

/// An EIP-2930 Ethereum transaction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Eip2930Transaction {
    /// The chain ID for the transaction.
    #[serde(rename = "chainId", with = "serialization::uint64")]
    pub chain_id: u64,
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
    /// List of addresses and storage keys that the transaction plans to access.
    #[serde(default, rename = "accessList")]
    pub access_list: AccessList,
}

impl Eip2930Transaction {
    /// Returns the RLP encoded transaction with an optional signature.
    pub fn rlp_encode(&self, signature: Option<Signature>) -> Vec<u8> {
        let fields = [
            rlp::uint(self.chain_id),
            rlp::uint(self.nonce),
            rlp::uint(self.gas_price),
            rlp::uint(self.gas_limit),
            rlp::address(self.to),
            rlp::uint(self.value),
            rlp::bytes(&self.data),
            self.access_list.rlp_encode(),
        ];

        let tail = signature.map(|signature| {
            [
                rlp::uint(signature.y_parity() as u64),
                rlp::uint(signature.r()),
                rlp::uint(signature.s()),
            ]
        });

        [
            &[TYPE][..],
            &rlp::iter(fields.iter().chain(tail.iter().flatten())),
        ]
        .concat()
    }

    /// Decodes a signed transaction from its EIP-2718 envelope.
    pub fn rlp_decode(raw: &[u8]) -> Result<(Self, Signature)> {
        let payload = match raw.split_first() {
            Some((&TYPE, payload)) => payload,
            _ => return Err(Error::InvalidTransaction("expected EIP-2930 type byte")),
        };
        let mut fields = rlp::Fields::new(payload, 11)?;

        let tx = Self {
            chain_id: fields.field()?.uint64()?,
            nonce: fields.field()?.uint64()?,
            gas_price: fields.field()?.uint()?,
            gas_limit: fields.field()?.uint64()?,
            to: fields.field()?.address()?,
            value: fields.field()?.uint()?,
            data: fields.field()?.bytes()?.to_vec(),
            access_list: AccessList::rlp_decode(fields.field()?)?,
        };
        let y_parity = fields.field()?.y_parity()?;
        let r = fields.field()?.uint()?;
        let s = fields.field()?.uint()?;

        Ok((tx, Signature::from_parts(y_parity, r, s)))
    }
}
