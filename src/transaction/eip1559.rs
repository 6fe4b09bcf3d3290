//! EIP-1559 Ethereum transaction with base gas pricing type definition and RLP encoding.

use crate::{
    account::{Address, Signature},
    error::{Error, Result},
    serialization,
    transaction::{accesslist::AccessList, rlp},
};
use ethnum::U256;
use serde::Deserialize;

/// The EIP-2718 transaction type byte for EIP-1559 transactions.
pub const TYPE: u8 = 0x02;

/// An EIP-1559 Ethereum transaction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Eip1559Transaction {
    #[serde(rename = "chainId", with = "serialization::uint64")]
    pub chain_id: u64,
    #[serde(with = "serialization::uint64")]
    pub nonce: u64,
    /// The tip in Wei per gas paid to the block producer.
    #[serde(rename = "maxPriorityFeePerGas", with = "serialization::u256")]
    pub max_priority_fee_per_gas: U256,
    /// The maximum total fee in Wei per gas, including the base fee.
    #[serde(rename = "maxFeePerGas", with = "serialization::u256")]
    pub max_fee_per_gas: U256,
    #[serde(rename = "gas", alias = "gasLimit", with = "serialization::uint64")]
    pub gas_limit: u64,
    /// The target address, or `None` for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(with = "serialization::u256")]
    pub value: U256,
    #[serde(default, with = "serialization::bytes")]
    pub data: Vec<u8>,
    #[serde(default, rename = "accessList")]
    pub access_list: AccessList,
}

impl Eip1559Transaction {
    /// Returns the EIP-2718 enveloped RLP encoding with an optional signature.
    pub fn rlp_encode(&self, signature: Option<Signature>) -> Vec<u8> {
        let fields = [
            rlp::uint(self.chain_id),
            rlp::uint(self.nonce),
            rlp::uint(self.max_priority_fee_per_gas),
            rlp::uint(self.max_fee_per_gas),
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
            _ => return Err(Error::InvalidTransaction("expected EIP-1559 type byte")),
        };
        let mut fields = rlp::Fields::new(payload, 12)?;

        let tx = Self {
            chain_id: fields.field()?.uint64()?,
            nonce: fields.field()?.uint64()?,
            max_priority_fee_per_gas: fields.field()?.uint()?,
            max_fee_per_gas: fields.field()?.uint()?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::accesslist::{AccessListEntry, StorageSlot};
    use ethnum::AsU256 as _;
    use hex_literal::hex;
    use serde_json::json;

    #[test]
    fn deserialize_json() {
        let mut tx = json!({
            "chainId": "0xff",
            "nonce": 42,
            "maxPriorityFeePerGas": 13.37e9,
            "maxFeePerGas": 42e9,
            "gas": 21000,
            "value": "13370000000000000000",
        });
        assert_eq!(
            serde_json::from_value::<Eip1559Transaction>(tx.clone()).unwrap(),
            Eip1559Transaction {
                chain_id: 255,
                nonce: 42,
                max_priority_fee_per_gas: 13.37e9.as_u256(),
                max_fee_per_gas: 42e9.as_u256(),
                gas_limit: 21_000,
                to: None,
                value: 13.37e18.as_u256(),
                data: vec![],
                access_list: AccessList::default(),
            }
        );

        tx["to"] = json!("0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef");
        tx["accessList"] = json!([{
            "address": "0x0000000000000000000000000000000000000000",
            "storageKeys": ["0x0000000000000000000000000000000000000000000000000000000000000000"],
        }]);
        let deserialized = serde_json::from_value::<Eip1559Transaction>(tx).unwrap();
        assert_eq!(
            deserialized.to.unwrap(),
            Address(hex!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef")),
        );
        assert_eq!(
            deserialized.access_list,
            AccessList(vec![AccessListEntry {
                address: Address::default(),
                storage_keys: vec![StorageSlot::default()],
            }]),
        );
    }

    #[test]
    fn encode() {
        assert_eq!(
            Eip1559Transaction {
                chain_id: 1,
                nonce: 66,
                max_priority_fee_per_gas: 28e9.as_u256(),
                max_fee_per_gas: 42e9.as_u256(),
                gas_limit: 30_000,
                to: Some(Address(hex!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"))),
                value: 13.37e18.as_u256(),
                data: vec![],
                access_list: AccessList::default(),
            }
            .rlp_encode(None),
            hex!(
                "02f10142850684ee18008509c765240082753094deadbeefdeadbeefdeadbeefdeadbeefde
                 adbeef88b98bc829a6f9000080c0"
            )
            .to_owned(),
        );
    }

    #[test]
    fn decode_rejects_missing_signature() {
        let tx = Eip1559Transaction {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: U256::ZERO,
            max_fee_per_gas: U256::ZERO,
            gas_limit: 21_000,
            to: None,
            value: U256::ZERO,
            data: vec![],
            access_list: AccessList::default(),
        };
        assert!(matches!(
            Eip1559Transaction::rlp_decode(&tx.rlp_encode(None)),
            Err(Error::InvalidTransaction(_))
        ));
    }
}
