//! Module defining Ethereum transaction data as well as an RLP encoding
//! implementation.

pub mod accesslist;
mod eip1559;
mod eip2930;
mod legacy;
mod rlp;

pub use self::{
    eip1559::Eip1559Transaction, eip2930::Eip2930Transaction, legacy::LegacyTransaction,
};
use crate::{
    account::{Address, PrivateKey, Signature},
    error::{Error, Result},
    hash, serialization,
    serialization::JsonObject,
};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// An Ethereum transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transaction {
    Legacy(LegacyTransaction),
    Eip2930(Eip2930Transaction),
    Eip1559(Eip1559Transaction),
}

/// The encoding kind of a transaction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TransactionKind {
    Legacy,
    Eip2930,
    Eip1559,
}

impl Transaction {
    /// Returns the 32-byte message used for signing.
    pub fn signing_message(&self) -> [u8; 32] {
        hash::keccak256(self.rlp_encode(None))
    }

    /// Returns the raw signed transaction bytes.
    pub fn encode(&self, signature: Signature) -> Vec<u8> {
        self.rlp_encode(Some(signature))
    }

    /// Signs the transaction with the specified key.
    pub fn sign(self, key: &PrivateKey) -> SignedTransaction {
        let signature = key.sign(self.signing_message());
        tracing::debug!(
            kind = %self.kind(),
            chain_id = ?self.chain_id(),
            "signed transaction"
        );
        SignedTransaction::new(self, signature)
    }

    /// Returns the encoding kind of the transaction.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Legacy(_) => TransactionKind::Legacy,
            Transaction::Eip2930(_) => TransactionKind::Eip2930,
            Transaction::Eip1559(_) => TransactionKind::Eip1559,
        }
    }

    /// Returns the chain ID the transaction is bound to. Only legacy
    /// transactions may lack one.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Transaction::Legacy(tx) => tx.chain_id,
            Transaction::Eip2930(tx) => Some(tx.chain_id),
            Transaction::Eip1559(tx) => Some(tx.chain_id),
        }
    }

    /// Converts the transaction to a different encoding kind.
    ///
    /// A legacy gas price becomes both EIP-1559 fee caps, and the EIP-1559
    /// maximum fee becomes the gas price going the other way. Typed kinds
    /// require a chain ID and legacy transactions cannot carry an access list.
    pub fn convert(self, kind: TransactionKind) -> Result<Self> {
        if self.kind() == kind {
            return Ok(self);
        }

        let (nonce, gas_price, gas_limit, to, value, data, chain_id, access_list) = match self {
            Transaction::Legacy(tx) => (
                tx.nonce,
                tx.gas_price,
                tx.gas_limit,
                tx.to,
                tx.value,
                tx.data,
                tx.chain_id,
                Default::default(),
            ),
            Transaction::Eip2930(tx) => (
                tx.nonce,
                tx.gas_price,
                tx.gas_limit,
                tx.to,
                tx.value,
                tx.data,
                Some(tx.chain_id),
                tx.access_list,
            ),
            Transaction::Eip1559(tx) => (
                tx.nonce,
                tx.max_fee_per_gas,
                tx.gas_limit,
                tx.to,
                tx.value,
                tx.data,
                Some(tx.chain_id),
                tx.access_list,
            ),
        };

        let typed_chain_id =
            || chain_id.ok_or(Error::InvalidTransaction("typed transactions require a chain ID"));
        Ok(match kind {
            TransactionKind::Legacy => {
                if !access_list.0.is_empty() {
                    return Err(Error::InvalidTransaction(
                        "legacy transactions cannot carry an access list",
                    ));
                }
                Transaction::Legacy(LegacyTransaction {
                    nonce,
                    gas_price,
                    gas_limit,
                    to,
                    value,
                    data,
                    chain_id,
                })
            }
            TransactionKind::Eip2930 => Transaction::Eip2930(Eip2930Transaction {
                chain_id: typed_chain_id()?,
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                data,
                access_list,
            }),
            TransactionKind::Eip1559 => Transaction::Eip1559(Eip1559Transaction {
                chain_id: typed_chain_id()?,
                nonce,
                max_priority_fee_per_gas: gas_price,
                max_fee_per_gas: gas_price,
                gas_limit,
                to,
                value,
                data,
                access_list,
            }),
        })
    }

    /// Returns the RLP encoded transaction with an optional signature.
    fn rlp_encode(&self, signature: Option<Signature>) -> Vec<u8> {
        match self {
            Transaction::Legacy(tx) => tx.rlp_encode(signature),
            Transaction::Eip2930(tx) => tx.rlp_encode(signature),
            Transaction::Eip1559(tx) => tx.rlp_encode(signature),
        }
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Type(#[serde(with = "serialization::uint64")] u64);

        let json = JsonObject::deserialize(deserializer)?;
        let kind = match json.get("type") {
            Some(ty) => match Type::deserialize(ty).map_err(de::Error::custom)? {
                Type(0) => TransactionKind::Legacy,
                Type(1) => TransactionKind::Eip2930,
                Type(2) => TransactionKind::Eip1559,
                Type(ty) => {
                    return Err(de::Error::custom(format!(
                        "unsupported transaction type {ty}"
                    )))
                }
            },
            None if json.contains_key("maxPriorityFeePerGas")
                || json.contains_key("maxFeePerGas") =>
            {
                TransactionKind::Eip1559
            }
            None if json.contains_key("accessList") => TransactionKind::Eip2930,
            None => TransactionKind::Legacy,
        };

        let json = serde_json::Value::from(json);
        Ok(match kind {
            TransactionKind::Legacy => {
                Transaction::Legacy(serde_json::from_value(json).map_err(de::Error::custom)?)
            }
            TransactionKind::Eip2930 => {
                Transaction::Eip2930(serde_json::from_value(json).map_err(de::Error::custom)?)
            }
            TransactionKind::Eip1559 => {
                Transaction::Eip1559(serde_json::from_value(json).map_err(de::Error::custom)?)
            }
        })
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Legacy => "legacy",
            TransactionKind::Eip2930 => "eip2930",
            TransactionKind::Eip1559 => "eip1559",
        })
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "0" => Ok(TransactionKind::Legacy),
            "eip2930" | "eip-2930" | "1" => Ok(TransactionKind::Eip2930),
            "eip1559" | "eip-1559" | "2" => Ok(TransactionKind::Eip1559),
            _ => Err(Error::InvalidTransaction("unknown transaction kind")),
        }
    }
}

/// A transaction with its signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(transaction: Transaction, signature: Signature) -> Self {
        Self {
            transaction,
            signature,
        }
    }

    /// Decodes a raw signed transaction as produced by [`Transaction::encode`].
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let (transaction, signature) = match raw.first().copied() {
            Some(0xc0..=0xff) => {
                let (tx, signature) = LegacyTransaction::rlp_decode(raw)?;
                (Transaction::Legacy(tx), signature)
            }
            Some(eip2930::TYPE) => {
                let (tx, signature) = Eip2930Transaction::rlp_decode(raw)?;
                (Transaction::Eip2930(tx), signature)
            }
            Some(eip1559::TYPE) => {
                let (tx, signature) = Eip1559Transaction::rlp_decode(raw)?;
                (Transaction::Eip1559(tx), signature)
            }
            Some(_) => return Err(Error::InvalidTransaction("unsupported transaction type")),
            None => return Err(Error::InvalidTransaction("empty transaction")),
        };

        tracing::trace!(kind = %transaction.kind(), "decoded raw transaction");
        Ok(Self::new(transaction, signature))
    }

    /// Returns the raw signed transaction bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.transaction.encode(self.signature)
    }

    /// Returns the transaction hash, the Keccak-256 digest of the raw signed
    /// transaction bytes.
    pub fn hash(&self) -> [u8; 32] {
        hash::keccak256(self.encode())
    }

    /// Recovers the address that signed the transaction.
    pub fn recover(&self) -> Result<Address> {
        self.signature.recover(self.transaction.signing_message())
    }

    /// Checks that the transaction is bound to the `expected` chain.
    pub fn verify_chain_id(&self, expected: u64) -> Result<()> {
        let actual = self.transaction.chain_id();
        if actual != Some(expected) {
            return Err(Error::ChainIdMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures::GANACHE_PRIVATE_KEY, transaction::accesslist::AccessList};
    use ethnum::U256;
    use hex_literal::hex;
    use serde_json::{json, Value};

    fn sign_encode(tx: Value) -> Vec<u8> {
        let tx = serde_json::from_value::<Transaction>(tx).unwrap();
        let key = PrivateKey::new(GANACHE_PRIVATE_KEY).unwrap();
        tx.sign(&key).encode()
    }

    fn transfer() -> Value {
        json!({
            "nonce": 0,
            "gasPrice": 0,
            "gas": 21000,
            "to": "0x0000000000000000000000000000000000000000",
            "value": 0,
            "data": "0x",
        })
    }

    const SIGNED_LEGACY_CHAIN_1: [u8; 97] = hex!(
        "f85f8080825208940000000000000000000000000000000000000000808025a0
         c97442e361bf3940bec722b240c699de22302469756436bbcc5a150a93309b08
         a02fd3e68ed327dea3d085ec16a8589ebf7871e5a990669f67be82a70cd9dfb4
         f7"
    );

    const SIGNED_EIP2930: [u8; 100] = hex!(
        "01f8610180808252089400000000000000000000000000000000000000008080
         c080a04366d11301b0a233d0f311f93083583ed316c2ebd7246ccd93f1a320b2
         57fd65a02e3df28ccda84b829403a04f2d142416f01bdf7036dba12b66e4add6
         4d59455e"
    );

    const SIGNED_EIP1559: [u8; 101] = hex!(
        "02f8620180808082520894000000000000000000000000000000000000000080
         80c001a0290dbdecbc884b4cb827015fe0cd7ac90df1a5634d52a2845c21afac
         ca14b803a03e848dd1a342e5528beff99c42876cf091a68e2090dbbced5a5f7f
         392d3abcda"
    );

    #[test]
    fn encode_signed_transaction() {
        assert_eq!(
            sign_encode(transfer()),
            hex!(
                "f85f808082520894000000000000000000000000000000000000000080801ca0
                 0f1c0e95b7050ac3df5ac3b69a7d41e0b815da462fcd30954b1c37b58ca71c16
                 a068dab467ad79359967a3df1bcfc17292a3839288d05274d0e3e391f8b50841
                 0b"
            ),
        );

        let mut tx = transfer();
        tx["chainId"] = json!(1);
        assert_eq!(sign_encode(tx.clone()), SIGNED_LEGACY_CHAIN_1);

        tx["accessList"] = json!([]);
        assert_eq!(sign_encode(tx), SIGNED_EIP2930);

        assert_eq!(
            sign_encode(json!({
                "chainId": 1,
                "nonce": 0,
                "maxPriorityFeePerGas": 0,
                "maxFeePerGas": 0,
                "gas": 21000,
                "to": "0x0000000000000000000000000000000000000000",
                "value": 0,
                "data": "0x",
            })),
            SIGNED_EIP1559,
        );
    }

    #[test]
    fn explicit_type_field_selects_kind() {
        let mut tx = transfer();
        tx["chainId"] = json!(1);
        tx["type"] = json!("0x1");
        assert_eq!(
            serde_json::from_value::<Transaction>(tx.clone())
                .unwrap()
                .kind(),
            TransactionKind::Eip2930,
        );

        tx["type"] = json!(3);
        assert!(serde_json::from_value::<Transaction>(tx).is_err());
    }

    #[test]
    fn decode_round_trips() {
        for raw in [
            &SIGNED_LEGACY_CHAIN_1[..],
            &SIGNED_EIP2930[..],
            &SIGNED_EIP1559[..],
        ] {
            let signed = SignedTransaction::decode(raw).unwrap();
            assert_eq!(signed.encode(), raw);
            assert_eq!(
                signed.recover().unwrap(),
                PrivateKey::new(GANACHE_PRIVATE_KEY).unwrap().address(),
            );
        }
    }

    #[test]
    fn decode_legacy_recovers_chain_id() {
        let signed = SignedTransaction::decode(&SIGNED_LEGACY_CHAIN_1).unwrap();
        assert_eq!(
            signed.transaction,
            Transaction::Legacy(LegacyTransaction {
                nonce: 0,
                gas_price: U256::ZERO,
                gas_limit: 21_000,
                to: Some(Address::default()),
                value: U256::ZERO,
                data: vec![],
                chain_id: Some(1),
            }),
        );
        assert!(!signed.signature.y_parity());
    }

    #[test]
    fn decode_eip2930_fields() {
        let signed = SignedTransaction::decode(&SIGNED_EIP2930).unwrap();
        assert_eq!(signed.transaction.kind(), TransactionKind::Eip2930);
        assert_eq!(
            signed.transaction,
            Transaction::Eip2930(Eip2930Transaction {
                chain_id: 1,
                nonce: 0,
                gas_price: U256::ZERO,
                gas_limit: 21_000,
                to: Some(Address::default()),
                value: U256::ZERO,
                data: vec![],
                access_list: AccessList::default(),
            }),
        );
        assert!(!signed.signature.y_parity());
        assert!(signed.verify_chain_id(1).is_ok());
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let trailing = [&SIGNED_LEGACY_CHAIN_1[..], &[0x00][..]].concat();
        for raw in [
            &[][..],
            &[0x03, 0xc0][..],
            &SIGNED_EIP2930[..SIGNED_EIP2930.len() - 1],
            &SIGNED_EIP1559[..SIGNED_EIP1559.len() - 1],
            &trailing[..],
        ] {
            assert!(
                matches!(
                    SignedTransaction::decode(raw),
                    Err(Error::InvalidTransaction(_))
                ),
                "{} should be rejected",
                hex::encode(raw),
            );
        }
    }

    #[test]
    fn transaction_hash() {
        let signed = SignedTransaction::decode(&SIGNED_EIP1559).unwrap();
        assert_eq!(signed.hash(), hash::keccak256(SIGNED_EIP1559));
    }

    #[test]
    fn chain_id_mismatch() {
        let signed = SignedTransaction::decode(&SIGNED_LEGACY_CHAIN_1).unwrap();
        assert!(signed.verify_chain_id(1).is_ok());
        assert!(matches!(
            signed.verify_chain_id(5),
            Err(Error::ChainIdMismatch {
                expected: 5,
                actual: Some(1),
            })
        ));
    }

    #[test]
    fn convert_between_kinds() {
        let mut json = transfer();
        json["gasPrice"] = json!(42e9);
        let legacy = serde_json::from_value::<Transaction>(json.clone()).unwrap();

        assert!(matches!(
            legacy.clone().convert(TransactionKind::Eip1559),
            Err(Error::InvalidTransaction(_))
        ));

        json["chainId"] = json!(1);
        let legacy = serde_json::from_value::<Transaction>(json).unwrap();
        let Transaction::Eip1559(tx) = legacy.clone().convert(TransactionKind::Eip1559).unwrap()
        else {
            panic!("expected EIP-1559 transaction");
        };
        assert_eq!(tx.max_fee_per_gas, U256::new(42_000_000_000));
        assert_eq!(tx.max_priority_fee_per_gas, U256::new(42_000_000_000));

        let back = Transaction::Eip1559(tx)
            .convert(TransactionKind::Legacy)
            .unwrap();
        assert_eq!(back, legacy);
    }

    #[test]
    fn kind_parsing() {
        for kind in [
            TransactionKind::Legacy,
            TransactionKind::Eip2930,
            TransactionKind::Eip1559,
        ] {
            assert_eq!(kind.to_string().parse::<TransactionKind>().unwrap(), kind);
        }
        assert_eq!(
            "EIP-1559".parse::<TransactionKind>().unwrap(),
            TransactionKind::Eip1559
        );
        assert!("eip4844".parse::<TransactionKind>().is_err());
    }
}
