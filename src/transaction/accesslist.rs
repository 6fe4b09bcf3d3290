//! Module with EIP-2930 access list type definition with RLP encoding and JSON
//! serialization implementation.

use crate::{
    account::Address,
    error::{Error, Result},
    serialization,
    transaction::rlp,
};
use serde::Deserialize;

/// An Ethereum virtual machine storage slot.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialOrd, PartialEq)]
#[serde(transparent)]
pub struct StorageSlot(#[serde(with = "serialization::bytearray")] pub [u8; 32]);

impl StorageSlot {
    /// RLP encodes a storage slot.
    pub fn rlp_encode(&self) -> Vec<u8> {
        rlp::bytes(&self.0)
    }

    fn rlp_decode(item: rlp::Item) -> Result<Self> {
        let bytes = item.bytes()?;
        let slot = bytes
            .try_into()
            .map_err(|_| Error::InvalidTransaction("storage slot must be 32 bytes"))?;
        Ok(Self(slot))
    }
}

/// An entry of an access list: an address and the storage slots the
/// transaction accesses on it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(from = "AccessListEntryJson")]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<StorageSlot>,
}

/// Access list entries are accepted both in the `eth_*` JSON-RPC object form
/// and as `[address, [slots...]]` tuples.
#[derive(Deserialize)]
#[serde(untagged)]
enum AccessListEntryJson {
    Object {
        address: Address,
        #[serde(rename = "storageKeys", default)]
        storage_keys: Vec<StorageSlot>,
    },
    Tuple(Address, Vec<StorageSlot>),
}

impl From<AccessListEntryJson> for AccessListEntry {
    fn from(json: AccessListEntryJson) -> Self {
        let (address, storage_keys) = match json {
            AccessListEntryJson::Object {
                address,
                storage_keys,
            } => (address, storage_keys),
            AccessListEntryJson::Tuple(address, storage_keys) => (address, storage_keys),
        };
        Self {
            address,
            storage_keys,
        }
    }
}

/// An EIP-2930 access list.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct AccessList(pub Vec<AccessListEntry>);

impl AccessList {
    /// RLP encodes the access list.
    pub fn rlp_encode(&self) -> Vec<u8> {
        rlp::iter(self.0.iter().map(|entry| {
            rlp::list(&[
                &rlp::bytes(&*entry.address),
                &rlp::iter(entry.storage_keys.iter().map(StorageSlot::rlp_encode)),
            ])
        }))
    }

    /// Decodes an RLP encoded access list.
    pub fn rlp_decode(item: rlp::Item) -> Result<Self> {
        item.list()?
            .into_iter()
            .map(|entry| {
                let [address, slots] = <[rlp::Item; 2]>::try_from(entry.list()?).map_err(|_| {
                    Error::InvalidTransaction("access list entry must have two fields")
                })?;
                Ok(AccessListEntry {
                    address: address
                        .address()?
                        .ok_or(Error::InvalidTransaction("access list entry missing address"))?,
                    storage_keys: slots
                        .list()?
                        .into_iter()
                        .map(StorageSlot::rlp_decode)
                        .collect::<Result<_>>()?,
                })
            })
            .collect::<Result<_>>()
            .map(Self)
    }
}
