//! Narrow interface to an Ethereum node.
//!
//! The wallet never talks to the network itself. Callers plug in a
//! [`Provider`] implementation (usually a JSON-RPC client) to fetch the chain
//! state needed to build transactions.

use crate::{
    account::Address,
    transaction::{LegacyTransaction, Transaction, TransactionKind},
};
use anyhow::Result;
use ethnum::U256;
use std::fmt::{self, Display, Formatter};

/// A block identifier for node queries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl Display for BlockTag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Pending => f.write_str("pending"),
            BlockTag::Earliest => f.write_str("earliest"),
            BlockTag::Number(number) => write!(f, "{number:#x}"),
        }
    }
}

/// Summary of a block header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub number: u64,
    pub hash: [u8; 32],
    pub timestamp: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub miner: Address,
    pub transaction_count: usize,
}

/// Parameters for an `eth_getLogs` query.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogFilter {
    pub from_block: BlockTag,
    pub to_block: BlockTag,
    pub address: Option<Address>,
    /// Topic filters by position, `None` matching anything.
    pub topics: Vec<Option<[u8; 32]>>,
}

/// An emitted event log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub transaction_hash: [u8; 32],
}

/// Chain state queries and submission implemented outside of this crate.
pub trait Provider {
    /// Returns the balance of an account in Wei.
    fn balance(&self, address: Address) -> Result<U256>;

    /// Returns the number of transactions sent from an account, which is the
    /// nonce of its next transaction.
    fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Returns the node's suggested gas price in Wei.
    fn gas_price(&self) -> Result<U256>;

    fn chain_id(&self) -> Result<u64>;

    fn block(&self, tag: BlockTag) -> Result<Block>;

    fn logs(&self, filter: &LogFilter) -> Result<Vec<Log>>;

    /// Submits a raw signed transaction, returning its hash.
    fn send_raw_transaction(&self, raw: &[u8]) -> Result<[u8; 32]>;
}

/// Builder for a plain Ether transfer, filling in the nonce, gas price and
/// chain ID from a [`Provider`].
#[derive(Clone, Debug)]
pub struct Transfer {
    to: Address,
    value: U256,
    kind: TransactionKind,
    gas_limit: u64,
    gas_price: Option<U256>,
}

impl Transfer {
    /// The gas used by a transfer to an account without code.
    pub const GAS_LIMIT: u64 = 21_000;

    /// Creates a legacy transfer of `value` Wei to `to`.
    pub fn new(to: Address, value: U256) -> Self {
        Self {
            to,
            value,
            kind: TransactionKind::Legacy,
            gas_limit: Self::GAS_LIMIT,
            gas_price: None,
        }
    }

    /// Sets the transaction encoding to use.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Uses a fixed gas price instead of asking the provider for one.
    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Builds the transaction for the `from` account.
    pub fn build<P>(&self, provider: &P, from: Address) -> Result<Transaction>
    where
        P: Provider + ?Sized,
    {
        let nonce = provider.transaction_count(from)?;
        let gas_price = match self.gas_price {
            Some(gas_price) => gas_price,
            None => provider.gas_price()?,
        };
        let chain_id = provider.chain_id()?;
        tracing::debug!(%from, nonce, chain_id, kind = %self.kind, "building transfer");

        let tx = Transaction::Legacy(LegacyTransaction {
            nonce,
            gas_price,
            gas_limit: self.gas_limit,
            to: Some(self.to),
            value: self.value,
            data: Vec::new(),
            chain_id: Some(chain_id),
        });
        Ok(tx.convert(self.kind)?)
    }
}
