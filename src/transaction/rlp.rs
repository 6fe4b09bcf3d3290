//! Tiny RLP encoding and decoding implementation.

use crate::{
    account::Address,
    error::{Error, Result},
};
use ethnum::U256;

/// RLP encode a list.
pub fn list(items: &[&[u8]]) -> Vec<u8> {
    let total_len = items.iter().map(|item| item.len()).sum();
    let mut buf = len(total_len, 0xc0);
    for item in items {
        buf.extend_from_slice(item);
    }
    buf
}

/// RLP encodes an iterator as a list.
pub fn iter<U, I>(items: I) -> Vec<u8>
where
    U: AsRef<[u8]>,
    I: IntoIterator<Item = U>,
{
    let collected = items.into_iter().collect::<Vec<_>>();
    let items = collected.iter().map(U::as_ref).collect::<Vec<_>>();
    list(&items)
}

/// RLP encode some bytes.
pub fn bytes(bytes: &[u8]) -> Vec<u8> {
    match bytes {
        [x] if *x < 0x80 => vec![*x],
        _ => {
            let mut buf = len(bytes.len(), 0x80);
            buf.extend_from_slice(bytes);
            buf
        }
    }
}

/// RLP encode a length.
pub fn len(len: usize, offset: u8) -> Vec<u8> {
    if len < 56 {
        vec![len as u8 + offset]
    } else {
        let bl_buf = len.to_be_bytes();
        let bl = {
            let start = len.leading_zeros() / 8;
            &bl_buf[start as usize..]
        };
        let mut buf = vec![bl.len() as u8 + offset + 55];
        buf.extend_from_slice(bl);
        buf
    }
}

/// RLP encode a unsigned integer. This ensures that it is shortned to its
/// shortest big endian byte representation.
pub fn uint(value: impl Into<U256>) -> Vec<u8> {
    let value = value.into();
    let start = value.leading_zeros() / 8;
    bytes(&value.to_be_bytes()[start as usize..])
}

/// RLP encode an optional address, where `None` encodes as empty bytes for
/// contract creations.
pub fn address(address: Option<Address>) -> Vec<u8> {
    match address {
        Some(address) => bytes(&*address),
        None => bytes(b""),
    }
}

/// A decoded RLP item, borrowing its payload from the input buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Item<'a> {
    /// A byte string.
    Bytes(&'a [u8]),
    /// A list, holding the concatenated encoding of its items.
    List(&'a [u8]),
}

/// Decodes a buffer that must contain exactly one RLP item.
pub fn decode(input: &[u8]) -> Result<Item<'_>> {
    let (item, rest) = decode_prefix(input)?;
    if !rest.is_empty() {
        return Err(invalid("trailing bytes after RLP item"));
    }
    Ok(item)
}

/// Decodes the first RLP item of the buffer, returning the remaining bytes.
fn decode_prefix(input: &[u8]) -> Result<(Item<'_>, &[u8])> {
    let (&prefix, rest) = input
        .split_first()
        .ok_or_else(|| invalid("unexpected end of RLP input"))?;

    match prefix {
        0x00..=0x7f => Ok((Item::Bytes(&input[..1]), rest)),
        0x80..=0xb7 => {
            let (payload, rest) = take(rest, (prefix - 0x80) as usize)?;
            if let [byte] = payload {
                if *byte < 0x80 {
                    return Err(invalid("non-canonical single byte RLP string"));
                }
            }
            Ok((Item::Bytes(payload), rest))
        }
        0xb8..=0xbf => {
            let (len, rest) = long_len(rest, (prefix - 0xb7) as usize)?;
            let (payload, rest) = take(rest, len)?;
            Ok((Item::Bytes(payload), rest))
        }
        0xc0..=0xf7 => {
            let (payload, rest) = take(rest, (prefix - 0xc0) as usize)?;
            Ok((Item::List(payload), rest))
        }
        0xf8..=0xff => {
            let (len, rest) = long_len(rest, (prefix - 0xf7) as usize)?;
            let (payload, rest) = take(rest, len)?;
            Ok((Item::List(payload), rest))
        }
    }
}

fn take(input: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if input.len() < len {
        return Err(invalid("RLP item length exceeds input"));
    }
    Ok(input.split_at(len))
}

fn long_len(input: &[u8], len_of_len: usize) -> Result<(usize, &[u8])> {
    let (len_bytes, rest) = take(input, len_of_len)?;
    if len_bytes.first() == Some(&0) {
        return Err(invalid("RLP length with leading zeros"));
    }
    if len_bytes.len() > std::mem::size_of::<usize>() {
        return Err(invalid("RLP length overflow"));
    }

    let len = len_bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
    if len < 56 {
        return Err(invalid("non-canonical RLP long length"));
    }
    Ok((len, rest))
}

impl<'a> Item<'a> {
    /// Returns the byte string payload.
    pub fn bytes(self) -> Result<&'a [u8]> {
        match self {
            Item::Bytes(bytes) => Ok(bytes),
            Item::List(_) => Err(invalid("expected RLP string but found list")),
        }
    }

    /// Decodes the items of a list.
    pub fn list(self) -> Result<Vec<Item<'a>>> {
        let mut payload = match self {
            Item::List(payload) => payload,
            Item::Bytes(_) => return Err(invalid("expected RLP list but found string")),
        };

        let mut items = Vec::new();
        while !payload.is_empty() {
            let (item, rest) = decode_prefix(payload)?;
            items.push(item);
            payload = rest;
        }
        Ok(items)
    }

    /// Decodes a canonical unsigned integer of at most 256 bits.
    pub fn uint(self) -> Result<U256> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(invalid("RLP integer with leading zeros"));
        }
        if bytes.len() > 32 {
            return Err(invalid("RLP integer overflows 256 bits"));
        }

        let mut buf = [0; 32];
        buf[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(U256::from_be_bytes(buf))
    }

    /// Decodes a canonical unsigned 64-bit integer.
    pub fn uint64(self) -> Result<u64> {
        u64::try_from(self.uint()?).map_err(|_| invalid("RLP integer overflows 64 bits"))
    }

    /// Decodes a transaction recipient, where empty bytes mean contract
    /// creation.
    pub fn address(self) -> Result<Option<Address>> {
        match self.bytes()? {
            [] => Ok(None),
            bytes if bytes.len() == 20 => Ok(Some(Address::from_slice(bytes))),
            _ => Err(invalid("RLP address must be 20 bytes")),
        }
    }

    /// Decodes a typed transaction signature y-parity, which must be 0 or 1.
    pub fn y_parity(self) -> Result<bool> {
        let parity = self.uint()?;
        if parity > U256::ONE {
            return Err(invalid("y-parity must be 0 or 1"));
        }
        Ok(parity == U256::ONE)
    }
}

/// Sequential reader over the fields of a decoded RLP list.
pub struct Fields<'a> {
    items: std::vec::IntoIter<Item<'a>>,
}

impl<'a> Fields<'a> {
    /// Decodes `input` as a list of exactly `count` fields.
    pub fn new(input: &'a [u8], count: usize) -> Result<Self> {
        let items = decode(input)?.list()?;
        if items.len() != count {
            return Err(invalid("unexpected number of transaction fields"));
        }
        Ok(Self {
            items: items.into_iter(),
        })
    }

    /// Returns the next field.
    pub fn field(&mut self) -> Result<Item<'a>> {
        self.items
            .next()
            .ok_or_else(|| invalid("missing transaction field"))
    }
}

fn invalid(reason: &'static str) -> Error {
    Error::InvalidTransaction(reason)
}
