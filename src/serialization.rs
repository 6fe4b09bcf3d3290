//! Module with JSON serialization helpers for transaction fields.

use ethnum::U256;
use serde::de::{self, Visitor};
use serde_json::{Map, Value};
use std::{
    fmt::{self, Formatter},
    marker::PhantomData,
};

/// A JSON object.
pub type JsonObject = Map<String, Value>;

/// An unsigned integer that can be read from a JSON quantity: a number, a
/// decimal string or a `0x`-prefixed hexadecimal string.
trait Quantity: Sized {
    const BITS: u32;

    fn from_u128(value: u128) -> Option<Self>;
    fn from_str_radix(src: &str, radix: u32) -> Result<Self, String>;
}

impl Quantity for U256 {
    const BITS: u32 = 256;

    fn from_u128(value: u128) -> Option<Self> {
        Some(U256::new(value))
    }

    fn from_str_radix(src: &str, radix: u32) -> Result<Self, String> {
        U256::from_str_radix(src, radix).map_err(|err| err.to_string())
    }
}

impl Quantity for u64 {
    const BITS: u32 = 64;

    fn from_u128(value: u128) -> Option<Self> {
        value.try_into().ok()
    }

    fn from_str_radix(src: &str, radix: u32) -> Result<Self, String> {
        u64::from_str_radix(src, radix).map_err(|err| err.to_string())
    }
}

struct QuantityVisitor<T>(PhantomData<T>);

impl<T> QuantityVisitor<T> {
    fn out_of_range<E>() -> E
    where
        T: Quantity,
        E: de::Error,
    {
        de::Error::custom(format!("number does not fit in {} bits", T::BITS))
    }
}

impl<'de, T> Visitor<'de> for QuantityVisitor<T>
where
    T: Quantity,
{
    type Value = T;

    fn expecting(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "unsigned {}-bit number, decimal string or '0x-' prefixed hexadecimal string",
            T::BITS,
        )
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_u128(v.into())
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        T::from_u128(v).ok_or_else(Self::out_of_range::<E>)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let v = u64::try_from(v).map_err(|_| de::Error::custom("negative quantity"))?;
        self.visit_u64(v)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v.fract() != 0. {
            return Err(de::Error::custom(
                "invalid conversion from floating point number \
                 with fractional part to integer",
            ));
        }
        if !(0.0..(1_u64 << 53) as _).contains(&v) {
            return Err(de::Error::custom(
                "invalid conversion from double precision floating point \
                 number outside of valid integer range [0, 2^53)",
            ));
        }

        self.visit_u64(v as _)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let (src, radix) = match v.strip_prefix("0x") {
            Some(v) => (v, 16),
            None => (v, 10),
        };
        T::from_str_radix(src, radix).map_err(de::Error::custom)
    }
}

/// `U256` serialization methods.
pub mod u256 {
    use super::QuantityVisitor;
    use ethnum::U256;
    use serde::de::Deserializer;
    use std::marker::PhantomData;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor(PhantomData))
    }
}

/// `u64` quantity serialization methods.
pub mod uint64 {
    use super::QuantityVisitor;
    use serde::de::Deserializer;
    use std::marker::PhantomData;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor(PhantomData))
    }

    pub mod option {
        use serde::{Deserialize, Deserializer};

        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Helper(#[serde(with = "super")] u64);

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let option = Option::deserialize(deserializer)?;
            Ok(option.map(|Helper(v)| v))
        }
    }
}

/// Dynamic byte array serialization methods.
pub mod bytes {
    use serde::{
        de::{self, Deserializer},
        Deserialize as _,
    };
    use std::borrow::Cow;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<str>::deserialize(deserializer)?;
        let s = s
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("hex data missing '0x' prefix"))?;
        hex::decode(s).map_err(de::Error::custom)
    }
}

/// Fixed byte array serialization methods.
pub mod bytearray {
    use serde::{
        de::{self, Deserializer},
        Deserialize as _,
    };
    use std::borrow::Cow;

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = [0_u8; N];
        let s = Cow::<str>::deserialize(deserializer)?;
        let s = s
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("storage slot missing '0x' prefix"))?;
        hex::decode_to_slice(s, &mut value).map_err(de::Error::custom)?;
        Ok(value)
    }
}
