//! Module implementing parsing for BIP-0032 HD paths used for key derivation.

use crate::error::{Error, Result};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A value indicating a path component is hardened.
pub const HARDENED: u32 = 0x8000_0000;

/// The BIP-0044 coin type registered for Ethereum.
const ETHEREUM_COIN_TYPE: u32 = 60;

/// A parsed hierarchical derivation path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path {
    components: Vec<Component>,
}

impl Path {
    /// Returns the path of the master node, `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Creates a BIP-0044 Ethereum path `m/44'/60'/{account}'/{change}/{index}`.
    ///
    /// Fails if any of the values have the hardened bit set.
    pub fn ethereum(account: u32, change: u32, index: u32) -> Result<Self> {
        let components = vec![
            Component::Hardened(44),
            Component::Hardened(ETHEREUM_COIN_TYPE),
            Component::Hardened(account),
            Component::Normal(change),
            Component::Normal(index),
        ];
        if components.iter().any(|component| !component.is_valid()) {
            return Err(Error::MalformedPath {
                path: format!("m/44'/60'/{account}'/{change}/{index}"),
                reason: "path component index out of range",
            });
        }

        Ok(Self { components })
    }

    /// Creates the default Ethereum HD path for the specified account index.
    pub fn for_index(index: u32) -> Result<Self> {
        Self::ethereum(0, 0, index)
    }

    /// Returns a new path with `component` appended.
    pub fn child(&self, component: Component) -> Self {
        let mut components = self.components.clone();
        components.push(component);
        Self { components }
    }

    /// Returns an iterator over the path components.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.components.iter().copied()
    }

    /// Returns the number of components, which is the depth of the key the
    /// path leads to.
    pub fn depth(&self) -> usize {
        self.components.len()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("m")?;
        for component in self.components() {
            write!(f, "/{component}")?;
        }

        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: &'static str| Error::MalformedPath {
            path: s.to_owned(),
            reason,
        };

        let rest = s
            .strip_prefix('m')
            .ok_or_else(|| malformed("missing main node 'm'"))?;
        if rest.is_empty() {
            return Ok(Self::master());
        }

        let components = rest
            .strip_prefix('/')
            .ok_or_else(|| malformed("expected '/' after main node"))?
            .split('/')
            .map(|component| component.parse::<Component>().map_err(malformed))
            .collect::<Result<_>>()?;

        Ok(Self { components })
    }
}

/// A hierarchical path component.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Component {
    /// Component to generate a hardened child key.
    Hardened(u32),
    /// Component to generate a normal child key.
    Normal(u32),
}

impl Component {
    /// Creates a component from a raw BIP-0032 child index, where indices
    /// with the high bit set are hardened.
    pub fn from_index(index: u32) -> Self {
        if index & HARDENED != 0 {
            Self::Hardened(index & !HARDENED)
        } else {
            Self::Normal(index)
        }
    }

    /// Returns the raw BIP-0032 child index.
    pub fn index(self) -> u32 {
        match self {
            Self::Hardened(value) => value | HARDENED,
            Self::Normal(value) => value,
        }
    }

    /// Returns `true` for hardened components.
    pub fn is_hardened(self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Returns the component's value without the hardened flag.
    pub fn value(self) -> u32 {
        match self {
            Self::Hardened(value) | Self::Normal(value) => value,
        }
    }

    /// Returns `false` if the value has the hardened bit set, in which case
    /// the component does not map onto a single BIP-0032 child index.
    pub fn is_valid(self) -> bool {
        self.value() < HARDENED
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Hardened(value) => write!(f, "{value}'"),
            Self::Normal(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for Component {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty path component");
        }

        let (value, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(value) => (value, true),
            None => (s, false),
        };
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err("path component is not a number");
        }

        let value = value
            .parse::<u32>()
            .ok()
            .filter(|value| *value < HARDENED)
            .ok_or("path component index out of range")?;

        Ok(if hardened {
            Component::Hardened(value)
        } else {
            Component::Normal(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        for (input, expected) in [
            ("m", "m"),
            ("m/0", "m/0"),
            ("m/44'/60'/0'/0/0", "m/44'/60'/0'/0/0"),
            ("m/44h/60H/0'/1/2147483647", "m/44'/60'/0'/1/2147483647"),
        ] {
            let path = input.parse::<Path>().unwrap();
            assert_eq!(path.to_string(), expected);
        }
    }

    #[test]
    fn ethereum_paths() {
        assert_eq!(
            Path::for_index(7).unwrap().to_string(),
            "m/44'/60'/0'/0/7"
        );
        assert_eq!(
            Path::ethereum(1, 1, 2).unwrap().to_string(),
            "m/44'/60'/1'/1/2"
        );
        assert_eq!(
            Path::for_index(3).unwrap(),
            "m/44'/60'/0'/0/3".parse::<Path>().unwrap()
        );
    }

    #[test]
    fn ethereum_paths_reject_hardened_values() {
        assert!(Path::for_index(HARDENED - 1).is_ok());
        for result in [
            Path::for_index(HARDENED),
            Path::for_index(u32::MAX),
            Path::ethereum(HARDENED, 0, 0),
            Path::ethereum(0, HARDENED, 0),
        ] {
            assert!(matches!(result, Err(Error::MalformedPath { .. })));
        }
    }

    #[test]
    fn malformed_paths() {
        for input in [
            "",
            "44'/60'",
            "m/",
            "m//0",
            "m/0/",
            "m/x",
            "m/-1",
            "m/+1",
            "m/1''",
            "m/'",
            "m/2147483648",
            "m/4294967296'",
            "n/0",
            "m0",
        ] {
            assert!(
                matches!(input.parse::<Path>(), Err(Error::MalformedPath { .. })),
                "{input} should be rejected",
            );
        }
    }

    #[test]
    fn component_indices() {
        assert_eq!(Component::Hardened(44).index(), 0x8000_002c);
        assert_eq!(Component::Normal(5).index(), 5);
        assert_eq!(Component::from_index(0x8000_003c), Component::Hardened(60));
        assert_eq!(Component::from_index(1), Component::Normal(1));
        assert!(Component::Hardened(0).is_hardened());
        assert_eq!(Component::Hardened(9).value(), 9);
        assert!(Component::Normal(HARDENED - 1).is_valid());
        assert!(!Component::Normal(HARDENED).is_valid());
        assert!(!Component::Hardened(u32::MAX).is_valid());
    }
}
