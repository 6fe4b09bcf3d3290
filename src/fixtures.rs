//! Well-known deterministic secrets for testing.

use hex_literal::hex;

/// The Ganache deterministic mnemonic.
pub const GANACHE_MNEMONIC: &str =
    "myth like bonus scare over problem client lizard pioneer submit female collect";

/// The private key of the account at index 0 derived from the Ganache
/// deterministic mnemonic.
pub const GANACHE_PRIVATE_KEY: [u8; 32] =
    hex!("4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d");

/// The Hardhat and Foundry development mnemonic.
pub const HARDHAT_MNEMONIC: &str =
    "test test test test test test test test test test test junk";

/// The BIP-0039 all-zero entropy mnemonic.
pub const ABANDON_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                                    abandon abandon abandon abandon abandon about";

/// Private key used for the personal message signing examples.
pub const EXAMPLE_PRIVATE_KEY: [u8; 32] =
    hex!("4c0883a69102937d6231471b5dbb6204fe512961708279f8c1c9f2e1f9c0e8a7");
