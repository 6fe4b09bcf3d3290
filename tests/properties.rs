use ethwallet::{
    account::{Address, PrivateKey},
    hdk::{Component, ExtendedKey},
    message,
    mnemonic::{Language, Mnemonic},
    transaction::{LegacyTransaction, SignedTransaction, Transaction, TransactionKind},
};
use ethnum::U256;
use proptest::prelude::*;

fn entropy() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::select(vec![16_usize, 20, 24, 28, 32])
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

fn private_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>().prop_filter_map("secret out of range", |secret| PrivateKey::new(secret).ok())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn mnemonic_round_trips(entropy in entropy()) {
        let mnemonic = Mnemonic::from_entropy(Language::English, &entropy).unwrap();
        let parsed = Mnemonic::from_phrase(mnemonic.to_phrase()).unwrap();
        prop_assert_eq!(parsed.entropy(), &entropy[..]);
        prop_assert_eq!(parsed.mnemonic_length(), entropy.len() * 3 / 4);
    }

    #[test]
    fn public_derivation_matches_private(seed in any::<[u8; 32]>(), index in 0..1000_u32) {
        let root = ExtendedKey::master(seed).unwrap();
        let private = root.derive_child(Component::Normal(index)).unwrap();
        let public = root.public().derive_child(Component::Normal(index)).unwrap();
        prop_assert_eq!(private.public_key(), public.public_key());
        prop_assert!(root.public().derive_child(Component::Hardened(index)).is_err());
    }

    #[test]
    fn signatures_recover_signer(key in private_key(), message in any::<Vec<u8>>()) {
        let signed = message::EthereumMessage(&message).sign(&key);
        prop_assert_eq!(signed.signature, key.sign(message::digest(&message)));
        prop_assert!(message::verify(&message, &signed.signature, key.address()).unwrap());

        let mut mutated = message.clone();
        mutated.push(0);
        prop_assert!(!message::verify(&mutated, &signed.signature, key.address()).unwrap());
    }

    #[test]
    fn checksum_is_idempotent(bytes in any::<[u8; 20]>()) {
        let checksum = Address(bytes).to_checksum();
        let reparsed = checksum.parse::<Address>().unwrap();
        prop_assert_eq!(reparsed.to_checksum(), checksum.clone());
        prop_assert_eq!(checksum.to_lowercase().parse::<Address>().unwrap(), reparsed);
    }

    #[test]
    fn signed_transactions_decode(
        key in private_key(),
        nonce in any::<u64>(),
        value in any::<u128>(),
        chain_id in prop::option::of(1..u64::MAX / 4),
        data in prop::collection::vec(any::<u8>(), 0..100),
        kind in prop::sample::select(vec![
            TransactionKind::Legacy,
            TransactionKind::Eip2930,
            TransactionKind::Eip1559,
        ]),
    ) {
        // Typed transactions always carry a chain ID.
        let chain_id = match kind {
            TransactionKind::Legacy => chain_id,
            _ => Some(chain_id.unwrap_or(1)),
        };
        let tx = Transaction::Legacy(LegacyTransaction {
            nonce,
            gas_price: U256::new(1_000_000_000),
            gas_limit: 21_000,
            to: Some(Address([0x42; 20])),
            value: U256::new(value),
            data,
            chain_id,
        })
        .convert(kind)
        .unwrap();
        let signed = tx.sign(&key);
        let decoded = SignedTransaction::decode(&signed.encode()).unwrap();
        prop_assert_eq!(decoded.transaction.kind(), kind);
        prop_assert_eq!(decoded.transaction.chain_id(), chain_id);
        prop_assert_eq!(decoded.recover().unwrap(), key.address());
        prop_assert_eq!(decoded, signed);
    }
}
