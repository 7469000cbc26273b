//! Shared test helpers for integration tests.

use pkey_core::crypto::PrivateKey;
use pkey_core::ids::{Id, ShortId, UtxoId};
use pkey_core::types::{MintOutput, Output, OutputOwners, TransferOutput, Utxo};

/// The well-known local-network funding key.
pub const EWOQ_ENCODED: &str = "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN";

/// Hex form of [`EWOQ_ENCODED`].
pub const EWOQ_HEX: &str = "56289e99c94b6912bfc12adc093c9b51124f0dc54ac7a766b2bc5ccf558d8027";

/// P-chain address of [`EWOQ_ENCODED`] on network 12345.
pub const EWOQ_LOCAL_ADDR: &str = "P-local18jma8ppw3nhx5r4ap8clazz0dps7rv5u00z96u";

/// The funding key as a [`PrivateKey`].
pub fn ewoq_key() -> PrivateKey {
    let bytes = hex::decode(EWOQ_HEX).unwrap();
    PrivateKey::from_bytes(&bytes).unwrap()
}

/// Deterministic transaction ID from a seed byte.
pub fn tx_id(seed: u8) -> Id {
    Id([seed; 32])
}

/// A single-owner transfer UTXO.
pub fn transfer_utxo(tx: u8, index: u32, amount: u64, owner: ShortId) -> Utxo {
    locked_utxo(tx, index, amount, owner, 0)
}

/// A single-owner transfer UTXO that unlocks at `locktime`.
pub fn locked_utxo(tx: u8, index: u32, amount: u64, owner: ShortId, locktime: u64) -> Utxo {
    Utxo {
        utxo_id: UtxoId::new(tx_id(tx), index),
        asset_id: Id([0xAA; 32]),
        output: Output::Transfer(TransferOutput {
            amount,
            owners: OutputOwners {
                locktime,
                ..OutputOwners::single(owner)
            },
        }),
    }
}

/// A transfer UTXO with a multi-signature owner set.
pub fn multisig_utxo(tx: u8, amount: u64, threshold: u32, addrs: Vec<ShortId>) -> Utxo {
    Utxo {
        utxo_id: UtxoId::new(tx_id(tx), 0),
        asset_id: Id([0xAA; 32]),
        output: Output::Transfer(TransferOutput {
            amount,
            owners: OutputOwners {
                locktime: 0,
                threshold,
                addrs,
            },
        }),
    }
}

/// A mint-right UTXO owned by `owner`.
pub fn mint_utxo(tx: u8, owner: ShortId) -> Utxo {
    Utxo {
        utxo_id: UtxoId::new(tx_id(tx), 0),
        asset_id: Id([0xBB; 32]),
        output: Output::Mint(MintOutput {
            owners: OutputOwners::single(owner),
        }),
    }
}
