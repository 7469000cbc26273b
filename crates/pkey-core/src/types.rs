//! UTXO and spend-input types.
//!
//! All amounts are in the asset's smallest denomination (u64).

use serde::{Deserialize, Serialize};

use crate::ids::{Id, ShortId, UtxoId};

/// Owner condition shared by all secp256k1 outputs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct OutputOwners {
    /// Unix time before which the output cannot be spent.
    pub locktime: u64,
    /// Number of distinct owner signatures required.
    pub threshold: u32,
    /// Addresses allowed to sign, in canonical order.
    pub addrs: Vec<ShortId>,
}

impl OutputOwners {
    /// A single-owner condition with no lock time.
    pub fn single(addr: ShortId) -> Self {
        Self {
            locktime: 0,
            threshold: 1,
            addrs: vec![addr],
        }
    }
}

/// An output carrying an amount of an asset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferOutput {
    pub amount: u64,
    pub owners: OutputOwners,
}

/// An output granting the right to mint an asset. Carries no amount.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintOutput {
    pub owners: OutputOwners,
}

/// The spendable part of a UTXO.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Transfer(TransferOutput),
    Mint(MintOutput),
}

impl Output {
    pub fn owners(&self) -> &OutputOwners {
        match self {
            Output::Transfer(out) => &out.owners,
            Output::Mint(out) => &out.owners,
        }
    }
}

/// An unspent transaction output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub output: Output,
}

/// Signature indices into an output's owner list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Input {
    pub sig_indices: Vec<u32>,
}

/// Input consuming a [`TransferOutput`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferInput {
    pub amount: u64,
    pub input: Input,
}

/// A spend produced by a keychain for some output.
///
/// Only [`SpentInput::Transfer`] can be wrapped into a [`TransferableInput`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpentInput {
    Transfer(TransferInput),
    Mint(Input),
}

/// A transaction input referencing a UTXO by ID, with the amount spent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferableInput {
    pub utxo_id: UtxoId,
    pub asset_id: Id,
    pub input: TransferInput,
}

impl TransferableInput {
    pub fn amount(&self) -> u64 {
        self.input.amount
    }
}

/// Sort inputs into canonical order: transaction ID bytes, then output index.
pub fn sort_transferable_inputs(inputs: &mut [TransferableInput]) {
    inputs.sort_by(|a, b| a.utxo_id.cmp(&b.utxo_id));
}

/// Check that inputs are in canonical order with no duplicate UTXO.
pub fn is_sorted_and_unique(inputs: &[TransferableInput]) -> bool {
    inputs.windows(2).all(|w| w[0].utxo_id < w[1].utxo_id)
}
