//! Identifiers: 32-byte IDs, 20-byte short IDs and UTXO identifiers.
//!
//! Both ID types render as CB58 strings, matching how transaction and asset
//! identifiers are shown by chain tooling.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::cb58;
use crate::error::Cb58Error;

/// A 32-byte identifier (transaction ID, asset ID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub [u8; 32]);

impl Id {
    /// The empty ID (32 zero bytes).
    pub const EMPTY: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A 20-byte identifier, used for addresses derived from public keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShortId(pub [u8; 20]);

impl ShortId {
    pub const EMPTY: Self = Self([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

macro_rules! cb58_string_impls {
    ($ty:ident, $len:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&cb58::encode(&self.0))
            }
        }

        impl FromStr for $ty {
            type Err = Cb58Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                cb58::decode_array::<{ $len }>(s).map(Self)
            }
        }

        impl From<[u8; $len]> for $ty {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $ty {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

cb58_string_impls!(Id, 32);
cb58_string_impls!(ShortId, 20);

/// Reference to a specific output of a previous transaction.
///
/// The derived ordering compares the transaction ID bytes first and the
/// output index second. Spend inputs are sorted by this order so that
/// serialized transactions are canonical.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtxoId {
    /// Transaction that produced the output.
    pub tx_id: Id,
    /// Index of the output within that transaction.
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_id: Id, output_index: u32) -> Self {
        Self { tx_id, output_index }
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.output_index)
    }
}
