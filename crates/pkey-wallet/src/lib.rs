//! # pkey-wallet: single-key manager and UTXO selection.
//!
//! Holds one secp256k1 key for a P-chain account, reads and writes it in
//! the encoded (`PrivateKey-...`) and raw-hex file formats, and selects
//! which UTXOs to consume for a spend.
//!
//! # Modules
//!
//! - [`error`]: `KeyError` enum
//! - [`codec`]: encoded and raw-hex key formats, key file parsing
//! - [`manager`]: `KeyManager` construction, persistence and spending
//! - [`selection`]: greedy UTXO selection with per-UTXO outcomes

pub mod codec;
pub mod error;
pub mod manager;
pub mod selection;

// Re-exports for convenient access
pub use codec::{
    KeyFileFormat, LoadedKey, ParseOutcome, decode_private_key, encode_private_key,
    load_from_bytes,
};
pub use error::KeyError;
pub use manager::{KeyConfig, KeyManager};
pub use selection::{Selection, SelectionParams, SkippedUtxo, SpendOutcome, UtxoSelector};
