//! # pkey-core
//! Foundation types, codecs and secp256k1 primitives for P-chain keys.

pub mod address;
pub mod cb58;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod ids;
pub mod keychain;
pub mod traits;
pub mod types;
