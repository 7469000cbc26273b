//! Integration test suite for the P-chain key manager.
//!
//! Exercises `pkey-core` and `pkey-wallet` together: key files written and
//! read through the public API, address derivation against known vectors,
//! and UTXO selection driven by a real keychain.

pub mod helpers;
