//! Error types for the core primitives.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid secp256k1 secret key")] InvalidSecretKey,
    #[error("invalid secp256k1 public key")] InvalidPublicKey,
    #[error("invalid recoverable signature")] InvalidSignature,
    #[error("invalid length: expected {expected}, got {got}")] InvalidLength { expected: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Cb58Error {
    #[error("base58: {0}")] Base58(String),
    #[error("payload shorter than checksum")] TooShort,
    #[error("checksum mismatch")] ChecksumMismatch,
    #[error("invalid length: expected {expected}, got {got}")] InvalidLength { expected: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing chain separator")] MissingChainSeparator,
    #[error("missing separator")] MissingSeparator,
    #[error("invalid HRP")] InvalidHrp,
    #[error("invalid length")] InvalidLength,
    #[error("invalid checksum")] InvalidChecksum,
    #[error("invalid character: {0}")] InvalidCharacter(char),
    #[error("invalid padding bits")] InvalidPadding,
    #[error("mixed case")] MixedCase,
}

/// Why an output cannot be spent by a keychain at a given time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpendError {
    #[error("output locked until {locktime} (time {time})")] Locked { locktime: u64, time: u64 },
    #[error("insufficient signers: threshold {threshold}, available {available}")] InsufficientSigners { threshold: u32, available: u32 },
    #[error("zero-value output")] ZeroAmount,
    #[error("invalid type: spent input is not transferable")] InvalidType,
}
