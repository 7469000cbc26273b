//! Key manager error types.

use pkey_core::error::{AddressError, CryptoError};
use thiserror::Error;

/// Errors from key construction, encoding and key file I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A supplied raw key does not match the supplied encoded key.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// A raw-hex key file does not hold exactly 64 hex characters.
    #[error("invalid private key length (expect 64 bytes in hex)")]
    InvalidPrivateKeyLen,

    /// Bytes after the 64 hex characters are not `\n` or `\r`.
    #[error("invalid private key ending")]
    InvalidPrivateKeyEnding,

    /// The re-encoded key differs from the supplied encoded string.
    #[error("invalid private key encoding")]
    InvalidPrivateKeyEncoding,

    /// Missing prefix, bad base58, checksum mismatch or wrong payload length.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// I/O error reading or writing a key file.
    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Address(#[from] AddressError),
}

impl From<std::io::Error> for KeyError {
    fn from(e: std::io::Error) -> Self {
        KeyError::Io(e.to_string())
    }
}
