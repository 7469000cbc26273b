//! CB58: base58 with a 4-byte SHA-256 checksum suffix.
//!
//! The checksum is the last four bytes of a single SHA-256 over the payload.
//! Used for encoded private keys and for the textual form of identifiers.

use sha2::{Digest, Sha256};

use crate::error::Cb58Error;

/// Checksum length in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Encode `payload` with an appended checksum.
pub fn encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}

/// Decode a CB58 string and verify its checksum, returning the payload.
pub fn decode(s: &str) -> Result<Vec<u8>, Cb58Error> {
    let mut data = bs58::decode(s)
        .into_vec()
        .map_err(|e| Cb58Error::Base58(e.to_string()))?;
    if data.len() < CHECKSUM_LEN {
        return Err(Cb58Error::TooShort);
    }
    let split = data.len() - CHECKSUM_LEN;
    if checksum(&data[..split]) != data[split..] {
        return Err(Cb58Error::ChecksumMismatch);
    }
    data.truncate(split);
    Ok(data)
}

/// Decode a CB58 string into a fixed-size array.
pub fn decode_array<const N: usize>(s: &str) -> Result<[u8; N], Cb58Error> {
    let bytes = decode(s)?;
    bytes.try_into().map_err(|b: Vec<u8>| Cb58Error::InvalidLength {
        expected: N,
        got: b.len(),
    })
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}
