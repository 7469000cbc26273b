//! secp256k1 cryptographic operations.
//!
//! Provides key generation, recoverable signing over 32-byte hashes, and
//! short-address derivation. Uses the `secp256k1` crate with its global
//! context for the curve arithmetic.
//!
//! # Short addresses
//!
//! The 20-byte [`ShortId`] of a public key is
//! `RIPEMD-160(SHA-256(compressed_pubkey))`, computed over the 33-byte
//! SEC1 compressed encoding.

use ripemd::Ripemd160;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1, SecretKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CryptoError;
use crate::ids::ShortId;

/// Secret key length in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Compressed public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Recoverable signature length in bytes (`r || s || v`).
pub const SIGNATURE_LEN: usize = 65;

/// secp256k1 private key.
///
/// Wraps [`secp256k1::SecretKey`]. The scalar is erased on drop. `Debug`
/// never prints key material.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Generate a random private key from the OS cryptographic RNG.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        loop {
            rand::rngs::OsRng.fill_bytes(&mut bytes);
            // Out-of-range scalars occur with probability ~2^-128.
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                bytes.fill(0);
                return Self { secret };
            }
        }
    }

    /// Create a private key from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CryptoError::InvalidLength {
                expected: PRIVATE_KEY_LEN,
                got: bytes.len(),
            });
        }
        let secret = SecretKey::from_slice(bytes).map_err(|_| CryptoError::InvalidSecretKey)?;
        Ok(Self { secret })
    }

    /// The raw 32-byte secret. Handle with care.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.secret.secret_bytes()
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: secp256k1::PublicKey::from_secret_key(SECP256K1, &self.secret),
        }
    }

    /// Sign a 32-byte hash, returning a 65-byte recoverable signature.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> [u8; SIGNATURE_LEN] {
        let msg = Message::from_digest(*hash);
        let sig = SECP256K1.sign_ecdsa_recoverable(&msg, &self.secret);
        let (recovery_id, compact) = sig.serialize_compact();
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&compact);
        out[64] = recovery_id.to_i32() as u8;
        out
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    inner: secp256k1::PublicKey,
}

impl PublicKey {
    /// Parse a SEC1-encoded public key (33 or 65 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let inner =
            secp256k1::PublicKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// The 33-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.inner.serialize()
    }

    /// The 20-byte short address of this key.
    pub fn short_address(&self) -> ShortId {
        short_address(&self.to_bytes())
    }

    /// Recover the signing key from a hash and a recoverable signature.
    pub fn recover(hash: &[u8; 32], signature: &[u8; SIGNATURE_LEN]) -> Result<Self, CryptoError> {
        let recovery_id = RecoveryId::from_i32(signature[64] as i32)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let sig = RecoverableSignature::from_compact(&signature[..64], recovery_id)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let inner = SECP256K1
            .recover_ecdsa(&Message::from_digest(*hash), &sig)
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self { inner })
    }

    /// Check that `signature` over `hash` was produced by this key.
    pub fn verify_hash(&self, hash: &[u8; 32], signature: &[u8; SIGNATURE_LEN]) -> bool {
        Self::recover(hash, signature).is_ok_and(|recovered| recovered == *self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

/// Compute the short address `RIPEMD-160(SHA-256(pubkey_bytes))`.
pub fn short_address(pubkey_bytes: &[u8]) -> ShortId {
    let sha = Sha256::digest(pubkey_bytes);
    ShortId(Ripemd160::digest(sha).into())
}
