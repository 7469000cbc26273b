//! Keychain: ownership, threshold and lock-time checks for spending outputs.
//!
//! A [`Keychain`] holds secp256k1 keys indexed by their short address. Given
//! an output and a reference time it decides whether the held keys can
//! satisfy the output's owner condition and, if so, which owner indices
//! will sign.

use std::collections::HashMap;
use std::fmt;

use crate::crypto::PrivateKey;
use crate::error::SpendError;
use crate::ids::ShortId;
use crate::types::{Input, Output, OutputOwners, SpentInput, TransferInput};

/// A set of keys that can produce spend inputs.
#[derive(Clone, Default)]
pub struct Keychain {
    keys: HashMap<ShortId, PrivateKey>,
    /// Addresses in insertion order.
    addrs: Vec<ShortId>,
}

impl Keychain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, returning its short address. Re-adding a key is a no-op.
    pub fn add(&mut self, key: PrivateKey) -> ShortId {
        let addr = key.public_key().short_address();
        if !self.keys.contains_key(&addr) {
            self.addrs.push(addr);
            self.keys.insert(addr, key);
        }
        addr
    }

    /// Look up the key for a short address.
    pub fn get(&self, addr: &ShortId) -> Option<&PrivateKey> {
        self.keys.get(addr)
    }

    /// Addresses of all held keys, in insertion order.
    pub fn addresses(&self) -> &[ShortId] {
        &self.addrs
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Match an owner condition at `time`.
    ///
    /// Walks `owners.addrs` in order and collects the index of every address
    /// this keychain holds, stopping once `threshold` indices are found.
    /// Returns the signature indices and the matching keys.
    pub fn match_owners(
        &self,
        owners: &OutputOwners,
        time: u64,
    ) -> Result<(Vec<u32>, Vec<&PrivateKey>), SpendError> {
        if owners.locktime > time {
            return Err(SpendError::Locked {
                locktime: owners.locktime,
                time,
            });
        }

        let threshold = owners.threshold as usize;
        let mut sig_indices = Vec::with_capacity(threshold);
        let mut signers = Vec::with_capacity(threshold);
        for (index, addr) in owners.addrs.iter().enumerate() {
            if sig_indices.len() >= threshold {
                break;
            }
            if let Some(key) = self.keys.get(addr) {
                sig_indices.push(index as u32);
                signers.push(key);
            }
        }

        if sig_indices.len() < threshold {
            return Err(SpendError::InsufficientSigners {
                threshold: owners.threshold,
                available: sig_indices.len() as u32,
            });
        }
        Ok((sig_indices, signers))
    }

    /// Produce the input that spends `output` at `time`, with its signers.
    pub fn spend(
        &self,
        output: &Output,
        time: u64,
    ) -> Result<(SpentInput, Vec<&PrivateKey>), SpendError> {
        match output {
            Output::Transfer(out) => {
                if out.amount == 0 {
                    return Err(SpendError::ZeroAmount);
                }
                let (sig_indices, signers) = self.match_owners(&out.owners, time)?;
                let input = TransferInput {
                    amount: out.amount,
                    input: Input { sig_indices },
                };
                Ok((SpentInput::Transfer(input), signers))
            }
            Output::Mint(out) => {
                let (sig_indices, signers) = self.match_owners(&out.owners, time)?;
                Ok((SpentInput::Mint(Input { sig_indices }), signers))
            }
        }
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("addresses", &self.addrs)
            .finish()
    }
}
