//! Single-key manager for a P-chain account.
//!
//! A [`KeyManager`] owns one secp256k1 private key together with its
//! encoded form and derived address. It is built from a [`KeyConfig`]
//! which may supply a raw key, an encoded key, both, or neither (a fresh
//! key is generated). When both are supplied they must agree.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use pkey_core::address::derive_p_address;
use pkey_core::constants::LOCAL_ID;
use pkey_core::crypto::{PRIVATE_KEY_LEN, PrivateKey, PublicKey, SIGNATURE_LEN};
use pkey_core::error::SpendError;
use pkey_core::ids::ShortId;
use pkey_core::keychain::Keychain;
use pkey_core::traits::{Addresser, OutputSpender};
use pkey_core::types::{Output, SpentInput, TransferInput, Utxo};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::codec::{self, KeyFileFormat};
use crate::error::KeyError;
use crate::selection::{Selection, SelectionParams, UtxoSelector};

/// Construction parameters for a [`KeyManager`].
///
/// An empty `private_key_encoded` string counts as unset.
#[derive(Clone)]
pub struct KeyConfig {
    pub network_id: u32,
    pub private_key: Option<PrivateKey>,
    pub private_key_encoded: Option<String>,
}

impl KeyConfig {
    /// A config for `network_id` that generates a fresh key.
    pub fn new(network_id: u32) -> Self {
        Self {
            network_id,
            private_key: None,
            private_key_encoded: None,
        }
    }

    pub fn with_private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    pub fn with_private_key_encoded(mut self, encoded: impl Into<String>) -> Self {
        self.private_key_encoded = Some(encoded.into());
        self
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::new(LOCAL_ID)
    }
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyConfig")
            .field("network_id", &self.network_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "private_key_encoded",
                &self.private_key_encoded.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Owns a key and exposes its address, encodings and spend capability.
pub struct KeyManager {
    network_id: u32,
    key: PrivateKey,
    raw: Zeroizing<[u8; PRIVATE_KEY_LEN]>,
    encoded: Zeroizing<String>,
    short_address: ShortId,
    p_address: String,
    keychain: Keychain,
}

impl KeyManager {
    /// Build a manager from `config`.
    ///
    /// # Errors
    /// - [`KeyError::InvalidEncoding`] or [`KeyError::Crypto`] if the encoded key does not decode
    /// - [`KeyError::InvalidPrivateKey`] if the raw and encoded keys differ
    /// - [`KeyError::InvalidPrivateKeyEncoding`] if re-encoding does not reproduce the input
    pub fn new(config: KeyConfig) -> Result<Self, KeyError> {
        let KeyConfig {
            network_id,
            private_key,
            private_key_encoded,
        } = config;
        let supplied_encoded = private_key_encoded
            .filter(|s| !s.is_empty())
            .map(Zeroizing::new);

        let key = match (&supplied_encoded, private_key) {
            (Some(encoded), raw) => {
                let decoded = codec::decode_private_key(encoded)?;
                if raw.is_some_and(|raw| raw != decoded) {
                    return Err(KeyError::InvalidPrivateKey);
                }
                decoded
            }
            (None, Some(raw)) => raw,
            (None, None) => PrivateKey::generate(),
        };

        let encoded = Zeroizing::new(codec::encode_private_key(&key));
        if supplied_encoded.is_some_and(|supplied| *supplied != *encoded) {
            return Err(KeyError::InvalidPrivateKeyEncoding);
        }

        let mut keychain = Keychain::new();
        let short_address = keychain.add(key.clone());
        let p_address = derive_p_address(network_id, &short_address)?;
        debug!(network_id, address = %p_address, "key manager ready");

        Ok(Self {
            network_id,
            raw: Zeroizing::new(key.to_bytes()),
            key,
            encoded,
            short_address,
            p_address,
            keychain,
        })
    }

    /// Read a key file in either the encoded or raw-hex format.
    pub fn load_from_file(network_id: u32, path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let bytes = Zeroizing::new(fs::read(path).map_err(|e| {
            KeyError::Io(format!("failed to read key file '{}': {e}", path.display()))
        })?);

        let loaded = codec::load_from_bytes(&bytes)?;
        let config = match loaded.format {
            KeyFileFormat::Encoded => {
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
                KeyConfig::new(network_id)
                    .with_private_key(loaded.key)
                    .with_private_key_encoded(text)
            }
            KeyFileFormat::Hex => KeyConfig::new(network_id).with_private_key(loaded.key),
        };
        let manager = Self::new(config)?;
        info!(
            path = %path.display(),
            format = ?loaded.format,
            address = %manager.p_address,
            "loaded private key"
        );
        Ok(manager)
    }

    /// Write the key as 64 lowercase hex characters, readable by the owner only.
    ///
    /// The key is written to a uniquely named hidden file in the same
    /// directory and then renamed into place, so an existing file is replaced
    /// whole or not at all.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), KeyError> {
        let path = path.as_ref();
        let name = path.file_name().ok_or_else(|| {
            KeyError::Io(format!("key file path '{}' has no file name", path.display()))
        })?;
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| {
                    KeyError::Io(format!(
                        "failed to create directory '{}': {e}",
                        parent.display()
                    ))
                })?;
                parent
            }
            None => Path::new("."),
        };

        let prefix = format!(".{}.", name.to_string_lossy());
        let contents = Zeroizing::new(hex::encode(self.raw.as_slice()));
        write_owner_only(dir, &prefix, path, contents.as_bytes()).map_err(|e| {
            KeyError::Io(format!("failed to write key file '{}': {e}", path.display()))
        })?;

        info!(path = %path.display(), address = %self.p_address, "saved private key");
        Ok(())
    }

    /// Select inputs from `utxos` that this key can spend.
    pub fn spend(&self, utxos: &[Utxo], params: &SelectionParams) -> Selection {
        UtxoSelector::select(utxos, self, params)
    }

    /// Sign a 32-byte hash with a recoverable signature (`r || s || v`).
    pub fn sign_hash(&self, hash: &[u8; 32]) -> [u8; SIGNATURE_LEN] {
        self.key.sign_hash(hash)
    }

    pub fn p_address(&self) -> &str {
        &self.p_address
    }

    /// The raw 32-byte secret. Callers must treat it as sensitive.
    pub fn raw_key(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.raw
    }

    pub fn encoded_key(&self) -> &str {
        &self.encoded
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn short_address(&self) -> ShortId {
        self.short_address
    }
}

impl OutputSpender for KeyManager {
    fn spend_output(&self, output: &Output, time: u64) -> Result<TransferInput, SpendError> {
        let (input, _signers) = self.keychain.spend(output, time)?;
        match input {
            SpentInput::Transfer(input) => Ok(input),
            SpentInput::Mint(_) => Err(SpendError::InvalidType),
        }
    }
}

impl Addresser for KeyManager {
    fn p_address(&self) -> &str {
        &self.p_address
    }
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("network_id", &self.network_id)
            .field("p_address", &self.p_address)
            .finish()
    }
}

/// Create a fresh temp file in `dir`, fill and sync it, then rename it to `target`.
///
/// The temp file is removed if any step fails.
fn write_owner_only(dir: &Path, prefix: &str, target: &Path, contents: &[u8]) -> io::Result<()> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o600));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
