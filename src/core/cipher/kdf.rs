//! Key derivation for encrypted payloads.
//!
//! Turns the user-supplied key string into a 32-byte AES key using exactly
//! one strategy, checked in priority order:
//!
//! 1. **Salted**: the envelope carries a salt, so the key string is
//!    stretched with scrypt (N=16384, r=8, p=1).
//! 2. **Raw hex**: the key string is exactly 64 hex characters and is
//!    decoded directly.
//! 3. **Hashed**: anything else is hashed with SHA-256.
//!
//! Any string yields a key. A wrong key is only detected when AES-GCM
//! authentication fails during decryption.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::core::constants::{KEY_LEN, SCRYPT_LOG_N, SCRYPT_P, SCRYPT_R};
use crate::error::DecryptError;

/// Which derivation strategy produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Salted,
    RawHex,
    Hashed,
}

impl KeySource {
    /// Strategy name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Salted => "salted",
            Self::RawHex => "raw-hex",
            Self::Hashed => "hashed",
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A 32-byte symmetric key, wiped from memory on drop.
pub struct DerivedKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
    source: KeySource,
}

impl DerivedKey {
    /// Raw key material.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Strategy that produced this key.
    pub fn source(&self) -> KeySource {
        self.source
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[redacted]")
            .field("source", &self.source)
            .finish()
    }
}

/// Whether a key string is exactly 64 hex characters (either case).
pub fn is_raw_hex(user_key: &str) -> bool {
    user_key.len() == KEY_LEN * 2 && user_key.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Derive the AES key for an envelope.
///
/// `salt` is the already-decoded salt bytes; an empty salt counts as absent.
///
/// # Errors
///
/// Only fails if the fixed scrypt parameters are rejected, which does not
/// happen for the constants in use.
pub fn derive_key(user_key: &str, salt: Option<&[u8]>) -> Result<DerivedKey, DecryptError> {
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);

    let source = match salt {
        Some(salt) if !salt.is_empty() => {
            let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
                .map_err(|e| DecryptError::KeyDerivation(e.to_string()))?;
            scrypt::scrypt(user_key.as_bytes(), salt, &params, &mut bytes[..])
                .map_err(|e| DecryptError::KeyDerivation(e.to_string()))?;
            KeySource::Salted
        }
        _ if is_raw_hex(user_key) => {
            hex::decode_to_slice(user_key, &mut bytes[..])
                .map_err(|e| DecryptError::KeyDerivation(e.to_string()))?;
            KeySource::RawHex
        }
        _ => {
            let digest = Sha256::digest(user_key.as_bytes());
            bytes.copy_from_slice(&digest);
            KeySource::Hashed
        }
    };

    Ok(DerivedKey { bytes, source })
}
