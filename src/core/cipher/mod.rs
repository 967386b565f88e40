//! Payload decryption.
//!
//! Encrypted API responses are AES-256-GCM envelopes with a detached tag.
//! [`open`] parses the envelope, derives the key and decrypts; the
//! plaintext must be a JSON object, which becomes the secret set.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce, Tag};
use serde_json::{Map, Value};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::types::SecretsMap;
use crate::error::DecryptError;

mod envelope;
mod kdf;

pub use envelope::EncryptedEnvelope;
pub use kdf::{derive_key, is_raw_hex, DerivedKey, KeySource};

/// Decrypt an envelope with an already-derived key.
///
/// # Errors
///
/// Returns `DecryptError::AuthenticationFailure` if the tag does not verify
/// (wrong key or tampered ciphertext), or
/// `DecryptError::InvalidPlaintextShape` if the plaintext is not a UTF-8
/// JSON object.
pub fn decrypt(envelope: &EncryptedEnvelope, key: &DerivedKey) -> Result<SecretsMap, DecryptError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut buffer = Zeroizing::new(envelope.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&envelope.nonce),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(&envelope.tag),
        )
        .map_err(|_| DecryptError::AuthenticationFailure)?;

    let plaintext = std::str::from_utf8(&buffer)
        .map_err(|_| DecryptError::InvalidPlaintextShape("not valid UTF-8".to_string()))?;

    let parsed: Value = serde_json::from_str(plaintext).map_err(|e| {
        DecryptError::InvalidPlaintextShape(format!(
            "not valid JSON (line {}, column {})",
            e.line(),
            e.column()
        ))
    })?;

    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(DecryptError::InvalidPlaintextShape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse, derive and decrypt an envelope-shaped response.
///
/// # Errors
///
/// Any `DecryptError` from envelope parsing, key derivation or decryption.
pub fn open(obj: &Map<String, Value>, user_key: &str) -> Result<SecretsMap, DecryptError> {
    let envelope = EncryptedEnvelope::parse(obj)?;
    let key = derive_key(user_key, envelope.salt.as_deref())?;
    debug!(strategy = %key.source(), bytes = envelope.ciphertext.len(), "decrypting payload");

    decrypt(&envelope, &key)
}

/// JSON type name for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build an envelope object the way the secrets API does, for tests.
#[cfg(test)]
pub(crate) fn seal(plaintext: &str, user_key: &str, salt: Option<&[u8]>) -> Map<String, Value> {
    use aes_gcm::aead::{AeadCore, OsRng};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let key = derive_key(user_key, salt).unwrap();
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .unwrap();

    let mut obj = Map::new();
    obj.insert("ciphertext".into(), STANDARD.encode(&buffer).into());
    obj.insert("iv".into(), STANDARD.encode(nonce).into());
    obj.insert("tag".into(), STANDARD.encode(tag).into());
    if let Some(salt) = salt {
        obj.insert("salt".into(), STANDARD.encode(salt).into());
    }
    obj
}
