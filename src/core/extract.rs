//! Response classification.
//!
//! The secrets API answers in one of three shapes. [`classify`] decides
//! which, first match wins:
//!
//! 1. `{"secrets": {...}}`
//! 2. `{"data": {...}}`
//! 3. an encrypted envelope (`ciphertext` or `encrypted` present)
//!
//! Anything else is unsupported. Decryption is only attempted for shape 3.

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::cipher::{self, EncryptedEnvelope};
use crate::core::types::{SecretsMap, SecretsResponse};
use crate::error::{ExtractError, Result};

/// Classified API response.
#[derive(Debug)]
pub enum ResponseShape<'a> {
    /// Secrets under a top-level `secrets` object.
    PlainSecrets(&'a SecretsMap),
    /// Secrets under a top-level `data` object.
    WrappedSecrets(&'a SecretsMap),
    /// Encrypted envelope fields at the top level.
    Encrypted(&'a Map<String, Value>),
    /// None of the above; carries the top-level field names.
    Unrecognized(Vec<String>),
}

impl ResponseShape<'_> {
    /// Shape name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlainSecrets(_) => "secrets",
            Self::WrappedSecrets(_) => "data",
            Self::Encrypted(_) => "encrypted",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Classify a raw response without touching any key material.
pub fn classify(response: &SecretsResponse) -> ResponseShape<'_> {
    let Value::Object(obj) = response else {
        return ResponseShape::Unrecognized(Vec::new());
    };

    if let Some(Value::Object(secrets)) = obj.get("secrets") {
        return ResponseShape::PlainSecrets(secrets);
    }

    if let Some(Value::Object(data)) = obj.get("data") {
        return ResponseShape::WrappedSecrets(data);
    }

    if EncryptedEnvelope::is_envelope(obj) {
        return ResponseShape::Encrypted(obj);
    }

    ResponseShape::Unrecognized(obj.keys().cloned().collect())
}

/// Extract the secret set from a response, decrypting if needed.
///
/// An empty `encryption_key` is treated as missing.
///
/// # Errors
///
/// - `ExtractError::MissingEncryptionKey` for an envelope without a key
/// - `ExtractError::UnsupportedResponseFormat` for unknown shapes
/// - any `DecryptError` from decryption
pub fn extract(response: &SecretsResponse, encryption_key: Option<&str>) -> Result<SecretsMap> {
    let shape = classify(response);
    debug!(shape = shape.name(), "classified response");

    match shape {
        ResponseShape::PlainSecrets(map) | ResponseShape::WrappedSecrets(map) => Ok(map.clone()),
        ResponseShape::Encrypted(obj) => {
            let key = encryption_key
                .filter(|k| !k.is_empty())
                .ok_or(ExtractError::MissingEncryptionKey)?;
            Ok(cipher::open(obj, key)?)
        }
        ResponseShape::Unrecognized(fields) => {
            Err(ExtractError::UnsupportedResponseFormat { fields }.into())
        }
    }
}
