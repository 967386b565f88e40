//! Encrypted envelope shape returned by the secrets API.
//!
//! ```json
//! { "ciphertext": "<b64>", "iv": "<b64>", "tag": "<b64>", "salt": "<b64>" }
//! ```
//!
//! `encrypted` is accepted in place of `ciphertext` and `nonce` in place of
//! `iv`. `salt` is optional.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};

use crate::core::constants::{NONCE_LEN, TAG_LEN};
use crate::error::DecryptError;

const CIPHERTEXT_FIELDS: &[&str] = &["ciphertext", "encrypted"];
const NONCE_FIELDS: &[&str] = &["iv", "nonce"];
const TAG_FIELDS: &[&str] = &["tag"];
const SALT_FIELDS: &[&str] = &["salt"];

/// Decoded envelope, ready for decryption.
#[derive(Debug, Clone)]
pub struct EncryptedEnvelope {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub salt: Option<Vec<u8>>,
}

impl EncryptedEnvelope {
    /// Whether a response object looks like an encrypted envelope.
    ///
    /// True when `ciphertext` or `encrypted` holds a truthy value. The rest
    /// of the envelope is validated by [`EncryptedEnvelope::parse`].
    pub fn is_envelope(obj: &Map<String, Value>) -> bool {
        CIPHERTEXT_FIELDS
            .iter()
            .any(|name| obj.get(*name).is_some_and(is_truthy))
    }

    /// Decode the envelope fields from a response object.
    ///
    /// # Errors
    ///
    /// Returns `DecryptError::MalformedEnvelope` if ciphertext, iv or tag is
    /// absent, any field is not valid base64, or the nonce/tag has the wrong
    /// length.
    pub fn parse(obj: &Map<String, Value>) -> Result<Self, DecryptError> {
        let ciphertext = field(obj, CIPHERTEXT_FIELDS);
        let nonce = field(obj, NONCE_FIELDS);
        let tag = field(obj, TAG_FIELDS);

        let (ciphertext, nonce, tag) = match (ciphertext, nonce, tag) {
            (Some(c), Some(n), Some(t)) => (c, n, t),
            (c, n, t) => {
                let missing: Vec<&str> = [(c, "ciphertext"), (n, "iv"), (t, "tag")]
                    .into_iter()
                    .filter(|(value, _)| value.is_none())
                    .map(|(_, name)| name)
                    .collect();
                return Err(DecryptError::MalformedEnvelope(format!(
                    "missing {}",
                    missing.join(", ")
                )));
            }
        };

        let salt = field(obj, SALT_FIELDS)
            .map(|s| decode("salt", s))
            .transpose()?;

        Ok(Self {
            ciphertext: decode("ciphertext", ciphertext)?,
            nonce: decode_fixed("iv", nonce)?,
            tag: decode_fixed("tag", tag)?,
            salt,
        })
    }
}

/// First non-empty string value among the given field names.
fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| obj.get(*name).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Padding optional, trailing bits ignored.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode standard or URL-safe base64, padded or not.
fn decode(name: &str, value: &str) -> Result<Vec<u8>, DecryptError> {
    let value = value.trim();
    STANDARD_LENIENT
        .decode(value)
        .or_else(|e| URL_SAFE_LENIENT.decode(value).map_err(|_| e))
        .map_err(|e| DecryptError::MalformedEnvelope(format!("{} is not valid base64: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N], DecryptError> {
    let bytes = decode(name, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        DecryptError::MalformedEnvelope(format!("{} must be {} bytes, got {}", name, N, len))
    })
}
