//! Error types for envpull.
//!
//! Each pipeline stage owns a focused error enum; [`Error`] wraps them so the
//! binary can match on the stage that failed. No variant ever carries a
//! secret value, the bearer token, or the encryption key.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for a pull run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid invocation settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Only the parse reason is kept; the URL itself may carry credentials.
    #[error("invalid request url: {reason}")]
    InvalidUrl { reason: String },
}

/// Failures talking to the secrets API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The API answered with a non-2xx status.
    #[error("secrets API returned {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("request to secrets API failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("secrets API returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl FetchError {
    /// HTTP status of a transport failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures turning an encrypted envelope into a secrets object.
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("malformed encrypted payload: {0}")]
    MalformedEnvelope(String),

    #[error("decryption failed: authentication tag mismatch (wrong key or tampered payload)")]
    AuthenticationFailure,

    #[error("decrypted payload does not contain a valid object: {0}")]
    InvalidPlaintextShape(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Failures classifying the API response.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("encrypted payload received but SECRETS_ENCRYPTION_KEY is missing")]
    MissingEncryptionKey,

    #[error("unsupported API response format. Top-level keys: {}", .fields.join(", "))]
    UnsupportedResponseFormat { fields: Vec<String> },
}

/// Failures reconciling secrets against the template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("missing keys from API response: {}", .0.join(", "))]
    MissingSecretKeys(Vec<String>),
}

/// Failures persisting the env file.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write temporary file {}: {source}", .path.display())]
    TempFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move env file into place at {}: {source}", .path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
