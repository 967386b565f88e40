//! Secrets API client.
//!
//! Issues exactly one GET per pull. There is no retry: any transport error
//! or non-2xx status ends the run.

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Url;
use tracing::debug;

use crate::core::constants::ERROR_BODY_LIMIT;
use crate::core::types::SecretsResponse;
use crate::error::{FetchError, Result};

/// HTTP client for the secrets API.
#[derive(Debug, Clone)]
pub struct SecretsClient {
    http: reqwest::Client,
}

impl SecretsClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(e.without_url()))?;
        Ok(Self { http })
    }

    /// GET the secrets document at `url`.
    ///
    /// Sends `Accept: application/json` and, when `token` is set, a bearer
    /// `Authorization` header.
    ///
    /// # Errors
    ///
    /// - `FetchError::Network` if the request cannot be completed
    /// - `FetchError::Transport` for a non-2xx status, with up to 300
    ///   characters of the response body
    /// - `FetchError::InvalidJson` if a 2xx body is not JSON
    pub async fn fetch(&self, url: &Url, token: Option<&str>) -> Result<SecretsResponse> {
        debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "requesting secrets");

        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;
        let status = response.status();
        debug!(status = status.as_u16(), "secrets API responded");

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::Transport {
                status: status.as_u16(),
                body: truncate_chars(&body, ERROR_BODY_LIMIT),
            }
            .into());
        }

        let payload = serde_json::from_str(&body).map_err(FetchError::InvalidJson)?;
        Ok(payload)
    }
}

/// First `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
