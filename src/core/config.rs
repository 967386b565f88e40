//! Resolved settings for one pull.
//!
//! Built once from the command line (flags, then `SECRETS_*` environment
//! variables, then defaults) and never mutated afterwards.

use std::path::{Path, PathBuf};

use reqwest::Url;
use zeroize::Zeroizing;

use crate::core::constants::{
    DEFAULT_APP, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_ENV, ENV_FILE, TEMPLATE_FILE,
};
use crate::error::{ConfigError, Result};

/// Where the secrets API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A full URL used as-is.
    Explicit(String),
    /// Base URL plus endpoint path; `app` and `env` are added as query
    /// parameters.
    Composed { base_url: String, path: String },
}

/// Immutable configuration for a single pull run.
pub struct PullConfig {
    pub app: String,
    pub env: String,
    pub url: Url,
    pub token: Option<Zeroizing<String>>,
    pub encryption_key: Option<Zeroizing<String>>,
    pub output: PathBuf,
    pub template: PathBuf,
}

/// Unresolved settings as collected from flags and environment.
///
/// `None` and empty values both mean "not supplied".
#[derive(Clone, Default)]
pub struct Settings {
    pub app: Option<String>,
    pub env: Option<String>,
    pub url: Option<String>,
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub encryption_key: Option<String>,
    pub output: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

impl PullConfig {
    /// Resolve settings into a runnable configuration.
    ///
    /// Settings that are absent or empty take their defaults; url, token
    /// and encryption key have none. Relative paths are resolved against
    /// `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the request URL cannot be parsed.
    pub fn resolve(settings: Settings, cwd: &Path) -> Result<Self> {
        let app = or_default(settings.app, DEFAULT_APP);
        let env = or_default(settings.env, DEFAULT_ENV);
        let endpoint = match non_empty(settings.url) {
            Some(url) => Endpoint::Explicit(url),
            None => Endpoint::Composed {
                base_url: or_default(settings.base_url, DEFAULT_BASE_URL),
                path: or_default(settings.endpoint, DEFAULT_ENDPOINT),
            },
        };
        let url = request_url(&endpoint, &app, &env)?;

        Ok(Self {
            app,
            env,
            url,
            token: non_empty(settings.token).map(Zeroizing::new),
            encryption_key: non_empty(settings.encryption_key).map(Zeroizing::new),
            output: absolute(cwd, path_or_default(settings.output, ENV_FILE)),
            template: absolute(cwd, path_or_default(settings.template, TEMPLATE_FILE)),
        })
    }

    /// Bearer token, if configured.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(String::as_str)
    }

    /// Local decryption key, if configured.
    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption_key.as_deref().map(String::as_str)
    }
}

impl std::fmt::Debug for PullConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullConfig")
            .field("app", &self.app)
            .field("env", &self.env)
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[redacted]"),
            )
            .field("output", &self.output)
            .field("template", &self.template)
            .finish()
    }
}

/// Build the request URL for an endpoint.
///
/// For a composed endpoint one trailing `/` is stripped from the base URL
/// before the path is appended.
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` if the result is not a valid URL.
pub fn request_url(endpoint: &Endpoint, app: &str, env: &str) -> Result<Url> {
    match endpoint {
        Endpoint::Explicit(url) => parse_url(url),
        Endpoint::Composed { base_url, path } => {
            let base = base_url.strip_suffix('/').unwrap_or(base_url);
            let mut url = parse_url(&format!("{}{}", base, path))?;
            url.query_pairs_mut()
                .append_pair("app", app)
                .append_pair("env", env);
            Ok(url)
        }
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| {
        ConfigError::InvalidUrl {
            reason: e.to_string(),
        }
        .into()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| default.to_string())
}

fn path_or_default(value: Option<PathBuf>, default: &str) -> PathBuf {
    value
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(default))
}

fn absolute(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
