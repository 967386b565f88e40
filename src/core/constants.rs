//! Constants used throughout envpull.
//!
//! Centralizes defaults, environment variable names and crypto parameters.

/// Default application name sent as the `app` query parameter.
pub const DEFAULT_APP: &str = "openweather";

/// Default environment name sent as the `env` query parameter.
pub const DEFAULT_ENV: &str = "dev";

/// Default secrets API base URL.
pub const DEFAULT_BASE_URL: &str = "https://mdp.mon-site.ca";

/// Default secrets API endpoint path.
pub const DEFAULT_ENDPOINT: &str = "/api/secrets";

/// Default output file (.env).
pub const ENV_FILE: &str = ".env";

/// Default template file listing expected keys.
pub const TEMPLATE_FILE: &str = ".env.example";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "ENVPULL_LOG";

/// Length of a derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// scrypt cost parameter as log2(N); N = 16384.
pub const SCRYPT_LOG_N: u8 = 14;

/// scrypt block size.
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelism.
pub const SCRYPT_P: u32 = 1;

/// Maximum number of characters of an error body surfaced to the user.
pub const ERROR_BODY_LIMIT: usize = 300;

/// Prefix of the temporary file written next to the output.
pub const TEMP_FILE_PREFIX: &str = ".tmp-env";

/// Permissions applied to the written env file.
#[cfg(unix)]
pub const ENV_FILE_MODE: u32 = 0o600;
