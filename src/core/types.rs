//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret key name (e.g., DATABASE_URL, API_KEY).
pub type SecretKey = String;

/// The resolved secret set: key name to JSON scalar value.
///
/// Iteration order is not relied upon; output ordering is computed
/// explicitly by the template reconciler.
pub type SecretsMap = serde_json::Map<SecretKey, serde_json::Value>;

/// The raw, unclassified JSON document returned by the secrets API.
pub type SecretsResponse = serde_json::Value;
