//! Expected-keys template (`.env.example`).
//!
//! The template lists which keys must be present and in which order they
//! are written. A missing template file means "no expectations".

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::core::types::{SecretKey, SecretsMap};
use crate::error::{Result, TemplateError};

/// Ordered key names parsed from a template file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    keys: Vec<SecretKey>,
}

impl Template {
    /// Load a template from disk.
    ///
    /// A file that does not exist yields an empty template.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let template = Self::parse(&contents);
                debug!(path = %path.display(), keys = template.len(), "loaded template");
                Ok(template)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no template file");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse template contents.
    ///
    /// Keeps lines of the form `NAME=...` (optionally `NAME =...`); skips
    /// blanks, `#` comments and anything else. Repeated names keep their
    /// first position.
    pub fn parse(contents: &str) -> Self {
        let mut keys: Vec<SecretKey> = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = declared_name(line) {
                if !keys.iter().any(|k| k == name) {
                    keys.push(name.to_string());
                }
            }
        }

        Self { keys }
    }

    /// Expected keys in template order.
    pub fn keys(&self) -> &[SecretKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check completeness and compute the output key order.
    ///
    /// Template keys come first in template order, followed by the remaining
    /// secret keys sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::MissingSecretKeys` naming every template key
    /// absent from `secrets`.
    pub fn reconcile(&self, secrets: &SecretsMap) -> Result<Vec<SecretKey>> {
        let missing: Vec<SecretKey> = self
            .keys
            .iter()
            .filter(|k| !secrets.contains_key(k.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TemplateError::MissingSecretKeys(missing).into());
        }

        let mut extra: Vec<SecretKey> = secrets
            .keys()
            .filter(|k| !self.keys.contains(k))
            .cloned()
            .collect();
        extra.sort();

        let mut ordered = self.keys.clone();
        ordered.extend(extra);
        Ok(ordered)
    }
}

/// Leading `NAME` of a `NAME=...` line.
///
/// NAME is an ASCII letter or underscore followed by letters, digits or
/// underscores; only whitespace may separate it from `=`.
fn declared_name(line: &str) -> Option<&str> {
    let first = line.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }

    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    let (name, rest) = line.split_at(end);

    rest.trim_start().starts_with('=').then_some(name)
}
