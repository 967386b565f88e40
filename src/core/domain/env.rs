//! Env type.
//!
//! An ordered set of `KEY=value` lines and the crash-safe writer that puts
//! them on disk.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::TEMP_FILE_PREFIX;
use crate::core::types::{SecretKey, SecretsMap};
use crate::error::{Result, WriteError};

/// A rendered .env file
#[derive(Debug, Clone)]
pub struct Env {
    entries: Vec<(SecretKey, String)>,
    path: PathBuf,
}

impl Env {
    /// Create from raw key-value pairs
    pub fn from_pairs(pairs: Vec<(String, String)>, path: PathBuf) -> Self {
        Self {
            entries: pairs,
            path,
        }
    }

    /// Build entries for `keys`, in order, from the resolved secrets.
    ///
    /// Keys absent from `secrets` render as empty values.
    pub fn from_secrets(keys: &[SecretKey], secrets: &SecretsMap, path: PathBuf) -> Self {
        let entries = keys
            .iter()
            .map(|key| (key.clone(), value_to_string(secrets.get(key))))
            .collect();
        Self::from_pairs(entries, path)
    }

    /// Write the env file to disk atomically.
    ///
    /// Content goes to a temporary file next to the destination, created
    /// with owner-only permissions and synced, then renamed over the
    /// destination. The destination therefore holds either the previous
    /// content or the new content, never a mix.
    ///
    /// # Errors
    ///
    /// Returns `WriteError::TempFile` if the temporary file cannot be
    /// written, or `WriteError::Rename` if it cannot be moved into place.
    pub fn save(&self) -> Result<()> {
        let content = Zeroizing::new(self.to_env_string());
        let tmp_path = temp_path_for(&self.path);
        debug!(tmp = %tmp_path.display(), "writing temporary env file");

        if let Err(source) = write_private(&tmp_path, content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(WriteError::TempFile {
                path: tmp_path,
                source,
            }
            .into());
        }

        if let Err(source) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(WriteError::Rename {
                path: self.path.clone(),
                source,
            }
            .into());
        }
        debug!(path = %self.path.display(), "env file moved into place");

        restrict_permissions(&self.path);
        Ok(())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize to .env format string
    ///
    /// Lines are joined with `\n` and the file always ends with one, so an
    /// empty set renders as a single blank line.
    fn to_env_string(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}={}", key, format_value(value)))
            .collect();

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

/// Format a value for the right-hand side of `KEY=value`.
///
/// Values made only of `[A-Za-z0-9_./:@%+,-]` (including the empty string)
/// are written bare; anything else is written as a JSON string literal.
pub fn format_value(value: &str) -> String {
    if value.chars().all(is_safe_char) {
        return value.to_string();
    }
    // Serializing a str cannot fail
    serde_json::to_string(value).unwrap_or_default()
}

fn is_safe_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '/' | ':' | '@' | '%' | '+' | ',' | '-')
}

/// Coerce a JSON value to its env-file text.
///
/// Strings are taken verbatim and null or absent becomes empty. Integral
/// floats drop their fraction (`1.0` is written `1`). Every other value
/// uses its compact JSON text.
pub fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_to_string(n),
        Some(other) => other.to_string(),
    }
}

fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

/// Temporary path in the same directory as `target`.
///
/// Named `.tmp-env-<pid>-<unix millis>` so concurrent invocations do not
/// collide.
fn temp_path_for(target: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let name = format!("{}-{}-{}", TEMP_FILE_PREFIX, std::process::id(), millis);

    match target.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Exclusively create `path` with owner-only permissions, write and sync.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(crate::core::constants::ENV_FILE_MODE);
    }

    let mut file: File = options.open(path)?;
    restrict_file_permissions(&file)?;
    file.write_all(content)?;
    file.flush()?;
    file.sync_all()
}

/// Re-apply owner-only permissions on an open file, ignoring the umask.
#[cfg(unix)]
fn restrict_file_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(
        crate::core::constants::ENV_FILE_MODE,
    ))
}

#[cfg(not(unix))]
fn restrict_file_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

/// Best-effort chmod 600 on the final path.
///
/// Failure (e.g. a filesystem without POSIX modes) is logged, not returned.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(
        path,
        fs::Permissions::from_mode(crate::core::constants::ENV_FILE_MODE),
    ) {
        tracing::warn!(path = %path.display(), error = %e, "could not restrict env file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_env_string())
    }
}
