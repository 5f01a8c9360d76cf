//! Key prefix normalization and object key derivation.

use std::fmt;
use std::path::Path;

/// Canonicalize a key prefix: forward slashes only, no surrounding
/// whitespace, exactly one trailing slash.
///
/// ```
/// use haul_core::path::normalize;
///
/// assert_eq!(normalize(" releases\\1.0 "), "releases/1.0/");
/// assert_eq!(normalize("folder//"), "folder/");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut normalized = raw.trim().replace('\\', "/");
    normalized.truncate(normalized.trim_end_matches('/').len());
    normalized.push('/');
    normalized
}

/// Full key an artifact is stored under: normalized prefix + file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build the key for `file_name` under `prefix`. The prefix is normalized
    /// on every call, so the key always tracks the current inputs.
    pub fn new(prefix: &str, file_name: &str) -> Self {
        Self(format!("{}{file_name}", normalize(prefix)))
    }

    /// Build the key for the file at `artifact`, or `None` if the path has
    /// no final component (`/`, `..`) or the name is not valid UTF-8.
    pub fn for_artifact(prefix: &str, artifact: &Path) -> Option<Self> {
        let name = artifact.file_name()?.to_str()?;
        Some(Self::new(prefix, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
