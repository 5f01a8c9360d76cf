use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::artifact::{ArtifactLocation, DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIRECTORY};

/// Default request timeout for the object store, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// The parsed representation of a `Haul.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub s3: S3Section,
}

/// Build output description from `[artifact]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default, rename = "output-directory")]
    pub output_directory: Option<String>,
    #[serde(default, rename = "final-name")]
    pub final_name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl ArtifactConfig {
    /// The artifact location, or `None` when `final-name` is not set.
    pub fn location(&self) -> Option<ArtifactLocation> {
        let final_name = self.final_name.as_deref().filter(|n| !n.trim().is_empty())?;
        Some(ArtifactLocation::new(
            self.output_directory
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_DIRECTORY),
            final_name,
            self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION),
        ))
    }
}

/// Bucket, credentials and publish options from `[s3]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Section {
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "access-key")]
    pub access_key: Option<String>,
    #[serde(default, rename = "secret-key")]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default, rename = "path-style")]
    pub path_style: bool,
    #[serde(default, rename = "canonical-ids")]
    pub canonical_ids: Vec<String>,
    #[serde(default, rename = "show-progress")]
    pub show_progress: bool,
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Manifest {
    /// Load and parse a `Haul.toml` file from the given path.
    ///
    /// Before parsing, `${env:VAR}` references in the manifest content are
    /// resolved using `.haul.env` (if present alongside `Haul.toml`) and
    /// process environment variables.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            haul_util::errors::HaulError::Manifest {
                message: format!("Failed to read {}: {e}", path.display()),
            }
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars = crate::properties::load_env_file(&dir.join(crate::ENV_FILE))?;
        let resolved = crate::properties::interpolate(&content, &env_vars);

        Self::from_str(&resolved)
    }

    /// Parse a `Haul.toml` from a string (no interpolation).
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            haul_util::errors::HaulError::Manifest {
                message: format!("Failed to parse Haul.toml: {e}"),
            }
            .into()
        })
    }

    /// Find `Haul.toml` in `start` or one of its parents.
    pub fn find(start: &Path) -> Option<PathBuf> {
        haul_util::fs::find_ancestor_with(start, crate::MANIFEST_FILE)
            .map(|dir| dir.join(crate::MANIFEST_FILE))
    }
}
