//! Operation: inspect `.haul.env`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use haul_core::config::Manifest;
use haul_core::properties::load_env_file;
use haul_core::ENV_FILE;

/// Entries of the `.haul.env` that applies to `cwd`.
pub struct EnvListing {
    pub path: PathBuf,
    pub entries: BTreeMap<String, String>,
}

/// Read the `.haul.env` next to the nearest `Haul.toml`, or in `cwd` when
/// there is no manifest.
pub fn list_env(cwd: &Path) -> miette::Result<EnvListing> {
    let dir = Manifest::find(cwd)
        .and_then(|manifest| manifest.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.to_path_buf());
    let path = dir.join(ENV_FILE);
    let entries = load_env_file(&path)?;
    Ok(EnvListing { path, entries })
}

/// Mask a secret for display, keeping a short prefix of long values.
pub fn mask(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "********".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}********")
}
