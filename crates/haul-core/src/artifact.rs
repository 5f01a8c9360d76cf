//! Where the build left the artifact.

use std::path::{Path, PathBuf};

/// Default build output directory, relative to the manifest.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target";

/// Default artifact extension.
pub const DEFAULT_EXTENSION: &str = "jar";

/// Build-metadata description of the artifact:
/// `output_directory/final_name.extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub output_directory: PathBuf,
    pub final_name: String,
    pub extension: String,
}

impl ArtifactLocation {
    pub fn new(output_directory: impl Into<PathBuf>, final_name: &str, extension: &str) -> Self {
        Self {
            output_directory: output_directory.into(),
            final_name: final_name.trim().to_string(),
            extension: extension.trim().trim_start_matches('.').to_string(),
        }
    }

    /// File name of the artifact, e.g. `app-1.0.jar`.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.final_name.clone()
        } else {
            format!("{}.{}", self.final_name, self.extension)
        }
    }

    /// Full path, with a relative output directory resolved against `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.output_directory).join(self.file_name())
    }
}
