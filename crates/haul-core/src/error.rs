//! Publish failure taxonomy.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::store::StoreError;

/// Why a publish did not complete.
#[derive(Debug, Error, Diagnostic)]
pub enum PublishError {
    /// A required setting is blank. Raised before any I/O.
    #[error("{field} is required ({property})")]
    #[diagnostic(
        code(haul::configuration_invalid),
        help("Set it in the [s3] section of Haul.toml or pass it on the command line")
    )]
    ConfigurationInvalid {
        field: &'static str,
        property: &'static str,
    },

    /// The artifact is not a file on disk. Raised before any network call.
    #[error("Artifact not found: {}", path.display())]
    #[diagnostic(
        code(haul::artifact_not_found),
        help("Build the project first, or check [artifact] in Haul.toml")
    )]
    ArtifactNotFound { path: PathBuf },

    /// The store answered the put without confirming it.
    #[error("{key} not uploaded to {bucket}: no acknowledgment from the store")]
    #[diagnostic(code(haul::upload_rejected))]
    UploadRejected { bucket: String, key: String },

    /// The put call failed.
    #[error("{key} not uploaded to {bucket}")]
    #[diagnostic(code(haul::upload_failed))]
    UploadTransportFailure {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },

    /// The object was uploaded but granting read access failed.
    #[error("{key} uploaded to {bucket} but granting read access failed")]
    #[diagnostic(
        code(haul::acl_grant_failed),
        help("The object is in the bucket; grant access manually or re-run the publish")
    )]
    AclGrantFailure {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },
}

impl PublishError {
    /// `false` for failures raised before any store call.
    pub fn upload_attempted(&self) -> bool {
        !matches!(
            self,
            Self::ConfigurationInvalid { .. } | Self::ArtifactNotFound { .. }
        )
    }

    /// `true` when the object is in the bucket despite the failure.
    pub fn object_uploaded(&self) -> bool {
        matches!(self, Self::AclGrantFailure { .. })
    }
}
