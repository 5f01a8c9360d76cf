//! The publish pipeline: validate, locate, upload, grant.
//!
//! [`ArtifactPublisher::publish`] runs the stages strictly in order and stops
//! at the first failure. Nothing is retried and nothing is rolled back: an
//! ACL failure leaves the uploaded object in place and says so through
//! [`PublishError::AclGrantFailure`].

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PublishError;
use crate::grants::filter_principals;
use crate::path::{normalize, ObjectKey};
use crate::progress::{ProgressEvent, ProgressObserver, ProgressReader, ProgressTracker};
use crate::store::{ObjectStore, StoreError};

/// Everything needed to publish one artifact.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub bucket: String,
    pub region: String,
    /// Key prefix; normalized before use.
    pub path: String,
    pub artifact: PathBuf,
    /// Principals granted read access after the upload.
    pub canonical_ids: Vec<String>,
    pub show_progress: bool,
}

impl PublishRequest {
    /// Check that bucket, region and path are present.
    pub fn validate(&self) -> Result<(), PublishError> {
        let required = [
            (&self.bucket, "Bucket", "s3.bucket"),
            (&self.region, "Region", "s3.region"),
            (&self.path, "Path", "s3.path"),
        ];
        for (value, field, property) in required {
            if value.trim().is_empty() {
                return Err(PublishError::ConfigurationInvalid { field, property });
            }
        }
        Ok(())
    }

    /// The normalized key prefix.
    pub fn prefix(&self) -> String {
        normalize(&self.path)
    }

    /// Key the artifact will be stored under.
    pub fn object_key(&self) -> Option<ObjectKey> {
        ObjectKey::for_artifact(&self.path, &self.artifact)
    }
}

/// Pipeline stage, as reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    LocateArtifact,
    Upload,
    ApplyAcl,
    Done,
}

/// Result of the pre-I/O stages: what would be uploaded, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    pub bucket: String,
    pub key: ObjectKey,
    pub artifact: PathBuf,
    pub size: u64,
}

/// Run `Validate` and `LocateArtifact` without touching the store.
pub fn plan(request: &PublishRequest) -> Result<PublishPlan, PublishError> {
    tracing::debug!(stage = ?Stage::Validate, "checking publish settings");
    request.validate()?;

    tracing::debug!(stage = ?Stage::LocateArtifact, prefix = %request.prefix(), artifact = %request.artifact.display());
    let size = haul_util::fs::regular_file_len(&request.artifact).ok_or_else(|| {
        PublishError::ArtifactNotFound {
            path: request.artifact.clone(),
        }
    })?;
    let key = request
        .object_key()
        .ok_or_else(|| PublishError::ArtifactNotFound {
            path: request.artifact.clone(),
        })?;

    Ok(PublishPlan {
        bucket: request.bucket.trim().to_string(),
        key,
        artifact: request.artifact.clone(),
        size,
    })
}

/// A completed publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub bucket: String,
    pub key: ObjectKey,
    /// Bytes sent as the object body.
    pub size: u64,
    pub etag: String,
    /// Principals granted read access; empty when the ACL stage was skipped.
    pub granted: Vec<String>,
}

pub type PublishOutcome = Result<PublishReceipt, PublishError>;

/// Publishes artifacts through an injected [`ObjectStore`].
pub struct ArtifactPublisher<S> {
    store: S,
    observer: Option<Arc<ProgressObserver>>,
}

impl<S: ObjectStore> ArtifactPublisher<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            observer: None,
        }
    }

    /// Also deliver progress events to `observer` when progress is requested.
    pub fn with_progress_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        let observer: Arc<ProgressObserver> = Arc::new(observer);
        self.observer = Some(observer);
        self
    }

    /// Publish one artifact. Blocks until the upload and grant finish.
    pub fn publish(&self, request: &PublishRequest) -> PublishOutcome {
        let plan = plan(request)?;
        tracing::info!("Getting artifact: {}", plan.artifact.display());

        let (etag, size) = self.upload(request, &plan)?;
        tracing::info!("Artifact uploaded");

        let granted = self.apply_acl(request, &plan)?;

        tracing::debug!(stage = ?Stage::Done, key = %plan.key);
        tracing::info!("Upload successful");
        Ok(PublishReceipt {
            bucket: plan.bucket,
            key: plan.key,
            size,
            etag,
            granted,
        })
    }

    fn upload(
        &self,
        request: &PublishRequest,
        plan: &PublishPlan,
    ) -> Result<(String, u64), PublishError> {
        tracing::debug!(stage = ?Stage::Upload);
        let transport = |source: StoreError| PublishError::UploadTransportFailure {
            bucket: plan.bucket.clone(),
            key: plan.key.to_string(),
            source,
        };

        let file = File::open(&plan.artifact).map_err(|e| transport(e.into()))?;
        let size = file.metadata().map_err(|e| transport(e.into()))?.len();

        if request.show_progress && size == 0 {
            tracing::info!("Artifact size is 0 bytes, skipping progress logging");
        }
        let body = self.body(file, request.show_progress, size);

        tracing::info!(
            "Uploading artifact to: {}/{} ({size} bytes)",
            plan.bucket,
            plan.key
        );
        let ack = self
            .store
            .put_object(&plan.bucket, plan.key.as_str(), body, size)
            .map_err(transport)?;

        match ack {
            Some(ack) => Ok((ack.etag, size)),
            None => Err(PublishError::UploadRejected {
                bucket: plan.bucket.clone(),
                key: plan.key.to_string(),
            }),
        }
    }

    fn body(&self, file: File, show_progress: bool, size: u64) -> Box<dyn Read + Send> {
        if !show_progress || size == 0 {
            return Box::new(file);
        }
        let mut tracker = ProgressTracker::new(size);
        if let Some(observer) = &self.observer {
            tracker = tracker.with_observer(Arc::clone(observer));
        }
        Box::new(ProgressReader::new(file, Arc::new(tracker)))
    }

    fn apply_acl(
        &self,
        request: &PublishRequest,
        plan: &PublishPlan,
    ) -> Result<Vec<String>, PublishError> {
        if request.canonical_ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(stage = ?Stage::ApplyAcl);

        let principals = filter_principals(&request.canonical_ids);
        if principals.is_empty() {
            tracing::warn!("Skipping ACL update: canonical IDs are empty after trimming");
            return Ok(Vec::new());
        }

        self.store
            .put_object_acl(&plan.bucket, plan.key.as_str(), &principals)
            .map_err(|source| PublishError::AclGrantFailure {
                bucket: plan.bucket.clone(),
                key: plan.key.to_string(),
                source,
            })?;
        tracing::info!("Permissions added for {} principal(s)", principals.len());
        Ok(principals)
    }
}
