//! The object store seam the publisher talks to.
//!
//! `haul-s3` provides the real implementation; tests plug in doubles.

use std::io::Read;

use miette::Diagnostic;
use thiserror::Error;

/// Confirmation returned by a successful put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutAck {
    /// Entity tag the store assigned to the new object.
    pub etag: String,
}

/// Failure reported by an [`ObjectStore`] call.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// Reading the request body failed.
    #[error("failed to read upload body: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store answered with an error status.
    #[error("{code} (HTTP {status}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },
}

/// Object storage operations needed to publish one artifact.
pub trait ObjectStore {
    /// Upload `body` as `bucket/key`. `content_length` is the exact number of
    /// bytes `body` yields.
    ///
    /// `Ok(None)` means the store answered without confirming the write.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Box<dyn Read + Send>,
        content_length: u64,
    ) -> Result<Option<PutAck>, StoreError>;

    /// Grant read access on `bucket/key` to every principal in `read_grants`,
    /// as a single request.
    fn put_object_acl(&self, bucket: &str, key: &str, read_grants: &[String])
        -> Result<(), StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Box<dyn Read + Send>,
        content_length: u64,
    ) -> Result<Option<PutAck>, StoreError> {
        (**self).put_object(bucket, key, body, content_length)
    }

    fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        read_grants: &[String],
    ) -> Result<(), StoreError> {
        (**self).put_object_acl(bucket, key, read_grants)
    }
}
