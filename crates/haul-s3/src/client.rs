//! Blocking S3 client.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::Utc;
use reqwest::blocking::{Body, Client, Response};
use reqwest::header::{AUTHORIZATION, ETAG};
use reqwest::Method;
use url::Url;

use haul_core::store::{ObjectStore, PutAck, StoreError};
use haul_util::errors::HaulError;

use crate::acl::{grant_read_value, GRANT_READ_HEADER};
use crate::config::S3Config;
use crate::error::service_error;
use crate::sign::{self, CanonicalRequest, EMPTY_PAYLOAD_SHA256, UNSIGNED_PAYLOAD};

/// Talks to one S3 endpoint with one set of credentials.
#[derive(Debug)]
pub struct S3Client {
    config: S3Config,
    http: Client,
}

impl S3Client {
    /// Build a client. The request timeout from `config` bounds each call.
    pub fn new(config: S3Config) -> miette::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("haul/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HaulError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    /// URL addressing `key` in `bucket`, virtual-hosted or path-style.
    ///
    /// Keys with a `.` or `..` segment are refused: URL parsing resolves
    /// those segments (even percent-encoded), so the request would land on
    /// a different object.
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url, StoreError> {
        if key.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(StoreError::Transport {
                message: format!("Object key {key} cannot be addressed"),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "key contains a `.` or `..` path segment",
                )),
            });
        }
        let endpoint = self.config.endpoint_url();
        let endpoint = endpoint.trim_end_matches('/');
        let key = sign::uri_encode(key, true);
        let raw = if self.config.path_style {
            format!("{endpoint}/{}/{key}", sign::uri_encode(bucket, false))
        } else {
            let (scheme, host) = endpoint.split_once("://").unwrap_or(("https", endpoint));
            format!("{scheme}://{bucket}.{host}/{key}")
        };
        Url::parse(&raw).map_err(|e| StoreError::Transport {
            message: format!("Invalid object URL {raw}"),
            source: Box::new(e),
        })
    }

    fn send(
        &self,
        method: Method,
        url: Url,
        canonical_query: &str,
        mut headers: BTreeMap<String, String>,
        payload_hash: &str,
        body: Body,
    ) -> Result<Response, StoreError> {
        let now = Utc::now();
        headers.insert("host".to_string(), host_header(&url)?);
        headers.insert("x-amz-date".to_string(), sign::amz_date(now));
        headers.insert(
            "x-amz-content-sha256".to_string(),
            payload_hash.to_string(),
        );

        let authorization = sign::authorization(
            &self.config.credentials,
            &self.config.region,
            now,
            &CanonicalRequest {
                method: method.as_str(),
                uri: url.path(),
                query: canonical_query,
                headers: &headers,
                payload_hash,
            },
        );

        let target = format!("{method} {url}");
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, authorization);
        // reqwest derives Host from the URL; it is only needed for signing.
        for (name, value) in headers.iter().filter(|(name, _)| *name != "host") {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(body)
            .send()
            .map_err(|e| StoreError::Transport {
                message: format!("{target} failed"),
                source: Box::new(e),
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("{target} -> {status}");
            Ok(response)
        } else {
            let text = response.text().unwrap_or_default();
            tracing::debug!("{target} -> {status}: {text}");
            Err(service_error(status, &text))
        }
    }
}

impl ObjectStore for S3Client {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Box<dyn Read + Send>,
        content_length: u64,
    ) -> Result<Option<PutAck>, StoreError> {
        let url = self.object_url(bucket, key)?;
        let mut headers = BTreeMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/octet-stream".to_string(),
        );

        let response = self.send(
            Method::PUT,
            url,
            "",
            headers,
            UNSIGNED_PAYLOAD,
            Body::sized(body, content_length),
        )?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string())
            .filter(|v| !v.is_empty());
        Ok(etag.map(|etag| PutAck { etag }))
    }

    fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        read_grants: &[String],
    ) -> Result<(), StoreError> {
        let mut url = self.object_url(bucket, key)?;
        url.set_query(Some("acl"));
        let mut headers = BTreeMap::new();
        headers.insert(
            GRANT_READ_HEADER.to_string(),
            grant_read_value(read_grants),
        );

        self.send(
            Method::PUT,
            url,
            "acl=",
            headers,
            EMPTY_PAYLOAD_SHA256,
            Body::from(Vec::<u8>::new()),
        )?;
        Ok(())
    }
}

fn host_header(url: &Url) -> Result<String, StoreError> {
    let host = url.host_str().ok_or_else(|| StoreError::Transport {
        message: format!("Invalid object URL {url}"),
        source: Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "URL has no host",
        )),
    })?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
