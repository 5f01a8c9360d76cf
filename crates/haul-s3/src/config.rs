//! Connection settings for [`crate::S3Client`].

use std::fmt;
use std::time::Duration;

use haul_core::config::DEFAULT_TIMEOUT_SECS;

/// Static access key pair used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"********")
            .finish()
    }
}

/// Where and how to reach the bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub credentials: Credentials,
    /// Custom endpoint such as `http://localhost:9000`; AWS when `None`.
    pub endpoint: Option<String>,
    /// Address buckets as `{endpoint}/{bucket}` instead of `{bucket}.{host}`.
    pub path_style: bool,
    /// Upper bound on a whole request, body included.
    pub timeout: Duration,
}

impl S3Config {
    pub fn new(region: &str, credentials: Credentials) -> Self {
        Self {
            region: region.trim().to_string(),
            credentials,
            endpoint: None,
            path_style: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty());
        self
    }

    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without the bucket.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_regional_aws() {
        let cfg = S3Config::new("eu-west-1", Credentials::new("a", "b"));
        assert_eq!(cfg.endpoint_url(), "https://s3.eu-west-1.amazonaws.com");
    }

    #[test]
    fn custom_endpoint_is_trimmed() {
        let cfg = S3Config::new("us-east-1", Credentials::new("a", "b"))
            .with_endpoint(Some(" http://localhost:9000/ ".to_string()));
        assert_eq!(cfg.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    fn blank_endpoint_falls_back_to_aws() {
        let cfg = S3Config::new("us-east-1", Credentials::new("a", "b"))
            .with_endpoint(Some("  ".to_string()));
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn debug_masks_secret() {
        let creds = Credentials::new("AKID", "topsecret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("AKID"));
        assert!(!rendered.contains("topsecret"));
    }
}
