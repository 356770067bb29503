//! S3 client configuration and creation.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use sf_error::{Error, Result};

use super::http::{build_http_client, HttpSettings};

/// Configuration for S3 access.
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// AWS region override
    pub region: Option<String>,

    /// Custom endpoint URL (on-prem stores, LocalStack)
    pub endpoint: Option<String>,

    /// Credential profile name
    pub profile: Option<String>,

    /// Transport tuning
    pub http: HttpSettings,
}

impl S3Config {
    /// Create a configuration with default transport settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the transport settings.
    pub fn with_http(mut self, http: HttpSettings) -> Self {
        self.http = http;
        self
    }
}

/// Create an S3 client from configuration.
///
/// An endpoint override is validated here; handing the SDK a malformed URL
/// would otherwise fail on the first request instead of before any RPC.
///
/// Path-style addressing is always on: virtual-host addressing breaks
/// against non-AWS endpoints, and AWS accepts both.
pub async fn create_client(config: &S3Config) -> Result<Client> {
    if let Some(endpoint) = &config.endpoint {
        let uri: hyper::Uri = endpoint
            .parse()
            .map_err(|e| Error::Setup(format!("endpoint URL {endpoint}: {e}")))?;
        if uri.scheme().is_none() {
            return Err(Error::Setup(format!(
                "endpoint URL {endpoint} has no scheme"
            )));
        }
    }

    let timeouts = aws_config::timeout::TimeoutConfig::builder()
        .connect_timeout(config.http.connect_timeout)
        .read_timeout(config.http.read_timeout)
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .http_client(build_http_client(&config.http))
        .timeout_config(timeouts);

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    Ok(Client::from_conf(s3_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_config_builder() {
        let config = S3Config::new()
            .with_region("eu-west-1")
            .with_endpoint("http://localhost:4566")
            .with_profile("staging");

        assert_eq!(config.region, Some("eu-west-1".to_string()));
        assert_eq!(config.endpoint, Some("http://localhost:4566".to_string()));
        assert_eq!(config.profile, Some("staging".to_string()));
        assert!(!config.http.insecure_tls);
    }

    #[test]
    fn test_s3_config_default_is_empty() {
        let config = S3Config::default();
        assert!(config.region.is_none());
        assert!(config.endpoint.is_none());
        assert!(config.profile.is_none());
    }

    #[tokio::test]
    async fn test_create_client_rejects_malformed_endpoint() {
        let config = S3Config::new().with_endpoint("not a url");
        let err = create_client(&config).await.unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
    }

    #[tokio::test]
    async fn test_create_client_requires_endpoint_scheme() {
        let config = S3Config::new().with_endpoint("localhost:4566");
        let err = create_client(&config).await.unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }
}
