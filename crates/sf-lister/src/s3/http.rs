//! HTTP client tuning for the S3 transport.
//!
//! The defaults favor many short-lived concurrent requests against one host:
//! tight connect/read timeouts, a large idle pool, and TCP keep-alive.

use aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder;
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use hyper::client::HttpConnector;
use std::sync::Arc;
use std::time::Duration;

/// Transport settings, tuned collectively.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Timeout waiting for response data.
    pub read_timeout: Duration,
    /// How long an idle pooled connection is kept.
    pub idle_conn_timeout: Duration,
    /// TCP keep-alive interval.
    pub keep_alive: Duration,
    /// Idle connections retained per host; must be at least the drain
    /// concurrency to avoid connection churn.
    pub max_idle_per_host: usize,
    /// Accept any TLS certificate.
    pub insecure_tls: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            idle_conn_timeout: Duration::from_secs(30),
            keep_alive: Duration::from_secs(10),
            max_idle_per_host: 100,
            insecure_tls: false,
        }
    }
}

impl HttpSettings {
    /// Settings with certificate verification disabled.
    pub fn insecure() -> Self {
        Self {
            insecure_tls: true,
            ..Default::default()
        }
    }
}

/// Build the SDK HTTP client from the settings.
pub fn build_http_client(settings: &HttpSettings) -> SharedHttpClient {
    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    connector.set_connect_timeout(Some(settings.connect_timeout));
    connector.set_keepalive(Some(settings.keep_alive));

    let mut hyper_builder = hyper::Client::builder();
    hyper_builder
        .pool_idle_timeout(settings.idle_conn_timeout)
        .pool_max_idle_per_host(settings.max_idle_per_host);

    if settings.insecure_tls {
        let tls = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_custom_certificate_verifier(Arc::new(NoCertificateVerification))
            .with_no_client_auth();
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(connector);
        HyperClientBuilder::new()
            .hyper_builder(hyper_builder)
            .build(https)
    } else {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(connector);
        HyperClientBuilder::new()
            .hyper_builder(hyper_builder)
            .build(https)
    }
}

/// Certificate verifier that accepts everything.
struct NoCertificateVerification;

impl rustls::client::ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::Certificate,
        _intermediates: &[rustls::Certificate],
        _server_name: &rustls::ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> std::result::Result<rustls::client::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::ServerCertVerified::assertion())
    }
}
