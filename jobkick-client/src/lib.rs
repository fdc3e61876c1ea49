//! Jobkick HTTP Client
//!
//! A small HTTP client for the remote job queue service. It knows two calls:
//!
//! - claim: `GET {base}/jobs/{queue}/ack` returns the next job identifier
//! - trigger: `GET {base}/jobs/{job_id}/run` asks the service to run it
//!
//! # Example
//!
//! ```no_run
//! use jobkick_client::{ClaimOutcome, ClientOptions, QueueClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QueueClient::new("https://localhost", &ClientOptions::default())?;
//!
//!     if let ClaimOutcome::Job(job_id) = client.claim_job("default").await? {
//!         let status = client.trigger_job(&job_id).await?;
//!         println!("job {} dispatched ({})", job_id, status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod job;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use job::{ClaimOutcome, JobId};
pub use reqwest::StatusCode;

use reqwest::Client;
use std::time::Duration;

/// Transport settings shared by every call made through a [`QueueClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound for a single request, from connect to the end of the body
    pub timeout: Duration,
    /// Skip TLS certificate verification (self-signed development endpoints only)
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// HTTP client for the job queue service
///
/// Cloning is cheap: the underlying connection pool is shared, so one client
/// built at startup can be handed to every worker.
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Base URL of the queue service, without trailing slash
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// Builds a `reqwest::Client` with the configured timeout and TLS mode.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the queue service (e.g., "https://localhost")
    /// * `options` - Timeout and TLS settings
    pub fn new(base_url: impl Into<String>, options: &ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().timeout(options.timeout);

        if options.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure proxies, headers, connection pooling, etc.
    ///
    /// # Example
    /// ```
    /// use jobkick_client::QueueClient;
    /// use reqwest::Client;
    ///
    /// let client = QueueClient::with_client("http://localhost:8080/", Client::new());
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the queue service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = QueueClient::new("http://localhost:8080", &ClientOptions::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slashes() {
        let client = QueueClient::new("https://localhost//", &ClientOptions::default()).unwrap();
        assert_eq!(client.base_url(), "https://localhost");
    }

    #[test]
    fn test_insecure_client_builds() {
        let options = ClientOptions {
            timeout: Duration::from_secs(5),
            accept_invalid_certs: true,
        };
        assert!(QueueClient::new("https://localhost", &options).is_ok());
    }

    /// Starts an HTTPS server on 127.0.0.1 with a freshly generated
    /// self-signed certificate; every request gets `body` back with a 200
    async fn serve_self_signed(body: &'static str) -> String {
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio_rustls::TlsAcceptor;
        use tokio_rustls::rustls::ServerConfig;
        use tokio_rustls::rustls::crypto::ring;
        use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
                .unwrap();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    // Handshakes from verifying clients fail here
                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };

                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match tls.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = tls.write_all(response.as_bytes()).await;
                    let _ = tls.shutdown().await;
                });
            }
        });

        format!("https://{}", addr)
    }

    #[tokio::test]
    async fn test_insecure_client_accepts_self_signed_certificate() {
        let uri = serve_self_signed("job-42").await;
        let options = ClientOptions {
            timeout: Duration::from_secs(5),
            accept_invalid_certs: true,
        };
        let client = QueueClient::new(uri, &options).unwrap();

        let outcome = client.claim_job("default").await.unwrap();
        assert_eq!(outcome, ClaimOutcome::Job(JobId::parse("job-42").unwrap()));
    }

    #[tokio::test]
    async fn test_verifying_client_rejects_self_signed_certificate() {
        let uri = serve_self_signed("job-42").await;
        let options = ClientOptions {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let client = QueueClient::new(uri, &options).unwrap();

        let err = client.claim_job("default").await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_default_options_verify_certificates() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(!options.accept_invalid_certs);
    }
}
