use crate::config::{BrpConfig, TlsVerification};
use crate::errors::{AppError, LookupError};
use crate::stuf_message::{CONTENT_TYPE as STUF_CONTENT_TYPE, SOAP_ACTION};
use reqwest::header;
use std::time::Duration;

/// Client for the StUF 0204 synchronous service of the population register.
///
/// Holds one mutual-TLS session configuration which is reused, read-only,
/// for every message sent through it.
#[derive(Clone)]
pub struct StufClient {
    client: reqwest::Client,
    endpoint: String,
}

impl StufClient {
    /// Creates a new `StufClient` from the register configuration.
    ///
    /// Reads the client certificate (certificate and private key in one PEM
    /// file) and, when configured, the CA bundle used to verify the register.
    ///
    /// # Arguments
    ///
    /// * `config` - Register endpoint, certificate paths and request timeout.
    ///
    /// # Returns
    ///
    /// * `Result<Self, AppError>` - The client, or a `Config` error for
    ///   unreadable files and a `Tls` error for unusable certificate material.
    pub async fn new(config: &BrpConfig) -> Result<Self, AppError> {
        let pem = tokio::fs::read(&config.client_certificate).await.map_err(|e| {
            AppError::Config(format!(
                "Failed to read client certificate {}: {}",
                config.client_certificate.display(),
                e
            ))
        })?;
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| AppError::Tls(format!("Invalid client certificate: {}", e)))?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(config.timeout);

        builder = match &config.tls_verification {
            TlsVerification::Disabled => {
                tracing::warn!("TLS verification of the BRP endpoint is disabled");
                builder.danger_accept_invalid_certs(true)
            }
            TlsVerification::SystemRoots => builder,
            TlsVerification::CaBundle(path) => {
                let ca = tokio::fs::read(path).await.map_err(|e| {
                    AppError::Config(format!("Failed to read CA bundle {}: {}", path.display(), e))
                })?;
                let certificate = reqwest::Certificate::from_pem(&ca)
                    .map_err(|e| AppError::Tls(format!("Invalid CA bundle: {}", e)))?;
                builder
                    .tls_built_in_root_certs(false)
                    .add_root_certificate(certificate)
            }
        };

        let client = builder
            .build()
            .map_err(|e| AppError::Tls(format!("Failed to create BRP client: {}", e)))?;

        Ok(Self::with_http_client(client, config.endpoint()))
    }

    /// Wraps an already configured HTTP client.
    pub fn with_http_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Plain client without certificate, for endpoints that do not require one.
    pub fn plain(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Tls(format!("Failed to create BRP client: {}", e)))?;
        Ok(Self::with_http_client(client, endpoint))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one question message and returns the raw answer.
    ///
    /// Exactly one round trip, no retries.
    ///
    /// # Arguments
    ///
    /// * `message` - The complete SOAP envelope to post.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<u8>, LookupError>` - The answer body. Any network, TLS or
    ///   timeout failure and any non-success status is a
    ///   [`LookupError::Transport`].
    pub async fn send(&self, message: String) -> Result<Vec<u8>, LookupError> {
        tracing::debug!(
            "Posting StUF message ({} bytes) to {}",
            message.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, STUF_CONTENT_TYPE)
            .header("SOAPAction", SOAP_ACTION)
            .body(message)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("BRP request failed: {}", e);
                LookupError::Transport
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("BRP returned status {}", status);
            return Err(LookupError::Transport);
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read BRP response: {}", e);
            LookupError::Transport
        })?;

        Ok(body.to_vec())
    }
}
