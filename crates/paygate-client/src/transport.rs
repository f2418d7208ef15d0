//! Network transport for gateway calls.

use std::time::Duration;

use async_trait::async_trait;
use paygate_core::{Credentials, GatewayError, GatewayResult};
use reqwest::{Client, Identity, header};
use tracing::{debug, instrument};

use crate::body::WireBody;

/// Sends an encoded request and returns the raw response body.
///
/// Implementations must be safe to share across tasks; the client calls
/// `post` concurrently from many `execute` futures.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// POST `body` to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportFailure`] on network, TLS, timeout,
    /// or non-success HTTP status.
    async fn post(&self, url: &str, body: WireBody) -> GatewayResult<String>;
}

/// HTTPS transport presenting the merchant's client certificate.
///
/// Holds one pooled reqwest client for its whole lifetime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from the certificate archive in `credentials`.
    ///
    /// The archive is opened with the merchant id as passphrase. `timeout`
    /// bounds each call end to end.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfiguration`] if the archive cannot
    /// be opened, or [`GatewayError::TransportFailure`] if the TLS backend
    /// fails to initialize.
    pub fn new(credentials: &Credentials, timeout: Duration) -> GatewayResult<Self> {
        let identity =
            Identity::from_pkcs12_der(credentials.certificate(), credentials.certificate_passphrase())
                .map_err(|e| {
                    GatewayError::InvalidConfiguration(format!("client certificate: {e}"))
                })?;

        let client = Client::builder()
            .identity(identity)
            .timeout(timeout)
            .build()
            .map_err(GatewayError::transport)?;

        debug!(timeout_ms = timeout.as_millis(), "Built certificate-authenticated HTTP client");
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client, e.g. one with a proxy configured.
    ///
    /// The client must already carry the merchant identity.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(bytes = body.content.len()))]
    async fn post(&self, url: &str, body: WireBody) -> GatewayResult<String> {
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, body.content_type)
            .body(body.content)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        let status = response.status();
        let text = response.text().await.map_err(GatewayError::transport)?;
        debug!(status = status.as_u16(), bytes = text.len(), "Gateway responded");

        if !status.is_success() {
            return Err(GatewayError::transport(format!(
                "gateway returned HTTP {status}"
            )));
        }
        Ok(text)
    }
}
