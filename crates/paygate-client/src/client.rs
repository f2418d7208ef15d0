//! The gateway client.

use std::sync::Arc;

use paygate_auth::{FieldEncryptor, ParameterSet, RequestKind, SignedEnvelope, build_envelope};
use paygate_core::{
    Credentials, GatewayConfig, GatewayError, GatewayResult, MissingSignPolicy, RequestEncoding,
};
use tracing::{info, instrument};

use crate::body::encode_body;
use crate::response::{GatewayResponse, verify_response};
use crate::transport::{HttpTransport, Transport};

/// Signs, sends, and verifies gateway calls.
///
/// Cheap to clone; clones share credentials and the transport. All methods
/// take `&self`, so one client can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    credentials: Arc<Credentials>,
    encryptor: Option<Arc<FieldEncryptor>>,
    transport: Arc<dyn Transport>,
    encoding: RequestEncoding,
    missing_sign: MissingSignPolicy,
}

impl GatewayClient {
    /// Build a client with the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfiguration`] if the credentials
    /// carry an issuer public key that cannot be parsed.
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> GatewayResult<Self> {
        let encryptor = credentials
            .rsa_public_key()
            .map(FieldEncryptor::parse)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            credentials: Arc::new(credentials),
            encryptor,
            transport,
            encoding: RequestEncoding::default(),
            missing_sign: MissingSignPolicy::default(),
        })
    }

    /// Build a client over HTTPS from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigurationMissing`] if a required value is
    /// empty, or [`GatewayError::InvalidConfiguration`] if the certificate or
    /// public key cannot be decoded.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let credentials = Credentials::from_config(config)?;
        let transport = HttpTransport::new(&credentials, config.timeout())?;
        Ok(Self::new(credentials, Arc::new(transport))?
            .with_request_encoding(config.request_encoding)
            .with_missing_sign_policy(config.missing_sign))
    }

    /// Set the outbound body encoding.
    #[must_use]
    pub fn with_request_encoding(mut self, encoding: RequestEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the handling of unsigned successful responses.
    #[must_use]
    pub fn with_missing_sign_policy(mut self, missing_sign: MissingSignPolicy) -> Self {
        self.missing_sign = missing_sign;
        self
    }

    /// The credentials this client signs with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign `params` for `kind` without sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingEncryptionKey`] if `kind` needs field
    /// encryption and no issuer key is configured, or
    /// [`GatewayError::Encryption`] if a field cannot be encrypted.
    pub fn build_envelope(
        &self,
        kind: RequestKind,
        params: ParameterSet,
    ) -> GatewayResult<SignedEnvelope> {
        build_envelope(kind, params, &self.credentials, self.encryptor.as_deref())
            .map_err(GatewayError::from)
    }

    /// Sign `params` for `kind`, post them to `url`, and verify the answer.
    ///
    /// A business error reported by the gateway is returned as a normal
    /// response; check [`GatewayResponse::is_error`]. The exact bodies sent
    /// and received are on the response, not in the logs.
    ///
    /// # Errors
    ///
    /// Fails before any network activity if signing fails (see
    /// [`GatewayClient::build_envelope`]). Otherwise returns
    /// [`GatewayError::TransportFailure`], [`GatewayError::EmptyBody`], or
    /// [`GatewayError::SignatureMismatch`].
    #[instrument(skip(self, params), fields(kind = %kind))]
    pub async fn execute(
        &self,
        kind: RequestKind,
        url: &str,
        params: ParameterSet,
    ) -> GatewayResult<GatewayResponse> {
        let envelope = self.build_envelope(kind, params)?;
        let body = encode_body(envelope.params(), self.encoding)?;
        let request_body = body.content.clone();
        info!(url, bytes = request_body.len(), "Sending request");

        let raw = self.transport.post(url, body).await?;
        info!(bytes = raw.len(), "Received response");

        let response = GatewayResponse::parse(kind, request_body, raw)?;
        verify_response(
            &response,
            envelope.policy(),
            self.credentials.key(),
            self.missing_sign,
        )?;
        Ok(response)
    }
}
