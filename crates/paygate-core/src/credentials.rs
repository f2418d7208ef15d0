//! Merchant credentials.
//!
//! [`Credentials`] is built once from a [`GatewayConfig`] and never mutated.
//! It is shared read-only across concurrent calls.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};

/// Immutable merchant credentials.
#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    mch_id: String,
    key: String,
    certificate: Vec<u8>,
    rsa_public_key: Option<String>,
}

impl Credentials {
    /// Create credentials from already-decoded certificate material.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigurationMissing`] naming the first empty field.
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        key: impl Into<String>,
        certificate: Vec<u8>,
    ) -> GatewayResult<Self> {
        let credentials = Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            key: key.into(),
            certificate,
            rsa_public_key: None,
        };

        if credentials.app_id.is_empty() {
            return Err(GatewayError::ConfigurationMissing("app_id"));
        }
        if credentials.mch_id.is_empty() {
            return Err(GatewayError::ConfigurationMissing("mch_id"));
        }
        if credentials.key.is_empty() {
            return Err(GatewayError::ConfigurationMissing("key"));
        }
        if credentials.certificate.is_empty() {
            return Err(GatewayError::ConfigurationMissing("certificate"));
        }

        Ok(credentials)
    }

    /// Build credentials from configuration, decoding the base64 certificate.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigurationMissing`] if a required value is
    /// empty, or [`GatewayError::InvalidConfiguration`] if the certificate is
    /// not valid base64.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        if config.certificate.trim().is_empty() {
            return Err(GatewayError::ConfigurationMissing("certificate"));
        }
        let certificate = BASE64.decode(config.certificate.trim()).map_err(|e| {
            GatewayError::InvalidConfiguration(format!("certificate is not valid base64: {e}"))
        })?;

        let credentials = Self::new(
            config.app_id.clone(),
            config.mch_id.clone(),
            config.key.clone(),
            certificate,
        )?;

        Ok(match &config.rsa_public_key {
            Some(public_key) => credentials.with_rsa_public_key(public_key.clone()),
            None => credentials,
        })
    }

    /// Attach the issuer public key used for field encryption.
    #[must_use]
    pub fn with_rsa_public_key(mut self, public_key: impl Into<String>) -> Self {
        let public_key = public_key.into();
        self.rsa_public_key = (!public_key.trim().is_empty()).then_some(public_key);
        self
    }

    /// Merchant application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Merchant id.
    #[must_use]
    pub fn mch_id(&self) -> &str {
        &self.mch_id
    }

    /// Shared signing key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// PKCS#12 client certificate archive.
    #[must_use]
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// Passphrase that unlocks the certificate archive (the merchant id).
    #[must_use]
    pub fn certificate_passphrase(&self) -> &str {
        &self.mch_id
    }

    /// Issuer public key, if configured.
    #[must_use]
    pub fn rsa_public_key(&self) -> Option<&str> {
        self.rsa_public_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("mch_id", &"<redacted>")
            .field("key", &"<redacted>")
            .field("certificate", &format_args!("<{} bytes>", self.certificate.len()))
            .field("rsa_public_key", &self.rsa_public_key.is_some())
            .finish()
    }
}
