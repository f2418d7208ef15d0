//! Field-level encryption with the issuer RSA public key.
//!
//! Sensitive values (bank card number, account holder name) are encrypted with
//! RSA PKCS#1 v1.5 padding and base64-encoded before the request is signed, so
//! the signature covers the ciphertext.
//!
//! The issuer key is accepted as PEM (`RSA PUBLIC KEY` or `PUBLIC KEY`) or as
//! base64 of the equivalent DER.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand_core::OsRng;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::error::AuthError;

/// Encrypts field values with the issuer public key.
#[derive(Debug, Clone)]
pub struct FieldEncryptor {
    public_key: RsaPublicKey,
}

impl FieldEncryptor {
    /// Wrap an already-parsed public key.
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Parse the issuer key from PEM or base64 DER, PKCS#1 or SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPublicKey`] if none of the formats parse.
    pub fn parse(encoded: &str) -> Result<Self, AuthError> {
        let encoded = encoded.trim();
        if encoded.contains("-----BEGIN") {
            Self::from_pem(encoded)
        } else {
            Self::from_base64(encoded)
        }
    }

    /// Parse a PEM-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPublicKey`] if the PEM is not an RSA public key.
    pub fn from_pem(pem: &str) -> Result<Self, AuthError> {
        RsaPublicKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
            .map(Self::new)
            .map_err(|e| AuthError::InvalidPublicKey(e.to_string()))
    }

    /// Parse a base64-encoded DER key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPublicKey`] if the text is not base64 or the
    /// DER is not an RSA public key.
    pub fn from_base64(encoded: &str) -> Result<Self, AuthError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let der = BASE64
            .decode(compact)
            .map_err(|e| AuthError::InvalidPublicKey(format!("invalid base64: {e}")))?;

        RsaPublicKey::from_pkcs1_der(&der)
            .or_else(|_| RsaPublicKey::from_public_key_der(&der))
            .map(Self::new)
            .map_err(|e| AuthError::InvalidPublicKey(e.to_string()))
    }

    /// Encrypt `plaintext` and return the base64 ciphertext.
    ///
    /// `field` names the value in errors only.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encryption`] if the value is too long for the key.
    pub fn encrypt_field(&self, field: &str, plaintext: &str) -> Result<String, AuthError> {
        let ciphertext = self
            .public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
            .map_err(|e| AuthError::Encryption {
                field: field.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(BASE64.encode(ciphertext))
    }
}
