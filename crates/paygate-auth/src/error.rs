//! Error types for request signing and response verification.

use paygate_core::GatewayError;

/// Errors that can occur while signing, encrypting, or verifying.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A policy requires field encryption but no issuer public key is available.
    #[error("Missing issuer public key for field encryption")]
    MissingEncryptionKey,

    /// The issuer public key could not be parsed.
    #[error("Invalid issuer public key: {0}")]
    InvalidPublicKey(String),

    /// RSA encryption of a field failed.
    #[error("Failed to encrypt field {field}: {reason}")]
    Encryption {
        /// The field being encrypted.
        field: String,
        /// The underlying failure.
        reason: String,
    },

    /// The `sign` field is absent or empty.
    #[error("Missing signature")]
    MissingSignature,

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The `sign_type` value is not one of the supported algorithms.
    #[error("Unsupported sign type: {0}")]
    UnsupportedSignType(String),
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingEncryptionKey => Self::MissingEncryptionKey,
            AuthError::InvalidPublicKey(reason) => {
                Self::InvalidConfiguration(format!("issuer public key: {reason}"))
            }
            err @ AuthError::Encryption { .. } => Self::Encryption(err.to_string()),
            err @ (AuthError::MissingSignature
            | AuthError::SignatureDoesNotMatch
            | AuthError::UnsupportedSignType(_)) => Self::signature_mismatch(err),
        }
    }
}
