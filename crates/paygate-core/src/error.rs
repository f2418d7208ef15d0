//! Error types for paygate.

use std::fmt;

/// Boxed error from the underlying network or TLS stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a client or executing a gateway call.
///
/// Every variant is terminal for the call; nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required credential was absent at construction.
    #[error("missing required configuration: {0}")]
    ConfigurationMissing(&'static str),

    /// A configured value could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The caller's parameters cannot be put on the wire.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request kind requires field encryption but no issuer public key is configured.
    #[error("field encryption required but no issuer public key is configured")]
    MissingEncryptionKey,

    /// Encrypting a designated field failed.
    #[error("field encryption failed: {0}")]
    Encryption(String),

    /// The gateway returned no content.
    #[error("response body is empty")]
    EmptyBody,

    /// The recomputed response signature does not match the provided one,
    /// or the response could not be decoded unambiguously.
    #[error("response signature check failed: {reason}")]
    SignatureMismatch {
        /// What failed.
        reason: String,
    },

    /// The network call or TLS setup failed.
    #[error("transport failure: {0}")]
    TransportFailure(#[source] BoxError),
}

/// Failure category of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`GatewayError::ConfigurationMissing`].
    ConfigurationMissing,
    /// See [`GatewayError::InvalidConfiguration`].
    InvalidConfiguration,
    /// See [`GatewayError::InvalidRequest`].
    InvalidRequest,
    /// See [`GatewayError::MissingEncryptionKey`].
    MissingEncryptionKey,
    /// See [`GatewayError::Encryption`].
    Encryption,
    /// See [`GatewayError::EmptyBody`].
    EmptyBody,
    /// See [`GatewayError::SignatureMismatch`].
    SignatureMismatch,
    /// See [`GatewayError::TransportFailure`].
    TransportFailure,
}

impl GatewayError {
    /// The failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::MissingEncryptionKey => ErrorKind::MissingEncryptionKey,
            Self::Encryption(_) => ErrorKind::Encryption,
            Self::EmptyBody => ErrorKind::EmptyBody,
            Self::SignatureMismatch { .. } => ErrorKind::SignatureMismatch,
            Self::TransportFailure(_) => ErrorKind::TransportFailure,
        }
    }

    /// Build a [`GatewayError::SignatureMismatch`].
    #[must_use]
    pub fn signature_mismatch(reason: impl fmt::Display) -> Self {
        Self::SignatureMismatch {
            reason: reason.to_string(),
        }
    }

    /// Wrap a network or TLS error.
    #[must_use]
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::TransportFailure(err.into())
    }
}

/// Convenience result type for paygate operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_each_variant_to_its_kind() {
        let cases = [
            (GatewayError::ConfigurationMissing("key"), ErrorKind::ConfigurationMissing),
            (GatewayError::InvalidRequest("bad name".into()), ErrorKind::InvalidRequest),
            (GatewayError::MissingEncryptionKey, ErrorKind::MissingEncryptionKey),
            (GatewayError::EmptyBody, ErrorKind::EmptyBody),
            (GatewayError::signature_mismatch("sign differs"), ErrorKind::SignatureMismatch),
            (GatewayError::transport("connection reset"), ErrorKind::TransportFailure),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn test_should_keep_transport_source() {
        let err = GatewayError::transport(std::io::Error::other("tls handshake failed"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("tls handshake failed"));
    }
}
