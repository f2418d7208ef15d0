//! Configuration for the paygate client.
//!
//! All configuration is driven by environment variables with a `PAYGATE_`
//! prefix. Required values that are absent are left empty here and rejected
//! when [`Credentials`](crate::Credentials) are built, so that a misconfigured
//! client fails before any network activity.

use std::fmt;
use std::time::Duration;

/// Default timeout for a single gateway call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Encoding of the outbound request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestEncoding {
    /// `application/x-www-form-urlencoded` key/value pairs.
    #[default]
    Form,
    /// Flat `<xml>` document with one element per field.
    Xml,
}

impl RequestEncoding {
    /// Parse an encoding name (`form` or `xml`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("form") {
            Some(Self::Form)
        } else if value.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else {
            None
        }
    }
}

/// What to do with a successful response that carries no `sign` element.
///
/// The gateway does not sign every response. Historically such responses
/// were accepted unchecked; `Reject` treats them as a signature mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSignPolicy {
    /// Accept the response without verification.
    #[default]
    Skip,
    /// Fail with a signature mismatch.
    Reject,
}

/// Gateway client configuration.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Merchant application id.
    pub app_id: String,
    /// Merchant id. Also the passphrase of the client certificate archive.
    pub mch_id: String,
    /// Shared signing key.
    pub key: String,
    /// Base64-encoded PKCS#12 client certificate archive.
    pub certificate: String,
    /// Issuer RSA public key for field encryption (base64 DER or PEM).
    pub rsa_public_key: Option<String>,
    /// Timeout for a single call, in seconds.
    pub timeout_secs: u64,
    /// Outbound body encoding.
    pub request_encoding: RequestEncoding,
    /// Handling of unsigned successful responses.
    pub missing_sign: MissingSignPolicy,
    /// Log level.
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            mch_id: String::new(),
            key: String::new(),
            certificate: String::new(),
            rsa_public_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_encoding: RequestEncoding::default(),
            missing_sign: MissingSignPolicy::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("app_id", &self.app_id)
            .field("mch_id", &"<redacted>")
            .field("key", &"<redacted>")
            .field("certificate", &format_args!("<{} chars>", self.certificate.len()))
            .field("rsa_public_key", &self.rsa_public_key.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .field("request_encoding", &self.request_encoding)
            .field("missing_sign", &self.missing_sign)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unparseable optional values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("PAYGATE_APP_ID") {
            config.app_id = v;
        }
        if let Some(v) = lookup("PAYGATE_MCH_ID") {
            config.mch_id = v;
        }
        if let Some(v) = lookup("PAYGATE_KEY") {
            config.key = v;
        }
        if let Some(v) = lookup("PAYGATE_CERTIFICATE") {
            config.certificate = v;
        }
        config.rsa_public_key = lookup("PAYGATE_RSA_PUBLIC_KEY").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("PAYGATE_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => tracing::warn!(value = %v, "ignoring invalid PAYGATE_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("PAYGATE_REQUEST_ENCODING") {
            match RequestEncoding::parse(&v) {
                Some(encoding) => config.request_encoding = encoding,
                None => tracing::warn!(value = %v, "ignoring invalid PAYGATE_REQUEST_ENCODING"),
            }
        }
        if let Some(v) = lookup("PAYGATE_REJECT_UNSIGNED") {
            if matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES") {
                config.missing_sign = MissingSignPolicy::Reject;
            }
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Timeout for a single call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.request_encoding, RequestEncoding::Form);
        assert_eq!(config.missing_sign, MissingSignPolicy::Skip);
        assert!(config.rsa_public_key.is_none());
    }

    #[test]
    fn test_should_load_all_variables() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("PAYGATE_APP_ID", "wx123"),
            ("PAYGATE_MCH_ID", "1900000109"),
            ("PAYGATE_KEY", "secret"),
            ("PAYGATE_CERTIFICATE", "AAAA"),
            ("PAYGATE_RSA_PUBLIC_KEY", "BBBB"),
            ("PAYGATE_TIMEOUT_SECS", "5"),
            ("PAYGATE_REQUEST_ENCODING", "XML"),
            ("PAYGATE_REJECT_UNSIGNED", "true"),
        ]));

        assert_eq!(config.app_id, "wx123");
        assert_eq!(config.mch_id, "1900000109");
        assert_eq!(config.key, "secret");
        assert_eq!(config.certificate, "AAAA");
        assert_eq!(config.rsa_public_key.as_deref(), Some("BBBB"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.request_encoding, RequestEncoding::Xml);
        assert_eq!(config.missing_sign, MissingSignPolicy::Reject);
    }

    #[test]
    fn test_should_ignore_invalid_optional_values() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("PAYGATE_TIMEOUT_SECS", "soon"),
            ("PAYGATE_REQUEST_ENCODING", "json"),
            ("PAYGATE_RSA_PUBLIC_KEY", "  "),
        ]));

        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.request_encoding, RequestEncoding::Form);
        assert!(config.rsa_public_key.is_none());
    }

    #[test]
    fn test_should_redact_secrets_in_debug_output() {
        let config = GatewayConfig {
            key: "top-secret-key".to_owned(),
            certificate: "certificate-bytes".to_owned(),
            ..GatewayConfig::default()
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret-key"));
        assert!(!rendered.contains("certificate-bytes"));
        assert!(rendered.contains("<redacted>"));
    }
}
