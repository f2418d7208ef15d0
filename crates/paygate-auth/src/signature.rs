//! Signature computation and comparison.
//!
//! Two digests are in use, selected per endpoint by the policy table and never
//! negotiated from a response:
//!
//! - `MD5`: `UPPER(HEX(MD5(canonical)))`
//! - `HMAC-SHA256`: `UPPER(HEX(HMAC-SHA256(signing_key, canonical)))`
//!
//! Comparison uppercases both sides and runs in constant time.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, KeyInit, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{SIGN_FIELD, canonicalize};
use crate::error::AuthError;
use crate::params::ParameterSet;

type HmacSha256 = Hmac<Sha256>;

/// Signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignType {
    /// Plain MD5 digest of the canonical string.
    Md5,
    /// HMAC-SHA256 of the canonical string keyed with the signing key.
    HmacSha256,
}

impl SignType {
    /// Wire name carried in the `sign_type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MD5" => Ok(Self::Md5),
            "HMAC-SHA256" => Ok(Self::HmacSha256),
            other => Err(AuthError::UnsupportedSignType(other.to_owned())),
        }
    }
}

/// Sign a canonical string, returning uppercase hex.
///
/// # Examples
///
/// ```
/// use paygate_auth::{SignType, sign};
///
/// let signature = sign("a=1&c=3&key=K", SignType::Md5, "K");
/// assert_eq!(signature, "0BFA118FE1219E73B897EFB684BAFCF8");
/// ```
#[must_use]
pub fn sign(canonical: &str, sign_type: SignType, key: &str) -> String {
    match sign_type {
        SignType::Md5 => hex::encode_upper(Md5::digest(canonical.as_bytes())),
        SignType::HmacSha256 => hex::encode_upper(hmac_sha256(key.as_bytes(), canonical.as_bytes())),
    }
}

/// Compare a candidate signature against a computed one.
///
/// Both are uppercased first; the comparison itself is constant-time.
#[must_use]
pub fn verify(candidate: &str, computed: &str) -> bool {
    let candidate = candidate.to_ascii_uppercase();
    let computed = computed.to_ascii_uppercase();
    candidate.as_bytes().ct_eq(computed.as_bytes()).into()
}

/// Canonicalize and sign a parameter set.
#[must_use]
pub fn sign_parameters(
    params: &ParameterSet,
    sign_type: SignType,
    exclude_sign_type: bool,
    key: &str,
) -> String {
    let canonical = canonicalize(params, exclude_sign_type, key);
    debug!(
        fields = params.len(),
        sign_type = %sign_type,
        exclude_sign_type,
        "Signing canonical string"
    );
    sign(&canonical, sign_type, key)
}

/// Verify the `sign` field of a parameter set against its own contents.
///
/// # Errors
///
/// Returns [`AuthError::MissingSignature`] if `sign` is absent or empty, or
/// [`AuthError::SignatureDoesNotMatch`] if the recomputed signature differs.
pub fn verify_parameters(
    params: &ParameterSet,
    sign_type: SignType,
    exclude_sign_type: bool,
    key: &str,
) -> Result<(), AuthError> {
    let provided = params
        .get_non_empty(SIGN_FIELD)
        .ok_or(AuthError::MissingSignature)?;

    let expected = sign_parameters(params, sign_type, exclude_sign_type, key);

    if verify(provided, &expected) {
        debug!(sign_type = %sign_type, "Signature verification succeeded");
        Ok(())
    } else {
        debug!(
            sign_type = %sign_type,
            fields = params.len(),
            "Signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    fn doc_params() -> ParameterSet {
        [
            ("appid", "wxd930ea5d5a258f4f"),
            ("mch_id", "10000100"),
            ("device_info", "1000"),
            ("body", "test"),
            ("nonce_str", "ibuaiVcKdpRxkhJA"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_should_match_published_md5_vector() {
        assert_eq!(
            sign_parameters(&doc_params(), SignType::Md5, true, DOC_KEY),
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        );
    }

    #[test]
    fn test_should_match_published_hmac_sha256_vector() {
        assert_eq!(
            sign_parameters(&doc_params(), SignType::HmacSha256, true, DOC_KEY),
            "6A9AE1657590FD6257D693A078E1C3E4BB6BA4DC30B23E0EE2496E54170DACD6"
        );
    }

    #[test]
    fn test_should_sign_worked_example() {
        let params: ParameterSet = [("a", "1"), ("b", ""), ("c", "3")].into_iter().collect();
        let canonical = canonicalize(&params, true, "K");
        assert_eq!(canonical, "a=1&c=3&key=K");
        assert_eq!(
            sign(&canonical, SignType::Md5, "K"),
            "0BFA118FE1219E73B897EFB684BAFCF8"
        );
        assert_eq!(
            sign(&canonical, SignType::HmacSha256, "K"),
            "CC3F804F3272D0F168D91FA802DB5F02E5C1AB1B805C9A68314F00F6A52DE0F6"
        );
    }

    #[test]
    fn test_should_round_trip_sign_and_verify() {
        for sign_type in [SignType::Md5, SignType::HmacSha256] {
            let mut params = doc_params();
            let signature = sign_parameters(&params, sign_type, false, DOC_KEY);
            params.insert(SIGN_FIELD, signature);
            assert!(verify_parameters(&params, sign_type, false, DOC_KEY).is_ok());
        }
    }

    #[test]
    fn test_should_detect_single_field_tamper() {
        let mut params = doc_params();
        let signature = sign_parameters(&params, SignType::Md5, true, DOC_KEY);
        params.insert(SIGN_FIELD, signature.clone());

        for field in ["appid", "mch_id", "device_info", "body", "nonce_str"] {
            let mut tampered = params.clone();
            let original = tampered.get(field).unwrap().to_owned();
            tampered.insert(field, format!("{original}x"));

            assert_ne!(
                sign_parameters(&tampered, SignType::Md5, true, DOC_KEY),
                signature
            );
            assert!(matches!(
                verify_parameters(&tampered, SignType::Md5, true, DOC_KEY),
                Err(AuthError::SignatureDoesNotMatch)
            ));
        }
    }

    #[test]
    fn test_should_reject_wrong_key() {
        let mut params = doc_params();
        params.insert(SIGN_FIELD, sign_parameters(&params, SignType::HmacSha256, true, DOC_KEY));
        assert!(matches!(
            verify_parameters(&params, SignType::HmacSha256, true, "other"),
            Err(AuthError::SignatureDoesNotMatch)
        ));
    }

    #[test]
    fn test_should_report_missing_signature() {
        let mut params = doc_params();
        assert!(matches!(
            verify_parameters(&params, SignType::Md5, true, DOC_KEY),
            Err(AuthError::MissingSignature)
        ));
        params.insert(SIGN_FIELD, "");
        assert!(matches!(
            verify_parameters(&params, SignType::Md5, true, DOC_KEY),
            Err(AuthError::MissingSignature)
        ));
    }

    #[test]
    fn test_should_uppercase_both_sides_before_comparing() {
        assert!(verify(
            "9a0a8659f005d6984697e2ca0a9cf3b7",
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        ));
        assert!(!verify("9A0A8659F005D6984697E2CA0A9CF3B", "9A0A8659F005D6984697E2CA0A9CF3B7"));
        assert!(!verify("", "9A0A8659F005D6984697E2CA0A9CF3B7"));
    }

    #[test]
    fn test_should_parse_wire_names() {
        assert_eq!("MD5".parse::<SignType>().unwrap(), SignType::Md5);
        assert_eq!("HMAC-SHA256".parse::<SignType>().unwrap(), SignType::HmacSha256);
        assert!("md5".parse::<SignType>().is_err());
        assert_eq!(SignType::HmacSha256.to_string(), "HMAC-SHA256");
    }

    #[derive(Debug, Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_should_not_log_recomputed_signature_on_mismatch() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut forged = doc_params();
        forged.insert(SIGN_FIELD, "00000000000000000000000000000000");
        let expected = sign_parameters(&forged, SignType::Md5, true, DOC_KEY);

        let result = tracing::subscriber::with_default(subscriber, || {
            verify_parameters(&forged, SignType::Md5, true, DOC_KEY)
        });
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Signature mismatch"), "{output}");
        assert!(!output.contains(&expected), "{output}");
        assert!(!output.contains(&expected.to_lowercase()), "{output}");
    }
}
