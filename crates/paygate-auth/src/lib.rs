//! Request signing and response verification for the paygate client.
//!
//! The gateway authenticates every call with a signature computed over a
//! canonical rendering of the request parameters plus a shared key:
//!
//! ```text
//! sign = UPPER(HEX(digest("k1=v1&k2=v2&...&key=<signing key>")))
//! ```
//!
//! where the pairs are sorted byte-wise, empty values and the `sign` field are
//! dropped, and `sign_type` is dropped for most endpoints. The digest is either
//! MD5 or HMAC-SHA256 keyed with the signing key, chosen per endpoint.
//!
//! # Usage
//!
//! ```rust
//! use paygate_auth::{ParameterSet, SignType, canonicalize, sign};
//!
//! let params: ParameterSet = [("a", "1"), ("b", ""), ("c", "3")].into_iter().collect();
//! let canonical = canonicalize(&params, true, "K");
//! assert_eq!(canonical, "a=1&c=3&key=K");
//!
//! let signature = sign(&canonical, SignType::Md5, "K");
//! assert_eq!(signature.len(), 32);
//! ```
//!
//! # Modules
//!
//! - [`params`] - The [`ParameterSet`] key/value container
//! - [`canonical`] - Canonical string construction
//! - [`signature`] - MD5 / HMAC-SHA256 signing and constant-time comparison
//! - [`policy`] - Per-endpoint signing policy table
//! - [`encrypt`] - RSA field encryption with the issuer public key
//! - [`envelope`] - Building the signed outbound parameter set
//! - [`nonce`] - Per-call nonce generation
//! - [`error`] - Signing error types

pub mod canonical;
pub mod encrypt;
pub mod envelope;
pub mod error;
pub mod nonce;
pub mod params;
pub mod policy;
pub mod signature;

pub use canonical::{KEY_FIELD, SIGN_FIELD, SIGN_TYPE_FIELD, canonicalize};
pub use encrypt::FieldEncryptor;
pub use envelope::{NONCE_FIELD, SignedEnvelope, build_envelope};
pub use error::AuthError;
pub use nonce::generate_nonce;
pub use params::ParameterSet;
pub use policy::{IdentitySource, RequestKind, RequestPolicy, policy_for};
pub use signature::{SignType, sign, sign_parameters, verify, verify_parameters};
