//! Building the signed outbound parameter set.
//!
//! [`build_envelope`] applies a [`RequestPolicy`] to caller parameters:
//!
//! 1. Encrypt the designated fields (the signature covers the ciphertext).
//! 2. Inject the identity fields and, where the policy says so, `sign_type`.
//! 3. Add a fresh `nonce_str`.
//! 4. Compute and add `sign`.

use paygate_core::Credentials;
use tracing::debug;

use crate::canonical::{SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::encrypt::FieldEncryptor;
use crate::error::AuthError;
use crate::nonce::generate_nonce;
use crate::params::ParameterSet;
use crate::policy::{RequestKind, RequestPolicy, policy_for};
use crate::signature::sign_parameters;

/// Name of the nonce field.
pub const NONCE_FIELD: &str = "nonce_str";

/// A fully signed request, ready to be sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    kind: RequestKind,
    policy: RequestPolicy,
    params: ParameterSet,
}

impl SignedEnvelope {
    /// The request kind this envelope was built for.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The policy applied to this envelope.
    #[must_use]
    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// All parameters, including `nonce_str` and `sign`.
    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// The nonce of this envelope.
    #[must_use]
    pub fn nonce(&self) -> &str {
        self.params.get(NONCE_FIELD).unwrap_or_default()
    }

    /// The computed signature.
    #[must_use]
    pub fn sign(&self) -> &str {
        self.params.get(SIGN_FIELD).unwrap_or_default()
    }
}

/// Apply the policy of `kind` to `params` and sign the result.
///
/// # Errors
///
/// Returns [`AuthError::MissingEncryptionKey`] if the policy requires field
/// encryption and `encryptor` is `None`, or [`AuthError::Encryption`] if a
/// field cannot be encrypted. Nothing is signed in either case.
pub fn build_envelope(
    kind: RequestKind,
    mut params: ParameterSet,
    credentials: &Credentials,
    encryptor: Option<&FieldEncryptor>,
) -> Result<SignedEnvelope, AuthError> {
    let policy = policy_for(kind);

    if policy.requires_field_encryption() {
        let encryptor = encryptor.ok_or(AuthError::MissingEncryptionKey)?;
        for &field in policy.encrypted_fields {
            let Some(plaintext) = params.get_non_empty(field) else {
                continue;
            };
            let ciphertext = encryptor.encrypt_field(field, plaintext)?;
            params.insert(field, ciphertext);
        }
    }

    for &(field, source) in policy.identity_fields {
        params.insert(field, source.resolve(credentials));
    }
    if policy.send_sign_type {
        params.insert(SIGN_TYPE_FIELD, policy.sign_type.as_str());
    }

    params.insert(NONCE_FIELD, generate_nonce());

    let sign = sign_parameters(
        &params,
        policy.sign_type,
        policy.exclude_sign_type,
        credentials.key(),
    );
    params.insert(SIGN_FIELD, sign);

    debug!(
        kind = %kind,
        fields = params.len(),
        encrypted = policy.requires_field_encryption(),
        "Built signed envelope"
    );

    Ok(SignedEnvelope {
        kind,
        policy,
        params,
    })
}
