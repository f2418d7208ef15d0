//! Per-endpoint signing policy.
//!
//! Each [`RequestKind`] maps to exactly one [`RequestPolicy`] through the
//! exhaustive `match` in [`policy_for`]. Adding an endpoint means adding a
//! variant and a table row; the compiler rejects a kind without a row.
//!
//! | Kind | Identity fields | `sign_type` | Algorithm | `sign_type` signed | Encrypted |
//! |------|-----------------|-------------|-----------|--------------------|-----------|
//! | `transfer` | `mch_appid`, `mchid` | - | MD5 | - | - |
//! | `get_public_key` | `mch_id` | `MD5` | MD5 | yes | - |
//! | `pay_bank` | `mch_id` | `MD5` | MD5 | no | `enc_bank_no`, `enc_true_name` |
//! | `query_bank` | `mch_id` | `MD5` | MD5 | no | - |
//! | `get_transfer_info` | `appid`, `mch_id` | `MD5` | MD5 | no | - |
//! | `download_fund_flow` | `appid`, `mch_id` | `HMAC-SHA256` | HMAC-SHA256 | yes | - |
//! | `refund` | `appid`, `mch_id` | - | MD5 | - | - |
//! | `generic` | `appid`, `mch_id` | - | MD5 | - | - |

use std::fmt;
use std::str::FromStr;

use paygate_core::Credentials;

use crate::signature::SignType;

/// Endpoint category of a gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Enterprise payment to a user's wallet.
    Transfer,
    /// Fetch the issuer RSA public key.
    GetPublicKey,
    /// Enterprise payment to a bank card.
    PayBank,
    /// Query a bank-card payment.
    QueryBank,
    /// Query a wallet transfer.
    GetTransferInfo,
    /// Download the fund flow statement.
    DownloadFundFlow,
    /// Refund an order.
    Refund,
    /// Any other certificate-secured endpoint.
    Generic,
}

impl RequestKind {
    /// Every request kind.
    pub const ALL: [Self; 8] = [
        Self::Transfer,
        Self::GetPublicKey,
        Self::PayBank,
        Self::QueryBank,
        Self::GetTransferInfo,
        Self::DownloadFundFlow,
        Self::Refund,
        Self::Generic,
    ];

    /// Snake-case name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::GetPublicKey => "get_public_key",
            Self::PayBank => "pay_bank",
            Self::QueryBank => "query_bank",
            Self::GetTransferInfo => "get_transfer_info",
            Self::DownloadFundFlow => "download_fund_flow",
            Self::Refund => "refund",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown request kind: {s}"))
    }
}

/// Which credential value an identity field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The merchant application id.
    AppId,
    /// The merchant id.
    MchId,
}

impl IdentitySource {
    /// Resolve the value from credentials.
    #[must_use]
    pub fn resolve(self, credentials: &Credentials) -> &str {
        match self {
            Self::AppId => credentials.app_id(),
            Self::MchId => credentials.mch_id(),
        }
    }
}

/// Signing rules for one request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Identity fields to inject, in injection order.
    pub identity_fields: &'static [(&'static str, IdentitySource)],
    /// Whether to add a `sign_type` field carrying the algorithm name.
    pub send_sign_type: bool,
    /// Signature algorithm.
    pub sign_type: SignType,
    /// Whether `sign_type` is left out of the signed string.
    pub exclude_sign_type: bool,
    /// Fields whose values must be RSA-encrypted before signing.
    pub encrypted_fields: &'static [&'static str],
}

impl RequestPolicy {
    /// Whether any field must be encrypted.
    #[must_use]
    pub fn requires_field_encryption(&self) -> bool {
        !self.encrypted_fields.is_empty()
    }
}

const APP_AND_MCH: &[(&str, IdentitySource)] = &[
    ("appid", IdentitySource::AppId),
    ("mch_id", IdentitySource::MchId),
];

const MCH_ONLY: &[(&str, IdentitySource)] = &[("mch_id", IdentitySource::MchId)];

const TRANSFER_IDENTITY: &[(&str, IdentitySource)] = &[
    ("mch_appid", IdentitySource::AppId),
    ("mchid", IdentitySource::MchId),
];

const BANK_ENCRYPTED_FIELDS: &[&str] = &["enc_bank_no", "enc_true_name"];

/// Look up the signing policy for a request kind.
#[must_use]
pub fn policy_for(kind: RequestKind) -> RequestPolicy {
    let md5 = RequestPolicy {
        identity_fields: APP_AND_MCH,
        send_sign_type: false,
        sign_type: SignType::Md5,
        exclude_sign_type: true,
        encrypted_fields: &[],
    };

    match kind {
        RequestKind::Transfer => RequestPolicy {
            identity_fields: TRANSFER_IDENTITY,
            ..md5
        },
        RequestKind::GetPublicKey => RequestPolicy {
            identity_fields: MCH_ONLY,
            send_sign_type: true,
            exclude_sign_type: false,
            ..md5
        },
        RequestKind::PayBank => RequestPolicy {
            identity_fields: MCH_ONLY,
            send_sign_type: true,
            encrypted_fields: BANK_ENCRYPTED_FIELDS,
            ..md5
        },
        RequestKind::QueryBank => RequestPolicy {
            identity_fields: MCH_ONLY,
            send_sign_type: true,
            ..md5
        },
        RequestKind::GetTransferInfo => RequestPolicy {
            send_sign_type: true,
            ..md5
        },
        RequestKind::DownloadFundFlow => RequestPolicy {
            send_sign_type: true,
            sign_type: SignType::HmacSha256,
            exclude_sign_type: false,
            ..md5
        },
        RequestKind::Refund | RequestKind::Generic => md5,
    }
}
