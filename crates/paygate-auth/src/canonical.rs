//! Canonical string construction.
//!
//! The canonical string is the exact input to the signature digest, for both
//! outbound requests and inbound responses:
//!
//! ```text
//! k1=v1&k2=v2&...&kn=vn&key=<signing key>
//! ```
//!
//! 1. `sign` is always dropped.
//! 2. `sign_type` is dropped when the endpoint excludes it.
//! 3. Pairs with empty values are dropped.
//! 4. The remaining keys are sorted in ascending byte order.
//! 5. Pairs are joined as `key=value` with `&`, without any encoding.
//! 6. `&key=<signing key>` is appended.

use crate::params::ParameterSet;

/// Name of the signature field.
pub const SIGN_FIELD: &str = "sign";

/// Name of the field carrying the signature algorithm.
pub const SIGN_TYPE_FIELD: &str = "sign_type";

/// Name under which the signing key is appended.
pub const KEY_FIELD: &str = "key";

/// Build the canonical string for `params`.
///
/// # Examples
///
/// ```
/// use paygate_auth::{ParameterSet, canonicalize};
///
/// let params: ParameterSet = [("a", "1"), ("b", ""), ("c", "3"), ("sign", "X")]
///     .into_iter()
///     .collect();
/// assert_eq!(canonicalize(&params, true, "K"), "a=1&c=3&key=K");
/// ```
#[must_use]
pub fn canonicalize(params: &ParameterSet, exclude_sign_type: bool, key: &str) -> String {
    let mut canonical = String::with_capacity(128);

    // ParameterSet iterates in byte order already.
    for (name, value) in params.iter() {
        if name == SIGN_FIELD || value.is_empty() {
            continue;
        }
        if exclude_sign_type && name == SIGN_TYPE_FIELD {
            continue;
        }
        canonical.push_str(name);
        canonical.push('=');
        canonical.push_str(value);
        canonical.push('&');
    }

    canonical.push_str(KEY_FIELD);
    canonical.push('=');
    canonical.push_str(key);
    canonical
}
