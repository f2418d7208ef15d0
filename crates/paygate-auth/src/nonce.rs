//! Per-call nonce generation.

/// Length of a generated nonce.
pub const NONCE_LEN: usize = 32;

/// Generate a fresh nonce: 32 lowercase hex characters from a random UUIDv4.
///
/// The UUID is drawn from the operating system CSPRNG, so concurrent calls
/// do not collide in practice.
#[must_use]
pub fn generate_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
