//! Unsalted SHA-256 digests written by the previous credential store.
//!
//! Only ever used to verify an existing digest so it can be upgraded; new
//! hashes are always Argon2id.

use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of the password bytes.
pub fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Whether `stored` has the shape of a legacy digest (64 hex characters).
pub fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == DIGEST_HEX_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Constant-time comparison of `digest(password)` against a stored digest.
pub fn verify(password: &str, stored: &str) -> bool {
    let computed = digest(password);
    computed
        .as_bytes()
        .ct_eq(stored.to_ascii_lowercase().as_bytes())
        .into()
}
