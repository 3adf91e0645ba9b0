use thiserror::Error;

/// Failure while hashing or checking a password.
///
/// A wrong password is not an error; `verify` reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    /// Stored value is neither an Argon2 PHC string nor a legacy digest.
    #[error("Unrecognised stored password hash: {0}")]
    UnrecognisedHash(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
