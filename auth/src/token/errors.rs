use thiserror::Error;

/// Error type for token operations.
///
/// The distinct validation variants exist for logging and tests. Request
/// boundaries collapse them into a single rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}
