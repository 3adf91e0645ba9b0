use auth::AuthenticationError;
use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Same outcome for an unknown email and a wrong password.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("User with this email already exists.")]
    DuplicateRegistration(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AuthenticationError> for AccountError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => AccountError::Password(e),
            AuthenticationError::TokenError(e) => AccountError::Token(e),
        }
    }
}
