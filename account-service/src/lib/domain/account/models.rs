use std::fmt;
use std::str::FromStr;

use auth::AuthenticationResult;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::EmailError;

/// Stored login credential of a registered user.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type, assigned by the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Credential to be inserted; the store assigns id and creation time.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Command to register a new user
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to log in with email and password
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub token: String,
    /// Token expiry (Unix epoch milliseconds)
    pub expires_at: i64,
}

impl Session {
    pub fn new(credential: &Credential, result: AuthenticationResult) -> Self {
        Self {
            user_id: credential.id,
            email: credential.email.clone(),
            token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}
