use http::header::AUTHORIZATION;
use http::HeaderMap;
use http::StatusCode;
use thiserror::Error;

use crate::token::Principal;
use crate::token::TokenError;
use crate::token::TokenVerifier;

/// Literal scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

const HEADER_REJECTION_MESSAGE: &str =
    "Authentication required: Missing or invalid Authorization header.";
const TOKEN_REJECTION_MESSAGE: &str = "Authentication failed: Invalid or expired token.";

/// Reason a request was refused by the [`AuthGate`].
///
/// Every variant maps to 401. Clients only ever see [`AuthRejection::message`],
/// which distinguishes a header problem from a token problem and nothing finer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Bearer credential")]
    InvalidScheme,

    #[error("Invalid or expired token: {0}")]
    InvalidOrExpiredToken(TokenError),
}

impl AuthRejection {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Message safe to return to the client.
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader | AuthRejection::InvalidScheme => {
                HEADER_REJECTION_MESSAGE
            }
            AuthRejection::InvalidOrExpiredToken(_) => TOKEN_REJECTION_MESSAGE,
        }
    }
}

/// Turns request headers into an authenticated [`Principal`].
#[derive(Clone)]
pub struct AuthGate {
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Authenticate a request from its headers.
    ///
    /// # Errors
    /// * `MissingHeader` - No `Authorization` header
    /// * `InvalidScheme` - Header is not `Bearer <token>` or not visible ASCII
    /// * `InvalidOrExpiredToken` - Token failed structural, signature or expiry checks
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthRejection> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthRejection::MissingHeader)?;

        let value = value.to_str().map_err(|_| AuthRejection::InvalidScheme)?;

        let token = value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthRejection::InvalidScheme)?;

        self.verifier
            .verify(token)
            .map_err(AuthRejection::InvalidOrExpiredToken)
    }
}
