use std::sync::Arc;
use std::sync::OnceLock;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::TokenConfig;
use crate::gate::AuthGate;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::Principal;
use crate::token::TokenCodec;
use crate::token::TokenError;
use crate::token::TokenVerifier;

/// Salt of the throwaway hash verified when a login names an unknown account.
const DUMMY_SALT: &[u8] = b"unknown-account-salt";

/// Authentication coordinator combining password verification and token issuance.
///
/// Owns the password hasher, the token codec and the request gate built on the
/// same configuration, so every component signs and verifies with one secret.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    verifier: TokenVerifier,
    gate: AuthGate,
    dummy_hash: OnceLock<Option<String>>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,

    /// Token expiry (Unix epoch milliseconds)
    pub expires_at: i64,

    /// Replacement Argon2id hash when the stored hash used an outdated scheme
    pub upgraded_hash: Option<String>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator reading time from the system clock.
    ///
    /// # Arguments
    /// * `config` - Signing secret and token lifetime
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new authenticator with an injected clock.
    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        let codec = Arc::new(TokenCodec::with_clock(&config, clock));
        let verifier = TokenVerifier::new(Arc::clone(&codec));

        Self {
            password_hasher: PasswordHasher::new(),
            gate: AuthGate::new(verifier.clone()),
            verifier,
            codec,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to embed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token, its expiry, and an upgraded
    /// hash when `stored_hash` is a legacy digest
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let upgraded_hash = if self.password_hasher.needs_rehash(stored_hash) {
            Some(self.password_hasher.hash(password)?)
        } else {
            None
        };

        let issued = self.codec.issue(claims)?;

        Ok(AuthenticationResult {
            expires_at: issued.expires_at(),
            access_token: issued.token,
            upgraded_hash,
        })
    }

    /// Spend the same work as a real password check, then refuse.
    ///
    /// Used when a login names an account that does not exist so the response
    /// time does not reveal which emails are registered.
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        let dummy_hash = self.dummy_hash.get_or_init(|| {
            self.password_hasher
                .hash_with_salt("unknown-account", DUMMY_SALT)
                .ok()
        });

        if let Some(hash) = dummy_hash {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// Used right after registration, when the password was just set.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn generate_token(&self, claims: &Claims) -> Result<AuthenticationResult, TokenError> {
        let issued = self.codec.issue(claims)?;

        Ok(AuthenticationResult {
            expires_at: issued.expires_at(),
            access_token: issued.token,
            upgraded_hash: None,
        })
    }

    /// Verify a token and return its principal.
    ///
    /// # Errors
    /// * `TokenError` - Token is malformed, forged, or expired
    pub fn validate_token(&self, token: &str) -> Result<Principal, TokenError> {
        self.verifier.verify(token)
    }

    /// Request gate sharing this authenticator's codec.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}
