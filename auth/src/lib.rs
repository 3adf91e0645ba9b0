//! Credential and token utilities.
//!
//! Provides the authentication core shared by request handlers:
//! - Password hashing (Argon2id, with verification of legacy SHA-256 digests)
//! - Signed, expiring bearer tokens (`base64url(header).base64url(claims).hex(hmac)`)
//! - Token verification and request gating
//! - Authentication coordination
//!
//! All components are built from an explicit [`TokenConfig`]; nothing reads
//! process state while signing or verifying.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Claims, TokenCodec, TokenConfig, TokenVerifier};
//!
//! let codec = Arc::new(TokenCodec::new(&TokenConfig::with_default_ttl("secret_key")));
//! let token = codec.encode(&Claims::for_user(42, "a@b.com")).unwrap();
//!
//! let principal = TokenVerifier::new(codec).verify(&token).unwrap();
//! assert_eq!(principal.user_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims, TokenConfig};
//!
//! let auth = Authenticator::new(TokenConfig::with_default_ttl("secret_key"));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let claims = Claims::for_user(42, "alice@example.com");
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let principal = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(principal.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod gate;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use config::Secret;
pub use config::TokenConfig;
pub use gate::AuthGate;
pub use gate::AuthRejection;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Principal;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenVerifier;
