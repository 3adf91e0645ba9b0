use std::fmt;

use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;

/// Default token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Length in bytes of a generated signing secret.
const GENERATED_SECRET_LEN: usize = 32;

/// Symmetric signing key shared by token issuance and verification.
///
/// Immutable once constructed. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Generate a random per-process secret from the OS CSPRNG.
    ///
    /// Tokens signed with a generated secret stop verifying when the process restarts.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; GENERATED_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {} bytes])", self.0.len())
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&[u8]> for Secret {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

/// Token issuance settings, fixed at process start.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: Secret,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Secret>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Config with the default 24 hour lifetime.
    pub fn with_default_ttl(secret: impl Into<Secret>) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }
}
