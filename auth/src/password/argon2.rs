use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;

use super::errors::PasswordError;
use super::legacy;

/// Password hashing implementation.
///
/// New hashes are Argon2id PHC strings. Verification also accepts the legacy
/// unsalted SHA-256 hex digests so existing credentials keep working until
/// they are upgraded.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Self::hash_with(password, &salt)
    }

    /// Hash a plaintext password with a caller-supplied salt.
    ///
    /// Deterministic: the same password and salt always give the same PHC string.
    ///
    /// # Errors
    /// * `InvalidSalt` - Salt is too short or too long
    /// * `HashingFailed` - Hashing failed
    pub fn hash_with_salt(&self, password: &str, salt: &[u8]) -> Result<String, PasswordError> {
        let salt = SaltString::encode_b64(salt)
            .map_err(|e| PasswordError::InvalidSalt(e.to_string()))?;
        Self::hash_with(password, &salt)
    }

    fn hash_with(password: &str, salt: &SaltString) -> Result<String, PasswordError> {
        Argon2::default()
            .hash_password(password.as_bytes(), salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored` - Argon2 PHC string, or a legacy SHA-256 hex digest
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `UnrecognisedHash` - `stored` is not a PHC string or legacy digest
    /// * `VerificationFailed` - Argon2 rejected the stored parameters
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        if legacy::is_legacy_digest(stored) {
            return Ok(legacy::verify(password, stored));
        }

        let parsed_hash =
            PasswordHash::new(stored).map_err(|e| PasswordError::UnrecognisedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    /// Whether a stored hash should be replaced by a fresh Argon2id hash.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => parsed.algorithm != Algorithm::Argon2id.ident(),
            Err(_) => true,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8] = b"fixed-salt-16byt";

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_with_salt_is_deterministic() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash_with_salt("secret123", SALT).unwrap();
        let second = hasher.hash_with_salt("secret123", SALT).unwrap();
        let other = hasher.hash_with_salt("secret1234", SALT).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_random_salts_differ() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first).unwrap());
        assert!(hasher.verify("secret123", &second).unwrap());
    }

    #[test]
    fn test_hash_with_short_salt_fails() {
        let hasher = PasswordHasher::new();
        let result = hasher.hash_with_salt("secret123", b"ab");
        assert!(matches!(result, Err(PasswordError::InvalidSalt(_))));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::UnrecognisedHash(_))));
    }

    #[test]
    fn test_verify_legacy_digest() {
        let hasher = PasswordHasher::new();
        let stored = legacy::digest("correctpw");

        assert!(hasher.verify("correctpw", &stored).unwrap());
        assert!(!hasher.verify("wrongpw", &stored).unwrap());
    }

    #[test]
    fn test_needs_rehash() {
        let hasher = PasswordHasher::new();

        assert!(hasher.needs_rehash(&legacy::digest("pw")));
        assert!(!hasher.needs_rehash(&hasher.hash("pw").unwrap()));
    }
}
