use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::Credential;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::NewCredential;
use crate::account::models::RegisterCommand;
use crate::account::models::Session;
use crate::account::models::UserId;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new user and issue a token for them.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Session for the new user
    ///
    /// # Errors
    /// * `DuplicateRegistration` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Session, AccountError>;

    /// Check credentials and issue a token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Session for the authenticated user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError>;
}

/// Persistence operations for credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Retrieve a credential by email address.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AccountError>;

    /// Persist a new credential.
    ///
    /// # Returns
    /// Stored credential with its assigned id
    ///
    /// # Errors
    /// * `DuplicateRegistration` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, credential: NewCredential) -> Result<Credential, AccountError>;

    /// Replace the stored password hash of a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AccountError>;
}
