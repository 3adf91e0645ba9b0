use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;

use crate::account::errors::AccountError;
use crate::account::models::Credential;
use crate::account::models::LoginCommand;
use crate::account::models::NewCredential;
use crate::account::models::RegisterCommand;
use crate::account::models::Session;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialRepository;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<CR>
where
    CR: CredentialRepository,
{
    repository: Arc<CR>,
    authenticator: Arc<Authenticator>,
}

impl<CR> AccountService<CR>
where
    CR: CredentialRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential persistence implementation
    /// * `authenticator` - Password and token coordinator
    pub fn new(repository: Arc<CR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn claims_for(credential: &Credential) -> Claims {
        Claims::for_user(credential.id.0, credential.email.as_str())
    }
}

#[async_trait]
impl<CR> AccountServicePort for AccountService<CR>
where
    CR: CredentialRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, AccountError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AccountError::DuplicateRegistration(
                command.email.to_string(),
            ));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let credential = self
            .repository
            .insert(NewCredential {
                email: command.email,
                password_hash,
            })
            .await?;

        let result = self
            .authenticator
            .generate_token(&Self::claims_for(&credential))?;

        tracing::info!(user_id = %credential.id, "User registered");

        Ok(Session::new(&credential, result))
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, AccountError> {
        let Some(credential) = self.repository.find_by_email(&command.email).await? else {
            tracing::debug!("Login attempt for unknown email");
            return Err(self
                .authenticator
                .reject_unknown_user(&command.password)
                .into());
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &credential.password_hash,
                &Self::claims_for(&credential),
            )
            .map_err(|e| {
                tracing::debug!(user_id = %credential.id, error = %e, "Login rejected");
                AccountError::from(e)
            })?;

        if let Some(upgraded_hash) = &result.upgraded_hash {
            match self
                .repository
                .update_password_hash(&credential.id, upgraded_hash)
                .await
            {
                Ok(()) => tracing::info!(
                    user_id = %credential.id,
                    "Upgraded legacy password hash"
                ),
                Err(e) => tracing::error!(
                    user_id = %credential.id,
                    error = %e,
                    "Failed to upgrade legacy password hash"
                ),
            }
        }

        Ok(Session::new(&credential, result))
    }
}
