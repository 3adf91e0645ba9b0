use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Credential;
use crate::account::models::EmailAddress;
use crate::account::models::NewCredential;
use crate::account::models::UserId;
use crate::account::ports::CredentialRepository;

/// Process-local credential store.
///
/// Used when no database is configured and by the API tests. Contents are lost
/// on restart.
pub struct InMemoryCredentialRepository {
    state: RwLock<State>,
}

struct State {
    next_id: i64,
    by_email: HashMap<String, Credential>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                by_email: HashMap::new(),
            }),
        }
    }
}

impl Default for InMemoryCredentialRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AccountError> {
        let state = self.state.read().await;
        Ok(state.by_email.get(email.as_str()).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<Credential, AccountError> {
        let mut state = self.state.write().await;

        if state.by_email.contains_key(credential.email.as_str()) {
            return Err(AccountError::DuplicateRegistration(
                credential.email.to_string(),
            ));
        }

        let stored = Credential {
            id: UserId(state.next_id),
            email: credential.email,
            password_hash: credential.password_hash,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state
            .by_email
            .insert(stored.email.as_str().to_string(), stored.clone());

        Ok(stored)
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AccountError> {
        let mut state = self.state.write().await;

        let credential = state
            .by_email
            .values_mut()
            .find(|credential| credential.id == *id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        credential.password_hash = password_hash.to_string();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_credential(raw_email: &str) -> NewCredential {
        NewCredential {
            email: EmailAddress::new(raw_email.to_string()).unwrap(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repository = InMemoryCredentialRepository::new();

        let first = repository.insert(new_credential("a@b.com")).await.unwrap();
        let second = repository.insert(new_credential("c@d.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
    }

    #[tokio::test]
    async fn test_insert_duplicate_email() {
        let repository = InMemoryCredentialRepository::new();
        repository.insert(new_credential("a@b.com")).await.unwrap();

        let result = repository.insert(new_credential("a@b.com")).await;

        assert!(matches!(result, Err(AccountError::DuplicateRegistration(_))));
    }

    #[tokio::test]
    async fn test_find_and_update() {
        let repository = InMemoryCredentialRepository::new();
        let stored = repository.insert(new_credential("a@b.com")).await.unwrap();

        repository
            .update_password_hash(&stored.id, "new-hash")
            .await
            .unwrap();

        let found = repository
            .find_by_email(&stored.email)
            .await
            .unwrap()
            .expect("Credential not found");
        assert_eq!(found.password_hash, "new-hash");

        let missing = repository.update_password_hash(&UserId(99), "x").await;
        assert!(matches!(missing, Err(AccountError::NotFound(_))));
    }
}
