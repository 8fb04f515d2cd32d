use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::validate_name;
use crate::error::GurukulError;
use crate::ids::IdGenerator;
use crate::models::{Account, EntityId, Role};
use crate::storage::SnapshotStore;

const ACCOUNTS_FILE: &str = "users.csv";

/// Login accounts with bcrypt-hashed passwords, username-unique.
pub struct AccountRegistry {
    store: SnapshotStore<Account>,
    bcrypt_cost: u32,
}

impl AccountRegistry {
    pub async fn open(
        dir: &Path,
        ids: Arc<IdGenerator>,
        bcrypt_cost: u32,
    ) -> Result<Self, GurukulError> {
        Ok(AccountRegistry {
            store: SnapshotStore::open(dir.join(ACCOUNTS_FILE), ids).await?,
            bcrypt_cost,
        })
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, GurukulError> {
        validate_name("username", username)?;
        if password.is_empty() {
            return Err(GurukulError::InvalidField {
                field: "password",
                reason: "cannot be empty".to_string(),
            });
        }

        let password_hash = bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|err| GurukulError::PasswordHash(err.to_string()))?;
        let account = Account {
            id: self.store.next_id(),
            username: username.trim().to_string(),
            password_hash,
            role,
        };
        let registered = self
            .store
            .transact(move |entries| {
                if entries.values().any(|a| a.username == account.username) {
                    return Err(GurukulError::UsernameTaken(account.username));
                }
                entries.insert(account.id, account.clone());
                Ok(account)
            })
            .await?;
        info!(account_id = registered.id, username = %registered.username, "account registered");
        Ok(registered)
    }

    /// Verifies the password against the stored hash. Unknown usernames
    /// and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, GurukulError> {
        let account = self.by_username(username).await.ok_or_else(|| {
            warn!(username, "authentication failed: unknown username");
            GurukulError::InvalidCredentials
        })?;
        let matches = bcrypt::verify(password, &account.password_hash)
            .map_err(|err| GurukulError::PasswordHash(err.to_string()))?;
        if matches {
            Ok(account)
        } else {
            warn!(username, "authentication failed: wrong password");
            Err(GurukulError::InvalidCredentials)
        }
    }

    pub async fn by_username(&self, username: &str) -> Option<Account> {
        self.store
            .find(|account| account.username == username)
            .await
            .into_iter()
            .next()
    }

    pub async fn get(&self, id: EntityId) -> Result<Account, GurukulError> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Account> {
        self.store.all().await
    }

    pub async fn count(&self) -> usize {
        self.store.len().await
    }
}
