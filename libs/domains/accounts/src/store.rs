use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AccountError, AccountResult};
use crate::models::Account;

/// Change applied to an account while it is being moved to a new key
pub type Mutation = Box<dyn FnOnce(&mut Account) + Send>;

/// Fallible in-place change; on error the stored account is left as it was
pub type Edit = Box<dyn FnOnce(&mut Account) -> AccountResult<()> + Send>;

/// Store trait for Account persistence.
///
/// Every operation is atomic with respect to concurrent callers.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account, failing if the key is taken
    async fn add(&self, id: &str, account: Account) -> AccountResult<()>;

    /// Get an account by key
    async fn get(&self, id: &str) -> AccountResult<Account>;

    /// Replace an existing account in full (last writer wins)
    async fn update(&self, id: &str, account: Account) -> AccountResult<()>;

    /// Remove an account, returning the prior value
    async fn delete(&self, id: &str) -> AccountResult<Account>;

    /// Read, change and write back an account under one lock, returning the
    /// stored result
    async fn modify(&self, id: &str, edit: Edit) -> AccountResult<Account>;

    /// Move an account to a new key and apply `mutate`, as one step
    async fn rename(&self, old_id: &str, new_id: &str, mutate: Mutation) -> AccountResult<Account>;

    /// Number of stored accounts
    async fn count(&self) -> usize;
}

/// In-memory implementation of AccountStore
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn add(&self, id: &str, account: Account) -> AccountResult<()> {
        let mut accounts = self.accounts.write().await;

        match accounts.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AccountError::AlreadyExists(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(account);
                tracing::info!(account = %id, "Added account");
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> AccountResult<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .get(id)
            .cloned()
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, account: Account) -> AccountResult<()> {
        let mut accounts = self.accounts.write().await;

        let slot = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        *slot = account;

        tracing::debug!(account = %id, "Updated account");
        Ok(())
    }

    async fn delete(&self, id: &str) -> AccountResult<Account> {
        let mut accounts = self.accounts.write().await;

        let removed = accounts
            .remove(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        tracing::info!(account = %id, "Deleted account");
        Ok(removed)
    }

    async fn modify(&self, id: &str, edit: Edit) -> AccountResult<Account> {
        let mut accounts = self.accounts.write().await;

        let slot = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        let mut draft = slot.clone();
        edit(&mut draft)?;
        *slot = draft.clone();

        tracing::debug!(account = %id, "Modified account");
        Ok(draft)
    }

    async fn rename(&self, old_id: &str, new_id: &str, mutate: Mutation) -> AccountResult<Account> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(old_id) {
            return Err(AccountError::NotFound(old_id.to_string()));
        }
        if old_id != new_id && accounts.contains_key(new_id) {
            return Err(AccountError::AlreadyExists(new_id.to_string()));
        }

        let mut account = accounts
            .remove(old_id)
            .ok_or_else(|| AccountError::NotFound(old_id.to_string()))?;
        mutate(&mut account);
        account.email = new_id.to_string();
        accounts.insert(new_id.to_string(), account.clone());

        tracing::info!(from = %old_id, to = %new_id, "Renamed account");
        Ok(account)
    }

    async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}
