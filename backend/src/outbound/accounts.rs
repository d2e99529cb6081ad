//! In-memory account store.
//!
//! Backs the `AccountStore` port with a process-local map. Each account
//! document lives inside a watch channel so writes double as snapshot
//! notifications for subscribers. Suitable for tests and single-node
//! deployments; durability is out of scope here.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::account::{Account, AccountId};
use crate::domain::plan::Plan;
use crate::domain::ports::{AccountStore, AccountStoreError, AccountWatch};

/// Process-local [`AccountStore`] keyed by account id.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, watch::Sender<Account>>>,
}

impl InMemoryAccountStore {
    fn with_sender<T>(
        &self,
        id: &AccountId,
        apply: impl FnOnce(&watch::Sender<Account>) -> T,
    ) -> Result<T, AccountStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AccountStoreError::query("account map lock poisoned"))?;
        let sender = accounts
            .get(id)
            .ok_or_else(|| AccountStoreError::not_found(id.as_ref()))?;
        Ok(apply(sender))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn fetch(&self, id: &AccountId) -> Result<Account, AccountStoreError> {
        self.with_sender(id, |sender| sender.borrow().clone())
    }

    async fn create(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AccountStoreError::query("account map lock poisoned"))?;
        if accounts.contains_key(&account.id) {
            return Err(AccountStoreError::query(format!(
                "account document already exists for {}",
                account.id
            )));
        }
        let (sender, _) = watch::channel(account.clone());
        accounts.insert(account.id.clone(), sender);
        Ok(())
    }

    async fn save_credits(&self, id: &AccountId, credits: u32) -> Result<(), AccountStoreError> {
        self.with_sender(id, |sender| {
            sender.send_modify(|account| account.credits = credits);
        })
    }

    async fn save_plan(
        &self,
        id: &AccountId,
        plan: Plan,
        credits: u32,
        max_characters: usize,
    ) -> Result<(), AccountStoreError> {
        self.with_sender(id, |sender| {
            sender.send_modify(|account| {
                account.plan = plan;
                account.credits = credits;
                account.max_characters = max_characters;
            });
        })
    }

    async fn subscribe(&self, id: &AccountId) -> Result<AccountWatch, AccountStoreError> {
        self.with_sender(id, watch::Sender::subscribe)
    }
}
