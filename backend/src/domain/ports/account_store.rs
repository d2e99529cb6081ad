//! Driven port for the account document store.
//!
//! The storage collaborator owns durability and its own consistency
//! mechanism; this port exposes per-account read, write, and a one-way
//! change stream. Credit reads and decrements are deliberately separate
//! calls, matching the collaborator's document API.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::account::{Account, AccountId};
use crate::domain::plan::Plan;

use super::define_port_error;

/// One-way notification stream of account snapshots.
///
/// Receivers observe the latest snapshot after any write to the account
/// document. This is distinct from the request/response calls that mutate
/// credits: consumers treat updates as out-of-band refreshes, never as
/// acknowledgements of their own writes.
pub type AccountWatch = watch::Receiver<Account>;

define_port_error! {
    /// Errors surfaced by the account store.
    pub enum AccountStoreError {
        /// No document exists for the account.
        NotFound { account_id: String } =>
            "no account document for {account_id}",
        /// The store could not be reached.
        Connection { message: String } =>
            "account store unavailable: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } =>
            "account store error: {message}",
    }
}

/// Port for reading and mutating account documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch the account document.
    async fn fetch(&self, id: &AccountId) -> Result<Account, AccountStoreError>;

    /// Create the account document. Fails if one already exists.
    async fn create(&self, account: &Account) -> Result<(), AccountStoreError>;

    /// Persist a new credit balance.
    async fn save_credits(&self, id: &AccountId, credits: u32) -> Result<(), AccountStoreError>;

    /// Persist a plan change together with its reset balance and limit.
    async fn save_plan(
        &self,
        id: &AccountId,
        plan: Plan,
        credits: u32,
        max_characters: usize,
    ) -> Result<(), AccountStoreError>;

    /// Subscribe to account snapshots pushed after each write.
    async fn subscribe(&self, id: &AccountId) -> Result<AccountWatch, AccountStoreError>;
}
