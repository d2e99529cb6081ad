//! Credit ledger service over the account store port.
//!
//! The ledger holds no durable state. Reads and decrements are the two
//! separate store calls the storage collaborator exposes, so two concurrent
//! spends from one account can both pass the balance check before either
//! decrement lands; the balance itself still never goes below zero because
//! [`Account::spend`] refuses the final step.

use std::sync::Arc;

use super::account::{Account, AccountId};
use super::error::Error;
use super::plan::Plan;
use super::ports::{AccountStore, AccountStoreError};

/// Tracks remaining credits and enforces decrement-on-use.
#[derive(Clone)]
pub struct CreditLedger {
    accounts: Arc<dyn AccountStore>,
}

impl CreditLedger {
    /// Create a ledger over an account store.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Settle exactly one credit for a completed paid action.
    ///
    /// Takes the account projection read during entitlement, decrements it,
    /// and persists the new balance. Returns the updated projection.
    ///
    /// # Errors
    ///
    /// Fails with an internal error when the balance is already zero (the
    /// entitlement gate must prevent this) or when the store write fails.
    pub async fn settle(&self, account: Account) -> Result<Account, Error> {
        let account = account
            .spend()
            .map_err(|err| Error::internal(format!("settlement after gate bypass: {err}")))?;
        self.accounts
            .save_credits(&account.id, account.credits)
            .await
            .map_err(map_store_error)?;
        Ok(account)
    }

    /// Move the account onto a new plan, resetting balance and limit.
    pub async fn change_plan(&self, account: Account, plan: Plan) -> Result<Account, Error> {
        let account = account.apply_plan_change(plan);
        self.accounts
            .save_plan(
                &account.id,
                account.plan,
                account.credits,
                account.max_characters,
            )
            .await
            .map_err(map_store_error)?;
        Ok(account)
    }

    /// Fetch the current account projection.
    pub async fn fetch(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts.fetch(id).await.map_err(map_store_error)
    }
}

/// Map store failures onto the domain error envelope.
pub(crate) fn map_store_error(error: AccountStoreError) -> Error {
    match error {
        AccountStoreError::NotFound { account_id } => {
            Error::internal(format!("account document missing for {account_id}"))
        }
        AccountStoreError::Connection { message } => {
            Error::internal(format!("account store unavailable: {message}"))
        }
        AccountStoreError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
    }
}
