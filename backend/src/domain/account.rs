//! Account aggregate and credit ledger primitives.
//!
//! An account records a user's current plan, remaining credit balance, and
//! the character limit applied to generated artifacts. The balance never
//! goes negative: [`Account::spend`] refuses to decrement past zero, and the
//! entitlement gate rejects paid actions before any external call is made.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::Plan;

/// Validation errors returned by [`AccountId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    /// The identifier was empty or whitespace-only.
    #[error("account id must not be empty")]
    Empty,
    /// The identifier carried surrounding whitespace.
    #[error("account id must not contain surrounding whitespace")]
    Untrimmed,
}

/// Opaque, stable per-user identifier issued by the identity collaborator.
///
/// Identity-provider uids are opaque tokens, not UUIDs, so the only
/// structural requirements are non-emptiness and the absence of surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and construct an [`AccountId`].
    pub fn new(id: impl Into<String>) -> Result<Self, AccountIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AccountIdError::Empty);
        }
        if id.trim() != id {
            return Err(AccountIdError::Untrimmed);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Error raised when a spend would take the balance below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("credit balance is exhausted")]
pub struct CreditsExhausted;

/// A user's plan, credit balance, and character-limit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier shared with the identity collaborator.
    pub id: AccountId,
    /// Email captured at registration.
    pub email: String,
    /// Current subscription tier.
    pub plan: Plan,
    /// Remaining credits; one credit is consumed per paid action.
    pub credits: u32,
    /// Maximum characters per generated artifact. Derived from the plan at
    /// registration and on plan change; stored so per-account overrides
    /// survive catalog edits.
    pub max_characters: usize,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Seed a new account from the Free plan, as done at registration.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Account, AccountId, Plan};
    ///
    /// let id = AccountId::new("uid-1").expect("valid id");
    /// let account = Account::register(id, "user@example.com");
    /// assert_eq!(account.plan, Plan::Free);
    /// assert_eq!(account.credits, 5);
    /// ```
    pub fn register(id: AccountId, email: impl Into<String>) -> Self {
        let limits = Plan::Free.limits();
        Self {
            id,
            email: email.into(),
            plan: Plan::Free,
            credits: limits.credits,
            max_characters: limits.max_characters,
            created_at: Utc::now(),
        }
    }

    /// Whether the account can afford one more paid action.
    pub const fn can_spend(&self) -> bool {
        self.credits > 0
    }

    /// Consume exactly one credit, returning the updated projection.
    ///
    /// # Errors
    ///
    /// Returns [`CreditsExhausted`] when the balance is already zero. Callers
    /// are expected to check [`Account::can_spend`] before issuing the paid
    /// external call, so hitting this error indicates a gate bypass.
    pub fn spend(mut self) -> Result<Self, CreditsExhausted> {
        self.credits = self.credits.checked_sub(1).ok_or(CreditsExhausted)?;
        Ok(self)
    }

    /// Reset the account onto a new plan.
    ///
    /// This is a full reset, not an additive top-up: unused credits from the
    /// previous plan are discarded and the character limit is re-derived.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Account, AccountId, Plan};
    ///
    /// let id = AccountId::new("uid-1").expect("valid id");
    /// let mut account = Account::register(id, "user@example.com");
    /// account.credits = 1;
    /// let account = account.apply_plan_change(Plan::Student);
    /// assert_eq!(account.credits, 30);
    /// assert_eq!(account.max_characters, 20_000);
    /// ```
    pub fn apply_plan_change(mut self, plan: Plan) -> Self {
        let limits = plan.limits();
        self.plan = plan;
        self.credits = limits.credits;
        self.max_characters = limits.max_characters;
        self
    }
}
