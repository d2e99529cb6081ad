//! Session/entitlement gate guarding paid actions.
//!
//! Each request walks `UNVERIFIED -> VERIFIED -> {ENTITLED, DENIED}`:
//! the bearer credential is verified by the identity collaborator, the
//! account is resolved from the store, and the credit balance is checked
//! before any paid external call may be issued. Only an entitled outcome
//! reaches a request handler.

use std::sync::Arc;

use tracing::{info, warn};

use super::account::{Account, AccountId};
use super::error::Error;
use super::ledger::map_store_error;
use super::ports::{AccountStore, AccountStoreError, TokenVerifier, TokenVerifierError};

/// Message shown when the balance blocks a paid action.
pub const NO_CREDITS_MESSAGE: &str = "You have no credits left. Please upgrade your plan.";

/// Verifies credentials and resolves entitled accounts.
#[derive(Clone)]
pub struct EntitlementGate {
    verifier: Arc<dyn TokenVerifier>,
    accounts: Arc<dyn AccountStore>,
}

impl EntitlementGate {
    /// Create a gate over the identity and storage collaborators.
    pub fn new(verifier: Arc<dyn TokenVerifier>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { verifier, accounts }
    }

    /// Verify the bearer token and resolve the caller's account.
    ///
    /// A verified principal without an account document is provisioned with
    /// Free-plan defaults, mirroring the registration seeding; identity and
    /// registration are the identity collaborator's concern.
    pub async fn identify(&self, token: &str) -> Result<Account, Error> {
        let principal = self.verifier.verify(token).await.map_err(|err| match err {
            TokenVerifierError::Rejected { message } => {
                warn!(reason = %message, "bearer credential rejected");
                Error::unauthorized("Unauthorized")
            }
            other => Error::internal(format!("identity collaborator failed: {other}")),
        })?;
        self.resolve_account(principal.account_id, principal.email)
            .await
    }

    /// Verify the caller and require a spendable credit balance.
    ///
    /// The balance check happens here, before any paid external call, never
    /// after. Exhausted accounts are denied with an entitlement error.
    pub async fn authorize(&self, token: &str) -> Result<Account, Error> {
        let account = self.identify(token).await?;
        if !account.can_spend() {
            return Err(Error::insufficient_credits(NO_CREDITS_MESSAGE));
        }
        Ok(account)
    }

    async fn resolve_account(
        &self,
        id: AccountId,
        email: Option<String>,
    ) -> Result<Account, Error> {
        match self.accounts.fetch(&id).await {
            Ok(account) => Ok(account),
            Err(AccountStoreError::NotFound { .. }) => {
                info!(account_id = %id, "provisioning first-seen account");
                let account = Account::register(id, email.unwrap_or_default());
                self.accounts
                    .create(&account)
                    .await
                    .map_err(map_store_error)?;
                Ok(account)
            }
            Err(err) => Err(map_store_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountStore, MockTokenVerifier, Principal};
    use crate::domain::{ErrorCode, Plan};

    fn verifier_accepting(uid: &'static str) -> MockTokenVerifier {
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().returning(move |_| {
            Ok(Principal {
                account_id: AccountId::new(uid).expect("id"),
                email: Some("user@example.com".to_owned()),
            })
        });
        verifier
    }

    fn stored_account(credits: u32) -> Account {
        let mut account =
            Account::register(AccountId::new("uid-1").expect("id"), "user@example.com");
        account.credits = credits;
        account
    }

    #[tokio::test]
    async fn rejected_credentials_are_unauthorized() {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(TokenVerifierError::rejected("expired")));
        let mut store = MockAccountStore::new();
        store.expect_fetch().times(0);
        let gate = EntitlementGate::new(Arc::new(verifier), Arc::new(store));

        let err = gate.authorize("stale-token").await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn exhausted_accounts_are_denied_before_any_paid_call() {
        let mut store = MockAccountStore::new();
        store
            .expect_fetch()
            .returning(|_| Ok(stored_account(0)));
        let gate = EntitlementGate::new(Arc::new(verifier_accepting("uid-1")), Arc::new(store));

        let err = gate.authorize("token").await.expect_err("no credits");
        assert_eq!(err.code(), ErrorCode::InsufficientCredits);
    }

    #[tokio::test]
    async fn entitled_accounts_pass_through() {
        let mut store = MockAccountStore::new();
        store
            .expect_fetch()
            .returning(|_| Ok(stored_account(3)));
        let gate = EntitlementGate::new(Arc::new(verifier_accepting("uid-1")), Arc::new(store));

        let account = gate.authorize("token").await.expect("entitled");
        assert_eq!(account.credits, 3);
    }

    #[tokio::test]
    async fn first_seen_principals_are_provisioned_on_the_free_plan() {
        let mut store = MockAccountStore::new();
        store.expect_fetch().returning(|id| {
            Err(AccountStoreError::not_found(id.as_ref()))
        });
        store
            .expect_create()
            .withf(|account| account.plan == Plan::Free && account.credits == 5)
            .times(1)
            .returning(|_| Ok(()));
        let gate = EntitlementGate::new(Arc::new(verifier_accepting("uid-new")), Arc::new(store));

        let account = gate.identify("token").await.expect("provisioned");
        assert_eq!(account.plan, Plan::Free);
        assert_eq!(account.email, "user@example.com");
    }

    #[tokio::test]
    async fn identify_does_not_require_credits() {
        let mut store = MockAccountStore::new();
        store
            .expect_fetch()
            .returning(|_| Ok(stored_account(0)));
        let gate = EntitlementGate::new(Arc::new(verifier_accepting("uid-1")), Arc::new(store));

        let account = gate.identify("token").await.expect("identified");
        assert_eq!(account.credits, 0);
    }
}
