//! Driven port for the identity collaborator.
//!
//! The service never inspects credentials itself; it forwards the bearer
//! token and receives back the principal the provider vouches for.

use async_trait::async_trait;

use crate::domain::account::AccountId;

use super::define_port_error;

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    /// Stable account identifier (the provider's uid).
    pub account_id: AccountId,
    /// Email attached to the credential, when the provider shares it.
    pub email: Option<String>,
}

define_port_error! {
    /// Errors surfaced while verifying a credential.
    pub enum TokenVerifierError {
        /// The provider rejected the credential.
        Rejected { message: String } =>
            "credential rejected: {message}",
        /// Network transport failed before receiving a verdict.
        Transport { message: String } =>
            "identity transport failed: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "identity response decode failed: {message}",
    }
}

/// Port for verifying bearer credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token and resolve the principal behind it.
    async fn verify(&self, token: &str) -> Result<Principal, TokenVerifierError>;
}

/// Fixture verifier accepting any non-empty token as its own account id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTokenVerifier;

#[async_trait]
impl TokenVerifier for FixtureTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, TokenVerifierError> {
        let account_id = AccountId::new(token)
            .map_err(|err| TokenVerifierError::rejected(err.to_string()))?;
        Ok(Principal {
            account_id,
            email: None,
        })
    }
}
