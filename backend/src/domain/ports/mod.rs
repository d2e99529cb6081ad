//! Driven ports for the external collaborators.
//!
//! Each port is an `async_trait` trait with a thiserror error enum and,
//! where useful, a fixture implementation for wiring and doc examples.
//! Outbound adapters implement these; the domain never sees transport
//! details.

mod account_store;
mod completion_source;
mod macros;
mod token_verifier;

pub(crate) use macros::define_port_error;

pub use account_store::{AccountStore, AccountStoreError, AccountWatch};
pub use completion_source::{
    CompletionRequest, CompletionSource, CompletionSourceError, FixtureCompletionSource,
    SamplingParams,
};
pub use token_verifier::{FixtureTokenVerifier, Principal, TokenVerifier, TokenVerifierError};

#[cfg(test)]
pub use account_store::MockAccountStore;
#[cfg(test)]
pub use completion_source::MockCompletionSource;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
