//! Outbound adapters implementing the driven ports.

mod accounts;
mod identity;
mod openai;

pub use accounts::InMemoryAccountStore;
pub use identity::HttpTokenVerifier;
pub use openai::{OpenAiHttpSource, OpenAiIdentity};
