//! OpenAI outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `CompletionSource` port against the chat-completions endpoint.

mod dto;
mod http_source;

pub use http_source::{OpenAiHttpSource, OpenAiIdentity};
