//! Driven port for the text-generation collaborator.
//!
//! The domain owns the request shape so handler flows stay adapter-agnostic.
//! One call yields one non-streamed completion; there is no retry and no
//! partial delivery.

use async_trait::async_trait;

use super::define_port_error;

/// Sampling parameters forwarded with a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Softmax temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Penalty applied to frequent tokens.
    pub frequency_penalty: f32,
    /// Penalty applied to already-present tokens.
    pub presence_penalty: f32,
}

/// Domain-owned completion request passed to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt establishing the collaborator's role.
    pub system_prompt: String,
    /// User prompt carrying the task.
    pub user_prompt: String,
    /// Sampling parameters for this request.
    pub params: SamplingParams,
}

define_port_error! {
    /// Errors surfaced while calling the completion collaborator.
    pub enum CompletionSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "completion transport failed: {message}",
        /// The collaborator call exceeded its timeout.
        Timeout { message: String } =>
            "completion timeout: {message}",
        /// The collaborator rate-limited the request.
        RateLimited { message: String } =>
            "completion rate limited: {message}",
        /// The collaborator response could not be decoded.
        Decode { message: String } =>
            "completion response decode failed: {message}",
        /// The collaborator rejected the request.
        InvalidRequest { message: String } =>
            "completion request invalid: {message}",
    }
}

/// Port for requesting a single text completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Produce one completion for the request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError>;
}

/// Fixture implementation echoing the user prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCompletionSource;

#[async_trait]
impl CompletionSource for FixtureCompletionSource {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError> {
        Ok(request.user_prompt.clone())
    }
}
