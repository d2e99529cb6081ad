//! Reqwest-backed chat-completions adapter.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and HTTP error mapping, and JSON decoding into
//! plain completion text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ChatCompletionRequestDto, ChatCompletionResponseDto};
use crate::domain::ports::{CompletionRequest, CompletionSource, CompletionSourceError};

const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Credentials and model selection for chat-completion requests.
pub struct OpenAiIdentity {
    /// API key sent as a bearer credential.
    pub api_key: String,
    /// Model requested for every completion.
    pub model: String,
}

impl OpenAiIdentity {
    /// Identity using the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }
}

/// Completion adapter performing HTTP POST requests against one endpoint.
pub struct OpenAiHttpSource {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, identity: OpenAiIdentity) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            endpoint,
            identity,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        endpoint: Url,
        identity: OpenAiIdentity,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: identity.api_key,
            model: identity.model,
        })
    }
}

#[async_trait]
impl CompletionSource for OpenAiHttpSource {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError> {
        let payload = ChatCompletionRequestDto::from_domain(&self.model, request);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_completion(body.as_ref())
    }
}

fn parse_completion(body: &[u8]) -> Result<String, CompletionSourceError> {
    let decoded: ChatCompletionResponseDto = serde_json::from_slice(body).map_err(|error| {
        CompletionSourceError::decode(format!("invalid completion JSON payload: {error}"))
    })?;
    decoded.into_text().map_err(CompletionSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> CompletionSourceError {
    if error.is_timeout() {
        CompletionSourceError::timeout(error.to_string())
    } else {
        CompletionSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CompletionSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CompletionSourceError::timeout(message)
        }
        _ if status.is_client_error() => CompletionSourceError::invalid_request(message),
        _ => CompletionSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network completion mapping helpers.

    use super::*;
    use crate::domain::ports::SamplingParams;
    use rstest::rstest;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are an academic writing assistant".to_owned(),
            user_prompt: "Write about owls".to_owned(),
            params: SamplingParams {
                temperature: 0.7,
                max_tokens: 4_000,
                top_p: 1.0,
                frequency_penalty: 0.0,
                presence_penalty: 0.0,
            },
        }
    }

    #[test]
    fn serialises_system_then_user_message() {
        let request = request();
        let dto = ChatCompletionRequestDto::from_domain("gpt-4-turbo-preview", &request);
        let json = serde_json::to_value(&dto).expect("serialisable");
        assert_eq!(json["model"], "gpt-4-turbo-preview");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Write about owls");
        assert_eq!(json["max_tokens"], 4_000);
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_http_statuses_to_expected_port_errors(#[case] status: StatusCode) {
        let error = map_status_error(status, b"{\"error\":{\"message\":\"nope\"}}");
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                assert!(matches!(error, CompletionSourceError::RateLimited { .. }));
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                assert!(matches!(error, CompletionSourceError::Timeout { .. }));
            }
            StatusCode::BAD_REQUEST => {
                assert!(matches!(error, CompletionSourceError::InvalidRequest { .. }));
            }
            _ => {
                assert!(matches!(error, CompletionSourceError::Transport { .. }));
            }
        }
    }

    #[test]
    fn parses_the_first_choice_content() {
        let body = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "A paper about owls." } }
            ]
        }"#;
        let text = parse_completion(body.as_bytes()).expect("decodes");
        assert_eq!(text, "A paper about owls.");
    }

    #[test]
    fn rejects_responses_without_choices() {
        let error = parse_completion(br#"{"choices":[]}"#).expect_err("no choices");
        assert!(matches!(error, CompletionSourceError::Decode { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let error = parse_completion(b"not json").expect_err("bad payload");
        assert!(matches!(error, CompletionSourceError::Decode { .. }));
    }

    #[test]
    fn previews_long_bodies_with_an_ellipsis() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }
}
