//! Reqwest-backed identity verifier adapter.
//!
//! Forwards bearer tokens to the identity provider's lookup endpoint and
//! maps the vouched-for user record into a domain principal. Transport
//! details only; entitlement decisions stay in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;
use crate::domain::ports::{Principal, TokenVerifier, TokenVerifierError};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Serialize)]
struct LookupRequestDto<'a> {
    #[serde(rename = "idToken")]
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponseDto {
    #[serde(default)]
    users: Vec<LookupUserDto>,
}

#[derive(Debug, Deserialize)]
struct LookupUserDto {
    #[serde(rename = "localId")]
    local_id: String,
    email: Option<String>,
}

/// Verifier adapter performing HTTP POST lookups against one endpoint.
pub struct HttpTokenVerifier {
    client: Client,
    endpoint: Url,
}

impl HttpTokenVerifier {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS))
    }

    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, TokenVerifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&LookupRequestDto { id_token: token })
            .send()
            .await
            .map_err(|error| TokenVerifierError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TokenVerifierError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        parse_principal(body.as_ref())
    }
}

fn map_status_error(status: StatusCode) -> TokenVerifierError {
    if status.is_client_error() {
        TokenVerifierError::rejected(format!("provider returned status {}", status.as_u16()))
    } else {
        TokenVerifierError::transport(format!("provider returned status {}", status.as_u16()))
    }
}

fn parse_principal(body: &[u8]) -> Result<Principal, TokenVerifierError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        TokenVerifierError::decode(format!("invalid lookup JSON payload: {error}"))
    })?;
    let user = decoded
        .users
        .into_iter()
        .next()
        .ok_or_else(|| TokenVerifierError::rejected("token matched no user record"))?;
    let account_id = AccountId::new(user.local_id)
        .map_err(|error| TokenVerifierError::decode(format!("unusable user id: {error}")))?;
    Ok(Principal {
        account_id,
        email: user.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_first_user_record() {
        let body = r#"{
            "users": [
                { "localId": "uid-1", "email": "user@example.com" }
            ]
        }"#;
        let principal = parse_principal(body.as_bytes()).expect("decodes");
        assert_eq!(principal.account_id.as_ref(), "uid-1");
        assert_eq!(principal.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn rejects_empty_user_lists() {
        let error = parse_principal(br#"{"users":[]}"#).expect_err("no user");
        assert!(matches!(error, TokenVerifierError::Rejected { .. }));
    }

    #[test]
    fn rejects_blank_user_ids() {
        let error =
            parse_principal(br#"{"users":[{"localId":""}]}"#).expect_err("blank id");
        assert!(matches!(error, TokenVerifierError::Decode { .. }));
    }

    #[test]
    fn client_statuses_map_to_rejection() {
        assert!(matches!(
            map_status_error(StatusCode::BAD_REQUEST),
            TokenVerifierError::Rejected { .. }
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE),
            TokenVerifierError::Transport { .. }
        ));
    }
}
