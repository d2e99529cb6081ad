//! Paper generation and humanization handlers.
//!
//! ```text
//! POST /api/v1/generate   Generate an academic paper
//! POST /api/v1/humanize   Rewrite text to sound more natural
//! ```
//!
//! Both endpoints are credit-gated: the bearer credential is verified and
//! the balance checked before the body is parsed or any collaborator call
//! is made. One credit settles only after a successful call.

use actix_web::{HttpResponse, post, web};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::paper::{invalid_citation_format_error, invalid_topic_error};
use crate::domain::{Artifact, CitationFormat, Error, PaperRequest, TRUNCATION_NOTICE, Topic};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;

/// Generation request body.
///
/// Any client-supplied character limit is ignored; the effective limit
/// always comes from the resolved account.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// What the paper should be about.
    #[serde(default)]
    pub topic: Option<String>,
    /// Citation style: `APA`, `MLA`, or `Chicago`.
    #[serde(default)]
    pub citation_format: Option<String>,
}

/// Humanization request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeRequest {
    /// The text to rewrite. Whitespace-only input counts as missing.
    #[serde(default)]
    pub text: Option<String>,
}

/// Response envelope shared by both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaperResponse {
    /// The generated or rewritten text.
    pub text: String,
    /// Whether the text was cut to the account's character limit.
    /// Omitted from the wire envelope when false.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    /// Advisory message, present when the text was truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Artifact> for PaperResponse {
    fn from(artifact: Artifact) -> Self {
        let message = artifact.truncated.then(|| TRUNCATION_NOTICE.to_owned());
        Self {
            text: artifact.text,
            truncated: artifact.truncated,
            message,
        }
    }
}

/// Decode a JSON body after the caller has been authorised.
///
/// The raw bytes arrive via `web::Bytes` so unauthenticated requests are
/// rejected without ever inspecting the payload.
fn parse_body<T: DeserializeOwned>(body: &web::Bytes) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|err| Error::invalid_request(format!("request body must be valid JSON: {err}")))
}

fn validated_paper_request(request: GenerateRequest) -> ApiResult<PaperRequest> {
    let topic = Topic::new(request.topic.unwrap_or_default())
        .map_err(|err| invalid_topic_error(&err))?;
    let citation_format = request
        .citation_format
        .unwrap_or_default()
        .parse::<CitationFormat>()
        .map_err(|err| invalid_citation_format_error(&err))?;
    Ok(PaperRequest {
        topic,
        citation_format,
    })
}

fn validated_humanize_text(request: HumanizeRequest, limit: usize) -> ApiResult<String> {
    let text = request.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(Error::invalid_request("Please provide text to humanize")
            .with_details(json!({ "field": "text", "code": "missing_text" })));
    }
    if text.chars().count() > limit {
        return Err(Error::invalid_request(format!(
            "Text is too long; please limit to {limit} characters for your plan"
        ))
        .with_details(json!({ "field": "text", "code": "text_too_long" })));
    }
    Ok(text)
}

/// Generate an academic paper.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or over-length topic, unknown citation format,
///   or a malformed body.
/// - `401 Unauthorized`: Missing or rejected bearer credential.
/// - `402 Payment Required`: The account has no credits left.
/// - `500 Internal Server Error`: The completion collaborator failed; no
///   credit is spent.
#[utoipa::path(
    post,
    path = "/api/v1/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Paper generated", body = PaperResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 402, description = "No credits left", body = Error),
        (status = 405, description = "Method not allowed; only POST is supported"),
        (status = 500, description = "Generation failed", body = Error)
    ),
    security(("bearerAuth" = [])),
    tags = ["papers"],
    operation_id = "generatePaper"
)]
#[post("/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    token: BearerToken,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let account = state.gate.authorize(token.as_str()).await?;
    let request = validated_paper_request(parse_body(&body)?)?;

    let artifact = state.papers.generate(&account, &request).await?;
    let account = state.ledger.settle(account).await?;
    info!(
        account_id = %account.id,
        credits_remaining = account.credits,
        truncated = artifact.truncated,
        "paper generated"
    );

    Ok(HttpResponse::Ok().json(PaperResponse::from(artifact)))
}

/// Rewrite text to sound more natural while keeping citations intact.
///
/// # Errors
///
/// - `400 Bad Request`: Missing text, text over the account's character
///   limit, or a malformed body.
/// - `401 Unauthorized`: Missing or rejected bearer credential.
/// - `402 Payment Required`: The account has no credits left.
/// - `500 Internal Server Error`: The completion collaborator failed; no
///   credit is spent.
#[utoipa::path(
    post,
    path = "/api/v1/humanize",
    request_body = HumanizeRequest,
    responses(
        (status = 200, description = "Text humanized", body = PaperResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 402, description = "No credits left", body = Error),
        (status = 405, description = "Method not allowed; only POST is supported"),
        (status = 500, description = "Humanization failed", body = Error)
    ),
    security(("bearerAuth" = [])),
    tags = ["papers"],
    operation_id = "humanizeText"
)]
#[post("/humanize")]
pub async fn humanize(
    state: web::Data<HttpState>,
    token: BearerToken,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let account = state.gate.authorize(token.as_str()).await?;
    let text = validated_humanize_text(parse_body(&body)?, account.max_characters)?;

    let artifact = state.papers.humanize(&account, &text).await?;
    let account = state.ledger.settle(account).await?;
    info!(
        account_id = %account.id,
        credits_remaining = account.credits,
        truncated = artifact.truncated,
        "text humanized"
    );

    Ok(HttpResponse::Ok().json(PaperResponse::from(artifact)))
}
