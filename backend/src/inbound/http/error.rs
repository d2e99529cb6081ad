//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. The active trace identifier is stitched into the envelope here,
//! not in the domain.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::Value;
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::InsufficientCredits => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(error = %error, "internal error redacted from response");
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

fn envelope(error: &Error) -> Value {
    let mut body = serde_json::to_value(redact_if_internal(error))
        .unwrap_or_else(|_| serde_json::json!({ "code": "internal_error" }));
    if let (Some(object), Some(trace_id)) = (body.as_object_mut(), TraceId::current()) {
        object.insert("traceId".to_owned(), Value::String(trace_id.to_string()));
    }
    body
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(envelope(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid(Error::invalid_request("bad topic"), StatusCode::BAD_REQUEST)]
    #[case::unauthorized(Error::unauthorized("Unauthorized"), StatusCode::UNAUTHORIZED)]
    #[case::credits(
        Error::insufficient_credits("You have no credits left. Please upgrade your plan."),
        StatusCode::PAYMENT_REQUIRED
    )]
    #[case::upstream(
        Error::upstream("Failed to generate paper. Please try again later."),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case::internal(Error::internal("secret detail"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_expected_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn internal_messages_are_redacted() {
        let body = envelope(&Error::internal("database password leaked"));
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["code"], "internal_error");
    }

    #[test]
    fn upstream_messages_stay_visible() {
        let body = envelope(&Error::upstream(
            "Failed to humanize text. Please try again later.",
        ));
        assert_eq!(
            body["message"],
            "Failed to humanize text. Please try again later."
        );
    }

    #[tokio::test]
    async fn envelope_carries_the_active_trace_id() {
        let trace_id: TraceId = "11111111-2222-3333-4444-555555555555"
            .parse()
            .expect("valid UUID");
        let body = TraceId::scope(trace_id, async move {
            envelope(&Error::invalid_request("bad"))
        })
        .await;
        assert_eq!(body["traceId"], trace_id.to_string());
    }

    #[test]
    fn envelope_omits_trace_id_outside_a_request() {
        let body = envelope(&Error::invalid_request("bad"));
        assert!(body.get("traceId").is_none());
    }
}
