//! Regression coverage for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case::credits(Error::insufficient_credits("broke"), ErrorCode::InsufficientCredits)]
#[case::upstream(Error::upstream("down"), ErrorCode::UpstreamFailure)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn try_new_rejects_blank_messages() {
    let err = Error::try_new(ErrorCode::InternalError, "   ").expect_err("blank message");
    assert_eq!(err, ErrorValidationError::EmptyMessage);
}

#[test]
fn serialises_in_camel_case_with_snake_case_codes() {
    let error = Error::invalid_request("topic required").with_details(json!({ "field": "topic" }));
    let value = serde_json::to_value(&error).expect("serialise");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], "topic required");
    assert_eq!(value["details"]["field"], "topic");
}

#[test]
fn deserialisation_round_trips() {
    let error = Error::insufficient_credits("no credits left");
    let json = serde_json::to_string(&error).expect("serialise");
    let parsed: Error = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(parsed, error);
}

#[test]
fn deserialisation_rejects_empty_messages() {
    let result = serde_json::from_str::<Error>(r#"{"code":"internal_error","message":""}"#);
    assert!(result.is_err(), "empty message should fail validation");
}
