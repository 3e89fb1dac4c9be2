//! Behaviour of the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> TraceId {
    TRACE_ID.parse().expect("fixture uuid is valid")
}

#[rstest]
#[case(ErrorCode::ArgumentRequired, 400)]
#[case(ErrorCode::Unauthorized, 401)]
#[case(ErrorCode::IncorrectData, 422)]
#[case(ErrorCode::Forbidden, 403)]
#[case(ErrorCode::DataNotFound, 404)]
#[case(ErrorCode::DataAlreadyExist, 409)]
#[case(ErrorCode::StorageFailure, 500)]
fn classification_is_stable(#[case] code: ErrorCode, #[case] expected: u16) {
    assert_eq!(code.classification(), expected);
}

#[rstest]
fn constructors_set_their_code() {
    let cases = [
        (Error::argument_required("x"), ErrorCode::ArgumentRequired),
        (Error::unauthorized("x"), ErrorCode::Unauthorized),
        (Error::incorrect_data("x"), ErrorCode::IncorrectData),
        (Error::forbidden("x"), ErrorCode::Forbidden),
        (Error::data_not_found("x"), ErrorCode::DataNotFound),
        (Error::data_already_exist("x"), ErrorCode::DataAlreadyExist),
        (Error::storage_failure("x"), ErrorCode::StorageFailure),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code);
    }
}

#[rstest]
fn blank_message_falls_back_to_generic_wording() {
    let err = Error::new(ErrorCode::DataNotFound, "  ");
    assert_eq!(err.message(), "data not found");
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::Forbidden, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::forbidden("no").try_with_trace_id(" ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn missing_field_names_the_field() {
    let err = Error::missing_field("title");
    assert_eq!(err.code(), ErrorCode::ArgumentRequired);
    assert_eq!(err.message(), "title is required");
    assert_eq!(err.details(), Some(&json!({ "field": "title" })));
}

#[rstest]
fn no_trace_id_outside_scope() {
    assert!(Error::storage_failure("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn captures_trace_id_in_scope(trace_id: TraceId) {
    let err = TraceId::scope(trace_id, async { Error::data_not_found("mission") }).await;
    assert_eq!(err.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_with_snake_case_code() {
    let err = Error::data_already_exist("duplicate")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "email" }));
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "data_already_exist",
            "message": "duplicate",
            "traceId": TRACE_ID,
            "details": { "field": "email" }
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let payload = json!({ "code": "forbidden", "message": "" });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(trace_id: TraceId) {
    let payload = json!({ "code": "unauthorized", "message": "login" });
    let err = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;
    assert!(err.trace_id().is_none());
}
