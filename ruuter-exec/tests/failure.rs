use ruuter_exec::{classify, CauseCode, Failure, FailureKind, StepExecutionError};
use serde_json::json;

#[test]
fn classification_follows_kind_not_message() {
    let cases = [
        (FailureKind::MissingValue, CauseCode::Null),
        (FailureKind::Script, CauseCode::Script),
        (FailureKind::Network, CauseCode::Network),
        (FailureKind::Integrity, CauseCode::PipelineIntegrity),
        (FailureKind::Cancelled, CauseCode::Unknown),
        (FailureKind::Other, CauseCode::Unknown),
    ];
    let messages = [
        None,
        Some(""),
        Some("null pointer"),
        Some("script error in network layer"),
        Some("E_network"),
    ];

    for (kind, expected) in cases {
        for message in messages {
            let failure = Failure {
                kind,
                message: message.map(str::to_string),
            };
            let err = StepExecutionError::new("step", failure).into_pipeline_error("dsl");
            assert_eq!(err.cause_code, expected, "{kind:?} with {message:?}");
        }
        assert_eq!(classify(kind), expected);
    }
}

#[test]
fn step_wrapper_keeps_message_and_attribution() {
    let err = StepExecutionError::new("fetch", Failure::network("connection reset"));
    assert_eq!(err.message(), Some("connection reset"));
    assert_eq!(err.to_string(), "error executing: fetch");

    let pipeline_err = err.into_pipeline_error("users/create");
    assert_eq!(pipeline_err.dsl_name, "users/create");
    assert_eq!(pipeline_err.step_name, "fetch");
    assert_eq!(pipeline_err.message.as_deref(), Some("connection reset"));
}

#[test]
fn cause_codes_map_to_statuses() {
    assert_eq!(CauseCode::Null.http_status(), 400);
    assert_eq!(CauseCode::Network.http_status(), 502);
    assert_eq!(CauseCode::Script.http_status(), 500);
    assert_eq!(CauseCode::PipelineIntegrity.http_status(), 500);
    assert_eq!(CauseCode::Unknown.http_status(), 500);
}

#[test]
fn error_object_wire_shape() {
    let err = StepExecutionError::new("answer", Failure::missing_value("no value at `x`"))
        .into_pipeline_error("users/create");
    let wire = serde_json::to_value(err.error_object()).unwrap();
    assert_eq!(
        wire,
        json!({
            "dslName": "users/create",
            "stepName": "answer",
            "causeCode": "E_null",
            "message": "no value at `x`"
        })
    );
}
