use assistant_rs::types::*;
use assistant_rs::CreateSessionParams;
use pretty_assertions::assert_eq;
use reqwest::Method;

mod recording_transport;

use recording_transport::{mock_assistant, VERSION};

#[tokio::test]
async fn test_create_session_passes_the_right_params() {
    let (assistant, transport) = mock_assistant();
    transport.add_response(201, r#"{"session_id":"fake_sessionId"}"#);

    let response = assistant
        .create_session(CreateSessionParams::new("fake_assistantId"))
        .await
        .unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.result.session_id, "fake_sessionId");

    let request = transport.only_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/v2/assistants/{assistant_id}/sessions");
    assert_eq!(request.path_params["assistant_id"], "fake_assistantId");
    assert_eq!(
        request.resolved_path().unwrap(),
        "/v2/assistants/fake_assistantId/sessions"
    );
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), None);
    assert!(request.body.is_none());
    assert_eq!(
        request.query,
        vec![("version".to_string(), VERSION.to_string())]
    );
}

#[tokio::test]
async fn test_create_session_prioritizes_user_given_headers() {
    let (assistant, transport) = mock_assistant();

    let params = CreateSessionParams::new("fake_assistantId")
        .header("Accept", "fake/header")
        .header("Content-Type", "fake/header");
    let _ = assistant.create_session(params).await;

    let request = transport.only_request();
    assert_eq!(request.header("accept"), Some("fake/header"));
    assert_eq!(request.header("content-type"), Some("fake/header"));
}

#[tokio::test]
async fn test_create_session_enforces_required_parameters() {
    let (assistant, transport) = mock_assistant();

    let err = assistant
        .create_session(CreateSessionParams::default())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Missing required parameters"));
    match err {
        AssistantError::MissingRequiredParameters { missing } => {
            assert_eq!(missing, vec!["assistant_id".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_create_session_rejects_only_when_polled() {
    let (assistant, transport) = mock_assistant();

    // Building the future does no work; the error arrives through it
    let mut task = tokio_test::task::spawn(assistant.create_session(CreateSessionParams::default()));
    assert_eq!(transport.call_count(), 0);

    let err = tokio_test::assert_ready_err!(task.poll());
    assert!(matches!(err, AssistantError::MissingRequiredParameters { .. }));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_build_create_session_matches_expected_shape() {
    let (assistant, _transport) = mock_assistant();

    let request = assistant
        .build_create_session(&CreateSessionParams::new("fake_assistantId"))
        .unwrap();

    assert_eq!(request.operation, "createSession");
    assert_eq!(
        request.url().unwrap().as_str(),
        "https://gateway.watsonplatform.net/assistant/api/assistant/api/v2/assistants/fake_assistantId/sessions?version=2018-10-18"
    );
    assert_eq!(
        request.header("x-ibmcloud-sdk-analytics"),
        Some("service_name=conversation;service_version=V2;operation_id=createSession")
    );
    assert!(request
        .header("user-agent")
        .unwrap()
        .starts_with("assistant-rs/"));
}
