use assistant_rs::types::*;
use assistant_rs::MessageParams;
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;

mod recording_transport;

use recording_transport::mock_assistant;

fn sample_context() -> MessageContext {
    MessageContext {
        global: Some(MessageContextGlobal {
            system: Some(MessageContextGlobalSystem {
                timezone: Some("Europe/Berlin".to_string()),
                user_id: Some("user-42".to_string()),
                turn_count: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_message_passes_the_right_params() {
    let (assistant, transport) = mock_assistant();
    transport.add_response(
        200,
        r#"{"output":{"generic":[{"response_type":"text","text":"Hi there"}]}}"#,
    );

    let input = MessageInput::text("fake_input");
    let context = sample_context();
    let params = MessageParams::new("fake_assistantId", "fake_sessionId")
        .input(input.clone())
        .context(context.clone());

    let response = assistant.message(params).await.unwrap();
    assert_eq!(response.result.text().as_deref(), Some("Hi there"));

    let request = transport.only_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.path,
        "/v2/assistants/{assistant_id}/sessions/{session_id}/message"
    );
    assert_eq!(request.path_params["assistant_id"], "fake_assistantId");
    assert_eq!(request.path_params["session_id"], "fake_sessionId");
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let body = request.body.expect("message carries a body");
    let sent_input: MessageInput = serde_json::from_value(body["input"].clone()).unwrap();
    let sent_context: MessageContext = serde_json::from_value(body["context"].clone()).unwrap();
    assert_eq!(sent_input, input);
    assert_eq!(sent_context, context);
}

#[test]
fn test_build_message_body_and_path() {
    let (assistant, _transport) = mock_assistant();

    let request = assistant
        .build_message(&MessageParams::new("a", "s").text("fake_input"))
        .unwrap();

    assert_eq!(
        request.resolved_path().unwrap(),
        "/v2/assistants/a/sessions/s/message"
    );
    assert_eq!(
        request.body,
        Some(json!({"input": {"message_type": "text", "text": "fake_input"}}))
    );
}

#[test]
fn test_build_message_without_input_sends_empty_object() {
    let (assistant, _transport) = mock_assistant();

    let request = assistant.build_message(&MessageParams::new("a", "s")).unwrap();
    assert_eq!(request.body, Some(json!({})));
}

#[tokio::test]
async fn test_message_prioritizes_user_given_headers() {
    let (assistant, transport) = mock_assistant();

    let params = MessageParams::new("fake_assistantId", "fake_sessionId")
        .header("Accept", "fake/header")
        .header("Content-Type", "fake/header");
    let _ = assistant.message(params).await;

    let request = transport.only_request();
    assert_eq!(request.header("accept"), Some("fake/header"));
    assert_eq!(request.header("content-type"), Some("fake/header"));
}

#[tokio::test]
async fn test_message_enforces_required_parameters() {
    let (assistant, transport) = mock_assistant();

    let err = assistant.message(MessageParams::default()).await.unwrap_err();

    assert!(err.to_string().contains("Missing required parameters"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_message_rejects_invalid_header_override_before_sending() {
    let (assistant, transport) = mock_assistant();

    let params = MessageParams::new("a", "s").header("Bad Header", "x");
    let err = assistant.message(params).await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidParameter(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_message_reports_unparseable_responses() {
    let (assistant, transport) = mock_assistant();
    transport.add_response(200, "<html>gateway timeout</html>");

    let err = assistant
        .message(MessageParams::new("a", "s").text("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::ParseError { .. }));
}

#[tokio::test]
async fn test_concurrent_messages_build_independent_requests() {
    let (assistant, transport) = mock_assistant();
    for _ in 0..3 {
        transport.add_response(200, r#"{"output":{}}"#);
    }

    let calls = ["one", "two", "three"]
        .iter()
        .map(|text| assistant.message(MessageParams::new("a", "s").text(*text)));
    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(Result::is_ok));

    let mut texts: Vec<String> = transport
        .get_request_history()
        .into_iter()
        .map(|r| r.body.unwrap()["input"]["text"].as_str().unwrap().to_string())
        .collect();
    texts.sort();
    assert_eq!(texts, vec!["one", "three", "two"]);
}

#[test]
fn test_build_message_sends_service_context_back_verbatim() {
    let (assistant, _transport) = mock_assistant();

    let context_json = json!({
        "global": {
            "session_id": "sess-1",
            "system": {"turn_count": 2, "locale": "en-us", "state": "opaque"}
        },
        "skills": {"main skill": {"user_defined": {"account": "123"}}},
        "integrations": {"chat": {"browser_info": {"page_url": "https://example.com"}}}
    });
    let input_json = json!({
        "text": "hi",
        "options": {"spelling": {"suggestions": true}, "export": true}
    });

    let context: MessageContext = serde_json::from_value(context_json.clone()).unwrap();
    let input: MessageInput = serde_json::from_value(input_json.clone()).unwrap();
    assert_eq!(
        context.global.as_ref().unwrap().extra["session_id"],
        json!("sess-1")
    );

    let request = assistant
        .build_message(&MessageParams::new("a", "s").input(input).context(context))
        .unwrap();

    let body = request.body.unwrap();
    assert_eq!(body["context"], context_json);
    assert_eq!(body["input"], input_json);
}
