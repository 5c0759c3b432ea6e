#![allow(dead_code)]

use assistant_rs::types::*;
use assistant_rs::{AssistantV2, NoAuthAuthenticator, RawResponse, RequestDescriptor, Transport};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const VERSION: &str = "2018-10-18";
pub const SERVICE_URL: &str = "https://gateway.watsonplatform.net/assistant/api/assistant/api";

/// Canned outcome for one transport call
#[derive(Clone)]
pub enum MockResponse {
    Success { status: u16, body: String },
    Error(AssistantError),
}

/// Transport double that records every descriptor it is handed and replays
/// canned responses in order. Falls back to `201 {}` when the queue is empty.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<RecordingTransportInner>>,
}

#[derive(Default)]
struct RecordingTransportInner {
    request_history: Vec<RequestDescriptor>,
    responses: VecDeque<MockResponse>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, status: u16, body: impl Into<String>) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(MockResponse::Success {
                status,
                body: body.into(),
            });
        self
    }

    pub fn add_error(&self, error: AssistantError) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(MockResponse::Error(error));
        self
    }

    pub fn get_request_history(&self) -> Vec<RequestDescriptor> {
        self.inner.lock().unwrap().request_history.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().request_history.len()
    }

    /// The single request sent so far; panics if there were none or several
    pub fn only_request(&self) -> RequestDescriptor {
        let history = self.get_request_history();
        assert_eq!(history.len(), 1, "expected exactly one request");
        history.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: RequestDescriptor) -> AssistantResult<RawResponse> {
        let next = {
            let mut inner = self.inner.lock().unwrap();
            inner.request_history.push(request);
            inner.responses.pop_front()
        };

        match next {
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Success { status, body }) => Ok(RawResponse {
                status,
                headers: HeaderMap::new(),
                body,
            }),
            None => Ok(RawResponse {
                status: 201,
                headers: HeaderMap::new(),
                body: "{}".to_string(),
            }),
        }
    }
}

/// A client wired to a fresh recording transport
pub fn mock_assistant() -> (AssistantV2, RecordingTransport) {
    let transport = RecordingTransport::new();
    let assistant = AssistantV2::new(VERSION, NoAuthAuthenticator)
        .unwrap()
        .with_service_url(SERVICE_URL)
        .unwrap()
        .with_transport(transport.clone());
    (assistant, transport)
}
