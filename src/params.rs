//! Per-operation parameters.
//!
//! Required identifiers are taken by each `new` constructor. The structs also
//! implement `Default`; a defaulted struct leaves the identifiers empty and the
//! call is rejected with `MissingRequiredParameters` before anything is sent.

use crate::types::{AssistantResult, MessageContext, MessageInput};
use crate::utils::require_params;

/// Header overrides supplied with a single call. They win over every
/// header the client computes.
pub type HeaderOverrides = Vec<(String, String)>;

#[derive(Debug, Clone, Default)]
pub struct CreateSessionParams {
    pub assistant_id: String,
    pub headers: HeaderOverrides,
}

impl CreateSessionParams {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn validate(&self) -> AssistantResult<()> {
        require_params(&[("assistant_id", self.assistant_id.as_str())])
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteSessionParams {
    pub assistant_id: String,
    pub session_id: String,
    pub headers: HeaderOverrides,
}

impl DeleteSessionParams {
    pub fn new(assistant_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            session_id: session_id.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn validate(&self) -> AssistantResult<()> {
        require_params(&[
            ("assistant_id", self.assistant_id.as_str()),
            ("session_id", self.session_id.as_str()),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageParams {
    pub assistant_id: String,
    pub session_id: String,
    pub input: Option<MessageInput>,
    pub context: Option<MessageContext>,
    pub headers: HeaderOverrides,
}

impl MessageParams {
    pub fn new(assistant_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    pub fn input(mut self, input: MessageInput) -> Self {
        self.input = Some(input);
        self
    }

    /// Shorthand for a plain text input
    pub fn text(self, text: impl Into<String>) -> Self {
        self.input(MessageInput::text(text))
    }

    pub fn context(mut self, context: MessageContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn validate(&self) -> AssistantResult<()> {
        require_params(&[
            ("assistant_id", self.assistant_id.as_str()),
            ("session_id", self.session_id.as_str()),
        ])
    }
}
