// Core types and errors

use lazy_static::lazy_static;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The result type used throughout the assistant SDK
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Convert reqwest::Error to our AssistantError
///
/// `details` names the failure kind: `timeout`, `connect`, `body` or `decode`.
impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        let details = if err.is_timeout() {
            Some("timeout")
        } else if err.is_connect() {
            Some("connect")
        } else if err.is_body() {
            Some("body")
        } else if err.is_decode() {
            Some("decode")
        } else {
            None
        };
        AssistantError::request_error(err.to_string(), details.map(String::from), Some(err))
    }
}

/// A secure container for credentials that zeroes its buffer when dropped
pub struct SecureToken {
    token: String,
}

impl SecureToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }
}

impl Deref for SecureToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl Drop for SecureToken {
    fn drop(&mut self) {
        let mut bytes = std::mem::take(&mut self.token).into_bytes();
        bytes.iter_mut().for_each(|b| *b = 0);
    }
}

// Keep credentials out of logs and debug output
impl fmt::Debug for SecureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureToken([REDACTED])")
    }
}

impl fmt::Display for SecureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED TOKEN]")
    }
}

impl Clone for SecureToken {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum AssistantError {
    #[error("Missing required parameters: {}", .missing.join(", "))]
    MissingRequiredParameters { missing: Vec<String> },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("API request failed: {message}")]
    RequestError {
        message: String,
        details: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("API returned error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        response_body: Option<String>,
    },

    #[error("Rate limited by API: retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Failed to parse API response: {message}")]
    ParseError {
        message: String,
        source_text: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },
}

impl AssistantError {
    pub fn missing_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let error = Self::MissingRequiredParameters {
            missing: names.into_iter().map(Into::into).collect(),
        };
        log::error!("{}", error);
        error
    }

    pub fn request_error<T: Into<String>>(
        message: T,
        details: Option<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let error = Self::RequestError {
            message: message.into(),
            details,
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        log::error!("{}", error);
        error
    }

    pub fn parse_error<T: Into<String>>(
        message: T,
        source_text: Option<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let error = Self::ParseError {
            message: message.into(),
            source_text,
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };
        log::error!("{}", error);
        error
    }

    pub fn api_error<T: Into<String>>(
        message: T,
        status: u16,
        response_body: Option<String>,
    ) -> Self {
        let error = Self::ApiError {
            status,
            message: message.into(),
            response_body,
        };
        log::error!("{}", error);
        error
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        let error = Self::RateLimited { retry_after };
        log::error!("{}", error);
        error
    }

    /// HTTP status attached to the error, if it came from the service
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Failure kind of a transport error, e.g. `timeout` or `connect`
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::RequestError { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Self::RequestError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            Self::ParseError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            _ => None,
        }
    }
}

lazy_static! {
    static ref KEY_LIKE: regex::Regex = regex::Regex::new(r"[A-Za-z0-9_-]{20,}")
        .unwrap_or_else(|_| regex::Regex::new(r"$^").unwrap());
}

/// Strip long key-like tokens from messages that came back from the service
pub fn sanitize_error_message(message: &str) -> String {
    KEY_LIKE.replace_all(message, "[REDACTED]").into_owned()
}

/// A service response together with its HTTP status and headers
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status: u16,
    pub headers: HeaderMap,
    pub result: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

/// User input sent with a message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MessageInputOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<RuntimeIntent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<RuntimeEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<String>,
    /// Fields this SDK does not model, sent back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageInput {
    /// Plain text input
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message_type: Some("text".to_string()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: MessageInputOptions) -> Self {
        self.options = Some(options);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageInputOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_intents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_context: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Conversation state carried between turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<MessageContextGlobal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Map<String, Value>>,
    /// Fields this SDK does not model, sent back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContextGlobal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<MessageContextGlobalSystem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContextGlobalSystem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeIntent {
    pub intent: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEntity {
    pub entity: String,
    pub location: Vec<i64>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogNodeAction {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    pub result_variable: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogNodeOutputOptionsElement {
    pub label: String,
    pub value: Value,
}

/// One entry of `output.generic`, tagged by `response_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum RuntimeResponseGeneric {
    Text {
        text: String,
    },
    Pause {
        time: u64,
        #[serde(default)]
        typing: Option<bool>,
    },
    Image {
        source: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    #[serde(rename = "option")]
    Choice {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        preference: Option<String>,
        #[serde(default)]
        options: Vec<DialogNodeOutputOptionsElement>,
    },
    ConnectToAgent {
        #[serde(default)]
        message_to_human_agent: Option<String>,
        #[serde(default)]
        topic: Option<String>,
    },
    Suggestion {
        title: String,
        #[serde(default)]
        suggestions: Vec<Value>,
    },
    /// A response type this SDK version does not model
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageOutput {
    #[serde(default)]
    pub generic: Vec<RuntimeResponseGeneric>,
    #[serde(default)]
    pub intents: Vec<RuntimeIntent>,
    #[serde(default)]
    pub entities: Vec<RuntimeEntity>,
    #[serde(default)]
    pub actions: Vec<DialogNodeAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub output: MessageOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,
}

impl MessageResponse {
    /// Concatenate every text response, one per line
    ///
    /// Returns None when the assistant produced no text output.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .output
            .generic
            .iter()
            .filter_map(|g| match g {
                RuntimeResponseGeneric::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// The highest-confidence intent, if any
    pub fn top_intent(&self) -> Option<&RuntimeIntent> {
        self.output
            .intents
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}
