// Core Client Implementation

use crate::auth::Authenticator;
use crate::config::ServiceConfig;
use crate::middleware::{RequestMiddleware, ResponseMiddleware};
use crate::params::{CreateSessionParams, DeleteSessionParams, MessageParams};
use crate::request::{parse_header, resolve_headers, MediaDefaults, RequestDescriptor, JSON_MEDIA_TYPE};
use crate::transport::{current_tls_config, HttpTransport, RawResponse, TlsConfig, Transport, DEFAULT_TIMEOUT};
use crate::types::*;
use crate::utils::StringValidator;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVICE_URL: &str = "https://gateway.watsonplatform.net/assistant/api";

const CREATE_SESSION_PATH: &str = "/v2/assistants/{assistant_id}/sessions";
const DELETE_SESSION_PATH: &str = "/v2/assistants/{assistant_id}/sessions/{session_id}";
const MESSAGE_PATH: &str = "/v2/assistants/{assistant_id}/sessions/{session_id}/message";

/// Body of a `message` call; both fields are passed through untouched
#[derive(Serialize)]
struct MessageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a MessageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a MessageContext>,
}

/// Client for the assistant v2 API.
///
/// Cheap to clone; clones share the transport, authenticator and middleware.
/// Every operation is split into a synchronous `build_*` step that validates
/// parameters and produces a [`RequestDescriptor`], and an async step that
/// authenticates, runs middleware and dispatches it.
#[derive(Clone)]
pub struct AssistantV2 {
    pub service_url: Url,
    pub version: String,
    default_headers: HeaderMap,
    authenticator: Arc<dyn Authenticator>,
    transport: Arc<dyn Transport>,
    request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

impl AssistantV2 {
    /// Create a client for the given API version date, e.g. `2020-04-01`
    pub fn new(
        version: impl Into<String>,
        authenticator: impl Authenticator + 'static,
    ) -> AssistantResult<Self> {
        Self::with_authenticator(version, Arc::new(authenticator))
    }

    fn with_authenticator(
        version: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
    ) -> AssistantResult<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "Argument error: version was not specified".to_string(),
            ));
        }

        let service_url = Url::parse(DEFAULT_SERVICE_URL)
            .map_err(|e| AssistantError::ConfigError(e.to_string()))?;

        Ok(Self {
            service_url,
            version,
            default_headers: HeaderMap::new(),
            authenticator,
            transport: Arc::new(HttpTransport::new()?),
            request_middleware: Vec::new(),
            response_middleware: Vec::new(),
        })
    }

    /// Create a client from a [`ServiceConfig`]
    pub fn from_config(version: impl Into<String>, config: &ServiceConfig) -> AssistantResult<Self> {
        let mut client = Self::with_authenticator(version, config.authenticator()?)?;
        if let Some(url) = &config.service_url {
            client = client.with_service_url(url)?;
        }
        if config.disable_ssl {
            client = client.disable_ssl_verification()?;
        }
        Ok(client)
    }

    /// Set a custom service URL
    pub fn with_service_url(mut self, url: impl Into<String>) -> AssistantResult<Self> {
        let url = StringValidator::not_empty(url, "service URL")
            .and_then(|u| StringValidator::no_bad_chars(u, "service URL"))
            .map_err(|e| AssistantError::ConfigError(e.to_string()))?;
        let parsed = Url::parse(&url)
            .map_err(|e| AssistantError::ConfigError(format!("invalid service URL `{}`: {}", url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(AssistantError::ConfigError(format!(
                "service URL `{}` cannot carry a path",
                url
            )));
        }
        self.service_url = parsed;
        Ok(self)
    }

    /// Add a header sent with every request, below any per-call override
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> AssistantResult<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Replace the transport, e.g. with a recording double in tests
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Use an HTTP transport that skips certificate verification
    ///
    /// Other settings come from the global TLS configuration.
    pub fn disable_ssl_verification(self) -> AssistantResult<Self> {
        self.with_tls_options(
            TlsConfig {
                cert_verification: false,
                ..current_tls_config()
            },
            DEFAULT_TIMEOUT,
        )
    }

    /// Use an HTTP transport with explicit TLS settings and timeout
    pub fn with_tls_options(mut self, tls: TlsConfig, timeout: Duration) -> AssistantResult<Self> {
        self.transport = Arc::new(HttpTransport::with_options(tls, timeout)?);
        Ok(self)
    }

    /// TLS settings of the current transport, if it exposes any
    pub fn tls_config(&self) -> Option<&TlsConfig> {
        self.transport.tls_config()
    }

    /// Add middleware that processes requests before they're sent
    pub fn add_request_middleware(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.request_middleware.push(Arc::new(middleware));
        self
    }

    /// Add middleware that processes responses after they're received
    pub fn add_response_middleware(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.response_middleware.push(Arc::new(middleware));
        self
    }

    fn descriptor(&self, operation: &'static str, method: Method, path: &'static str) -> RequestDescriptor {
        RequestDescriptor::new(operation, method, path, self.service_url.clone(), &self.version)
    }

    /// Build the request for `create_session` without sending it
    pub fn build_create_session(&self, params: &CreateSessionParams) -> AssistantResult<RequestDescriptor> {
        params.validate()?;

        let headers = resolve_headers(
            &self.default_headers,
            "createSession",
            MediaDefaults {
                accept: Some(JSON_MEDIA_TYPE),
                content_type: None,
            },
            &params.headers,
        )?;

        Ok(self
            .descriptor("createSession", Method::POST, CREATE_SESSION_PATH)
            .path_param("assistant_id", &params.assistant_id)
            .headers(headers))
    }

    /// Build the request for `delete_session` without sending it
    pub fn build_delete_session(&self, params: &DeleteSessionParams) -> AssistantResult<RequestDescriptor> {
        params.validate()?;

        let headers = resolve_headers(
            &self.default_headers,
            "deleteSession",
            MediaDefaults {
                accept: Some(JSON_MEDIA_TYPE),
                content_type: None,
            },
            &params.headers,
        )?;

        Ok(self
            .descriptor("deleteSession", Method::DELETE, DELETE_SESSION_PATH)
            .path_param("assistant_id", &params.assistant_id)
            .path_param("session_id", &params.session_id)
            .headers(headers))
    }

    /// Build the request for `message` without sending it
    pub fn build_message(&self, params: &MessageParams) -> AssistantResult<RequestDescriptor> {
        params.validate()?;

        let body = serde_json::to_value(MessageRequest {
            input: params.input.as_ref(),
            context: params.context.as_ref(),
        })
        .map_err(|e| AssistantError::InvalidParameter(format!("message body: {}", e)))?;

        let headers = resolve_headers(
            &self.default_headers,
            "message",
            MediaDefaults {
                accept: Some(JSON_MEDIA_TYPE),
                content_type: Some(JSON_MEDIA_TYPE),
            },
            &params.headers,
        )?;

        Ok(self
            .descriptor("message", Method::POST, MESSAGE_PATH)
            .path_param("assistant_id", &params.assistant_id)
            .path_param("session_id", &params.session_id)
            .body(body)
            .headers(headers))
    }

    /// Create a new session. A session is used to send user input to a skill
    /// and receive responses; it also maintains the state of the conversation.
    pub async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> AssistantResult<DetailedResponse<SessionResponse>> {
        let request = self.build_create_session(&params)?;
        self.execute(request).await?.into_json()
    }

    /// Delete a session explicitly before it times out
    pub async fn delete_session(&self, params: DeleteSessionParams) -> AssistantResult<DetailedResponse<()>> {
        let request = self.build_delete_session(&params)?;
        Ok(self.execute(request).await?.into_empty())
    }

    /// Send user input to an assistant and receive a response
    pub async fn message(&self, params: MessageParams) -> AssistantResult<DetailedResponse<MessageResponse>> {
        let request = self.build_message(&params)?;
        self.execute(request).await?.into_json()
    }

    /// Authenticate, run middleware and dispatch a built request
    async fn execute(&self, mut request: RequestDescriptor) -> AssistantResult<RawResponse> {
        self.authenticator.authenticate(&mut request.headers).await?;

        for middleware in &self.request_middleware {
            request = middleware.process_request(request).await?;
        }

        log::debug!(
            "dispatching {} {} {}",
            request.operation,
            request.method,
            request.path
        );
        let mut response = self.transport.send(request).await?;

        for middleware in &self.response_middleware {
            response = middleware.process_response(response).await?;
        }

        Ok(response)
    }
}

impl std::fmt::Debug for AssistantV2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantV2")
            .field("service_url", &self.service_url.as_str())
            .field("version", &self.version)
            .field("auth_type", &self.authenticator.auth_type())
            .field("tls", &self.transport.tls_config())
            .field("request_middleware", &self.request_middleware.len())
            .field("response_middleware", &self.response_middleware.len())
            .finish()
    }
}
