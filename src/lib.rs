//! # assistant-rs: a Rust SDK for the conversational assistant v2 API
//!
//! The client maps three operations onto HTTP requests:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | `create_session` | POST | `/v2/assistants/{assistant_id}/sessions` |
//! | `delete_session` | DELETE | `/v2/assistants/{assistant_id}/sessions/{session_id}` |
//! | `message` | POST | `/v2/assistants/{assistant_id}/sessions/{session_id}/message` |
//!
//! Required parameters are checked before anything is sent. A call with a
//! missing parameter resolves to [`AssistantError::MissingRequiredParameters`]
//! through the same future that would carry the response, and the transport
//! is never invoked.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use assistant_rs::{AssistantV2, BearerTokenAuthenticator, CreateSessionParams, MessageParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assistant = AssistantV2::new("2020-04-01", BearerTokenAuthenticator::new("token")?)?
//!         .with_service_url("https://api.us-south.assistant.example.com")?;
//!
//!     let session = assistant
//!         .create_session(CreateSessionParams::new("my-assistant-id"))
//!         .await?;
//!
//!     let reply = assistant
//!         .message(MessageParams::new("my-assistant-id", &session.result.session_id).text("Hello"))
//!         .await?;
//!
//!     if let Some(text) = reply.result.text() {
//!         println!("{}", text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
mod middleware;
pub mod params;
pub mod request;
pub mod transport;
pub mod types;
pub mod utils;

pub use auth::{Authenticator, BasicAuthenticator, BearerTokenAuthenticator, NoAuthAuthenticator};
pub use client::{AssistantV2, DEFAULT_SERVICE_URL};
pub use config::{AuthType, ServiceConfig};
pub use middleware::{RequestMiddleware, ResponseMiddleware};
pub use params::{CreateSessionParams, DeleteSessionParams, MessageParams};
pub use request::RequestDescriptor;
pub use transport::{set_tls_config, HttpTransport, RawResponse, TlsConfig, Transport};
pub use types::{
    sanitize_error_message, AssistantError, AssistantResult, DetailedResponse, MessageContext,
    MessageContextGlobal, MessageContextGlobalSystem, MessageInput, MessageInputOptions,
    MessageOutput, MessageResponse, RuntimeEntity, RuntimeIntent, RuntimeResponseGeneric,
    SecureToken, SessionResponse,
};

pub mod prelude {
    //! Convenient imports for commonly used types and functions
    pub use crate::{
        from_env, AssistantError, AssistantResult, AssistantV2, CreateSessionParams,
        DeleteSessionParams, MessageContext, MessageInput, MessageParams, MessageResponse,
    };
}

/// Create a client configured from `ASSISTANT_*` environment variables
pub fn from_env(version: impl Into<String>) -> AssistantResult<AssistantV2> {
    let config = ServiceConfig::from_env(config::DEFAULT_PREFIX)?;
    AssistantV2::from_config(version, &config)
}
