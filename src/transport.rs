// Transport layer

use crate::request::RequestDescriptor;
use crate::types::*;
use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

lazy_static! {
    static ref CLIENT_CONFIG: Mutex<TlsConfig> = Mutex::new(TlsConfig::default());
}

/// Configuration for TLS
#[derive(Clone, Debug, PartialEq)]
pub struct TlsConfig {
    pub min_tls_version: Option<reqwest::tls::Version>,
    pub cert_verification: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            min_tls_version: Some(reqwest::tls::Version::TLS_1_2),
            cert_verification: true,
        }
    }
}

/// Set global TLS configuration for transports created afterwards
pub fn set_tls_config(config: TlsConfig) {
    if let Ok(mut cfg) = CLIENT_CONFIG.lock() {
        *cfg = config;
    }
}

pub(crate) fn current_tls_config() -> TlsConfig {
    match CLIENT_CONFIG.lock() {
        Ok(guard) => guard.clone(),
        // A poisoned lock still holds a usable value
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// The response as the transport saw it, before deserialization
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn into_json<T: DeserializeOwned>(self) -> AssistantResult<DetailedResponse<T>> {
        let result = serde_json::from_str::<T>(&self.body).map_err(|e| {
            AssistantError::parse_error(e.to_string(), Some(self.body.clone()), Some(e))
        })?;
        Ok(DetailedResponse {
            status: self.status,
            headers: self.headers,
            result,
        })
    }

    pub fn into_empty(self) -> DetailedResponse<()> {
        DetailedResponse {
            status: self.status,
            headers: self.headers,
            result: (),
        }
    }
}

/// Turns a [`RequestDescriptor`] into a response
///
/// Implementations must not reinterpret the descriptor: headers, body and
/// URL go out exactly as built.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> AssistantResult<RawResponse>;

    /// TLS settings in effect, for transports that own a TLS stack
    fn tls_config(&self) -> Option<&TlsConfig> {
        None
    }
}

/// reqwest-backed transport
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http_client: HttpClient,
    tls_config: TlsConfig,
}

impl HttpTransport {
    /// Build a transport from the global TLS configuration
    pub fn new() -> AssistantResult<Self> {
        Self::with_options(current_tls_config(), DEFAULT_TIMEOUT)
    }

    pub fn with_options(tls_config: TlsConfig, timeout: Duration) -> AssistantResult<Self> {
        if !tls_config.cert_verification {
            log::warn!("TLS certificate verification is disabled");
        }

        let mut builder = HttpClient::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!tls_config.cert_verification);

        if let Some(version) = tls_config.min_tls_version {
            builder = builder.min_tls_version(version);
        }

        let http_client = builder.build().map_err(|e| {
            AssistantError::ConfigError(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            tls_config,
        })
    }

    /// Map non-success statuses to errors
    async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> AssistantResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AssistantError::rate_limited(retry_after));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("failed to read {} error body: {}", status, e);
                String::new()
            }
        };
        let message = extract_error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(AssistantError::api_error(
            sanitize_error_message(&message),
            status.as_u16(),
            if body.is_empty() { None } else { Some(body) },
        ))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> AssistantResult<RawResponse> {
        let url = request.url()?;
        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                AssistantError::InvalidParameter(format!("request body is not serializable: {}", e))
            })?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await?;
        let response = self.handle_error_response(response).await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn tls_config(&self) -> Option<&TlsConfig> {
        Some(&self.tls_config)
    }
}

/// Pull a human-readable message out of a service error body
///
/// Checks `error`, `message`, `errorMessage`, `msg`, then `errors[0].message`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    ["error", "message", "errorMessage", "msg"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .or_else(|| {
            value
                .get("errors")
                .and_then(|errors| errors.get(0))
                .and_then(|first| first.get("message"))
                .and_then(Value::as_str)
        })
        .map(String::from)
}
