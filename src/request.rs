// Request descriptors and header resolution

use crate::params::HeaderOverrides;
use crate::types::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Header carrying the service name, API version and operation id
pub const ANALYTICS_HEADER: &str = "x-ibmcloud-sdk-analytics";

pub(crate) const JSON_MEDIA_TYPE: &str = "application/json";

const SDK_USER_AGENT: &str = concat!("assistant-rs/", env!("CARGO_PKG_VERSION"));

/// A fully resolved HTTP request, built fresh for every call and consumed
/// once by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Operation id, e.g. `createSession`
    pub operation: &'static str,
    pub method: Method,
    /// Path template with `{name}` placeholders
    pub path: &'static str,
    pub path_params: BTreeMap<&'static str, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub service_url: Url,
}

impl RequestDescriptor {
    pub(crate) fn new(
        operation: &'static str,
        method: Method,
        path: &'static str,
        service_url: Url,
        version: &str,
    ) -> Self {
        Self {
            operation,
            method,
            path,
            path_params: BTreeMap::new(),
            query: vec![("version".to_string(), version.to_string())],
            body: None,
            headers: HeaderMap::new(),
            service_url,
        }
    }

    pub(crate) fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path_params.insert(name, value.into());
        self
    }

    pub(crate) fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Header value as a string, if present and printable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The path with every placeholder replaced by its raw value
    pub fn resolved_path(&self) -> AssistantResult<String> {
        Ok(format!("/{}", self.bound_segments()?.join("/")))
    }

    /// The final URL: service URL, bound path segments (percent-encoded) and query
    pub fn url(&self) -> AssistantResult<Url> {
        let segments = self.bound_segments()?;
        let mut url = self.service_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AssistantError::ConfigError(format!(
                    "service URL cannot carry a path: {}",
                    self.service_url
                ))
            })?
            .pop_if_empty()
            .extend(segments.iter());

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        log::trace!("{} resolved to {}", self.operation, url);
        Ok(url)
    }

    fn bound_segments(&self) -> AssistantResult<Vec<&str>> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => self
                        .path_params
                        .get(name)
                        .map(String::as_str)
                        .ok_or_else(|| {
                            AssistantError::InvalidParameter(format!(
                                "no value bound for path parameter `{}`",
                                name
                            ))
                        }),
                    None => Ok(segment),
                }
            })
            .collect()
    }
}

/// Media-type defaults an operation computes before user overrides apply
#[derive(Debug, Clone, Copy)]
pub(crate) struct MediaDefaults {
    pub accept: Option<&'static str>,
    pub content_type: Option<&'static str>,
}

/// Layer headers from lowest to highest precedence: client defaults, SDK
/// headers, media defaults, then per-call overrides.
pub(crate) fn resolve_headers(
    client_defaults: &HeaderMap,
    operation: &str,
    media: MediaDefaults,
    overrides: &HeaderOverrides,
) -> AssistantResult<HeaderMap> {
    let mut headers = client_defaults.clone();

    headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
    let analytics = format!(
        "service_name=conversation;service_version=V2;operation_id={}",
        operation
    );
    headers.insert(
        HeaderName::from_static(ANALYTICS_HEADER),
        HeaderValue::from_str(&analytics)
            .map_err(|e| AssistantError::InvalidParameter(e.to_string()))?,
    );

    if let Some(accept) = media.accept {
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
    }
    if let Some(content_type) = media.content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    for (name, value) in overrides {
        let (name, value) = parse_header(name, value)?;
        headers.insert(name, value);
    }

    log::trace!("{} resolved {} headers", operation, headers.len());
    Ok(headers)
}

pub(crate) fn parse_header(name: &str, value: &str) -> AssistantResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        AssistantError::InvalidParameter(format!("invalid header name `{}`: {}", name, e))
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| {
        AssistantError::InvalidParameter(format!("invalid value for header `{}`: {}", name, e))
    })?;
    Ok((header_name, header_value))
}
