// Middleware and Extension Traits

use crate::request::RequestDescriptor;
use crate::transport::RawResponse;
use crate::types::*;
use async_trait::async_trait;

#[async_trait]
pub trait RequestMiddleware: Send + Sync {
    /// Process and possibly modify the request before it reaches the transport
    async fn process_request(&self, request: RequestDescriptor) -> AssistantResult<RequestDescriptor>;
}

#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    /// Process and possibly modify the raw response before deserialization
    async fn process_response(&self, response: RawResponse) -> AssistantResult<RawResponse>;
}
