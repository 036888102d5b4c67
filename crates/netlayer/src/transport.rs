//! HTTP transport seam

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::TransportError;
use crate::request::Method;
use crate::response::RawResponse;

/// A fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Parsed request URL
    pub url: Url,
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Vec<u8>>,
    /// Effective timeout for the whole exchange
    pub timeout: Duration,
}

/// Performs a single HTTP exchange
///
/// A transport must not retry; one call maps to one outstanding request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send the request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}
