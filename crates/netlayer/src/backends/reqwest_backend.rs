//! reqwest-based Transport implementation

use tracing::instrument;

use crate::error::TransportError;
use crate::request::Method;
use crate::response::RawResponse;
use crate::transport::{Transport, TransportRequest};

/// reqwest-based transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Create a new transport with default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a transport from an existing reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let TransportRequest {
            url,
            method,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self
            .inner
            .request(to_reqwest_method(method), url)
            .timeout(timeout);

        for (key, value) in headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(RawResponse::new(status, body.to_vec()).with_headers(headers))
    }
}
