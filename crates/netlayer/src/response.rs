//! Raw HTTP response

use serde::de::DeserializeOwned;

use crate::error::NetworkError;

/// Raw response returned by a [`Transport`](crate::Transport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    /// Create a new RawResponse
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Attach response headers
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Check if the status is a recognizable HTTP status (100-599)
    pub fn is_http(&self) -> bool {
        (100..600).contains(&self.status)
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response and return the body
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NetworkError> {
        serde_json::from_slice(&self.body).map_err(NetworkError::from)
    }

    /// Body pretty-printed as JSON, `None` if it is not JSON
    pub fn pretty_json(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        serde_json::to_string_pretty(&value).ok()
    }
}
