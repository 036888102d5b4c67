//! Error types

use thiserror::Error;

use crate::envelope::ErrorCode;

/// Errors reported by [`RequestExecutor`](crate::RequestExecutor)
///
/// Every failure of a request is classified into exactly one of these
/// variants and returned through the same `Result` as the success value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Reachability probe reported no connectivity, no request was sent
    #[error("Network not reachable")]
    NetworkUnreachable,
    /// Descriptor URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Response was not a recognizable HTTP response
    #[error("Server error ({code}): {message}")]
    ServerError {
        /// Status code, `0` when no HTTP status was available
        code: u16,
        /// Error message
        message: String,
    },
    /// Transport timeout elapsed
    #[error("Request timeout")]
    Timeout,
    /// Body did not match the requested type
    #[error("Unable to decode response: {0}")]
    DecodeFailure(String),
    /// Successful response carrying an embedded application error
    #[error("Application error ({code}): {message}")]
    ApplicationError {
        /// Application error code as sent by the server
        code: String,
        /// Application error message
        message: String,
    },
    /// Any other transport failure
    #[error("{0}")]
    Unknown(String),
}

impl NetworkError {
    /// Error used when the transport returned something that is not HTTP
    pub(crate) fn not_http() -> Self {
        NetworkError::ServerError {
            code: 0,
            message: "Server error".to_string(),
        }
    }

    /// Check if this is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetworkError::Timeout)
    }

    /// Check if this is an application error signalling an expired session
    pub fn is_session_expired(&self) -> bool {
        match self {
            NetworkError::ApplicationError { code, .. } => {
                ErrorCode::from(code.as_str()).is_session_expired()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::DecodeFailure(err.to_string())
    }
}

impl From<TransportError> for NetworkError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => NetworkError::Timeout,
            other => NetworkError::Unknown(other.to_string()),
        }
    }
}

/// Errors raised by a [`Transport`](crate::Transport) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request or client build error
    #[error("Build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}
