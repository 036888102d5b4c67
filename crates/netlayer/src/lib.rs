//! Reachability-gated HTTP request layer
//!
//! This crate turns a [`RequestDescriptor`] into a typed value or a typed
//! [`NetworkError`]. Before any request is sent the [`ReachabilityProbe`] is
//! consulted and the URL is validated. Successful bodies are checked for an
//! embedded application error (see [`ResponseEnvelope`]) and then decoded as
//! JSON into the caller's type.
//!
//! The HTTP exchange itself goes through the [`Transport`] trait; the
//! default backend uses reqwest.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use netlayer::{NetworkError, RequestDescriptor, RequestExecutor};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ApiResponse {
//!     value: i64,
//! }
//!
//! async fn example() -> Result<ApiResponse, NetworkError> {
//!     let executor = RequestExecutor::with_default_timeout(Duration::from_secs(30));
//!     executor
//!         .execute(RequestDescriptor::get("https://api.example.com/data"))
//!         .await
//! }
//! ```

mod backends;
mod config;
mod envelope;
mod error;
mod executor;
mod reachability;
mod request;
mod response;
mod transport;

#[cfg(feature = "reqwest")]
pub use backends::ReqwestTransport;
pub use config::{EnvelopeCheck, ExecutorConfig, DEFAULT_TIMEOUT};
pub use envelope::{ErrorCode, ResponseEnvelope};
pub use error::{NetworkError, TransportError};
pub use executor::{RequestExecutor, Requestable};
pub use reachability::{AlwaysReachable, ReachabilityFlag, ReachabilityProbe};
pub use request::{Method, RequestDescriptor};
pub use response::RawResponse;
pub use transport::{Transport, TransportRequest};
