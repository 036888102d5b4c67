//! Executor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Whether successful bodies are inspected for an embedded application error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeCheck {
    /// Decode the body as a [`ResponseEnvelope`](crate::ResponseEnvelope) first
    #[default]
    Enabled,
    /// Decode straight into the requested type
    Disabled,
}

/// Immutable configuration of a [`RequestExecutor`](crate::RequestExecutor)
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Timeout used when a descriptor does not carry its own
    #[serde(rename = "default_timeout_secs")]
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub default_timeout: Duration,
    /// Application error detection
    pub envelope_check: EnvelopeCheck,
    /// Emit response bodies at debug level on the `netlayer::response` target
    pub log_response_bodies: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            envelope_check: EnvelopeCheck::default(),
            log_response_bodies: false,
        }
    }
}

impl ExecutorConfig {
    /// Configuration with the given default timeout
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            default_timeout,
            ..Default::default()
        }
    }

    /// Set the envelope check
    pub fn envelope_check(mut self, envelope_check: EnvelopeCheck) -> Self {
        self.envelope_check = envelope_check;
        self
    }

    /// Enable or disable response body logging
    pub fn log_response_bodies(mut self, enabled: bool) -> Self {
        self.log_response_bodies = enabled;
        self
    }

    /// Timeout for a request, preferring the per-request value
    pub fn effective_timeout(&self, request_timeout: Option<Duration>) -> Duration {
        request_timeout.unwrap_or(self.default_timeout)
    }
}
