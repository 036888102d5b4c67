//! Request executor

use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

#[cfg(feature = "reqwest")]
use crate::backends::ReqwestTransport;
use crate::config::{EnvelopeCheck, ExecutorConfig};
use crate::envelope::ResponseEnvelope;
use crate::error::NetworkError;
#[cfg(feature = "reqwest")]
use crate::reachability::AlwaysReachable;
use crate::reachability::ReachabilityProbe;
use crate::request::RequestDescriptor;
use crate::response::RawResponse;
use crate::transport::{Transport, TransportRequest};

/// Something that can execute a [`RequestDescriptor`] into a typed value
#[async_trait::async_trait]
pub trait Requestable: Send + Sync {
    /// Execute the request and decode the JSON body into `R`
    async fn request<R>(&self, descriptor: RequestDescriptor) -> Result<R, NetworkError>
    where
        R: DeserializeOwned + Send;
}

/// Executes request descriptors against a [`Transport`]
///
/// Each call is gated on the [`ReachabilityProbe`], sends exactly one
/// request and resolves to exactly one outcome: the decoded value or a
/// classified [`NetworkError`]. Nothing is retried.
///
/// The result is delivered on the task that awaits the returned future.
/// Dropping that future before it resolves cancels the in-flight request.
#[derive(Debug, Clone)]
pub struct RequestExecutor<P, T> {
    config: ExecutorConfig,
    probe: P,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl RequestExecutor<AlwaysReachable, ReqwestTransport> {
    /// Executor with the given default timeout that assumes the network is
    /// always reachable
    pub fn with_default_timeout(default_timeout: std::time::Duration) -> Self {
        Self::new(ExecutorConfig::new(default_timeout), AlwaysReachable)
    }
}

#[cfg(feature = "reqwest")]
impl<P: ReachabilityProbe> RequestExecutor<P, ReqwestTransport> {
    /// Executor backed by a default reqwest transport
    pub fn new(config: ExecutorConfig, probe: P) -> Self {
        Self::with_transport(config, probe, ReqwestTransport::new())
    }
}

impl<P, T> RequestExecutor<P, T>
where
    P: ReachabilityProbe,
    T: Transport,
{
    /// Executor with a custom transport
    pub fn with_transport(config: ExecutorConfig, probe: P, transport: T) -> Self {
        Self {
            config,
            probe,
            transport,
        }
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Reachability probe
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute the request and decode the JSON body into `R`
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method(), url = %descriptor.url()))]
    pub async fn execute<R>(&self, descriptor: RequestDescriptor) -> Result<R, NetworkError>
    where
        R: DeserializeOwned,
    {
        let result = self
            .send(descriptor)
            .await
            .and_then(|response| self.decode(&response));

        if let Err(err) = &result {
            tracing::warn!("Request failed: {}", err);
        }

        result
    }

    /// Execute the request and return the raw response
    ///
    /// Reachability, URL validation and the HTTP check still apply, but the
    /// body is left untouched.
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<RawResponse, NetworkError> {
        let RequestDescriptor {
            url,
            method,
            headers,
            body,
            timeout: request_timeout,
        } = descriptor;
        let timeout = self.config.effective_timeout(request_timeout);

        if !self.probe.is_reachable() {
            return Err(NetworkError::NetworkUnreachable);
        }

        let url =
            Url::parse(&url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(
            "Sending {} {} (timeout {}s)",
            method,
            url,
            timeout.as_secs_f64()
        );

        let response = self
            .transport
            .send(TransportRequest {
                url,
                method,
                headers,
                body,
                timeout,
            })
            .await?;

        if !response.is_http() {
            return Err(NetworkError::not_http());
        }

        tracing::debug!("Received status {}", response.status());

        if self.config.log_response_bodies {
            log_body(&response);
        }

        Ok(response)
    }

    fn decode<R>(&self, response: &RawResponse) -> Result<R, NetworkError>
    where
        R: DeserializeOwned,
    {
        // Embedded errors are only looked for in 2xx bodies
        if self.config.envelope_check == EnvelopeCheck::Enabled && response.is_success() {
            // A body that is not an envelope skips the check
            match ResponseEnvelope::from_slice(response.body()) {
                Ok(envelope) => {
                    if let Some(err) = envelope.application_error() {
                        return Err(err);
                    }
                }
                Err(err) => tracing::trace!("Body is not an envelope: {}", err),
            }
        }

        response.json()
    }
}

fn log_body(response: &RawResponse) {
    match response.pretty_json() {
        Some(json) => tracing::debug!(target: "netlayer::response", "Response body:\n{}", json),
        None => tracing::debug!(
            target: "netlayer::response",
            "Response body ({} bytes, not JSON)",
            response.body().len()
        ),
    }
}

#[async_trait::async_trait]
impl<P, T> Requestable for RequestExecutor<P, T>
where
    P: ReachabilityProbe,
    T: Transport,
{
    async fn request<R>(&self, descriptor: RequestDescriptor) -> Result<R, NetworkError>
    where
        R: DeserializeOwned + Send,
    {
        self.execute(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde::Deserialize;

    use super::*;
    use crate::error::TransportError;
    use crate::reachability::ReachabilityFlag;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Value {
        value: i64,
    }

    #[derive(Debug, Default)]
    struct FakeTransport {
        response: Option<Result<RawResponse, TransportError>>,
        calls: Mutex<Vec<TransportRequest>>,
    }

    impl FakeTransport {
        fn responding(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Some(Ok(RawResponse::new(status, body))),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: TransportError) -> Arc<Self> {
            Arc::new(Self {
                response: Some(Err(err)),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<TransportRequest> {
            self.calls.lock().expect("Lock not poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
            self.calls.lock().expect("Lock not poisoned").push(request);
            self.response
                .clone()
                .unwrap_or_else(|| Err(TransportError::Other("no response".to_string())))
        }
    }

    fn executor(
        transport: Arc<FakeTransport>,
    ) -> RequestExecutor<ReachabilityFlag, Arc<FakeTransport>> {
        RequestExecutor::with_transport(
            ExecutorConfig::new(Duration::from_secs(60)),
            ReachabilityFlag::new(true),
            transport,
        )
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let transport = FakeTransport::responding(200, r#"{"value": 42}"#);
        let executor = executor(transport.clone());

        let result = executor
            .execute::<Value>(RequestDescriptor::get("not a url"))
            .await;

        assert!(matches!(result, Err(NetworkError::InvalidUrl(_))));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_wins_over_invalid_url() {
        let transport = FakeTransport::responding(200, r#"{"value": 42}"#);
        let executor = executor(transport.clone());
        executor.probe().set(false);

        let result = executor
            .execute::<Value>(RequestDescriptor::get("not a url"))
            .await;

        assert_eq!(result, Err(NetworkError::NetworkUnreachable));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_default_timeout_applied() {
        let transport = FakeTransport::responding(200, r#"{"value": 1}"#);
        let executor = executor(transport.clone());

        let _ = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_request_timeout_overrides_default() {
        let transport = FakeTransport::responding(200, r#"{"value": 1}"#);
        let executor = executor(transport.clone());

        let _ = executor
            .execute::<Value>(
                RequestDescriptor::get("https://api.example.com/x")
                    .timeout(Duration::from_secs(3)),
            )
            .await;

        assert_eq!(transport.calls()[0].timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_descriptor_forwarded_to_transport() {
        let transport = FakeTransport::responding(200, r#"{"value": 1}"#);
        let executor = executor(transport.clone());

        let _ = executor
            .execute::<Value>(
                RequestDescriptor::post("https://api.example.com/x")
                    .header("X-Custom-Header", "custom-value")
                    .body("payload"),
            )
            .await;

        let call = &transport.calls()[0];
        assert_eq!(call.method, crate::Method::Post);
        assert_eq!(call.url.as_str(), "https://api.example.com/x");
        assert_eq!(
            call.headers,
            vec![("X-Custom-Header".to_string(), "custom-value".to_string())]
        );
        assert_eq!(call.body.as_deref(), Some(&b"payload"[..]));
    }

    #[tokio::test]
    async fn test_not_http_is_server_error() {
        let executor = executor(FakeTransport::responding(0, r#"{"value": 1}"#));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(
            result,
            Err(NetworkError::ServerError {
                code: 0,
                message: "Server error".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_transport_timeout() {
        let executor = executor(FakeTransport::failing(TransportError::Timeout));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(result, Err(NetworkError::Timeout));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unknown() {
        let executor = executor(FakeTransport::failing(TransportError::Connection(
            "refused".to_string(),
        )));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(
            result,
            Err(NetworkError::Unknown("Connection error: refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_envelope_error_wins_over_decodable_body() {
        let executor = executor(FakeTransport::responding(
            200,
            r#"{"value": 42, "errorCode": "0000252", "errorMsg": "Session expired"}"#,
        ));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        let err = result.expect_err("Embedded error is reported");
        assert!(err.is_session_expired());
    }

    #[tokio::test]
    async fn test_envelope_check_disabled() {
        let executor = RequestExecutor::with_transport(
            ExecutorConfig::default().envelope_check(EnvelopeCheck::Disabled),
            ReachabilityFlag::new(true),
            FakeTransport::responding(200, r#"{"value": 42, "errorMsg": "ignored"}"#),
        );

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(result, Ok(Value { value: 42 }));
    }

    #[tokio::test]
    async fn test_non_object_body_skips_envelope() {
        let executor = executor(FakeTransport::responding(200, "[1, 2, 3]"));

        let result = executor
            .execute::<Vec<u32>>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(result, Ok(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_error_status_body_still_decoded() {
        let executor = executor(FakeTransport::responding(404, r#"{"value": 7}"#));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(result, Ok(Value { value: 7 }));
    }

    #[tokio::test]
    async fn test_envelope_ignored_on_error_status() {
        let executor = executor(FakeTransport::responding(
            500,
            r#"{"errorCode":"E1","errorMsg":"Internal"}"#,
        ));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert!(matches!(result, Err(NetworkError::DecodeFailure(_))));
    }

    #[tokio::test]
    async fn test_error_status_with_envelope_and_value_decodes() {
        let executor = executor(FakeTransport::responding(
            503,
            r#"{"value": 11, "errorMsg": "Unavailable"}"#,
        ));

        let result = executor
            .execute::<Value>(RequestDescriptor::get("https://api.example.com/x"))
            .await;

        assert_eq!(result, Ok(Value { value: 11 }));
    }

    #[tokio::test]
    async fn test_send_returns_raw_response() {
        let executor = executor(FakeTransport::responding(201, "created"));

        let response = executor
            .send(RequestDescriptor::put("https://api.example.com/x"))
            .await
            .expect("Request should succeed");

        assert_eq!(response.status(), 201);
        assert_eq!(response.body(), b"created");
    }

    #[tokio::test]
    async fn test_requestable_trait() {
        async fn fetch_value<C: Requestable>(client: &C) -> Result<Value, NetworkError> {
            client
                .request(RequestDescriptor::get("https://api.example.com/x"))
                .await
        }

        let executor = executor(FakeTransport::responding(200, r#"{"value": 5}"#));
        assert_eq!(fetch_value(&executor).await, Ok(Value { value: 5 }));
    }
}
