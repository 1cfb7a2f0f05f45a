//! Fetch client with dependency tagging, timeouts and retries.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    /// The service answered with an error document.
    #[error("{message}")]
    Api { message: String, code: Option<String> },
}

impl FetchError {
    /// Message suitable for showing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Api { message, .. } => message.clone(),
            FetchError::Timeout(_) => "The request timed out. Please try again.".to_string(),
            FetchError::Connection(_) => "Could not reach the server. Check your connection.".to_string(),
            FetchError::Http { status, .. } if *status >= 500 => {
                "The service is having trouble. Please try again shortly.".to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outbound client for one dependency.
///
/// Every attempt is bounded by the policy's total timeout. Failed attempts
/// are retried only when the request is safe to repeat.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    tag: DependencyTag,
    policy: FetchPolicy,
}

impl FetchClient {
    /// Create a client over an existing transport.
    pub fn new(transport: Arc<dyn Transport>, tag: DependencyTag) -> Self {
        Self {
            transport,
            tag,
            policy: FetchPolicy::from_tag(tag),
        }
    }

    /// Create a client over a `reqwest` transport built for `policy`.
    pub fn with_reqwest(tag: DependencyTag, policy: FetchPolicy) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(&policy.timeout)?;
        Ok(Self::new(Arc::new(transport), tag).with_policy(policy))
    }

    /// Override the policy derived from the tag.
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tag(&self) -> DependencyTag {
        self.tag
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Send `request`, returning the first response that is not retried.
    ///
    /// Non-2xx responses are returned as-is; callers decide how to read them.
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let retry_safe = request.is_retry_safe();
        let mut attempt = 0u32;

        loop {
            let outcome = match tokio::time::timeout(self.policy.timeout.total, self.transport.send(request)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.policy.timeout.total)),
            };

            let retry = retry_safe
                && match &outcome {
                    Ok(response) => self.policy.retry.should_retry_status(response.status, attempt),
                    Err(FetchError::Timeout(_)) => self.policy.retry.should_retry_timeout(attempt),
                    Err(FetchError::Connection(_)) => self.policy.retry.should_retry_connection(attempt),
                    Err(_) => false,
                };
            if !retry {
                if let Err(e) = &outcome {
                    tracing::warn!(dependency = %self.tag, method = %request.method, url = %request.url, error = %e, "request failed");
                }
                return outcome;
            }

            let delay = self.policy.retry.backoff.delay_for_attempt(attempt);
            tracing::info!(
                dependency = %self.tag,
                method = %request.method,
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Send `request` and decode a successful JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, FetchError> {
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
                url: request.url.clone(),
            });
        }
        serde_json::from_slice(&response.body).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("tag", &self.tag)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport replaying scripted outcomes and recording requests.
    pub(crate) struct MockTransport {
        outcomes: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
        delay: Option<Duration>,
    }

    impl MockTransport {
        pub(crate) fn new(outcomes: Vec<Result<HttpResponse, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
                delay: None,
            })
        }

        pub(crate) fn hanging() -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                delay: Some(Duration::from_secs(60)),
            })
        }

        pub(crate) fn json(status: u16, body: serde_json::Value) -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::new(status, body.to_string()))
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Connection("no scripted response".into())))
        }
    }

    fn fast_policy() -> FetchPolicy {
        FetchPolicy::new(
            TimeoutConfig::from_total(Duration::from_millis(100)),
            RetryPolicy::new(1).with_backoff(crate::retry::BackoffStrategy::None),
        )
    }

    #[tokio::test]
    async fn test_get_retried_once_on_server_error() {
        let transport = MockTransport::new(vec![
            MockTransport::json(503, serde_json::json!({})),
            MockTransport::json(200, serde_json::json!({"ok": true})),
        ]);
        let client = FetchClient::new(transport.clone(), DependencyTag::Catalog).with_policy(fast_policy());

        let value: serde_json::Value = client.fetch_json(&HttpRequest::get("https://catalog/items")).await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let transport = MockTransport::new(vec![
            MockTransport::json(500, serde_json::json!({})),
            MockTransport::json(502, serde_json::json!({})),
            MockTransport::json(200, serde_json::json!({})),
        ]);
        let client = FetchClient::new(transport.clone(), DependencyTag::Catalog).with_policy(fast_policy());

        let err = client
            .fetch_json::<serde_json::Value>(&HttpRequest::get("https://catalog/items"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 502, .. }));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_post_without_key_not_retried() {
        let transport = MockTransport::new(vec![
            Err(FetchError::Connection("reset".into())),
            MockTransport::json(200, serde_json::json!({})),
        ]);
        let client = FetchClient::new(transport.clone(), DependencyTag::Payment).with_policy(fast_policy());

        let err = client.send(&HttpRequest::post("https://pay/intents")).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_post_with_key_retried() {
        let transport = MockTransport::new(vec![
            Err(FetchError::Connection("reset".into())),
            MockTransport::json(200, serde_json::json!({})),
        ]);
        let client = FetchClient::new(transport.clone(), DependencyTag::Payment).with_policy(fast_policy());

        let request = HttpRequest::post("https://pay/intents").with_idempotency_key("idem_1");
        let response = client.send(&request).await.unwrap();
        assert!(response.is_success());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_time_out() {
        let transport = MockTransport::hanging();
        let client = FetchClient::new(transport.clone(), DependencyTag::Catalog)
            .with_policy(FetchPolicy::new(TimeoutConfig::from_secs(12), RetryPolicy::none()));

        let err = client.send(&HttpRequest::get("https://catalog/items")).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_secs(12)));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_user_message() {
        let err = FetchError::Api {
            message: "Category not found".into(),
            code: Some("not_found".into()),
        };
        assert_eq!(err.user_message(), "Category not found");
        assert!(FetchError::Timeout(Duration::from_secs(1)).user_message().contains("timed out"));
    }
}
