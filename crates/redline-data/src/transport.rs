//! Requests, responses and the transport that carries them.

use async_trait::async_trait;
use http::Method;
use serde::Serialize;

use crate::client::FetchError;
use crate::timeout::TimeoutConfig;

/// Header carrying the client-generated idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// An outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Set a header, replacing any previous value (names compare case-insensitively).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    pub fn with_idempotency_key(self, key: &str) -> Self {
        self.with_header(IDEMPOTENCY_KEY_HEADER, key)
    }

    /// Serialize `body` as the JSON request body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, FetchError> {
        let bytes = serde_json::to_vec(body).map_err(|e| FetchError::Request(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self.with_header("Content-Type", "application/json"))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether sending this request twice cannot have a different effect
    /// than sending it once.
    pub fn is_retry_safe(&self) -> bool {
        self.method.is_idempotent() || self.header(IDEMPOTENCY_KEY_HEADER).is_some()
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded, for error messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can carry one request to a server and bring back the
/// response. Timeouts and retries are applied by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client whose connect timeout follows `timeout`.
    pub fn new(timeout: &TimeoutConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .user_agent(concat!("redline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self.http.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                FetchError::Connection(e.to_string())
            } else {
                FetchError::Request(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_safety() {
        assert!(HttpRequest::get("https://x/items").is_retry_safe());
        assert!(!HttpRequest::post("https://x/intents").is_retry_safe());
        assert!(HttpRequest::post("https://x/intents")
            .with_idempotency_key("idem_1")
            .is_retry_safe());
    }

    #[test]
    fn test_headers_replace_case_insensitively() {
        let request = HttpRequest::get("https://x")
            .with_header("authorization", "a")
            .with_bearer("tok");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer tok"));
    }

    #[test]
    fn test_json_body() {
        let request = HttpRequest::post("https://x")
            .with_json(&serde_json::json!({"amount": 100}))
            .unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(br#"{"amount":100}"#.as_slice()));
    }
}
