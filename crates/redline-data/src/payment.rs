//! Payment processor client.

use redline_commerce::checkout::{PaymentIntent, PaymentIntentRequest};
use serde::Deserialize;

use crate::client::{FetchClient, FetchError};
use crate::transport::{HttpRequest, HttpResponse};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ProcessorError,
}

#[derive(Debug, Deserialize)]
struct ProcessorError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Client for creating and reading payment intents.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    fetch: FetchClient,
    base_url: String,
    secret_key: String,
}

impl PaymentClient {
    pub fn new(fetch: FetchClient, base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    /// Create a payment intent.
    ///
    /// The request's idempotency key is sent as the `Idempotency-Key`
    /// header, which is also what makes the call eligible for retry.
    pub async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<PaymentIntent, FetchError> {
        let mut http = HttpRequest::post(format!("{}/payment_intents", self.base_url))
            .with_bearer(&self.secret_key)
            .with_json(request)?;
        match request.idempotency_key() {
            Some(key) => http = http.with_idempotency_key(key),
            None => tracing::warn!("creating payment intent without an idempotency key"),
        }

        let response = self.fetch.send(&http).await?;
        let intent: PaymentIntent = read(&http, &response)?;
        tracing::info!(intent_id = %intent.id, amount = intent.amount, status = %intent.status, "payment intent created");
        Ok(intent)
    }

    /// Read back a payment intent by id.
    pub async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, FetchError> {
        let http = HttpRequest::get(format!("{}/payment_intents/{}", self.base_url, id)).with_bearer(&self.secret_key);
        let response = self.fetch.send(&http).await?;
        read(&http, &response)
    }
}

fn read(request: &HttpRequest, response: &HttpResponse) -> Result<PaymentIntent, FetchError> {
    if !response.is_success() {
        return Err(match serde_json::from_slice::<ErrorBody>(&response.body) {
            Ok(body) => FetchError::Api {
                message: body.error.message,
                code: body.error.code,
            },
            Err(_) => FetchError::Http {
                status: response.status,
                url: request.url.clone(),
            },
        });
    }
    serde_json::from_slice(&response.body).map_err(|e| FetchError::Deserialization(e.to_string()))
}
