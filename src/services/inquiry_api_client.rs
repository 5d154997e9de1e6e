/// Thin HTTP client for the marketplace inquiry endpoints
/// Every response is unwrapped from the `{success, message, data, error}` envelope
/// and every failure is normalized into `InquiryError` here, nowhere else.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{header, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error_handling::{InquiryError, Result};
use crate::metrics;
use crate::models::envelope::ApiEnvelope;
use crate::models::inquiry::{InquiryPayload, InquiryRecord};
use crate::utils::log_sanitizer::sanitize_for_log;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Network seam used by `SubmissionStore`.
#[async_trait]
pub trait InquiryTransport: Send + Sync {
    async fn create_inquiry(&self, payload: &InquiryPayload) -> Result<InquiryRecord>;

    async fn get_inquiry(&self, id: &str) -> Result<InquiryRecord>;

    async fn list_inquiries(&self) -> Result<Vec<InquiryRecord>>;

    async fn list_inquiries_by_buyer(&self, buyer_id: &str) -> Result<Vec<InquiryRecord>>;
}

pub struct InquiryApiClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl InquiryApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            http_client: builder.build()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned + Send>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        let request_id = Uuid::new_v4();

        let mut request = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header(header::ACCEPT, "application/json");
        if let Some(ref token) = self.config.auth_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(request_id = %request_id, operation = %operation, "Sending inquiry API request");

        let start_time = Instant::now();
        let sent = request.send().await;
        metrics::observe_request_duration(operation, start_time.elapsed().as_secs_f64());

        let response = sent.map_err(|e| {
            tracing::warn!(request_id = %request_id, operation = %operation, "Inquiry API unreachable: {}", e);
            InquiryError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = parse_envelope(status, &body);
        if let Err(ref e) = result {
            tracing::warn!(
                request_id = %request_id,
                operation = %operation,
                status = status,
                "Inquiry API call failed: {}",
                sanitize_for_log(&e.to_string())
            );
        }
        result
    }
}

#[async_trait]
impl InquiryTransport for InquiryApiClient {
    async fn create_inquiry(&self, payload: &InquiryPayload) -> Result<InquiryRecord> {
        let url = self.config.endpoint(&["inquiry", "create"])?;
        self.send("create", self.http_client.post(url).json(payload)).await
    }

    async fn get_inquiry(&self, id: &str) -> Result<InquiryRecord> {
        let url = self.config.endpoint(&["inquiry", id])?;
        self.send("by_id", self.http_client.get(url)).await
    }

    async fn list_inquiries(&self) -> Result<Vec<InquiryRecord>> {
        let url = self.config.endpoint(&["inquiry", "all"])?;
        self.send("all", self.http_client.get(url)).await
    }

    async fn list_inquiries_by_buyer(&self, buyer_id: &str) -> Result<Vec<InquiryRecord>> {
        let url = self.config.endpoint(&["inquiry", "buyer", buyer_id])?;
        self.send("by_buyer", self.http_client.get(url)).await
    }
}

/// Turn a raw HTTP status and body into the envelope's `data` or an `InquiryError`.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(InquiryError::Server {
            message: failure_message_from_body(body).unwrap_or_default(),
            code: Some(status),
        });
    }

    // A 2xx body that is not an envelope but carries text is still the server's message.
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body).map_err(|e| {
        match failure_message_from_body(body) {
            Some(message) => InquiryError::Server {
                message,
                code: Some(status),
            },
            None => InquiryError::Transport(format!("Invalid response body: {}", e)),
        }
    })?;

    if !envelope.success {
        return Err(InquiryError::Server {
            message: envelope.failure_message().unwrap_or_default(),
            code: Some(status),
        });
    }

    let data = envelope
        .data
        .filter(|data| !data.is_null())
        .ok_or_else(|| InquiryError::Server {
            message: "Response did not include any data".to_string(),
            code: Some(status),
        })?;

    serde_json::from_value(data)
        .map_err(|e| InquiryError::Transport(format!("Invalid response data: {}", e)))
}

// Envelope fields first, then a bare JSON string, then a non-JSON text body.
fn failure_message_from_body(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value::<ApiEnvelope<serde_json::Value>>(value)
                .ok()
                .and_then(|envelope| envelope.failure_message())
        }
        Ok(_) => None,
        Err(_) => Some(body.trim().to_string()).filter(|t| !t.is_empty()),
    }
}
