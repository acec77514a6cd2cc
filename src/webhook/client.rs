//! Authenticated webhook delivery.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{WebhookMode, WEBHOOK_BATCH_DELAY, WEBHOOK_USER_AGENT};
use crate::error_handling::{ValidationError, WebhookError};
use crate::store::{Store, WebhookConfig};

use super::credentials::basic_auth_header;
use super::payload::{build_payload, TestPayload};

/// Outcome of one webhook POST.
///
/// A non-2xx status is reported here with `success == false`; only transport
/// failures become errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Status was 2xx
    pub success: bool,
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: String,
    /// Response body
    pub body: String,
    /// Response headers
    pub headers: BTreeMap<String, String>,
}

/// Result of one payload of a batch send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSendResult {
    /// Position in the batch
    pub index: usize,
    /// Delivered with a 2xx status
    pub success: bool,
    /// HTTP status, when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response body, when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Error message, when no response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Accepts only absolute `http`/`https` URLs.
pub fn validate_webhook_url(url: &str) -> Result<Url, ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(ValidationError::InvalidWebhookUrl(url.to_string())),
    }
}

/// Request headers for a webhook call.
pub fn build_headers(username: &str, password: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
    headers.insert(USER_AGENT.to_string(), WEBHOOK_USER_AGENT.to_string());
    if let Some(auth) = basic_auth_header(username, password) {
        headers.insert(AUTHORIZATION.to_string(), auth);
    }
    headers
}

/// [`build_headers`] with the credentials masked, for display.
pub fn masked_headers(username: &str, password: &str) -> BTreeMap<String, String> {
    let mut headers = build_headers(username, password);
    if let Some(auth) = headers.get_mut(AUTHORIZATION.as_str()) {
        *auth = format!("Basic {}", "•".repeat(16));
    }
    headers
}

/// Sends payloads to the configured webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: Arc<reqwest::Client>,
}

impl WebhookClient {
    /// Wraps a shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    /// POSTs `payload` as JSON to `url` with Basic auth when both credentials are set.
    pub async fn send_request<P: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &P,
        username: &str,
        password: &str,
    ) -> Result<WebhookResponse, WebhookError> {
        let url = validate_webhook_url(url)?;
        let body = serde_json::to_vec(payload)?;
        info!(
            "Sending webhook request to {} (user: {}, password set: {}, {} bytes)",
            url,
            username,
            !password.is_empty(),
            body.len()
        );

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, WEBHOOK_USER_AGENT)
            .body(body);
        if let Some(auth) = basic_auth_header(username, password) {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.text().await?;

        if status.is_success() {
            info!("Webhook responded {}", status);
        } else {
            warn!("Webhook responded {}: {}", status, body);
        }

        Ok(WebhookResponse {
            success: status.is_success(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
            headers,
        })
    }

    /// Builds the payload of `mode` from the store and sends it with `config`.
    pub async fn send(
        &self,
        store: &Store,
        mode: WebhookMode,
        config: &WebhookConfig,
    ) -> Result<WebhookResponse, WebhookError> {
        let payload = build_payload(store, mode).await?;
        self.send_request(&config.url, &payload, &config.username, &config.password)
            .await
    }

    /// Sends a test payload to check the endpoint and credentials.
    pub async fn test_connection(
        &self,
        config: &WebhookConfig,
    ) -> Result<WebhookResponse, WebhookError> {
        self.send_request(
            &config.url,
            &TestPayload::new(),
            &config.username,
            &config.password,
        )
        .await
    }

    /// Sends payloads one after another with a short pause in between.
    ///
    /// A failing payload is recorded and does not stop the batch.
    pub async fn send_batch(
        &self,
        payloads: &[Value],
        config: &WebhookConfig,
    ) -> Vec<BatchSendResult> {
        let mut results = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            let result = match self
                .send_request(&config.url, payload, &config.username, &config.password)
                .await
            {
                Ok(response) => BatchSendResult {
                    index,
                    success: response.success,
                    status: Some(response.status),
                    body: Some(response.body),
                    error: None,
                },
                Err(e) => BatchSendResult {
                    index,
                    success: false,
                    status: None,
                    body: None,
                    error: Some(e.to_string()),
                },
            };
            results.push(result);
            if index + 1 < payloads.len() {
                tokio::time::sleep(WEBHOOK_BATCH_DELAY).await;
            }
        }
        results
    }
}
