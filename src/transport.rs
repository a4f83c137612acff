//! Transports that carry a [`GenerateRequest`] to the generation backend.
//!
//! - `ProxyTransport` posts to a same-origin proxy that owns the credential.
//! - `GeminiTransport` performs the proxy's relay in-process when the client holds the key.
//! - `UnconfiguredTransport` answers every send with the configuration problem.

use crate::request::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_PROXY_ERROR: &str = "Failed to fetch AI response";
pub const MISSING_API_KEY: &str = "API key not configured";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-success status. The message is whatever the backend reported.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    NotConfigured(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// One request in, one response out. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GenerateRequest) -> TransportResult<GenerateResponse>;
}

fn decode_success(body: &str) -> TransportResult<GenerateResponse> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    Ok(GenerateResponse::from_json(value))
}

pub struct ProxyTransport {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ProxyErrorBody {
    error: Option<String>,
}

impl ProxyTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn proxy_error_message(body: &str) -> String {
    serde_json::from_str::<ProxyErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_PROXY_ERROR.to_string())
}

#[async_trait]
impl Transport for ProxyTransport {
    async fn send(&self, request: &GenerateRequest) -> TransportResult<GenerateResponse> {
        debug!(endpoint = %self.endpoint, turns = request.contents.len(), "posting to proxy");
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "proxy returned an error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: proxy_error_message(&body),
            });
        }

        decode_success(&body)
    }
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiTransport {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn send(&self, request: &GenerateRequest) -> TransportResult<GenerateResponse> {
        if self.api_key.is_empty() {
            return Err(TransportError::NotConfigured(MISSING_API_KEY.to_string()));
        }

        debug!(model = %self.model, turns = request.contents.len(), "posting generateContent");
        // The key rides in the query string; strip URLs from errors so it never reaches the chat.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.without_url()))?;

        if !status.is_success() {
            warn!(%status, "generateContent returned an error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        decode_success(&body)
    }
}

/// Stands in when no backend is configured; every send reports why.
pub struct UnconfiguredTransport {
    reason: String,
}

impl UnconfiguredTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Transport for UnconfiguredTransport {
    async fn send(&self, _request: &GenerateRequest) -> TransportResult<GenerateResponse> {
        Err(TransportError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_error_prefers_reported_text() {
        assert_eq!(proxy_error_message(r#"{"error":"quota exceeded"}"#), "quota exceeded");
        assert_eq!(proxy_error_message(r#"{"error":""}"#), DEFAULT_PROXY_ERROR);
        assert_eq!(proxy_error_message(r#"{"detail":"x"}"#), DEFAULT_PROXY_ERROR);
        assert_eq!(proxy_error_message("<html>502</html>"), DEFAULT_PROXY_ERROR);
    }

    #[test]
    fn gemini_endpoint_joins_model() {
        let transport = GeminiTransport::new("https://example.test/v1beta/", "gemini-2.0-flash", "k");
        assert_eq!(
            transport.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn invalid_success_body_is_a_decode_error() {
        assert!(matches!(decode_success("not json"), Err(TransportError::Decode(_))));
        assert!(decode_success("{}").is_ok());
    }
}
