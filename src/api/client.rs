//! HTTP client wrapper for the analysis service.
//!
//! Resolves endpoints against the configured base URL, attaches the bearer
//! token and JSON accept header to every request, and turns transport,
//! status and decoding failures into [`ApiError`].

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::ApiConfig;

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error types for service operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed ({status}): {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to read file: {0}")]
    Encoding(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Authenticated client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token
    token: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidBaseUrl("base URL is empty".to_string()));
        }
        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let token = config.api_key.clone().filter(|k| !k.is_empty());
        if token.is_none() {
            tracing::warn!("No API key configured, requests will be sent without authorization");
        }

        Ok(Self { base_url, token, client })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.endpoint(path))
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(path, request).await
    }

    /// POST a multipart form and decode a JSON response.
    pub async fn post_multipart<T>(&self, path: &str, form: reqwest::multipart::Form) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint(path)).multipart(form);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> ApiResult<T> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        tracing::debug!(endpoint = path, "Sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint = path, error = %e, "Request failed");
            ApiError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(endpoint = path, %status, %message, "Service returned an error");
            return Err(ApiError::Status { status, message });
        }

        tracing::debug!(endpoint = path, %status, bytes = body.len(), "Received response");

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a human readable message out of an error response body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`,
/// `{"message": "..."}` and `{"error": "..."}`; anything else is returned
/// as-is.
fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let detail = value.get("detail").and_then(|d| match d {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> =
                    items.iter().filter_map(|i| i.get("msg").and_then(|m| m.as_str())).collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        });

        let message = detail.or_else(|| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        });

        if let Some(message) = message {
            return message;
        }
    }

    if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body.to_string()
    }
}
