//! Bedrock transport over plain HTTPS with a Bedrock API key

use super::runtime_endpoint;
use super::types::ErrorBody;
use crate::classify::MODEL_NOT_RESOLVED_MARKER;
use crate::{ModelTransport, TransportError};
use async_trait::async_trait;
use invoke_core::{ConfigError, FailureKind, InvokeConfig, InvokeResult, JSON_CONTENT_TYPE};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use std::error::Error as _;
use std::time::Duration;

/// `POST /model/{modelId}/invoke` authenticated with `Authorization: Bearer`.
pub struct BedrockHttpTransport {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl BedrockHttpTransport {
    /// Create a new transport.
    ///
    /// # Arguments
    /// * `base_url` - Runtime endpoint, e.g. `https://bedrock-runtime.us-east-1.amazonaws.com`
    /// * `bearer_token` - Bedrock API key
    /// * `timeout` - Per-request timeout applied by the HTTP client
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        timeout: Duration,
    ) -> InvokeResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "http_client".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        })
    }

    /// Build from config: regional endpoint unless `endpoint_url` overrides it.
    pub fn from_config(config: &InvokeConfig) -> InvokeResult<Self> {
        let token = config
            .bearer_token
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "bearer_token".to_string(),
            })?;
        let base_url = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| runtime_endpoint(&config.region));

        Self::new(base_url, token, config.timeout)
    }

    /// Full invoke URL for `model_id`, with the id escaped as one path segment.
    pub fn invoke_url(&self, model_id: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TransportError::with_kind(
                FailureKind::Configuration,
                format!("invalid endpoint url {}: {}", self.base_url, e),
            )
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                TransportError::with_kind(
                    FailureKind::Configuration,
                    format!("endpoint url {} cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(["model", model_id, "invoke"]);

        Ok(url)
    }
}

#[async_trait]
impl ModelTransport for BedrockHttpTransport {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let url = self.invoke_url(model_id)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.bearer_token)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| request_error(&e))?;
            Ok(bytes.to_vec())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = ErrorBody::message_from(&error_text);

            Err(TransportError {
                kind: status_kind(status, &message),
                ..TransportError::new(format!("HTTP {}: {}", status.as_u16(), message))
            })
        }
    }

    fn name(&self) -> &'static str {
        "bedrock-http"
    }
}

impl std::fmt::Debug for BedrockHttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockHttpTransport")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"[REDACTED]")
            .finish()
    }
}

/// Structured kind for a non-2xx status.
pub fn status_kind(status: StatusCode, message: &str) -> Option<FailureKind> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(FailureKind::AccessDenied),
        StatusCode::NOT_FOUND => Some(FailureKind::ModelNotResolved),
        StatusCode::REQUEST_TIMEOUT => Some(FailureKind::Timeout),
        StatusCode::TOO_MANY_REQUESTS => Some(FailureKind::Throttled),
        StatusCode::BAD_REQUEST if message.contains(MODEL_NOT_RESOLVED_MARKER) => {
            Some(FailureKind::ModelNotResolved)
        }
        s if s.is_server_error() => Some(FailureKind::ServiceUnavailable),
        _ => None,
    }
}

/// Flatten a reqwest error and its sources into one message.
fn request_error(err: &reqwest::Error) -> TransportError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if err.is_timeout() {
        TransportError::with_kind(FailureKind::Timeout, message)
    } else {
        TransportError::new(message)
    }
}
