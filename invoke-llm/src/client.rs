//! Inference client: build, send, classify, decode

use crate::{classify, ModelTransport, TransportError};
use invoke_core::{
    FailureKind, InvokeConfig, InvokeRequest, InvokeResponse, InvokeResult, LlmError,
    RetryConfig, BEDROCK_ANTHROPIC_VERSION,
};
use std::sync::Arc;
use std::time::Duration;

/// One-shot client for Anthropic models on Bedrock.
///
/// Every attempt is bounded by `timeout`. Transient failures (throttling,
/// timeouts, temporary unavailability) are retried with exponential backoff
/// up to `retry.max_retries` times; anything else fails on the spot.
pub struct InferenceClient {
    transport: Arc<dyn ModelTransport>,
    model_id: String,
    region: String,
    anthropic_version: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl InferenceClient {
    /// Create a client with default timeout and retry settings.
    ///
    /// # Arguments
    /// * `transport` - Transport that reaches the model
    /// * `model_id` - Foundation model identifier
    /// * `region` - Region the transport targets, used in diagnostics
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        model_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let defaults = InvokeConfig::default();
        Self {
            transport,
            model_id: model_id.into(),
            region: region.into(),
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
            timeout: defaults.timeout,
            retry: defaults.retry,
        }
    }

    /// Create a client from a validated config.
    pub fn from_config(transport: Arc<dyn ModelTransport>, config: &InvokeConfig) -> Self {
        Self {
            transport,
            model_id: config.model_id.clone(),
            region: config.region.clone(),
            anthropic_version: config.anthropic_version.clone(),
            timeout: config.timeout,
            retry: config.retry.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Send a single-turn prompt and return the text of the first content block.
    ///
    /// # Arguments
    /// * `prompt` - User prompt, must not be blank
    /// * `system` - System instruction
    /// * `max_tokens` - Output token cap, must be greater than 0
    pub async fn invoke(&self, prompt: &str, system: &str, max_tokens: u32) -> InvokeResult<String> {
        let request = InvokeRequest::new(prompt, system, max_tokens)?
            .with_anthropic_version(&self.anthropic_version);
        let response = self.send(&request).await?;
        self.first_text(&response)
    }

    /// Send a prepared request and return the whole decoded response.
    pub async fn send(&self, request: &InvokeRequest) -> InvokeResult<InvokeResponse> {
        request.validate()?;
        let body = request.to_json_bytes()?;

        let raw = self.invoke_with_retry(body).await?;
        let response = InvokeResponse::from_json_slice(&raw)?;

        tracing::debug!(
            model_id = %self.model_id,
            response_id = %response.id,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Invocation succeeded"
        );

        Ok(response)
    }

    /// Text of the first content block; later blocks are ignored.
    pub fn first_text(&self, response: &InvokeResponse) -> InvokeResult<String> {
        match response.first_block() {
            None => Err(LlmError::EmptyContent {
                model_id: self.model_id.clone(),
            }
            .into()),
            Some(block) => block.as_text().map(str::to_string).ok_or_else(|| {
                LlmError::NonTextContent {
                    model_id: self.model_id.clone(),
                }
                .into()
            }),
        }
    }

    async fn invoke_with_retry(&self, body: Vec<u8>) -> InvokeResult<Vec<u8>> {
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!(
                transport = self.transport.name(),
                model_id = %self.model_id,
                region = %self.region,
                attempt,
                "Invoking model"
            );

            let err = match self.attempt(body.clone()).await {
                Ok(raw) => return Ok(raw),
                Err(err) => err,
            };

            let kind = classify(&err);
            if kind.is_transient() && attempt < self.retry.max_retries {
                let delay = self.retry.backoff_for(attempt);
                tracing::warn!(
                    kind = %kind,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient invocation failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            tracing::debug!(kind = %kind, attempt, error = %err, "Invocation failed");
            return Err(LlmError::InvocationFailed {
                kind,
                model_id: self.model_id.clone(),
                region: self.region.clone(),
                message: err.message,
            }
            .into());
        }
    }

    async fn attempt(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        match tokio::time::timeout(self.timeout, self.transport.invoke_model(&self.model_id, body))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::with_kind(
                FailureKind::Timeout,
                format!("no response within {}ms", self.timeout.as_millis()),
            )),
        }
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("transport", &self.transport.name())
            .field("model_id", &self.model_id)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
