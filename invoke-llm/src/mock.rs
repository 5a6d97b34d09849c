//! Scripted transport for tests

use crate::{ModelTransport, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub model_id: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Mock transport for testing.
/// Replays scripted outcomes in order and records every request it receives.
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose only outcome is a response with one text block.
    pub fn with_text(text: &str) -> Self {
        let mock = Self::new();
        mock.push_body(text_response_body(&[text]));
        mock
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a raw response body.
    pub fn push_body(&self, body: impl Into<Vec<u8>>) {
        lock(&self.outcomes).push_back(Ok(body.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, err: TransportError) {
        lock(&self.outcomes).push_back(Err(err));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl ModelTransport for MockTransport {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            model_id: model_id.to_string(),
            body,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("mock transport has no scripted outcome")))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Response body in Bedrock's Anthropic shape with one text block per entry.
pub fn text_response_body(texts: &[&str]) -> Vec<u8> {
    let content: Vec<_> = texts
        .iter()
        .map(|text| json!({ "type": "text", "text": text }))
        .collect();

    json!({
        "id": "msg_bdrk_mock",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20240620",
        "content": content,
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": { "input_tokens": 12, "output_tokens": 4 }
    })
    .to_string()
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoke_core::InvokeResponse;

    #[tokio::test]
    async fn test_mock_replays_in_order_and_records() {
        let mock = MockTransport::new();
        mock.push_body(text_response_body(&["one"]));
        mock.push_error(TransportError::new("boom"));

        let first = mock.invoke_model("model-a", b"{}".to_vec()).await.unwrap();
        let decoded = InvokeResponse::from_json_slice(&first).unwrap();
        assert_eq!(decoded.first_text(), Some("one"));

        let second = mock.invoke_model("model-b", b"[]".to_vec()).await;
        assert_eq!(second, Err(TransportError::new("boom")));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model_id, "model-a");
        assert_eq!(requests[1].body, b"[]".to_vec());
    }

    #[tokio::test]
    async fn test_mock_runs_dry() {
        let mock = MockTransport::new();
        let err = mock.invoke_model("m", Vec::new()).await.unwrap_err();
        assert!(err.message.contains("no scripted outcome"));
        assert_eq!(mock.call_count(), 1);
    }
}
