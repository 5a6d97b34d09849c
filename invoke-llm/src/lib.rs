//! bedrock-invoke LLM - transports and the inference client
//!
//! [`ModelTransport`] is the seam between the client and the wire: it moves
//! an already-encoded request body to a named model and hands back the raw
//! response body or a [`TransportError`]. The client owns everything around
//! that call (encoding, timeouts, retries, classification, decoding).

pub mod classify;
pub mod client;
pub mod mock;
pub mod providers;

pub use classify::{classify, classify_message};
pub use client::InferenceClient;
pub use mock::{text_response_body, MockTransport, RecordedRequest};
pub use providers::bedrock::{BedrockHttpTransport, BedrockSdkTransport};
pub use providers::transport_from_config;

use async_trait::async_trait;
use invoke_core::FailureKind;
use thiserror::Error;

// ============================================================================
// TRANSPORT ERROR
// ============================================================================

/// Raw failure reported by a transport, before classification.
///
/// `kind` is set when the transport could tell from structured information
/// (typed SDK errors, HTTP status) what went wrong. When it is `None` the
/// classifier falls back to matching `message`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: Option<FailureKind>,
    pub message: String,
}

impl TransportError {
    /// Unclassified failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: single_line(message.into()),
        }
    }

    /// Failure with a known kind.
    pub fn with_kind(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            message: single_line(message.into()),
        }
    }
}

fn single_line(message: String) -> String {
    if message.contains(['\n', '\r']) {
        message.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        message
    }
}

// ============================================================================
// MODEL TRANSPORT TRAIT
// ============================================================================

/// Carries an encoded request body to a foundation model.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Invoke `model_id` with a JSON `body` and return the raw response body.
    ///
    /// # Arguments
    /// * `model_id` - Foundation model identifier
    /// * `body` - Serialized request JSON
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - Response body bytes
    /// * `Err(TransportError)` - If the call failed at any layer
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_flattens_newlines() {
        let err = TransportError::new("dispatch failure\n  caused by: dns error\r\n");
        assert_eq!(err.message, "dispatch failure caused by: dns error");
        assert_eq!(err.kind, None);
    }

    #[test]
    fn test_transport_error_display_is_message() {
        let err = TransportError::with_kind(FailureKind::Throttled, "Too many requests");
        assert_eq!(err.to_string(), "Too many requests");
        assert_eq!(err.kind, Some(FailureKind::Throttled));
    }
}
