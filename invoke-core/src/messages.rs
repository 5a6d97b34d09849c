//! Anthropic-on-Bedrock request and response types

use crate::{CodecError, ValidationError, BEDROCK_ANTHROPIC_VERSION};
use serde::{Deserialize, Serialize};

// ============================================================================
// MESSAGE TYPES
// ============================================================================

/// Speaker of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

/// A typed unit of message payload.
///
/// Only text is ever sent. Blocks of any other type in a response decode as
/// [`ContentBlock::Unsupported`] rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// A user message with a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// Body of an `InvokeModel` call for Anthropic models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

impl InvokeRequest {
    /// Build a single-turn request.
    ///
    /// # Arguments
    /// * `prompt` - User prompt, must contain non-whitespace text
    /// * `system` - System instruction (may be empty)
    /// * `max_tokens` - Output token cap, must be greater than 0
    pub fn new(
        prompt: impl Into<String>,
        system: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
            max_tokens,
            system: system.into(),
            messages: vec![Message::user(prompt)],
        };
        request.validate()?;
        Ok(request)
    }

    /// Replace the protocol version tag.
    pub fn with_anthropic_version(mut self, version: impl Into<String>) -> Self {
        self.anthropic_version = version.into();
        self
    }

    /// Check the request invariants.
    ///
    /// Validates:
    /// - max_tokens > 0
    /// - at least one message, and every message has content
    /// - the first user text block is not blank
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_tokens".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.anthropic_version.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "anthropic_version".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.messages.is_empty() {
            return Err(ValidationError::NoMessages);
        }

        if let Some(index) = self.messages.iter().position(|m| m.content.is_empty()) {
            return Err(ValidationError::EmptyMessage { index });
        }

        let prompt = self
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.content.first())
            .and_then(ContentBlock::as_text)
            .unwrap_or_default();
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        Ok(())
    }

    /// Serialize to the JSON body sent over the wire.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(|e| CodecError::Encode {
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Decoded `InvokeModel` response body.
///
/// Only `content` is required; the envelope fields default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub response_type: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

impl InvokeResponse {
    /// Decode a raw response body.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(body).map_err(|e| CodecError::Decode {
            reason: e.to_string(),
        })
    }

    /// The first content block, if any.
    pub fn first_block(&self) -> Option<&ContentBlock> {
        self.content.first()
    }

    /// Text of the first content block. Later blocks are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.first_block().and_then(ContentBlock::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANGKOK: &str = r#"{
        "id": "msg_bdrk_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20240620",
        "content": [{"type": "text", "text": "Bangkok"}],
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 23, "output_tokens": 5}
    }"#;

    #[test]
    fn test_request_wire_shape() {
        let request =
            InvokeRequest::new("What is the capital of Thailand?", "Act as a kindergartner.", 1024)
                .unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&request.to_json_bytes().unwrap()).unwrap();

        assert_eq!(value["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["system"], "Act as a kindergartner.");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(
            value["messages"][0]["content"][0]["text"],
            "What is the capital of Thailand?"
        );
    }

    #[test]
    fn test_request_rejects_blank_prompt() {
        let err = InvokeRequest::new("   ", "sys", 10).unwrap_err();
        assert_eq!(err, ValidationError::EmptyPrompt);
    }

    #[test]
    fn test_request_rejects_zero_max_tokens() {
        let err = InvokeRequest::new("hi", "sys", 0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "max_tokens"));
    }

    #[test]
    fn test_request_rejects_empty_messages() {
        let mut request = InvokeRequest::new("hi", "", 10).unwrap();
        request.messages.clear();
        assert_eq!(request.validate(), Err(ValidationError::NoMessages));

        request.messages.push(Message {
            role: Role::User,
            content: vec![],
        });
        assert_eq!(
            request.validate(),
            Err(ValidationError::EmptyMessage { index: 0 })
        );
    }

    #[test]
    fn test_response_first_text() {
        let response = InvokeResponse::from_json_slice(BANGKOK.as_bytes()).unwrap();
        assert_eq!(response.first_text(), Some("Bangkok"));
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.stop_sequence, None);
        assert_eq!(response.usage.input_tokens, 23);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[test]
    fn test_response_only_first_block_counts() {
        let body = r#"{
            "id": "m", "type": "message", "role": "assistant",
            "content": [{"type": "text", "text": "first"}, {"type": "text", "text": "second"}],
            "stop_reason": "max_tokens", "stop_sequence": null,
            "usage": {"input_tokens": 1, "output_tokens": 2}
        }"#;
        let response = InvokeResponse::from_json_slice(body.as_bytes()).unwrap();
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.first_text(), Some("first"));
    }

    #[test]
    fn test_response_empty_content_has_no_text() {
        let body = r#"{
            "id": "m", "type": "message", "role": "assistant", "content": [],
            "stop_reason": "end_turn", "usage": {"input_tokens": 1, "output_tokens": 0}
        }"#;
        let response = InvokeResponse::from_json_slice(body.as_bytes()).unwrap();
        assert!(response.first_block().is_none());
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_response_tolerates_unknown_blocks_and_reasons() {
        let body = r#"{
            "id": "m", "type": "message", "role": "assistant",
            "content": [{"type": "tool_use", "id": "t1", "name": "lookup", "input": {}}],
            "stop_reason": "refusal", "stop_sequence": "STOP",
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }"#;
        let response = InvokeResponse::from_json_slice(body.as_bytes()).unwrap();
        assert_eq!(response.first_block(), Some(&ContentBlock::Unsupported));
        assert_eq!(response.first_text(), None);
        assert_eq!(response.stop_reason, Some(StopReason::Unknown));
        assert_eq!(response.stop_sequence.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_response_with_only_content_decodes() {
        let body = br#"{"content":[{"type":"text","text":"Bangkok!"}]}"#;
        let response = InvokeResponse::from_json_slice(body).unwrap();
        assert_eq!(response.first_text(), Some("Bangkok!"));
        assert_eq!(response.id, "");
        assert_eq!(response.role, Role::Assistant);
        assert_eq!(response.stop_reason, None);
        assert_eq!(response.usage, Usage::default());
    }

    #[test]
    fn test_response_without_content_is_a_decode_error() {
        let err = InvokeResponse::from_json_slice(br#"{"id":"m"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn test_response_decode_error_is_typed() {
        let err = InvokeResponse::from_json_slice(b"{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
