//! Error types for bedrock-invoke operations

use crate::{FailureKind, REGIONAL_SERVICES_URL};
use thiserror::Error;

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Request must contain at least one message")]
    NoMessages,

    #[error("Message {index} has no content blocks")]
    EmptyMessage { index: usize },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// JSON encode/decode errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to encode request: {reason}")]
    Encode { reason: String },

    #[error("Failed to decode response: {reason}")]
    Decode { reason: String },
}

/// Remote model errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("Invocation of {model_id} in {region} failed ({kind}): {message}")]
    InvocationFailed {
        kind: FailureKind,
        model_id: String,
        region: String,
        message: String,
    },

    #[error("Response from {model_id} contained no content blocks")]
    EmptyContent { model_id: String },

    #[error("First content block from {model_id} is not text")]
    NonTextContent { model_id: String },
}

/// Master error type for all bedrock-invoke errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias for bedrock-invoke operations.
pub type InvokeResult<T> = Result<T, InvokeError>;

impl InvokeError {
    /// Failure kind of a remote invocation error, if this is one.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InvokeError::Llm(LlmError::InvocationFailed { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    /// Single-line, human-readable explanation for the terminal.
    pub fn diagnostic(&self) -> String {
        match self {
            InvokeError::Llm(LlmError::InvocationFailed {
                kind,
                model_id,
                region,
                message,
            }) => invocation_diagnostic(*kind, model_id, region, message),
            InvokeError::Llm(LlmError::EmptyContent { model_id }) => {
                format!("Error: the response from \"{}\" contained no content", model_id)
            }
            InvokeError::Llm(LlmError::NonTextContent { model_id }) => format!(
                "Error: the response from \"{}\" did not start with a text block",
                model_id
            ),
            InvokeError::Validation(err) => format!("Error: invalid request: {}", err),
            InvokeError::Config(err) => format!("Error: invalid configuration: {}", err),
            InvokeError::Codec(CodecError::Encode { reason }) => {
                format!("Error: failed to encode the request JSON: {}", reason)
            }
            InvokeError::Codec(CodecError::Decode { reason }) => {
                format!("Error: failed to parse the response JSON: {}", reason)
            }
        }
    }
}

fn invocation_diagnostic(kind: FailureKind, model_id: &str, region: &str, message: &str) -> String {
    match kind {
        FailureKind::RegionUnavailable => format!(
            "Error: the Bedrock service is not available in the selected region ({}). \
             Check regional availability at {}",
            region, REGIONAL_SERVICES_URL
        ),
        FailureKind::ModelNotResolved => format!(
            "Error: could not resolve the foundation model from model identifier \"{}\". \
             Make sure the model exists and is accessible in the specified region",
            model_id
        ),
        FailureKind::AccessDenied => format!(
            "Error: access to model \"{}\" was denied. Check your credentials and model access: {}",
            model_id, message
        ),
        FailureKind::Throttled => {
            format!("Error: the request was throttled by Bedrock: {}", message)
        }
        FailureKind::Timeout => format!("Error: the Bedrock invocation timed out: {}", message),
        FailureKind::ServiceUnavailable => {
            format!("Error: Bedrock is temporarily unavailable: {}", message)
        }
        FailureKind::Configuration => {
            format!("Error: failed to resolve AWS configuration: {}", message)
        }
        FailureKind::Other => format!("Error: failed to invoke Anthropic Claude: {}", message),
    }
}

// =============================================================================
// TESTS
// =============================================================================
