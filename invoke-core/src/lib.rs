//! bedrock-invoke core - wire types, configuration and errors
//!
//! Pure data types shared by the transport and CLI crates. Nothing in here
//! performs I/O; the request/response schemas, the error taxonomy and the
//! configuration structure all live here so they can be tested in isolation.

pub mod config;
pub mod error;
pub mod failure;
pub mod messages;

pub use config::{EnvLookup, InvokeConfig, RetryConfig, TransportKind};
pub use error::{
    CodecError, ConfigError, InvokeError, InvokeResult, LlmError, ValidationError,
};
pub use failure::FailureKind;
pub use messages::{
    ContentBlock, InvokeRequest, InvokeResponse, Message, Role, StopReason, Usage,
};

// ============================================================================
// DEFAULTS
// ============================================================================

/// Protocol version tag Bedrock expects in Anthropic request bodies.
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Foundation model used when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";

/// Prompt sent when none is supplied.
pub const DEFAULT_PROMPT: &str = "What is the capital of Thailand?";

/// System instruction sent when none is supplied.
pub const DEFAULT_SYSTEM: &str = "Act as a kindergartner.";

/// Output token cap used when none is supplied.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// MIME type for both the request body and the accepted response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Link printed when the service is unreachable in the configured region.
pub const REGIONAL_SERVICES_URL: &str =
    "https://aws.amazon.com/about-aws/global-infrastructure/regional-product-services/";
