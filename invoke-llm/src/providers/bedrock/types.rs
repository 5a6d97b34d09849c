//! Bedrock error response body

use serde::Deserialize;

/// JSON body Bedrock sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "Message")]
    pub message: String,
}

impl ErrorBody {
    /// Message from a raw error body, or the body itself if it isn't JSON.
    pub fn message_from(raw: &str) -> String {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body.message,
            Err(_) if raw.trim().is_empty() => "Unknown error".to_string(),
            Err(_) => raw.trim().to_string(),
        }
    }
}
