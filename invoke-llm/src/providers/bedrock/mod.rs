//! Amazon Bedrock runtime transports
//!
//! Two ways to reach `InvokeModel`: the AWS SDK with the default credential
//! chain, or plain HTTPS authenticated with a Bedrock API key.

pub mod http;
pub mod sdk;
pub mod types;

pub use http::BedrockHttpTransport;
pub use sdk::BedrockSdkTransport;

/// Default runtime endpoint for a region.
pub fn runtime_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{}.amazonaws.com", region)
}
