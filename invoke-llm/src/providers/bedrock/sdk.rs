//! Bedrock transport on top of the AWS SDK

use crate::classify::classify_message;
use crate::{ModelTransport, TransportError};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use invoke_core::{FailureKind, InvokeConfig, JSON_CONTENT_TYPE};

/// `InvokeModel` through `aws-sdk-bedrockruntime`.
///
/// Credentials come from the SDK's default chain (environment, shared
/// config/credential files, container and instance metadata). SDK-level
/// retries are switched off because [`crate::InferenceClient`] retries.
pub struct BedrockSdkTransport {
    client: Client,
    region: String,
}

impl BedrockSdkTransport {
    /// Load the shared AWS config for `config.region` and build a client.
    pub async fn from_config(config: &InvokeConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_attempt_timeout(config.timeout)
                    .build(),
            );

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let sdk_config = loader.load().await;
        Self {
            client: Client::new(&sdk_config),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl ModelTransport for BedrockSdkTransport {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let result = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.body().as_ref().to_vec()),
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                Err(TransportError {
                    kind: classify_sdk_error(&err),
                    ..TransportError::new(message)
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "bedrock-sdk"
    }
}

impl std::fmt::Debug for BedrockSdkTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockSdkTransport")
            .field("region", &self.region)
            .finish()
    }
}

/// Structured kind for an SDK failure, when one can be read off the error.
pub fn classify_sdk_error<R>(err: &SdkError<InvokeModelError, R>) -> Option<FailureKind> {
    match err {
        SdkError::TimeoutError(_) => Some(FailureKind::Timeout),
        SdkError::ConstructionFailure(_) => Some(FailureKind::Configuration),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => Some(FailureKind::Timeout),
        SdkError::DispatchFailure(failure) if failure.is_user() => {
            Some(FailureKind::Configuration)
        }
        SdkError::ServiceError(context) => classify_service_error(context.err()),
        _ => None,
    }
}

/// Structured kind for a modeled `InvokeModel` service error.
pub fn classify_service_error(err: &InvokeModelError) -> Option<FailureKind> {
    match err {
        // Validation messages go through the text classifier.
        InvokeModelError::ValidationException(e) => e.message().map(classify_message),
        InvokeModelError::ResourceNotFoundException(_) => Some(FailureKind::ModelNotResolved),
        InvokeModelError::AccessDeniedException(_) => Some(FailureKind::AccessDenied),
        InvokeModelError::ThrottlingException(_)
        | InvokeModelError::ServiceQuotaExceededException(_) => Some(FailureKind::Throttled),
        InvokeModelError::ModelTimeoutException(_) => Some(FailureKind::Timeout),
        InvokeModelError::ServiceUnavailableException(_)
        | InvokeModelError::ModelNotReadyException(_)
        | InvokeModelError::InternalServerException(_) => Some(FailureKind::ServiceUnavailable),
        _ => None,
    }
}
