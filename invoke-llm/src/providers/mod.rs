//! Transport implementations

pub mod bedrock;

use crate::ModelTransport;
use bedrock::{BedrockHttpTransport, BedrockSdkTransport};
use invoke_core::{InvokeConfig, InvokeResult, TransportKind};
use std::sync::Arc;

/// Build the transport selected by `config.transport`.
pub async fn transport_from_config(config: &InvokeConfig) -> InvokeResult<Arc<dyn ModelTransport>> {
    let transport: Arc<dyn ModelTransport> = match config.transport {
        TransportKind::Sdk => Arc::new(BedrockSdkTransport::from_config(config).await),
        TransportKind::Http => Arc::new(BedrockHttpTransport::from_config(config)?),
    };

    tracing::debug!(
        transport = transport.name(),
        region = %config.region,
        endpoint_url = ?config.endpoint_url,
        "Transport ready"
    );

    Ok(transport)
}
