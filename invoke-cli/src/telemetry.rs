//! Tracing subscriber setup
//!
//! Everything goes to standard error; standard output is reserved for the
//! completion text.

use crate::error::CliError;
use invoke_core::EnvLookup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "BEDROCK_INVOKE_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// `BEDROCK_INVOKE_LOG_FORMAT=json` selects JSON lines; anything else is text.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let format = match lookup(ENV_LOG_FORMAT) {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            format,
            ..Self::default()
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.with_target(false))
            .try_init(),
    };

    result.map_err(|e| CliError::Telemetry(e.to_string()))
}
