//! Configuration types

use crate::{
    ConfigError, InvokeRequest, ValidationError, BEDROCK_ANTHROPIC_VERSION, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL_ID, DEFAULT_PROMPT, DEFAULT_REGION, DEFAULT_SYSTEM,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment lookup used by [`InvokeConfig::apply_env`].
///
/// Production code passes a wrapper around `std::env::var`; tests pass a map.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

// ============================================================================
// RETRY
// ============================================================================

/// Retry configuration for transient invocation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64()
            * f64::from(self.backoff_multiplier).powi(exponent);
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }
}

// ============================================================================
// TRANSPORT SELECTION
// ============================================================================

/// Which transport carries the request to Bedrock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// AWS SDK with the default credential chain
    #[default]
    Sdk,
    /// Plain HTTPS with a Bedrock API key as bearer token
    Http,
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sdk" => Ok(Self::Sdk),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::InvalidValue {
                field: "transport".to_string(),
                value: other.to_string(),
                reason: "expected 'sdk' or 'http'".to_string(),
            }),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdk => f.write_str("sdk"),
            Self::Http => f.write_str("http"),
        }
    }
}

// ============================================================================
// INVOKE CONFIG
// ============================================================================

pub const ENV_REGION: &str = "BEDROCK_INVOKE_REGION";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_MODEL_ID: &str = "BEDROCK_INVOKE_MODEL_ID";
pub const ENV_PROMPT: &str = "BEDROCK_INVOKE_PROMPT";
pub const ENV_SYSTEM: &str = "BEDROCK_INVOKE_SYSTEM";
pub const ENV_MAX_TOKENS: &str = "BEDROCK_INVOKE_MAX_TOKENS";
pub const ENV_TIMEOUT_MS: &str = "BEDROCK_INVOKE_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "BEDROCK_INVOKE_MAX_RETRIES";
pub const ENV_TRANSPORT: &str = "BEDROCK_INVOKE_TRANSPORT";
pub const ENV_ENDPOINT_URL: &str = "BEDROCK_INVOKE_ENDPOINT_URL";
pub const ENV_BEARER_TOKEN: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Everything needed for one invocation.
///
/// Values come from [`Default`], then the environment, then command-line
/// flags; `validate()` runs once all layers are applied.
#[derive(Clone, PartialEq)]
pub struct InvokeConfig {
    pub region: String,
    pub model_id: String,
    pub prompt: String,
    pub system: String,
    pub max_tokens: u32,
    pub anthropic_version: String,
    /// Deadline for a single attempt
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub transport: TransportKind,
    /// Override for the Bedrock runtime endpoint
    pub endpoint_url: Option<String>,
    /// Bedrock API key, required by the HTTP transport
    pub bearer_token: Option<String>,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            system: DEFAULT_SYSTEM.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            transport: TransportKind::Sdk,
            endpoint_url: None,
            bearer_token: None,
        }
    }
}

impl InvokeConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(&|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values found through `lookup` onto this config.
    ///
    /// Environment variables:
    /// - `BEDROCK_INVOKE_REGION`, falling back to `AWS_REGION`
    /// - `BEDROCK_INVOKE_MODEL_ID`
    /// - `BEDROCK_INVOKE_PROMPT`
    /// - `BEDROCK_INVOKE_SYSTEM`
    /// - `BEDROCK_INVOKE_MAX_TOKENS`
    /// - `BEDROCK_INVOKE_TIMEOUT_MS`
    /// - `BEDROCK_INVOKE_MAX_RETRIES`
    /// - `BEDROCK_INVOKE_TRANSPORT`: "sdk" or "http"
    /// - `BEDROCK_INVOKE_ENDPOINT_URL`
    /// - `AWS_BEARER_TOKEN_BEDROCK`
    ///
    /// Blank values are ignored. Unparseable numbers are an error.
    pub fn apply_env(&mut self, lookup: EnvLookup<'_>) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = get(ENV_REGION).or_else(|| get(ENV_AWS_REGION)) {
            self.region = region;
        }
        if let Some(model_id) = get(ENV_MODEL_ID) {
            self.model_id = model_id;
        }
        if let Some(prompt) = get(ENV_PROMPT) {
            self.prompt = prompt;
        }
        if let Some(system) = lookup(ENV_SYSTEM) {
            self.system = system;
        }
        if let Some(value) = get(ENV_MAX_TOKENS) {
            self.max_tokens = parse_number(ENV_MAX_TOKENS, &value)?;
        }
        if let Some(value) = get(ENV_TIMEOUT_MS) {
            self.timeout = Duration::from_millis(parse_number(ENV_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = get(ENV_MAX_RETRIES) {
            self.retry.max_retries = parse_number(ENV_MAX_RETRIES, &value)?;
        }
        if let Some(value) = get(ENV_TRANSPORT) {
            self.transport = value.parse()?;
        }
        if let Some(url) = get(ENV_ENDPOINT_URL) {
            self.endpoint_url = Some(url);
        }
        if let Some(token) = get(ENV_BEARER_TOKEN) {
            self.bearer_token = Some(token);
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - region, model_id and prompt are not blank
    /// - max_tokens > 0 and timeout > 0
    /// - backoff_multiplier >= 1.0 and max_backoff >= initial_backoff
    /// - the HTTP transport has a bearer token
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("region", &self.region),
            ("model_id", &self.model_id),
            ("prompt", &self.prompt),
            ("anthropic_version", &self.anthropic_version),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: field.to_string(),
                });
            }
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_tokens".to_string(),
                value: self.max_tokens.to_string(),
                reason: "max_tokens must be greater than 0".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                value: format!("{:?}", self.timeout),
                reason: "timeout must be positive".to_string(),
            });
        }

        if self.retry.backoff_multiplier.is_nan() || self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_multiplier".to_string(),
                value: self.retry.backoff_multiplier.to_string(),
                reason: "backoff_multiplier must be >= 1.0".to_string(),
            });
        }

        if self.retry.max_backoff < self.retry.initial_backoff {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_backoff".to_string(),
                value: format!("{:?}", self.retry.max_backoff),
                reason: "max_backoff must be >= initial_backoff".to_string(),
            });
        }

        if self.transport == TransportKind::Http && self.bearer_token.is_none() {
            return Err(ConfigError::MissingRequired {
                field: format!("bearer_token (set {} for the http transport)", ENV_BEARER_TOKEN),
            });
        }

        Ok(())
    }

    /// Build the request body described by this config.
    pub fn request(&self) -> Result<InvokeRequest, ValidationError> {
        let request = InvokeRequest::new(&self.prompt, &self.system, self.max_tokens)?
            .with_anthropic_version(&self.anthropic_version);
        request.validate()?;
        Ok(request)
    }
}

impl fmt::Debug for InvokeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeConfig")
            .field("region", &self.region)
            .field("model_id", &self.model_id)
            .field("prompt", &self.prompt)
            .field("system", &self.system)
            .field("max_tokens", &self.max_tokens)
            .field("anthropic_version", &self.anthropic_version)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("transport", &self.transport)
            .field("endpoint_url", &self.endpoint_url)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = InvokeConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.model_id, "anthropic.claude-3-5-sonnet-20240620-v1:0");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.anthropic_version, "bedrock-2023-05-31");
        assert_eq!(config.transport, TransportKind::Sdk);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut config = InvokeConfig::default();
        let lookup = lookup_from(&[
            (ENV_REGION, "ap-southeast-1"),
            (ENV_AWS_REGION, "eu-west-1"),
            (ENV_MODEL_ID, "anthropic.claude-3-haiku-20240307-v1:0"),
            (ENV_MAX_TOKENS, "256"),
            (ENV_TIMEOUT_MS, "1500"),
            (ENV_MAX_RETRIES, "0"),
        ]);
        config.apply_env(&lookup).unwrap();

        assert_eq!(config.region, "ap-southeast-1");
        assert_eq!(config.model_id, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_aws_region_is_fallback() {
        let mut config = InvokeConfig::default();
        config
            .apply_env(&lookup_from(&[(ENV_AWS_REGION, "eu-west-1")]))
            .unwrap();
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_env_rejects_garbage_numbers() {
        let mut config = InvokeConfig::default();
        let err = config
            .apply_env(&lookup_from(&[(ENV_MAX_TOKENS, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == ENV_MAX_TOKENS));
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let mut config = InvokeConfig::default();
        config
            .apply_env(&lookup_from(&[(ENV_REGION, "  "), (ENV_MAX_TOKENS, "")]))
            .unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_tokens_and_timeout() {
        let mut config = InvokeConfig::default();
        config.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = InvokeConfig::default();
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        let mut config = InvokeConfig::default();
        config.prompt = " ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingRequired {
                field: "prompt".to_string()
            })
        );
    }

    #[test]
    fn test_http_transport_requires_token() {
        let mut config = InvokeConfig::default();
        config.transport = TransportKind::Http;
        assert!(config.validate().is_err());

        config.bearer_token = Some("bedrock-api-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = InvokeConfig::default();
        config.bearer_token = Some("super-secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_transport_kind_parse() {
        assert_eq!("SDK".parse::<TransportKind>().unwrap(), TransportKind::Sdk);
        assert_eq!("http".parse::<TransportKind>().unwrap(), TransportKind::Http);
        assert!("grpc".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
            backoff_multiplier: 2.0,
        };
        assert_eq!(retry.backoff_for(0), Duration::from_millis(100));
        assert_eq!(retry.backoff_for(1), Duration::from_millis(200));
        assert_eq!(retry.backoff_for(2), Duration::from_millis(350));
        assert_eq!(retry.backoff_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_request_uses_configured_fields() {
        let mut config = InvokeConfig::default();
        config.anthropic_version = "bedrock-2099-01-01".to_string();
        let request = config.request().unwrap();
        assert_eq!(request.anthropic_version, "bedrock-2099-01-01");
        assert_eq!(request.system, "Act as a kindergartner.");
        assert_eq!(request.max_tokens, 1024);
    }
}
