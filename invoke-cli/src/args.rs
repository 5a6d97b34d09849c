//! Command-line flags.

use crate::error::CliError;
use invoke_core::{InvokeConfig, TransportKind};
use std::str::FromStr;
use std::time::Duration;

pub const USAGE: &str = "\
Send one prompt to Anthropic Claude on Amazon Bedrock and print the reply.

Usage: bedrock-invoke [OPTIONS]

Options:
  --region <REGION>          AWS region [env: BEDROCK_INVOKE_REGION, AWS_REGION] [default: us-east-1]
  --model-id <ID>            Model identifier [env: BEDROCK_INVOKE_MODEL_ID]
  --prompt <TEXT>            User prompt [env: BEDROCK_INVOKE_PROMPT]
  --system <TEXT>            System prompt [env: BEDROCK_INVOKE_SYSTEM]
  --max-tokens <N>           Maximum tokens to generate [env: BEDROCK_INVOKE_MAX_TOKENS] [default: 1024]
  --timeout-ms <MS>          Per-attempt timeout [env: BEDROCK_INVOKE_TIMEOUT_MS] [default: 60000]
  --max-retries <N>          Retries for transient failures [env: BEDROCK_INVOKE_MAX_RETRIES] [default: 2]
  --transport <sdk|http>     AWS SDK or HTTPS with a Bedrock API key [env: BEDROCK_INVOKE_TRANSPORT] [default: sdk]
  --endpoint-url <URL>       Override the Bedrock runtime endpoint [env: BEDROCK_INVOKE_ENDPOINT_URL]
  --bearer-token <TOKEN>     Bedrock API key for the http transport [env: AWS_BEARER_TOKEN_BEDROCK]
  -h, --help                 Print this help

Logging goes to standard error; set RUST_LOG to change the level and
BEDROCK_INVOKE_LOG_FORMAT=json for JSON lines.
";

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliArgs),
    Help,
}

/// Values given on the command line. `None` leaves the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub region: Option<String>,
    pub model_id: Option<String>,
    pub prompt: Option<String>,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub transport: Option<TransportKind>,
    pub endpoint_url: Option<String>,
    pub bearer_token: Option<String>,
}

/// Parse arguments (without the program name).
///
/// Accepts `--flag value` and `--flag=value`. `-h`/`--help` anywhere wins.
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        if !flag.starts_with("--") {
            return Err(CliError::Usage(format!("unexpected argument: {}", flag)));
        }

        let value = match inline {
            Some(value) => value,
            None => args
                .next()
                .ok_or_else(|| CliError::Usage(format!("missing value for {}", flag)))?,
        };

        match flag.as_str() {
            "--region" => parsed.region = Some(value),
            "--model-id" => parsed.model_id = Some(value),
            "--prompt" => parsed.prompt = Some(value),
            "--system" => parsed.system = Some(value),
            "--max-tokens" => parsed.max_tokens = Some(number(&flag, &value)?),
            "--timeout-ms" => parsed.timeout_ms = Some(number(&flag, &value)?),
            "--max-retries" => parsed.max_retries = Some(number(&flag, &value)?),
            "--transport" => parsed.transport = Some(value.parse()?),
            "--endpoint-url" => parsed.endpoint_url = Some(value),
            "--bearer-token" => parsed.bearer_token = Some(value),
            _ => return Err(CliError::Usage(format!("unknown argument: {}", flag))),
        }
    }

    Ok(Command::Run(parsed))
}

fn number<T: FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("invalid value for {}: {}", flag, value)))
}

impl CliArgs {
    /// Overlay flags onto `config`.
    pub fn apply(&self, config: &mut InvokeConfig) {
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(model_id) = &self.model_id {
            config.model_id = model_id.clone();
        }
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(system) = &self.system {
            config.system = system.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(max_retries) = self.max_retries {
            config.retry.max_retries = max_retries;
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(url) = &self.endpoint_url {
            config.endpoint_url = Some(url.clone());
        }
        if let Some(token) = &self.bearer_token {
            config.bearer_token = Some(token.clone());
        }
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
