//! bedrock-invoke command-line client.
//!
//! `main` wires these pieces together; they live in the library so the
//! whole flow can be driven against a [`invoke_llm::MockTransport`].

pub mod args;
pub mod error;
pub mod telemetry;

use args::CliArgs;
use error::CliError;
use invoke_core::{EnvLookup, InvokeConfig};
use invoke_llm::{InferenceClient, ModelTransport};
use std::io::Write;
use std::sync::Arc;

/// Defaults, then the environment, then flags; validated.
pub fn resolve_config(args: &CliArgs, lookup: EnvLookup<'_>) -> Result<InvokeConfig, CliError> {
    let mut config = InvokeConfig::default();
    config.apply_env(lookup)?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Send the configured prompt and write the first text block as one line.
pub async fn invoke_and_print<W: Write>(
    config: &InvokeConfig,
    transport: Arc<dyn ModelTransport>,
    stdout: &mut W,
) -> Result<(), CliError> {
    let client = InferenceClient::from_config(transport, config);
    tracing::debug!(client = ?client, "Sending prompt");

    let text = client
        .invoke(&config.prompt, &config.system, config.max_tokens)
        .await?;

    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

/// Run one invocation and return the process exit code.
pub async fn run<W: Write, E: Write>(
    config: &InvokeConfig,
    transport: Arc<dyn ModelTransport>,
    stdout: &mut W,
    stderr: &mut E,
) -> u8 {
    match invoke_and_print(config, transport, stdout).await {
        Ok(()) => 0,
        Err(err) => report(&err, stderr),
    }
}

/// Write the diagnostic for `err` and return its exit code.
pub fn report<E: Write>(err: &CliError, stderr: &mut E) -> u8 {
    if let CliError::Invoke(inner) = err {
        tracing::debug!(kind = ?inner.failure_kind(), error = %inner, "Invocation failed");
    }
    let _ = writeln!(stderr, "{}", err.diagnostic());
    err.exit_code()
}
