//! bedrock-invoke entry point.

use invoke_cli::args::{parse_args, Command, USAGE};
use invoke_cli::error::CliError;
use invoke_cli::telemetry::{init_tracing, TelemetryConfig};
use invoke_cli::{report, resolve_config, run};
use invoke_llm::transport_from_config;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            let _ = write!(stdout, "{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(args)) => args,
        Err(err) => return ExitCode::from(report(&err, &mut stderr)),
    };

    if let Err(err) = init_tracing(&TelemetryConfig::from_env()) {
        return ExitCode::from(report(&err, &mut stderr));
    }

    let config = match resolve_config(&args, &|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => return ExitCode::from(report(&err, &mut stderr)),
    };
    tracing::debug!(config = ?config, "Resolved configuration");

    let transport = match transport_from_config(&config).await {
        Ok(transport) => transport,
        Err(err) => return ExitCode::from(report(&CliError::from(err), &mut stderr)),
    };

    ExitCode::from(run(&config, transport, &mut stdout, &mut stderr).await)
}
