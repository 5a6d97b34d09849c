//! Error types for the CLI.

use invoke_core::{ConfigError, InvokeError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// The single line written to standard error.
    pub fn diagnostic(&self) -> String {
        match self {
            CliError::Usage(message) => {
                format!("Error: {}. Run with --help for usage", message)
            }
            CliError::Config(err) => format!("Error: invalid configuration: {}", err),
            CliError::Invoke(err) => err.diagnostic(),
            CliError::Telemetry(message) => {
                format!("Error: failed to initialise logging: {}", message)
            }
            CliError::Io(err) => format!("Error: failed to write output: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoke_core::{FailureKind, LlmError};

    #[test]
    fn test_invoke_errors_use_core_diagnostic() {
        let err = CliError::from(InvokeError::from(LlmError::InvocationFailed {
            kind: FailureKind::Other,
            model_id: "m".to_string(),
            region: "us-east-1".to_string(),
            message: "boom".to_string(),
        }));
        assert_eq!(err.diagnostic(), "Error: failed to invoke Anthropic Claude: boom");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_usage_diagnostic_points_at_help() {
        let err = CliError::Usage("unknown argument: --nope".to_string());
        assert!(err.diagnostic().starts_with("Error: unknown argument: --nope"));
        assert!(err.diagnostic().ends_with("--help for usage"));
    }

    #[test]
    fn test_diagnostics_are_single_line() {
        let errors = [
            CliError::Usage("missing value for --region".to_string()),
            CliError::Config(ConfigError::MissingRequired {
                field: "region".to_string(),
            }),
            CliError::Telemetry("a global default trace dispatcher has already been set".to_string()),
            CliError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe")),
        ];
        for err in errors {
            assert!(!err.diagnostic().contains('\n'), "{:?}", err);
            assert_eq!(err.exit_code(), 1);
        }
    }
}
