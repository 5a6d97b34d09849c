//! Classified failure kinds for remote invocations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a remote model invocation failed.
///
/// Transports fill this in from structured SDK/HTTP information when they
/// can; otherwise the classifier in `invoke-llm` derives it from the error
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service endpoint could not be reached in the configured region
    RegionUnavailable,
    /// The model identifier does not name an accessible foundation model
    ModelNotResolved,
    /// Credentials were rejected or lack permission for the model
    AccessDenied,
    /// Request rate or quota exceeded
    Throttled,
    /// The attempt did not finish within its deadline
    Timeout,
    /// The service or model is temporarily unable to serve requests
    ServiceUnavailable,
    /// Credential or region resolution failed before the request was sent
    Configuration,
    /// Anything not recognised above
    Other,
}

impl FailureKind {
    /// Whether another attempt could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Throttled | Self::Timeout | Self::ServiceUnavailable
        )
    }

    /// Stable snake_case name, used in structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegionUnavailable => "region_unavailable",
            Self::ModelNotResolved => "model_not_resolved",
            Self::AccessDenied => "access_denied",
            Self::Throttled => "throttled",
            Self::Timeout => "timeout",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Configuration => "configuration",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
