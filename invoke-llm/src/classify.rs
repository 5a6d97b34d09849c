//! Failure classification
//!
//! Transports report structured kinds where the SDK or HTTP layer exposes
//! them. Everything else is matched on the error text, in a fixed
//! precedence: unreachable host first, then model resolution, then
//! credential loading, then `Other`.

use crate::TransportError;
use invoke_core::FailureKind;

/// Text that means the regional endpoint could not be resolved.
///
/// The first entry is the resolver wording Go programs surface; the others
/// are what hyper/the AWS SDK report for the same condition.
pub const REGION_UNAVAILABLE_MARKERS: &[&str] =
    &["no such host", "dns error", "failed to lookup address"];

/// Text Bedrock returns when the model identifier does not resolve.
pub const MODEL_NOT_RESOLVED_MARKER: &str = "Could not resolve the foundation model";

/// Text the credential chain produces when it finds nothing usable.
pub const CREDENTIAL_MARKERS: &[&str] = &[
    "no providers in chain provided credentials",
    "failed to load credentials",
    "credentials provider was not enabled",
];

/// Classify a transport failure, preferring the structured kind.
///
/// A structured `Other` says nothing specific, so the text still decides.
pub fn classify(err: &TransportError) -> FailureKind {
    match err.kind {
        Some(kind) if kind != FailureKind::Other => kind,
        _ => classify_message(&err.message),
    }
}

/// Classify a failure from its text alone.
pub fn classify_message(message: &str) -> FailureKind {
    let lowered = message.to_lowercase();

    if REGION_UNAVAILABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return FailureKind::RegionUnavailable;
    }

    if lowered.contains(&MODEL_NOT_RESOLVED_MARKER.to_lowercase()) {
        return FailureKind::ModelNotResolved;
    }

    if CREDENTIAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        return FailureKind::Configuration;
    }

    FailureKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_host_is_region_unavailable() {
        let msg = "operation error Bedrock Runtime: InvokeModel, https response error \
                   StatusCode: 0, RequestID: , request send failed, Post \
                   \"https://bedrock-runtime.xx-east-1.amazonaws.com/model/m/invoke\": \
                   dial tcp: lookup bedrock-runtime.xx-east-1.amazonaws.com: no such host";
        assert_eq!(classify_message(msg), FailureKind::RegionUnavailable);
    }

    #[test]
    fn test_rust_resolver_wording_is_region_unavailable() {
        let msg = "dispatch failure: io error: client error (Connect): dns error: \
                   failed to lookup address information: Name or service not known";
        assert_eq!(classify_message(msg), FailureKind::RegionUnavailable);
    }

    #[test]
    fn test_host_marker_wins_over_model_marker() {
        let msg = "Could not resolve the foundation model; also: no such host";
        assert_eq!(classify_message(msg), FailureKind::RegionUnavailable);
    }

    #[test]
    fn test_model_marker() {
        let msg = "ValidationException: Could not resolve the foundation model from the \
                   provided model identifier.";
        assert_eq!(classify_message(msg), FailureKind::ModelNotResolved);
    }

    #[test]
    fn test_credential_marker() {
        let msg = "dispatch failure: other: no providers in chain provided credentials";
        assert_eq!(classify_message(msg), FailureKind::Configuration);
    }

    #[test]
    fn test_unrecognised_text_is_other() {
        assert_eq!(
            classify_message("ModelErrorException: the model returned an error"),
            FailureKind::Other
        );
    }

    #[test]
    fn test_structured_kind_takes_precedence() {
        let err = TransportError::with_kind(FailureKind::Throttled, "Too many requests");
        assert_eq!(classify(&err), FailureKind::Throttled);

        let err = TransportError::new("lookup failed: no such host");
        assert_eq!(classify(&err), FailureKind::RegionUnavailable);
    }

    #[test]
    fn test_structured_other_still_reads_the_text() {
        let err = TransportError::with_kind(
            FailureKind::Other,
            "ValidationException: lookup x: no such host",
        );
        assert_eq!(classify(&err), FailureKind::RegionUnavailable);

        let err = TransportError::with_kind(FailureKind::Other, "ModelErrorException: boom");
        assert_eq!(classify(&err), FailureKind::Other);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
