//! Domain-level error taxonomy for clearclaim.

/// Errors surfaced to the caller before or around a pipeline run.
///
/// Agent-level failures never appear here: the agent runner converts them
/// into ESCALATE verdicts at its own boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// Submitted claim facts failed validation. Rejected before the
    /// pipeline starts; distinct from an ESCALATE disposition.
    #[error("invalid claim submission: {0}")]
    InvalidClaim(String),

    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for clearclaim domain operations.
pub type Result<T> = std::result::Result<T, ClaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_claim_display() {
        let err = ClaimError::InvalidClaim("report_date precedes incident_date".to_string());
        assert!(err.to_string().contains("invalid claim submission"));
        assert!(err.to_string().contains("report_date"));
    }

    #[test]
    fn test_unsupported_provider_display() {
        let err = ClaimError::UnsupportedProvider("cohere".to_string());
        assert!(err.to_string().contains("cohere"));
    }
}
