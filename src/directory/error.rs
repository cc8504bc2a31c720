//! Directory error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Reasons a request is refused before it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Missing organization header")]
    MissingOrganization,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid organization")]
    InvalidOrganization,
}

impl AdmissionError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::MissingOrganization => "missing_organization",
            AdmissionError::RateLimited => "rate_limited",
            AdmissionError::InvalidOrganization => "invalid_organization",
        }
    }
}

/// Errors from the write path.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Rejected before any storage interaction.
    #[error("invalid employee: {0}")]
    InvalidEmployee(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AdmissionError::RateLimited.to_string(), "Rate limit exceeded");
        let err = ServiceError::from(DirectoryError::InvalidEmployee("org_id must not be empty".into()));
        assert_eq!(err.to_string(), "invalid employee: org_id must not be empty");
    }
}
