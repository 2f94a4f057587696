//! Domain errors for the coverage sync job.

use thiserror::Error;

/// Domain-level errors that can occur while syncing coverage data.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Upstream request {endpoint} returned {status}: {body}")]
    UpstreamRequest {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Upstream request {endpoint} could not be completed: {message}")]
    UpstreamTransport { endpoint: String, message: String },

    #[error("Failed to update issue {issue_key}: {message}")]
    IssueUpdateFailed { issue_key: String, message: String },

    #[error("Sync setting '{0}' is missing or empty")]
    MissingSetting(&'static str),

    #[error("Invalid sync setting '{field}': {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
