//! Service error types.

use formscore_core::FormScoreError;
use formscore_storage::StorageError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Scoring(#[from] FormScoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scoring task failed: {0}")]
    TaskFailed(String),
}

impl ServiceError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn task_failed(msg: impl Into<String>) -> Self {
        Self::TaskFailed(msg.into())
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Scoring(e) => e.kind(),
            ServiceError::Storage(_) => "storage",
            ServiceError::ConfigError(_) => "config",
            ServiceError::TaskFailed(_) => "task_failed",
        }
    }

    /// Check if error is retryable.
    ///
    /// Only I/O failures of the reference store qualify. Scoring errors are
    /// deterministic in their inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(e) if e.is_transient())
    }

    /// Check if the user has to record the exercise again.
    pub fn requires_recapture(&self) -> bool {
        matches!(self, ServiceError::Scoring(e) if e.requires_recapture())
    }

    /// Check if a standard-form reference has to be captured first.
    pub fn requires_reference_capture(&self) -> bool {
        matches!(self, ServiceError::Scoring(e) if e.requires_reference_capture())
    }
}
