//! Structured request logging utilities.
//!
//! Every service call gets a request id so the log lines of one scoring or
//! capture run can be correlated.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Request logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct ScoringLogger {
    request_id: String,
    operation: String,
    exercise: String,
}

impl ScoringLogger {
    /// Create a logger with a fresh request id.
    ///
    /// # Arguments
    /// * `operation` - The service operation (e.g., "compute_form_score")
    /// * `exercise` - The exercise key as given by the caller
    pub fn new(operation: &str, exercise: &str) -> Self {
        Self::with_request_id(&Uuid::new_v4().to_string(), operation, exercise)
    }

    /// Create a logger for an existing request id.
    pub fn with_request_id(request_id: &str, operation: &str, exercise: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            operation: operation.to_string(),
            exercise: exercise.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            operation = %self.operation,
            exercise = %self.exercise,
            "Request started: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            request_id = %self.request_id,
            operation = %self.operation,
            exercise = %self.exercise,
            "Request warning: {}", message
        );
    }

    /// Log a failed request with its error kind.
    pub fn log_error(&self, kind: &str, message: &str) {
        error!(
            request_id = %self.request_id,
            operation = %self.operation,
            exercise = %self.exercise,
            kind = %kind,
            "Request failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            operation = %self.operation,
            exercise = %self.exercise,
            "Request completed: {}", message
        );
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    /// Create a tracing span for this request.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            operation = %self.operation,
            exercise = %self.exercise
        )
    }
}
