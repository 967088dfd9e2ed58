//! Scoring metrics.
//!
//! Recorded through the `metrics` facade; they are no-ops until the host
//! process installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SCORES_COMPUTED_TOTAL: &str = "formscore_scores_computed_total";
    pub const SCORING_FAILURES_TOTAL: &str = "formscore_scoring_failures_total";
    pub const OVERALL_SCORE: &str = "formscore_overall_score";
    pub const SCORING_DURATION_SECONDS: &str = "formscore_scoring_duration_seconds";
    pub const REFERENCES_BUILT_TOTAL: &str = "formscore_references_built_total";
}

/// Record a completed scoring call.
pub fn record_score(exercise: &str, overall_score: f64, duration_secs: f64) {
    let labels = [("exercise", exercise.to_string())];
    counter!(names::SCORES_COMPUTED_TOTAL, &labels).increment(1);
    histogram!(names::OVERALL_SCORE, &labels).record(overall_score);
    histogram!(names::SCORING_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a failed scoring or capture call.
pub fn record_failure(exercise: &str, kind: &str) {
    let labels = [
        ("exercise", exercise.to_string()),
        ("kind", kind.to_string()),
    ];
    counter!(names::SCORING_FAILURES_TOTAL, &labels).increment(1);
}

/// Record a reference set built from a capture.
pub fn record_reference_built(exercise: &str) {
    let labels = [("exercise", exercise.to_string())];
    counter!(names::REFERENCES_BUILT_TOTAL, &labels).increment(1);
}
