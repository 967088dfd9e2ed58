//! Error types for scoring operations.

use std::fmt;

use formscore_models::{Axis, ExerciseDefinitionError, Joint, VideoParamsError};
use thiserror::Error;

/// Result type for scoring operations.
pub type FormScoreResult<T> = Result<T, FormScoreError>;

/// Which side of a comparison a curve came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveRole {
    Reference,
    User,
}

impl fmt::Display for CurveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveRole::Reference => write!(f, "reference"),
            CurveRole::User => write!(f, "user"),
        }
    }
}

/// Errors that can occur while scoring or capturing a reference.
///
/// None of these are transient: the engine does no I/O, so retrying the
/// same inputs always fails the same way.
#[derive(Debug, Error)]
pub enum FormScoreError {
    #[error("Unknown exercise: {key}")]
    UnknownExercise { key: String },

    #[error("No reference captured for exercise {exercise}{}", joint_suffix(.joint))]
    ReferenceNotFound {
        exercise: String,
        joint: Option<Joint>,
    },

    #[error(
        "Cannot align {curve} curve{} with {len} sample(s); at least 2 are required",
        joint_axis_suffix(.joint, .axis)
    )]
    Alignment {
        joint: Option<Joint>,
        axis: Option<Axis>,
        curve: CurveRole,
        len: usize,
    },

    #[error("Exercise {exercise} has no detected frames for joints: {}", join_joints(.joints))]
    IncompleteJointData { exercise: String, joints: Vec<Joint> },

    #[error("Invalid video parameters: {0}")]
    InvalidVideoParams(String),

    #[error("Invalid exercise definition: {0}")]
    InvalidExercise(#[from] ExerciseDefinitionError),

    #[error("Exercise {0} is defined more than once")]
    DuplicateExercise(String),

    #[error("Failed to parse exercise presets: {0}")]
    PresetParse(String),
}

impl FormScoreError {
    pub fn unknown_exercise(key: impl Into<String>) -> Self {
        Self::UnknownExercise { key: key.into() }
    }

    pub fn reference_not_found(exercise: impl Into<String>, joint: Option<Joint>) -> Self {
        Self::ReferenceNotFound {
            exercise: exercise.into(),
            joint,
        }
    }

    pub fn alignment(curve: CurveRole, len: usize) -> Self {
        Self::Alignment {
            joint: None,
            axis: None,
            curve,
            len,
        }
    }

    /// Attach joint and axis identifiers to an alignment error.
    pub fn for_joint_axis(self, joint: Joint, axis: Axis) -> Self {
        match self {
            Self::Alignment { curve, len, .. } => Self::Alignment {
                joint: Some(joint),
                axis: Some(axis),
                curve,
                len,
            },
            other => other,
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownExercise { .. } => "unknown_exercise",
            Self::ReferenceNotFound { .. } => "reference_not_found",
            Self::Alignment { .. } => "alignment",
            Self::IncompleteJointData { .. } => "incomplete_joint_data",
            Self::InvalidVideoParams(_) => "invalid_video_params",
            Self::InvalidExercise(_) => "invalid_exercise",
            Self::DuplicateExercise(_) => "duplicate_exercise",
            Self::PresetParse(_) => "preset_parse",
        }
    }

    /// Check if the user has to record the exercise again.
    ///
    /// True when pose detection yielded too little usable data.
    pub fn requires_recapture(&self) -> bool {
        matches!(
            self,
            Self::Alignment {
                curve: CurveRole::User,
                ..
            } | Self::IncompleteJointData { .. }
        )
    }

    /// Check if a reference capture has to run before scoring can succeed.
    pub fn requires_reference_capture(&self) -> bool {
        matches!(
            self,
            Self::ReferenceNotFound { .. }
                | Self::Alignment {
                    curve: CurveRole::Reference,
                    ..
                }
        )
    }
}

impl From<VideoParamsError> for FormScoreError {
    fn from(e: VideoParamsError) -> Self {
        Self::InvalidVideoParams(e.0)
    }
}

fn joint_suffix(joint: &Option<Joint>) -> String {
    joint.map(|j| format!(" (joint {})", j)).unwrap_or_default()
}

fn joint_axis_suffix(joint: &Option<Joint>, axis: &Option<Axis>) -> String {
    match (joint, axis) {
        (Some(j), Some(a)) => format!(" for {} {}", j, a),
        (Some(j), None) => format!(" for {}", j),
        _ => String::new(),
    }
}

fn join_joints(joints: &[Joint]) -> String {
    joints
        .iter()
        .map(|j| j.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_identifiers() {
        let err = FormScoreError::reference_not_found("bicep_curl", Some(Joint::RWrist));
        assert_eq!(
            err.to_string(),
            "No reference captured for exercise bicep_curl (joint RWrist)"
        );

        let err =
            FormScoreError::alignment(CurveRole::User, 1).for_joint_axis(Joint::RElbow, Axis::X);
        assert_eq!(
            err.to_string(),
            "Cannot align user curve for RElbow x with 1 sample(s); at least 2 are required"
        );

        let err = FormScoreError::IncompleteJointData {
            exercise: "lateral_raise".into(),
            joints: vec![Joint::LElbow, Joint::LWrist],
        };
        assert_eq!(
            err.to_string(),
            "Exercise lateral_raise has no detected frames for joints: LElbow, LWrist"
        );
    }

    #[test]
    fn test_recovery_classification() {
        assert!(FormScoreError::alignment(CurveRole::User, 0).requires_recapture());
        assert!(!FormScoreError::alignment(CurveRole::User, 0).requires_reference_capture());
        assert!(FormScoreError::alignment(CurveRole::Reference, 1).requires_reference_capture());
        assert!(FormScoreError::reference_not_found("x", None).requires_reference_capture());
        assert!(!FormScoreError::unknown_exercise("x").requires_recapture());
    }

    #[test]
    fn test_for_joint_axis_leaves_other_errors_untouched() {
        let err = FormScoreError::unknown_exercise("plank").for_joint_axis(Joint::Neck, Axis::Y);
        assert_eq!(err.kind(), "unknown_exercise");
    }
}
