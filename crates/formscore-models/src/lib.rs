//! Shared data models for the FormScore pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Body joints and coordinate axes
//! - Exercise definitions
//! - Video parameters and per-joint frame maps from the pose source
//! - Derived kinematic series
//! - Stored reference (standard form) sets
//! - Form score reports

pub mod exercise;
pub mod joint;
pub mod kinematics;
pub mod pose;
pub mod reference;
pub mod report;
pub mod utils;
pub mod video;

// Re-export common types
pub use exercise::{ExerciseDefinition, ExerciseDefinitionError};
pub use joint::{Axis, AxisParseError, Joint, JointParseError};
pub use kinematics::{AxisKinematics, JointKinematics, KinematicSeries};
pub use pose::{JointFrameMap, JointTrack, PixelPoint, PoseCapture};
pub use reference::{AxisCurves, ReferenceCurve, ReferenceSet, REFERENCE_FORMAT_VERSION};
pub use report::{AxisScores, FeedbackTier, FormScoreReport};
pub use utils::normalize_exercise_key;
pub use video::{VideoParams, VideoParamsError};
