//! Form scoring engine.
//!
//! This crate provides:
//! - The exercise registry with built-in presets
//! - Kinematics extraction from per-frame joint positions
//! - Alignment of curves onto a normalized time axis
//! - Nonlinear similarity scoring and report aggregation
//!
//! Everything here is synchronous and free of I/O. Reference persistence
//! lives in `formscore-storage`.

pub mod aggregate;
pub mod align;
pub mod error;
pub mod kinematics;
pub mod metrics;
pub mod pipeline;
pub mod registry;
pub mod scoring;

pub use aggregate::{aggregate, generate_insights, JointAxisResult, INSIGHT_THRESHOLD};
pub use align::{
    align, normalized_time_axis, resample, AlignedPair, LinearInterpolator, RESAMPLE_POINTS,
};
pub use error::{CurveRole, FormScoreError, FormScoreResult};
pub use kinematics::{extract, extract_joint, gradient, gradient_uniform};
pub use pipeline::{score_joint_axis, FormScorer, ScoringOptions};
pub use registry::{builtin_presets, ExerciseRegistry};
pub use scoring::{mean_abs_diff, raw_score, score_aligned, score_transform};
