//! Aggregation of joint/axis scores into a form score report.

use std::collections::BTreeMap;

use formscore_models::{
    Axis, AxisCurves, AxisScores, ExerciseDefinition, FeedbackTier, FormScoreReport, Joint,
};

use crate::align::AlignedPair;
use crate::error::{FormScoreError, FormScoreResult};
use crate::scoring::mean_abs_diff;

/// Mean absolute deviation above which a joint/axis is flagged.
///
/// Fixed; independent of the score transform.
pub const INSIGHT_THRESHOLD: f64 = 0.1;

/// Outcome of comparing one joint along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct JointAxisResult {
    pub joint: Joint,
    pub axis: Axis,
    pub score: f64,
    pub aligned: AlignedPair,
}

impl JointAxisResult {
    /// Mean absolute deviation of the aligned curves.
    pub fn deviation(&self) -> f64 {
        mean_abs_diff(&self.aligned.reference, &self.aligned.user)
    }

    pub fn is_flagged(&self) -> bool {
        self.deviation() > INSIGHT_THRESHOLD
    }
}

/// Joints whose aligned curves deviate beyond [`INSIGHT_THRESHOLD`], with the flagged axes.
///
/// Joints without any flagged axis are left out.
pub fn generate_insights(results: &[JointAxisResult]) -> BTreeMap<Joint, Vec<Axis>> {
    let mut insights: BTreeMap<Joint, Vec<Axis>> = BTreeMap::new();
    for result in results.iter().filter(|r| r.is_flagged()) {
        insights.entry(result.joint).or_default().push(result.axis);
    }
    for axes in insights.values_mut() {
        axes.sort_unstable();
    }
    insights
}

/// Combine per-joint/axis results into the final report.
///
/// `results` must contain exactly one entry for each joint of the exercise's
/// joint group on each axis. `user_data` and `standard_data` are the
/// pre-alignment curves carried for diagnostics.
pub fn aggregate(
    definition: &ExerciseDefinition,
    results: &[JointAxisResult],
    user_data: BTreeMap<Joint, AxisCurves>,
    standard_data: BTreeMap<Joint, AxisCurves>,
) -> FormScoreResult<FormScoreReport> {
    let mut by_pair: BTreeMap<(Joint, Axis), f64> = BTreeMap::new();
    for result in results {
        by_pair.insert((result.joint, result.axis), result.score);
    }

    let mut joint_scores = BTreeMap::new();
    let mut missing = Vec::new();
    for &joint in &definition.joint_group {
        match (by_pair.get(&(joint, Axis::X)), by_pair.get(&(joint, Axis::Y))) {
            (Some(&x), Some(&y)) => {
                joint_scores.insert(joint, AxisScores { x, y });
            }
            _ => missing.push(joint),
        }
    }

    if !missing.is_empty() {
        return Err(FormScoreError::IncompleteJointData {
            exercise: definition.key.clone(),
            joints: missing,
        });
    }

    let total: f64 = joint_scores.values().map(|s| s.x + s.y).sum();
    let overall_score = total / definition.scored_pairs() as f64;

    let insights = generate_insights(results);

    Ok(FormScoreReport {
        exercise_key: definition.key.clone(),
        exercise_name: definition.name.clone(),
        overall_score,
        feedback: FeedbackTier::from_score(overall_score),
        joint_scores,
        insights,
        user_data,
        standard_data,
    })
}
