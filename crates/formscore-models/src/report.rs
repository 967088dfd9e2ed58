//! Form score report models.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::joint::{Axis, Joint};
use crate::reference::AxisCurves;

/// Post-transform similarity scores of one joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AxisScores {
    pub x: f64,
    pub y: f64,
}

impl AxisScores {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Coarse verdict on the overall score, used for user-facing summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    /// Overall score of at least 0.9
    Great,
    /// Overall score of at least 0.8
    NotBad,
    /// Anything lower
    NeedsWork,
}

impl FeedbackTier {
    pub const GREAT_THRESHOLD: f64 = 0.9;
    pub const NOT_BAD_THRESHOLD: f64 = 0.8;

    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= Self::GREAT_THRESHOLD {
            FeedbackTier::Great
        } else if overall_score >= Self::NOT_BAD_THRESHOLD {
            FeedbackTier::NotBad
        } else {
            FeedbackTier::NeedsWork
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackTier::Great => "great",
            FeedbackTier::NotBad => "not_bad",
            FeedbackTier::NeedsWork => "needs_work",
        }
    }

    /// Returns a human-readable summary.
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::Great => "Great job! Your form looks good overall.",
            FeedbackTier::NotBad => {
                "Not bad form! However, there are some areas for improvement in your form."
            }
            FeedbackTier::NeedsWork => {
                "Your form needs work. Focus on improving your technique for better results \
                 and injury prevention."
            }
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of comparing one user recording against the exercise reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormScoreReport {
    /// Normalized registry key
    pub exercise_key: String,

    /// Display name of the exercise
    pub exercise_name: String,

    /// Mean of every joint/axis score
    pub overall_score: f64,

    /// Verdict derived from the overall score
    pub feedback: FeedbackTier,

    /// Per joint, per axis scores
    pub joint_scores: BTreeMap<Joint, AxisScores>,

    /// Joints whose aligned curves deviate beyond the insight threshold, with the axes flagged
    pub insights: BTreeMap<Joint, Vec<Axis>>,

    /// User positions before alignment
    pub user_data: BTreeMap<Joint, AxisCurves>,

    /// Reference positions before alignment
    pub standard_data: BTreeMap<Joint, AxisCurves>,
}

impl FormScoreReport {
    pub fn score(&self, joint: Joint, axis: Axis) -> Option<f64> {
        self.joint_scores.get(&joint).map(|s| s.get(axis))
    }

    /// Whether a joint/axis was flagged as deviating.
    pub fn is_flagged(&self, joint: Joint, axis: Axis) -> bool {
        self.insights
            .get(&joint)
            .is_some_and(|axes| axes.contains(&axis))
    }

    /// Overall score as a percentage.
    pub fn overall_percent(&self) -> f64 {
        self.overall_score * 100.0
    }

    /// Flagged joint/axis pairs as "Joint, axis" labels.
    pub fn insight_labels(&self) -> Vec<String> {
        self.insights
            .iter()
            .flat_map(|(joint, axes)| axes.iter().map(move |axis| format!("{}, {}", joint, axis)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_tier_boundaries() {
        assert_eq!(FeedbackTier::from_score(1.0), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_score(0.9), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_score(0.8999), FeedbackTier::NotBad);
        assert_eq!(FeedbackTier::from_score(0.8), FeedbackTier::NotBad);
        assert_eq!(FeedbackTier::from_score(0.7999), FeedbackTier::NeedsWork);
        assert_eq!(FeedbackTier::from_score(-0.2), FeedbackTier::NeedsWork);
    }

    #[test]
    fn test_feedback_tier_serde() {
        assert_eq!(
            serde_json::to_string(&FeedbackTier::NotBad).unwrap(),
            "\"not_bad\""
        );
        assert_eq!(FeedbackTier::NeedsWork.to_string(), "needs_work");
    }

    #[test]
    fn test_report_accessors() {
        let mut joint_scores = BTreeMap::new();
        joint_scores.insert(Joint::RElbow, AxisScores { x: 0.9, y: 0.4 });
        let mut insights = BTreeMap::new();
        insights.insert(Joint::RElbow, vec![Axis::Y]);

        let report = FormScoreReport {
            exercise_key: "bicep_curl".into(),
            exercise_name: "Bicep Curl".into(),
            overall_score: 0.65,
            feedback: FeedbackTier::from_score(0.65),
            joint_scores,
            insights,
            user_data: BTreeMap::new(),
            standard_data: BTreeMap::new(),
        };

        assert_eq!(report.score(Joint::RElbow, Axis::Y), Some(0.4));
        assert_eq!(report.score(Joint::RWrist, Axis::X), None);
        assert!(report.is_flagged(Joint::RElbow, Axis::Y));
        assert!(!report.is_flagged(Joint::RElbow, Axis::X));
        assert_eq!(report.insight_labels(), vec!["RElbow, y".to_string()]);
        assert!((report.overall_percent() - 65.0).abs() < 1e-9);
    }
}
