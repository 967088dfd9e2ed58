//! End-to-end scoring pipeline.
//!
//! `FormScorer` ties the registry, kinematics extraction, alignment, scoring
//! and aggregation together. It is pure and synchronous: reference data is
//! passed in by the caller, never fetched.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use formscore_models::{
    normalize_exercise_key, Axis, AxisCurves, ExerciseDefinition, FormScoreReport, Joint,
    KinematicSeries, PoseCapture, ReferenceSet,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregate::{aggregate, JointAxisResult};
use crate::align::align;
use crate::error::{CurveRole, FormScoreError, FormScoreResult};
use crate::kinematics::extract;
use crate::metrics;
use crate::registry::ExerciseRegistry;
use crate::scoring::score_aligned;

/// Options controlling how scoring work is scheduled.
#[derive(Debug, Clone)]
pub struct ScoringOptions {
    /// Score joint/axis pairs on the rayon thread pool
    pub parallel_joints: bool,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            parallel_joints: true,
        }
    }
}

/// Compare one joint/axis curve pair.
pub fn score_joint_axis(
    joint: Joint,
    axis: Axis,
    reference: &[f64],
    user: &[f64],
) -> FormScoreResult<JointAxisResult> {
    let aligned = align(reference, user).map_err(|e| e.for_joint_axis(joint, axis))?;
    let score = score_aligned(&aligned);
    debug!(joint = %joint, axis = %axis, score, "Scored joint axis");
    Ok(JointAxisResult {
        joint,
        axis,
        score,
        aligned,
    })
}

/// Scores user recordings against reference sets.
#[derive(Debug, Clone)]
pub struct FormScorer {
    registry: Arc<ExerciseRegistry>,
    options: ScoringOptions,
}

impl FormScorer {
    pub fn new(registry: Arc<ExerciseRegistry>) -> Self {
        Self {
            registry,
            options: ScoringOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScoringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &ExerciseRegistry {
        &self.registry
    }

    /// Kinematics of every joint in the exercise's joint group.
    ///
    /// Fails with `IncompleteJointData` if any joint has no detected frame.
    pub fn kinematics(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> FormScoreResult<KinematicSeries> {
        let definition = self.registry.lookup(exercise_key)?;
        capture.video.check()?;
        complete_kinematics(definition, capture)
    }

    /// Compare a user recording against the exercise's reference set.
    pub fn score(
        &self,
        exercise_key: &str,
        user: &PoseCapture,
        reference: &ReferenceSet,
    ) -> FormScoreResult<FormScoreReport> {
        let start = Instant::now();
        let result = self.score_inner(exercise_key, user, reference);

        match &result {
            Ok(report) => {
                metrics::record_score(
                    &report.exercise_key,
                    report.overall_score,
                    start.elapsed().as_secs_f64(),
                );
                info!(
                    exercise = %report.exercise_key,
                    overall_score = report.overall_score,
                    feedback = %report.feedback,
                    flagged_joints = report.insights.len(),
                    "Computed form score"
                );
            }
            Err(e) => metrics::record_failure(&normalize_exercise_key(exercise_key), e.kind()),
        }

        result
    }

    fn score_inner(
        &self,
        exercise_key: &str,
        user: &PoseCapture,
        reference: &ReferenceSet,
    ) -> FormScoreResult<FormScoreReport> {
        let definition = self.registry.lookup(exercise_key)?;
        user.video.check()?;

        if normalize_exercise_key(&reference.exercise_key) != definition.key {
            return Err(FormScoreError::reference_not_found(&definition.key, None));
        }

        let series = complete_kinematics(definition, user)?;

        if let Some(&joint) = definition
            .joint_group
            .iter()
            .find(|&&joint| reference.curves(joint).is_none())
        {
            return Err(FormScoreError::reference_not_found(&definition.key, Some(joint)));
        }

        let tasks: Vec<(Joint, Axis)> = definition
            .joint_group
            .iter()
            .flat_map(|&joint| Axis::ALL.into_iter().map(move |axis| (joint, axis)))
            .collect();

        let compare = |task: &(Joint, Axis)| -> FormScoreResult<JointAxisResult> {
            let (joint, axis) = *task;
            let user_curve = series.position(joint, axis).ok_or_else(|| {
                FormScoreError::IncompleteJointData {
                    exercise: definition.key.clone(),
                    joints: vec![joint],
                }
            })?;
            let reference_curve = reference
                .curves(joint)
                .map(|c| c.get(axis))
                .ok_or_else(|| FormScoreError::reference_not_found(&definition.key, Some(joint)))?;
            score_joint_axis(joint, axis, reference_curve, user_curve)
        };

        let results: Vec<JointAxisResult> = if self.options.parallel_joints {
            tasks.par_iter().map(&compare).collect::<FormScoreResult<_>>()?
        } else {
            tasks.iter().map(&compare).collect::<FormScoreResult<_>>()?
        };

        let mut user_data = BTreeMap::new();
        let mut standard_data = BTreeMap::new();
        for &joint in &definition.joint_group {
            if let Some(k) = series.get(joint) {
                user_data.insert(
                    joint,
                    AxisCurves::new(k.x.position.clone(), k.y.position.clone()),
                );
            }
            if let Some(curves) = reference.curves(joint) {
                standard_data.insert(joint, curves.clone());
            }
        }

        aggregate(definition, &results, user_data, standard_data)
    }

    /// Build a fresh reference set from a standard-form recording.
    ///
    /// Every joint of the exercise needs at least two detected frames so
    /// later comparisons can interpolate it.
    pub fn build_reference(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> FormScoreResult<ReferenceSet> {
        let result = self.build_reference_inner(exercise_key, capture);
        match &result {
            Ok(set) => {
                metrics::record_reference_built(&set.exercise_key);
                info!(
                    exercise = %set.exercise_key,
                    joints = set.curves.len(),
                    fps = set.video.fps,
                    "Built reference set"
                );
            }
            Err(e) => metrics::record_failure(&normalize_exercise_key(exercise_key), e.kind()),
        }
        result
    }

    fn build_reference_inner(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> FormScoreResult<ReferenceSet> {
        let definition = self.registry.lookup(exercise_key)?;
        capture.video.check()?;
        let series = complete_kinematics(definition, capture)?;

        let mut set = ReferenceSet::new(
            definition.key.clone(),
            definition.name.clone(),
            capture.video,
        );

        for &joint in &definition.joint_group {
            let Some(k) = series.get(joint) else {
                continue;
            };
            if k.len() < 2 {
                return Err(FormScoreError::Alignment {
                    joint: Some(joint),
                    axis: None,
                    curve: CurveRole::Reference,
                    len: k.len(),
                });
            }
            set.insert_curves(
                joint,
                AxisCurves::new(k.x.position.clone(), k.y.position.clone()),
            );
        }

        Ok(set)
    }
}

/// Extract kinematics for the joint group, failing if any joint is missing.
fn complete_kinematics(
    definition: &ExerciseDefinition,
    capture: &PoseCapture,
) -> FormScoreResult<KinematicSeries> {
    let series = extract(&capture.frames, &capture.video, &definition.joint_group);

    let missing: Vec<Joint> = definition
        .joint_group
        .iter()
        .copied()
        .filter(|&joint| !series.contains(joint))
        .collect();

    if !missing.is_empty() {
        return Err(FormScoreError::IncompleteJointData {
            exercise: definition.key.clone(),
            joints: missing,
        });
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use formscore_models::{FeedbackTier, JointFrameMap, VideoParams};

    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;

    fn curl_registry() -> Arc<ExerciseRegistry> {
        Arc::new(
            ExerciseRegistry::from_definitions([ExerciseDefinition::new(
                "bicep_curl",
                "Bicep Curl",
                false,
                [Joint::RElbow, Joint::RWrist],
            )])
            .unwrap(),
        )
    }

    /// Recording where every joint sits at normalized (fx(t), fy(t)).
    fn capture(
        frames: u32,
        fps: f64,
        fx: impl Fn(f64) -> f64,
        fy: impl Fn(f64) -> f64,
    ) -> PoseCapture {
        let mut map = JointFrameMap::new();
        for frame in 0..frames {
            let t = frame as f64 / (frames - 1) as f64;
            for joint in [Joint::RElbow, Joint::RWrist] {
                map = map.with_point(joint, frame, fx(t) * WIDTH as f64, fy(t) * HEIGHT as f64);
            }
        }
        PoseCapture::new(VideoParams::new(frames, fps, WIDTH, HEIGHT), map)
    }

    fn constant_reference(value: f64, len: usize) -> ReferenceSet {
        ReferenceSet::new("bicep_curl", "Bicep Curl", VideoParams::new(len as u32, 30.0, 1280, 720))
            .with_curves(Joint::RElbow, vec![value; len], vec![value; len])
            .with_curves(Joint::RWrist, vec![value; len], vec![value; len])
    }

    #[test]
    fn test_matching_recording_scores_exactly_one() {
        let scorer = FormScorer::new(curl_registry());
        let user = capture(45, 30.0, |_| 0.5, |_| 0.5);

        let report = scorer.score("bicep_curl", &user, &constant_reference(0.5, 60)).unwrap();

        assert_eq!(report.overall_score, 1.0);
        assert!(report.insights.is_empty());
        assert_eq!(report.feedback, FeedbackTier::Great);
        assert_eq!(report.joint_scores.len(), 2);
        assert_eq!(report.user_data[&Joint::RElbow].x.len(), 45);
        assert_eq!(report.standard_data[&Joint::RWrist].y.len(), 60);
    }

    #[test]
    fn test_offset_recording_is_flagged() {
        let scorer = FormScorer::new(curl_registry());
        let user = capture(30, 30.0, |_| 0.65, |_| 0.55);

        let report = scorer.score("Bicep Curl", &user, &constant_reference(0.5, 30)).unwrap();

        // x deviates by 0.15, y by 0.05
        assert_abs_diff_eq!(
            report.score(Joint::RElbow, Axis::X).unwrap(),
            0.85_f64.powi(2),
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            report.score(Joint::RElbow, Axis::Y).unwrap(),
            0.95_f64.powi(2),
            epsilon = 1e-9
        );
        assert!(report.is_flagged(Joint::RElbow, Axis::X));
        assert!(!report.is_flagged(Joint::RElbow, Axis::Y));
        assert_eq!(report.insights.len(), 2);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let registry = curl_registry();
        let user = capture(40, 24.0, |t| 0.3 + 0.4 * t, |t| 0.6 - 0.2 * t * t);
        let reference = FormScorer::new(registry.clone())
            .build_reference(
                "bicep_curl",
                &capture(90, 60.0, |t| 0.35 + 0.3 * t, |t| 0.6 - 0.25 * t),
            )
            .unwrap();

        let parallel = FormScorer::new(registry.clone())
            .score("bicep_curl", &user, &reference)
            .unwrap();
        let sequential = FormScorer::new(registry)
            .with_options(ScoringOptions { parallel_joints: false })
            .score("bicep_curl", &user, &reference)
            .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_unknown_exercise() {
        let scorer = FormScorer::new(curl_registry());
        let user = capture(10, 30.0, |_| 0.5, |_| 0.5);
        let err = scorer.score("squat", &user, &constant_reference(0.5, 10)).unwrap_err();
        assert!(matches!(err, FormScoreError::UnknownExercise { .. }));
    }

    #[test]
    fn test_missing_joint_in_recording() {
        let scorer = FormScorer::new(curl_registry());
        let user = PoseCapture::new(
            VideoParams::new(3, 30.0, WIDTH, HEIGHT),
            JointFrameMap::new()
                .with_point(Joint::RElbow, 0, 10.0, 10.0)
                .with_point(Joint::RElbow, 1, 12.0, 10.0),
        );

        let err = scorer.score("bicep_curl", &user, &constant_reference(0.5, 10)).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::IncompleteJointData { ref joints, .. } if joints == &vec![Joint::RWrist]
        ));
        assert!(err.requires_recapture());
    }

    #[test]
    fn test_missing_joint_in_reference() {
        let scorer = FormScorer::new(curl_registry());
        let user = capture(10, 30.0, |_| 0.5, |_| 0.5);
        let video = VideoParams::new(10, 30.0, 640, 480);
        let reference = ReferenceSet::new("bicep_curl", "Bicep Curl", video)
            .with_curves(Joint::RElbow, vec![0.5; 10], vec![0.5; 10]);

        let err = scorer.score("bicep_curl", &user, &reference).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::ReferenceNotFound { joint: Some(Joint::RWrist), .. }
        ));
    }

    #[test]
    fn test_reference_for_other_exercise_is_rejected() {
        let scorer = FormScorer::new(curl_registry());
        let user = capture(10, 30.0, |_| 0.5, |_| 0.5);
        let mut reference = constant_reference(0.5, 10);
        reference.exercise_key = "lateral_raise".into();

        let err = scorer.score("bicep_curl", &user, &reference).unwrap_err();
        assert!(matches!(err, FormScoreError::ReferenceNotFound { joint: None, .. }));
    }

    #[test]
    fn test_single_frame_user_curve_fails_alignment() {
        let scorer = FormScorer::new(curl_registry()).with_options(ScoringOptions {
            parallel_joints: false,
        });
        let user = PoseCapture::new(
            VideoParams::new(1, 30.0, WIDTH, HEIGHT),
            JointFrameMap::new()
                .with_point(Joint::RElbow, 0, 10.0, 10.0)
                .with_point(Joint::RWrist, 0, 12.0, 10.0),
        );

        let err = scorer.score("bicep_curl", &user, &constant_reference(0.5, 10)).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::Alignment {
                joint: Some(Joint::RElbow),
                axis: Some(Axis::X),
                curve: CurveRole::User,
                len: 1
            }
        ));
    }

    #[test]
    fn test_invalid_video_params() {
        let scorer = FormScorer::new(curl_registry());
        let mut user = capture(10, 30.0, |_| 0.5, |_| 0.5);
        user.video.fps = 0.0;

        let err = scorer.score("bicep_curl", &user, &constant_reference(0.5, 10)).unwrap_err();
        assert!(matches!(err, FormScoreError::InvalidVideoParams(_)));
    }

    #[test]
    fn test_build_reference_normalizes_positions() {
        let scorer = FormScorer::new(curl_registry());
        let set = scorer
            .build_reference("Bicep Curl", &capture(5, 30.0, |_| 0.25, |_| 0.75))
            .unwrap();

        assert_eq!(set.exercise_key, "bicep_curl");
        assert_eq!(set.exercise_name, "Bicep Curl");
        assert_eq!(set.curves.len(), 2);
        assert_eq!(set.curves(Joint::RWrist).unwrap().x, vec![0.25; 5]);
        assert_eq!(set.curves(Joint::RWrist).unwrap().y, vec![0.75; 5]);
        assert_eq!(set.video.frame_width, WIDTH);
    }

    #[test]
    fn test_build_reference_rejects_single_frame_joint() {
        let scorer = FormScorer::new(curl_registry());
        let capture = PoseCapture::new(
            VideoParams::new(2, 30.0, WIDTH, HEIGHT),
            JointFrameMap::new()
                .with_point(Joint::RElbow, 0, 10.0, 10.0)
                .with_point(Joint::RElbow, 1, 11.0, 10.0)
                .with_point(Joint::RWrist, 1, 12.0, 10.0),
        );

        let err = scorer.build_reference("bicep_curl", &capture).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::Alignment {
                joint: Some(Joint::RWrist),
                curve: CurveRole::Reference,
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_kinematics_exposes_velocity() {
        let scorer = FormScorer::new(curl_registry());
        let series = scorer
            .kinematics("bicep_curl", &capture(11, 10.0, |t| t, |_| 0.5))
            .unwrap();

        // x sweeps the full width over one second
        let elbow = series.get(Joint::RElbow).unwrap();
        for v in &elbow.x.velocity {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-9);
        }
    }
}
