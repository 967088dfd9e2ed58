//! Form scoring service.
//!
//! Wires the scoring engine to a reference store. Loading the reference is
//! the only await point; scoring itself runs synchronously on the caller's
//! task (spread over the rayon pool when parallel scoring is enabled).

use std::sync::Arc;

use formscore_core::{metrics, ExerciseRegistry, FormScoreError, FormScorer};
use formscore_models::{
    normalize_exercise_key, Axis, ExerciseDefinition, FormScoreReport, Joint, PoseCapture,
    ReferenceCurve, ReferenceSet,
};
use formscore_storage::{LocalReferenceStore, ReferenceStore};
use tracing::{info, Instrument, Span};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::logging::ScoringLogger;

/// Scores recordings against stored references and captures new references.
#[derive(Clone)]
pub struct FormScoreService {
    scorer: FormScorer,
    store: Arc<dyn ReferenceStore>,
}

impl FormScoreService {
    pub fn new(scorer: FormScorer, store: Arc<dyn ReferenceStore>) -> Self {
        Self { scorer, store }
    }

    /// Service backed by the local reference store described by `config`.
    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let registry = config.build_registry()?;
        let scorer =
            FormScorer::new(Arc::new(registry)).with_options(config.scoring_options());
        let store = LocalReferenceStore::new(config.reference_dir.clone());

        info!(
            reference_dir = %config.reference_dir.display(),
            exercises = scorer.registry().len(),
            parallel_joints = config.parallel_joints,
            "Form score service ready"
        );

        Ok(Self::new(scorer, Arc::new(store)))
    }

    pub fn registry(&self) -> &ExerciseRegistry {
        self.scorer.registry()
    }

    pub fn store(&self) -> &dyn ReferenceStore {
        self.store.as_ref()
    }

    /// Exercise definitions, sorted by key.
    pub fn exercises(&self) -> Vec<&ExerciseDefinition> {
        self.registry().definitions()
    }

    /// Score a user recording against the stored reference of the exercise.
    pub async fn compute_form_score(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> ServiceResult<FormScoreReport> {
        let logger = ScoringLogger::new("compute_form_score", exercise_key);
        let span = logger.create_span();

        async {
            logger.log_start(&format!(
                "{} frames at {} fps",
                capture.video.frame_count, capture.video.fps
            ));

            let result = self.compute_form_score_inner(exercise_key, capture, &logger).await;
            match &result {
                Ok(report) => logger.log_completion(&format!(
                    "overall score {:.3} ({})",
                    report.overall_score, report.feedback
                )),
                Err(e) => logger.log_error(e.kind(), &e.to_string()),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn compute_form_score_inner(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
        logger: &ScoringLogger,
    ) -> ServiceResult<FormScoreReport> {
        let definition = self.registry().lookup(exercise_key).inspect_err(|e| {
            metrics::record_failure(&normalize_exercise_key(exercise_key), e.kind())
        })?;

        let Some(reference) = self.store.load(&definition.key).await? else {
            let err = FormScoreError::reference_not_found(&definition.key, None);
            metrics::record_failure(&definition.key, err.kind());
            return Err(err.into());
        };

        if reference.exercise_name != definition.name {
            logger.log_warning(&format!(
                "reference was captured as {:?}, exercise is now named {:?}",
                reference.exercise_name, definition.name
            ));
        }

        let scorer = self.scorer.clone();
        let key = definition.key.clone();
        let capture = capture.clone();
        let report = run_blocking(move || scorer.score(&key, &capture, &reference)).await??;
        Ok(report)
    }

    /// Capture a standard-form recording as the exercise's new reference.
    ///
    /// Any previous reference of the exercise is replaced as a whole.
    pub async fn capture_reference(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> ServiceResult<ReferenceSet> {
        let logger = ScoringLogger::new("capture_reference", exercise_key);
        let span = logger.create_span();

        async {
            logger.log_start(&format!(
                "{} frames at {} fps",
                capture.video.frame_count, capture.video.fps
            ));

            let result = self.capture_reference_inner(exercise_key, capture).await;
            match &result {
                Ok(set) => logger.log_completion(&format!(
                    "stored {} joints for {}",
                    set.curves.len(),
                    set.exercise_key
                )),
                Err(e) => logger.log_error(e.kind(), &e.to_string()),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn capture_reference_inner(
        &self,
        exercise_key: &str,
        capture: &PoseCapture,
    ) -> ServiceResult<ReferenceSet> {
        let scorer = self.scorer.clone();
        let key = exercise_key.to_string();
        let capture = capture.clone();
        let set = run_blocking(move || scorer.build_reference(&key, &capture)).await??;
        self.store.replace(&set).await?;
        Ok(set)
    }

    /// Stored reference curve for one joint and axis.
    pub async fn reference_curve(
        &self,
        exercise_key: &str,
        joint: Joint,
        axis: Axis,
    ) -> ServiceResult<ReferenceCurve> {
        let definition = self.registry().lookup(exercise_key)?;
        let set = self
            .store
            .load(&definition.key)
            .await?
            .ok_or_else(|| FormScoreError::reference_not_found(&definition.key, None))?;

        Ok(set
            .curve(joint, axis)
            .ok_or_else(|| FormScoreError::reference_not_found(&definition.key, Some(joint)))?)
    }

    /// Keys of exercises with a stored reference.
    pub async fn list_references(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_exercises().await?)
    }

    /// Remove the stored reference of an exercise. Returns whether one existed.
    pub async fn delete_reference(&self, exercise_key: &str) -> ServiceResult<bool> {
        let definition = self.registry().lookup(exercise_key)?;
        let deleted = self.store.delete(&definition.key).await?;
        info!(
            exercise = %definition.key,
            deleted,
            store = self.store.name(),
            "Reference delete requested"
        );
        Ok(deleted)
    }
}

/// Run CPU-bound scoring work on the blocking pool, inside the caller's span.
async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(work))
        .await
        .map_err(|e| ServiceError::task_failed(format!("Blocking task join error: {}", e)))
}
