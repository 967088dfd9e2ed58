//! Reference store abstraction.

use async_trait::async_trait;
use formscore_models::{normalize_exercise_key, Axis, Joint, ReferenceCurve, ReferenceSet};

use crate::error::{StorageError, StorageResult};

/// Normalized storage key for an exercise.
///
/// Keys double as file names, so only ASCII alphanumerics, `_` and `-` are
/// accepted after normalization.
pub fn reference_key(exercise_key: &str) -> StorageResult<String> {
    let key = normalize_exercise_key(exercise_key);
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(StorageError::invalid_key(exercise_key));
    }
    Ok(key)
}

/// Persistent reference sets, one per exercise.
///
/// Implementations must make `replace` all-or-nothing: a reader sees either
/// the previous set or the new one, never a mix.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Name of this store for logging.
    fn name(&self) -> &'static str;

    /// Load the reference set of an exercise, if one was captured.
    async fn load(&self, exercise_key: &str) -> StorageResult<Option<ReferenceSet>>;

    /// Store `set` under its exercise key, discarding any previous set.
    async fn replace(&self, set: &ReferenceSet) -> StorageResult<()>;

    /// Remove the reference set of an exercise. Returns whether one existed.
    async fn delete(&self, exercise_key: &str) -> StorageResult<bool>;

    /// Keys of all exercises with a stored reference, sorted.
    async fn list_exercises(&self) -> StorageResult<Vec<String>>;

    /// Reference curve for one joint and axis.
    async fn reference_curve(
        &self,
        exercise_key: &str,
        joint: Joint,
        axis: Axis,
    ) -> StorageResult<ReferenceCurve> {
        let set = self
            .load(exercise_key)
            .await?
            .ok_or_else(|| StorageError::not_found(normalize_exercise_key(exercise_key)))?;

        set.curve(joint, axis)
            .ok_or_else(|| StorageError::not_found(format!("{}/{}", set.exercise_key, joint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_key_normalizes() {
        assert_eq!(reference_key("Bicep Curl").unwrap(), "bicep_curl");
        assert_eq!(reference_key("  iso_right_bicep_curl ").unwrap(), "iso_right_bicep_curl");
    }

    #[test]
    fn test_reference_key_rejects_paths() {
        assert!(matches!(reference_key("../etc"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(reference_key("a/b"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(reference_key("   "), Err(StorageError::InvalidKey(_))));
    }
}
