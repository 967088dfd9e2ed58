//! In-memory reference store.

use std::collections::HashMap;

use async_trait::async_trait;
use formscore_models::ReferenceSet;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageResult;
use crate::store::{reference_key, ReferenceStore};

/// Reference store backed by a map. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryReferenceStore {
    sets: RwLock<HashMap<String, ReferenceSet>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given sets.
    pub fn with_sets(sets: impl IntoIterator<Item = ReferenceSet>) -> StorageResult<Self> {
        let mut map = HashMap::new();
        for set in sets {
            map.insert(reference_key(&set.exercise_key)?, set);
        }
        Ok(Self {
            sets: RwLock::new(map),
        })
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, exercise_key: &str) -> StorageResult<Option<ReferenceSet>> {
        let key = reference_key(exercise_key)?;
        Ok(self.sets.read().await.get(&key).cloned())
    }

    async fn replace(&self, set: &ReferenceSet) -> StorageResult<()> {
        let key = reference_key(&set.exercise_key)?;
        let previous = self.sets.write().await.insert(key.clone(), set.clone());
        debug!(
            exercise = %key,
            joints = set.curves.len(),
            replaced = previous.is_some(),
            "Stored reference set in memory"
        );
        Ok(())
    }

    async fn delete(&self, exercise_key: &str) -> StorageResult<bool> {
        let key = reference_key(exercise_key)?;
        Ok(self.sets.write().await.remove(&key).is_some())
    }

    async fn list_exercises(&self) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self.sets.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use formscore_models::{Axis, Joint, VideoParams};

    fn set(key: &str, value: f64) -> ReferenceSet {
        ReferenceSet::new(key, "Bicep Curl", VideoParams::new(3, 30.0, 640, 480))
            .with_curves(Joint::RElbow, vec![value; 3], vec![value; 3])
            .with_curves(Joint::RWrist, vec![value; 3], vec![value; 3])
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let store = InMemoryReferenceStore::new();
        assert!(store.load("bicep_curl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_discards_previous_joints() {
        let store = InMemoryReferenceStore::new();
        store.replace(&set("bicep_curl", 0.1)).await.unwrap();

        let single_joint =
            ReferenceSet::new("bicep_curl", "Bicep Curl", VideoParams::new(2, 30.0, 640, 480))
                .with_curves(Joint::LElbow, vec![0.9, 0.9], vec![0.9, 0.9]);
        store.replace(&single_joint).await.unwrap();

        let loaded = store.load("Bicep Curl").await.unwrap().unwrap();
        assert_eq!(loaded.joints().collect::<Vec<_>>(), vec![Joint::LElbow]);
    }

    #[tokio::test]
    async fn test_reference_curve_lookup() {
        let store = InMemoryReferenceStore::with_sets([set("bicep_curl", 0.4)]).unwrap();

        let curve = store.reference_curve("bicep_curl", Joint::RWrist, Axis::Y).await.unwrap();
        assert_eq!(curve.values, vec![0.4; 3]);
        assert_eq!(curve.video.fps, 30.0);

        let err = store.reference_curve("bicep_curl", Joint::LWrist, Axis::Y).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref k) if k == "bicep_curl/LWrist"));

        let err = store.reference_curve("lateral_raise", Joint::RWrist, Axis::X).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref k) if k == "lateral_raise"));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store =
            InMemoryReferenceStore::with_sets([set("lateral_raise", 0.1), set("bicep_curl", 0.2)])
                .unwrap();
        assert_eq!(store.list_exercises().await.unwrap(), vec!["bicep_curl", "lateral_raise"]);

        assert!(store.delete("lateral_raise").await.unwrap());
        assert!(!store.delete("lateral_raise").await.unwrap());
        assert_eq!(store.list_exercises().await.unwrap(), vec!["bicep_curl"]);
    }
}
