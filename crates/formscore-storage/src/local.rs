//! Filesystem reference store.
//!
//! Layout: `<root>/<exercise_key>.json.gz`, one document per exercise.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use formscore_models::{normalize_exercise_key, ReferenceSet};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::codec::{decode_reference_set, encode_reference_set, REFERENCE_EXTENSION};
use crate::error::{StorageError, StorageResult};
use crate::store::{reference_key, ReferenceStore};

/// Reference store writing gzip JSON documents under a root directory.
#[derive(Debug, Clone)]
pub struct LocalReferenceStore {
    root: PathBuf,
}

impl LocalReferenceStore {
    /// The root directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for a normalized key.
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, REFERENCE_EXTENSION))
    }

    /// Unique per write, so concurrent writers never share a temp file.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(
            ".{}.{}.{}.tmp",
            key,
            REFERENCE_EXTENSION,
            Uuid::new_v4().simple()
        ))
    }
}

#[async_trait]
impl ReferenceStore for LocalReferenceStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load(&self, exercise_key: &str) -> StorageResult<Option<ReferenceSet>> {
        let key = reference_key(exercise_key)?;
        let path = self.document_path(&key);

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(exercise = %key, path = %path.display(), "No reference document");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let set = decode_reference_set(&key, &data)?;
        if normalize_exercise_key(&set.exercise_key) != key {
            return Err(StorageError::corrupt(
                key,
                format!("document belongs to exercise {}", set.exercise_key),
            ));
        }

        Ok(Some(set))
    }

    async fn replace(&self, set: &ReferenceSet) -> StorageResult<()> {
        let key = reference_key(&set.exercise_key)?;
        let bytes = encode_reference_set(set)?;

        fs::create_dir_all(&self.root).await?;

        // Rename is atomic within a directory, so readers never see a partial document
        let temp = self.temp_path(&key);
        let path = self.document_path(&key);
        fs::write(&temp, &bytes).await?;
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        info!(
            exercise = %key,
            joints = set.curves.len(),
            size = bytes.len(),
            path = %path.display(),
            "Stored reference set"
        );
        Ok(())
    }

    async fn delete(&self, exercise_key: &str) -> StorageResult<bool> {
        let key = reference_key(exercise_key)?;
        match fs::remove_file(self.document_path(&key)).await {
            Ok(()) => {
                info!(exercise = %key, "Deleted reference set");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_exercises(&self) -> StorageResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{}", REFERENCE_EXTENSION);
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(&suffix) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
