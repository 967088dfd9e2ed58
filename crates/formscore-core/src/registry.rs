//! Exercise definition registry.
//!
//! The registry is an immutable value built once at startup and shared by
//! reference. Lookups normalize the key first, so display names and keys
//! both resolve.

use std::collections::HashMap;

use formscore_models::{normalize_exercise_key, ExerciseDefinition, Joint};
use tracing::debug;

use crate::error::{FormScoreError, FormScoreResult};

const RIGHT_ARM: [Joint; 3] = [Joint::RShoulder, Joint::RElbow, Joint::RWrist];
const LEFT_ARM: [Joint; 3] = [Joint::LShoulder, Joint::LElbow, Joint::LWrist];
const BOTH_ARMS: [Joint; 6] = [
    Joint::RShoulder,
    Joint::RElbow,
    Joint::RWrist,
    Joint::LShoulder,
    Joint::LElbow,
    Joint::LWrist,
];

/// Built-in exercise presets.
pub fn builtin_presets() -> Vec<ExerciseDefinition> {
    vec![
        ExerciseDefinition::new("iso_right_bicep_curl", "Bicep Curl", true, RIGHT_ARM),
        ExerciseDefinition::new("iso_left_bicep_curl", "Bicep Curl", true, LEFT_ARM),
        ExerciseDefinition::new("bicep_curl", "Bicep Curl", false, BOTH_ARMS),
        ExerciseDefinition::new("lateral_raise", "Lateral Raise", false, BOTH_ARMS),
    ]
}

/// Read-only map from normalized exercise key to definition.
#[derive(Debug, Clone)]
pub struct ExerciseRegistry {
    definitions: HashMap<String, ExerciseDefinition>,
}

impl ExerciseRegistry {
    /// Registry holding only the built-in presets.
    pub fn with_presets() -> Self {
        let definitions = builtin_presets()
            .into_iter()
            .map(|def| (def.key.clone(), def))
            .collect();
        Self { definitions }
    }

    /// Build a registry from explicit definitions.
    ///
    /// Every definition is validated and keys must be unique.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ExerciseDefinition>,
    ) -> FormScoreResult<Self> {
        let mut map = HashMap::new();
        for def in definitions {
            def.validate()?;
            if map.contains_key(&def.key) {
                return Err(FormScoreError::DuplicateExercise(def.key));
            }
            map.insert(def.key.clone(), def);
        }
        Ok(Self { definitions: map })
    }

    /// Parse a JSON array of exercise definitions.
    ///
    /// Keys are normalized before validation.
    pub fn parse_definitions(json: &str) -> FormScoreResult<Vec<ExerciseDefinition>> {
        let mut definitions: Vec<ExerciseDefinition> =
            serde_json::from_str(json).map_err(|e| FormScoreError::PresetParse(e.to_string()))?;
        for def in &mut definitions {
            def.key = normalize_exercise_key(&def.key);
        }
        Ok(definitions)
    }

    /// Build a registry from a JSON array of definitions.
    pub fn from_json(json: &str) -> FormScoreResult<Self> {
        Self::from_definitions(Self::parse_definitions(json)?)
    }

    /// Layer additional definitions over this registry.
    ///
    /// A definition whose key already exists replaces the existing one.
    pub fn merge(
        mut self,
        definitions: impl IntoIterator<Item = ExerciseDefinition>,
    ) -> FormScoreResult<Self> {
        for def in definitions {
            def.validate()?;
            debug!(exercise = %def.key, "Registering exercise preset");
            self.definitions.insert(def.key.clone(), def);
        }
        Ok(self)
    }

    /// Look up an exercise by key or display name.
    pub fn lookup(&self, key: &str) -> FormScoreResult<&ExerciseDefinition> {
        let normalized = normalize_exercise_key(key);
        self.definitions
            .get(&normalized)
            .ok_or(FormScoreError::UnknownExercise { key: normalized })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(&normalize_exercise_key(key))
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Registered definitions in key order.
    pub fn definitions(&self) -> Vec<&ExerciseDefinition> {
        let mut defs: Vec<&ExerciseDefinition> = self.definitions.values().collect();
        defs.sort_by(|a, b| a.key.cmp(&b.key));
        defs
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ExerciseRegistry {
    fn default() -> Self {
        Self::with_presets()
    }
}
