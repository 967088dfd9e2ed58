//! Exercise definitions.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::joint::Joint;
use crate::utils::normalize_exercise_key;

/// Static description of an exercise and the joints that matter for scoring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExerciseDefinition {
    /// Normalized registry key (e.g. `bicep_curl`)
    pub key: String,

    /// Display name (e.g. `Bicep Curl`)
    pub name: String,

    /// Whether the movement is performed one side at a time
    pub isolated_movement: bool,

    /// Joints scored for this exercise, in report order
    pub joint_group: Vec<Joint>,
}

impl ExerciseDefinition {
    /// Create a definition. The key is normalized.
    pub fn new(
        key: &str,
        name: impl Into<String>,
        isolated_movement: bool,
        joint_group: impl Into<Vec<Joint>>,
    ) -> Self {
        Self {
            key: normalize_exercise_key(key),
            name: name.into(),
            isolated_movement,
            joint_group: joint_group.into(),
        }
    }

    /// Check the invariants every registered definition must hold.
    pub fn validate(&self) -> Result<(), ExerciseDefinitionError> {
        if self.key.is_empty() {
            return Err(ExerciseDefinitionError::EmptyKey);
        }
        if self.key != normalize_exercise_key(&self.key) {
            return Err(ExerciseDefinitionError::UnnormalizedKey(self.key.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(ExerciseDefinitionError::EmptyName(self.key.clone()));
        }
        if self.joint_group.is_empty() {
            return Err(ExerciseDefinitionError::EmptyJointGroup(self.key.clone()));
        }

        let mut seen = HashSet::new();
        for joint in &self.joint_group {
            if !seen.insert(*joint) {
                return Err(ExerciseDefinitionError::DuplicateJoint {
                    key: self.key.clone(),
                    joint: *joint,
                });
            }
        }

        Ok(())
    }

    /// Number of joint/axis pairs scored for this exercise.
    pub fn scored_pairs(&self) -> usize {
        self.joint_group.len() * 2
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExerciseDefinitionError {
    #[error("Exercise key is empty")]
    EmptyKey,

    #[error("Exercise key is not normalized: {0}")]
    UnnormalizedKey(String),

    #[error("Exercise {0} has an empty name")]
    EmptyName(String),

    #[error("Exercise {0} has an empty joint group")]
    EmptyJointGroup(String),

    #[error("Exercise {key} lists joint {joint} more than once")]
    DuplicateJoint { key: String, joint: Joint },
}
