//! Reference (standard form) trajectory models.
//!
//! A reference set is captured once per exercise from a video of correct
//! form and read on every scoring call. It is stored as one document per
//! exercise and always replaced as a whole.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::joint::{Axis, Joint};
use crate::video::VideoParams;

/// Version of the reference document format.
/// Increment this when the structure changes so stale documents are rejected.
pub const REFERENCE_FORMAT_VERSION: u32 = 1;

/// Normalized position curves of one joint on both axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AxisCurves {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl AxisCurves {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

/// Reference positions for one (exercise, joint, axis).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve {
    pub values: Vec<f64>,
    /// Parameters of the capture session that produced the curve
    pub video: VideoParams,
}

/// Complete reference capture for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceSet {
    /// Normalized registry key of the exercise
    pub exercise_key: String,

    /// Display name at capture time
    pub exercise_name: String,

    /// Parameters of the reference video
    pub video: VideoParams,

    /// Normalized position curves per joint
    pub curves: BTreeMap<Joint, AxisCurves>,

    /// Document format version
    pub format_version: u32,

    /// When the reference was captured
    pub captured_at: DateTime<Utc>,
}

impl ReferenceSet {
    /// Create an empty reference set for an exercise.
    pub fn new(
        exercise_key: impl Into<String>,
        exercise_name: impl Into<String>,
        video: VideoParams,
    ) -> Self {
        Self {
            exercise_key: exercise_key.into(),
            exercise_name: exercise_name.into(),
            video,
            curves: BTreeMap::new(),
            format_version: REFERENCE_FORMAT_VERSION,
            captured_at: Utc::now(),
        }
    }

    /// Add or replace the curves of a joint.
    pub fn insert_curves(&mut self, joint: Joint, curves: AxisCurves) {
        self.curves.insert(joint, curves);
    }

    /// Builder-style variant of [`insert_curves`](Self::insert_curves).
    pub fn with_curves(mut self, joint: Joint, x: Vec<f64>, y: Vec<f64>) -> Self {
        self.insert_curves(joint, AxisCurves::new(x, y));
        self
    }

    pub fn curves(&self, joint: Joint) -> Option<&AxisCurves> {
        self.curves.get(&joint)
    }

    /// Reference curve of a joint along one axis, with the capture parameters.
    pub fn curve(&self, joint: Joint, axis: Axis) -> Option<ReferenceCurve> {
        self.curves.get(&joint).map(|c| ReferenceCurve {
            values: c.get(axis).to_vec(),
            video: self.video,
        })
    }

    pub fn joints(&self) -> impl Iterator<Item = Joint> + '_ {
        self.curves.keys().copied()
    }

    /// Check if this document matches the current format version.
    pub fn is_current_version(&self) -> bool {
        self.format_version == REFERENCE_FORMAT_VERSION
    }
}
