//! Derived kinematic signals.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::joint::{Axis, Joint};

/// Position and its first two time derivatives along one axis.
///
/// All three sequences have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AxisKinematics {
    /// Pixel coordinate divided by the matching frame dimension
    pub position: Vec<f64>,
    /// d(position)/dt in frame-normalized units per second
    pub velocity: Vec<f64>,
    /// d(velocity)/dt
    pub acceleration: Vec<f64>,
}

impl AxisKinematics {
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }
}

/// Kinematics of a single joint on both axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JointKinematics {
    /// Frame indices of the samples, ascending
    pub frames: Vec<u32>,
    pub x: AxisKinematics,
    pub y: AxisKinematics,
}

impl JointKinematics {
    pub fn axis(&self, axis: Axis) -> &AxisKinematics {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Kinematics for every processed joint of one video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct KinematicSeries {
    joints: BTreeMap<Joint, JointKinematics>,
}

impl KinematicSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: Joint, kinematics: JointKinematics) {
        self.joints.insert(joint, kinematics);
    }

    pub fn get(&self, joint: Joint) -> Option<&JointKinematics> {
        self.joints.get(&joint)
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.joints.contains_key(&joint)
    }

    /// Normalized positions of a joint along an axis.
    pub fn position(&self, joint: Joint, axis: Axis) -> Option<&[f64]> {
        self.get(joint).map(|k| k.axis(axis).position.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &JointKinematics)> {
        self.joints.iter().map(|(joint, k)| (*joint, k))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
