//! Body joint and axis definitions.
//!
//! Joints follow the 18-landmark OpenPose body layout used by the
//! upstream pose detector. The detector index of each joint is kept so
//! frame maps can be built directly from heatmap channel numbers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named anatomical landmark tracked per video frame.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Joint {
    Nose,
    Neck,
    RShoulder,
    RElbow,
    RWrist,
    LShoulder,
    LElbow,
    LWrist,
    RHip,
    RKnee,
    RAnkle,
    LHip,
    LKnee,
    LAnkle,
    REye,
    LEye,
    REar,
    LEar,
}

impl Joint {
    /// All joints in detector index order.
    pub const ALL: &'static [Joint] = &[
        Joint::Nose,
        Joint::Neck,
        Joint::RShoulder,
        Joint::RElbow,
        Joint::RWrist,
        Joint::LShoulder,
        Joint::LElbow,
        Joint::LWrist,
        Joint::RHip,
        Joint::RKnee,
        Joint::RAnkle,
        Joint::LHip,
        Joint::LKnee,
        Joint::LAnkle,
        Joint::REye,
        Joint::LEye,
        Joint::REar,
        Joint::LEar,
    ];

    /// Returns the landmark name as used by the detector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::Nose => "Nose",
            Joint::Neck => "Neck",
            Joint::RShoulder => "RShoulder",
            Joint::RElbow => "RElbow",
            Joint::RWrist => "RWrist",
            Joint::LShoulder => "LShoulder",
            Joint::LElbow => "LElbow",
            Joint::LWrist => "LWrist",
            Joint::RHip => "RHip",
            Joint::RKnee => "RKnee",
            Joint::RAnkle => "RAnkle",
            Joint::LHip => "LHip",
            Joint::LKnee => "LKnee",
            Joint::LAnkle => "LAnkle",
            Joint::REye => "REye",
            Joint::LEye => "LEye",
            Joint::REar => "REar",
            Joint::LEar => "LEar",
        }
    }

    /// Heatmap channel index of this joint in the detector output.
    pub fn detector_index(&self) -> usize {
        *self as usize
    }

    /// Look up a joint by detector channel index.
    pub fn from_detector_index(index: usize) -> Option<Joint> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Joint {
    type Err = JointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|joint| joint.as_str() == s)
            .ok_or_else(|| JointParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown joint: {0}")]
pub struct JointParseError(String);

/// Image-plane coordinate axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, x first.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axis {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            _ => Err(AxisParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown axis: {0}")]
pub struct AxisParseError(String);
