//! Per-joint frame maps produced by the pose source.
//!
//! A frame map only holds frames where the detector's confidence exceeded
//! its threshold, so frame indices for a joint may have gaps. Tracks are
//! kept ordered by frame index.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::joint::Joint;
use crate::video::VideoParams;

/// Pixel coordinates of a detected joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Frame index to pixel point for a single joint.
pub type JointTrack = BTreeMap<u32, PixelPoint>;

/// Detected joint positions for one video, keyed by joint then frame index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JointFrameMap {
    tracks: BTreeMap<Joint, JointTrack>,
}

impl JointFrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a detection. A later detection for the same frame replaces the earlier one.
    pub fn insert(&mut self, joint: Joint, frame: u32, point: PixelPoint) {
        self.tracks.entry(joint).or_default().insert(frame, point);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_point(mut self, joint: Joint, frame: u32, x: f64, y: f64) -> Self {
        self.insert(joint, frame, PixelPoint::new(x, y));
        self
    }

    /// Replace the whole track of a joint.
    pub fn set_track(&mut self, joint: Joint, track: JointTrack) {
        self.tracks.insert(joint, track);
    }

    pub fn track(&self, joint: Joint) -> Option<&JointTrack> {
        self.tracks.get(&joint)
    }

    /// Number of frames in which the joint was detected.
    pub fn detected_frames(&self, joint: Joint) -> usize {
        self.tracks.get(&joint).map_or(0, |t| t.len())
    }

    /// Joints with at least one detection.
    pub fn joints(&self) -> impl Iterator<Item = Joint> + '_ {
        self.tracks
            .iter()
            .filter(|(_, track)| !track.is_empty())
            .map(|(joint, _)| *joint)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.values().all(|t| t.is_empty())
    }
}

/// Everything the pose source hands over for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseCapture {
    pub video: VideoParams,
    pub frames: JointFrameMap,
}

impl PoseCapture {
    pub fn new(video: VideoParams, frames: JointFrameMap) -> Self {
        Self { video, frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_are_ordered_by_frame() {
        let map = JointFrameMap::new()
            .with_point(Joint::RWrist, 7, 70.0, 7.0)
            .with_point(Joint::RWrist, 2, 20.0, 2.0)
            .with_point(Joint::RWrist, 4, 40.0, 4.0);

        let frames: Vec<u32> = map.track(Joint::RWrist).unwrap().keys().copied().collect();
        assert_eq!(frames, vec![2, 4, 7]);
        assert_eq!(map.detected_frames(Joint::RWrist), 3);
        assert_eq!(map.detected_frames(Joint::LWrist), 0);
    }

    #[test]
    fn test_empty_tracks_are_not_reported_as_joints() {
        let mut map = JointFrameMap::new().with_point(Joint::RElbow, 0, 1.0, 1.0);
        map.set_track(Joint::RWrist, JointTrack::new());

        let joints: Vec<Joint> = map.joints().collect();
        assert_eq!(joints, vec![Joint::RElbow]);
        assert!(!map.is_empty());
        assert!(JointFrameMap::new().is_empty());
    }

    #[test]
    fn test_pose_capture_json_shape() {
        let capture = PoseCapture::new(
            VideoParams::new(2, 30.0, 640, 480),
            JointFrameMap::new().with_point(Joint::RElbow, 1, 320.0, 240.0),
        );

        let json = serde_json::to_value(&capture).unwrap();
        assert_eq!(json["frames"]["RElbow"]["1"]["x"], 320.0);

        let parsed: PoseCapture = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, capture);
    }
}
