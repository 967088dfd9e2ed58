//! Video capture parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Geometry and timing of one processed video.
///
/// Required to normalize pixel coordinates and to convert frame indices
/// into physical time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct VideoParams {
    /// Number of frames read from the video
    pub frame_count: u32,

    /// Frames per second
    #[validate(range(exclusive_min = 0.0))]
    pub fps: f64,

    /// Frame width in pixels
    #[validate(range(min = 1))]
    pub frame_width: u32,

    /// Frame height in pixels
    #[validate(range(min = 1))]
    pub frame_height: u32,
}

impl VideoParams {
    pub fn new(frame_count: u32, fps: f64, frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_count,
            fps,
            frame_width,
            frame_height,
        }
    }

    /// Check that the parameters can be used for normalization and timing.
    pub fn check(&self) -> Result<(), VideoParamsError> {
        if !self.fps.is_finite() {
            return Err(VideoParamsError(format!("fps must be finite, got {}", self.fps)));
        }
        self.validate()
            .map_err(|e| VideoParamsError(e.to_string().replace('\n', "; ")))
    }

    /// Seconds between two consecutive frames.
    pub fn dt(&self) -> f64 {
        1.0 / self.fps
    }

    /// Timestamp in seconds of a frame index.
    pub fn frame_time(&self, frame: u32) -> f64 {
        frame as f64 / self.fps
    }

    /// Duration of the whole video in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.fps
    }
}

#[derive(Debug, Error)]
#[error("Invalid video parameters: {0}")]
pub struct VideoParamsError(pub String);
