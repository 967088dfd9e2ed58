//! Kinematics extraction from detected joint positions.
//!
//! Positions are normalized by the frame dimensions so recordings from
//! different cameras are comparable. Velocity and acceleration are
//! numerical time derivatives.
//!
//! Frames the detector dropped are absent from the frame map. Each
//! surviving sample is placed at its true timestamp (`frame / fps`), so a
//! gap stretches the derivative step instead of being treated as one frame.
//! For contiguous frames this is identical to differentiating with a
//! constant `dt = 1 / fps`.

use formscore_models::{
    AxisKinematics, Joint, JointFrameMap, JointKinematics, KinematicSeries, VideoParams,
};
use tracing::debug;

/// Numerical derivative of `values` sampled at strictly increasing `times`.
///
/// Interior points use the second-order accurate central difference for
/// non-uniform spacing. The two endpoints use one-sided first differences.
/// A single sample has derivative zero; an empty input yields an empty output.
pub fn gradient(values: &[f64], times: &[f64]) -> Vec<f64> {
    debug_assert_eq!(values.len(), times.len());
    let n = values.len();

    match n {
        0 => return Vec::new(),
        1 => return vec![0.0],
        _ => {}
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (times[1] - times[0]));

    for i in 1..n - 1 {
        let hs = times[i] - times[i - 1];
        let hd = times[i + 1] - times[i];
        let d = (hs * hs * values[i + 1] + (hd * hd - hs * hs) * values[i]
            - hd * hd * values[i - 1])
            / (hs * hd * (hd + hs));
        out.push(d);
    }

    out.push((values[n - 1] - values[n - 2]) / (times[n - 1] - times[n - 2]));
    out
}

/// Numerical derivative of `values` sampled every `dt` seconds.
pub fn gradient_uniform(values: &[f64], dt: f64) -> Vec<f64> {
    let n = values.len();

    match n {
        0 => return Vec::new(),
        1 => return vec![0.0],
        _ => {}
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / dt);
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / (2.0 * dt));
    }
    out.push((values[n - 1] - values[n - 2]) / dt);
    out
}

fn axis_kinematics(position: Vec<f64>, times: &[f64]) -> AxisKinematics {
    let velocity = gradient(&position, times);
    let acceleration = gradient(&velocity, times);
    AxisKinematics {
        position,
        velocity,
        acceleration,
    }
}

/// Compute kinematics for one joint, or `None` if it has no detections.
pub fn extract_joint(
    frames: &JointFrameMap,
    video: &VideoParams,
    joint: Joint,
) -> Option<JointKinematics> {
    let track = frames.track(joint).filter(|t| !t.is_empty())?;

    let width = video.frame_width as f64;
    let height = video.frame_height as f64;

    let mut frame_indices = Vec::with_capacity(track.len());
    let mut times = Vec::with_capacity(track.len());
    let mut xs = Vec::with_capacity(track.len());
    let mut ys = Vec::with_capacity(track.len());

    for (&frame, point) in track {
        frame_indices.push(frame);
        times.push(video.frame_time(frame));
        xs.push(point.x / width);
        ys.push(point.y / height);
    }

    Some(JointKinematics {
        frames: frame_indices,
        x: axis_kinematics(xs, &times),
        y: axis_kinematics(ys, &times),
    })
}

/// Compute kinematics for each requested joint.
///
/// Joints without any detected frame are left out of the result; callers
/// decide whether that is an error. `video` must already be validated.
pub fn extract(frames: &JointFrameMap, video: &VideoParams, joints: &[Joint]) -> KinematicSeries {
    let mut series = KinematicSeries::new();

    for &joint in joints {
        match extract_joint(frames, video, joint) {
            Some(kinematics) => {
                debug!(joint = %joint, samples = kinematics.len(), "Extracted joint kinematics");
                series.insert(joint, kinematics);
            }
            None => debug!(joint = %joint, "No detections for joint"),
        }
    }

    series
}
