//! Synthetic pose generators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pose_classification::landmarks::*;
use pose_classification::math::{point, Point3D};
use pose_classification::{PoseSample, PoseSampleStore};

// =============================================================================
// POSE GENERATORS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing,
    ArmsUp,
    TPose,
    Squat,
}

impl Pose {
    pub const ALL: [Pose; 4] = [Pose::Standing, Pose::ArmsUp, Pose::TPose, Pose::Squat];

    /// Class label used for this pose in the exercise cycle.
    pub fn label(self) -> &'static str {
        match self {
            Pose::Standing => "down",
            Pose::ArmsUp => "up",
            Pose::TPose => "t3",
            Pose::Squat => "t2",
        }
    }

    pub fn from_label(label: &str) -> Pose {
        Pose::ALL
            .into_iter()
            .find(|p| p.label() == label)
            .unwrap_or_else(|| panic!("unknown label {label}"))
    }
}

/// Mirror a left-side x coordinate to the right side around x = 0.5.
fn right(x: f32) -> f32 {
    1.0 - x
}

/// Generate a front-facing pose in image coordinates (y grows downward).
///
/// `variant` 0 is the exact pose; other variants add a small deterministic
/// jitter to every coordinate.
pub fn generate_pose(kind: Pose, variant: usize) -> Vec<Point3D> {
    let hip_y = if kind == Pose::Squat { 0.75 } else { 0.6 };
    let shoulder_y = hip_y - 0.3;

    let (elbow, wrist) = match kind {
        Pose::Standing => ((0.63, shoulder_y + 0.15), (0.64, shoulder_y + 0.3)),
        Pose::ArmsUp => ((0.64, shoulder_y - 0.15), (0.63, shoulder_y - 0.3)),
        Pose::TPose => ((0.75, shoulder_y), (0.9, shoulder_y)),
        Pose::Squat => ((0.66, shoulder_y + 0.08), (0.6, shoulder_y + 0.05)),
    };
    let (knee, ankle) = match kind {
        Pose::Squat => ((0.68, 0.85), (0.58, 1.0)),
        _ => ((0.56, 0.8), (0.56, 1.0)),
    };

    let mut lm = vec![point(0.5, shoulder_y - 0.12, 0.0); NUM_LANDMARKS];

    // Face.
    lm[LEFT_EYE] = point(0.52, shoulder_y - 0.14, 0.0);
    lm[RIGHT_EYE] = point(right(0.52), shoulder_y - 0.14, 0.0);
    lm[LEFT_EAR] = point(0.55, shoulder_y - 0.12, 0.02);
    lm[RIGHT_EAR] = point(right(0.55), shoulder_y - 0.12, 0.02);

    let mut set_pair = |left_idx: usize, right_idx: usize, (x, y): (f32, f32), z: f32| {
        lm[left_idx] = point(x, y, z);
        lm[right_idx] = point(right(x), y, z);
    };

    set_pair(LEFT_SHOULDER, RIGHT_SHOULDER, (0.6, shoulder_y), 0.0);
    set_pair(LEFT_ELBOW, RIGHT_ELBOW, elbow, 0.02);
    set_pair(LEFT_WRIST, RIGHT_WRIST, wrist, 0.04);
    set_pair(LEFT_PINKY, RIGHT_PINKY, (wrist.0 + 0.01, wrist.1 + 0.02), 0.04);
    set_pair(LEFT_INDEX, RIGHT_INDEX, (wrist.0, wrist.1 + 0.03), 0.04);
    set_pair(LEFT_THUMB, RIGHT_THUMB, (wrist.0 - 0.01, wrist.1 + 0.02), 0.04);
    set_pair(LEFT_HIP, RIGHT_HIP, (0.55, hip_y), 0.0);
    set_pair(LEFT_KNEE, RIGHT_KNEE, knee, 0.0);
    set_pair(LEFT_ANKLE, RIGHT_ANKLE, ankle, 0.0);
    set_pair(LEFT_HEEL, RIGHT_HEEL, (ankle.0, ankle.1 + 0.02), 0.02);
    set_pair(LEFT_FOOT_INDEX, RIGHT_FOOT_INDEX, (ankle.0 + 0.02, ankle.1 + 0.03), -0.04);

    if variant > 0 {
        for (i, p) in lm.iter_mut().enumerate() {
            let phase = (i * 31 + variant * 17) as f32;
            *p += point((phase * 0.7).sin(), (phase * 1.3).cos(), (phase * 0.3).sin()) * 0.004;
        }
    }

    lm
}

/// Store with `per_class` jittered samples of every pose.
pub fn build_store(per_class: usize) -> Arc<PoseSampleStore> {
    let samples = Pose::ALL
        .iter()
        .flat_map(|&kind| {
            (1..=per_class).map(move |v| {
                PoseSample::new(format!("{}_{v:02}", kind.label()), kind.label(), &generate_pose(kind, v))
                    .expect("synthetic pose embeds")
            })
        })
        .collect();
    Arc::new(PoseSampleStore::from_samples(samples).expect("consistent store"))
}

/// Format a landmark set as one sample file line.
pub fn to_csv_line(name: &str, class: &str, landmarks: &[Point3D], separator: char) -> String {
    let mut fields = vec![name.to_string(), class.to_string()];
    for p in landmarks {
        fields.extend([p.x, p.y, p.z].iter().map(ToString::to_string));
    }
    fields.join(&separator.to_string())
}

/// Labels for `frames_per_phase` frames of each phase over `cycles` repetitions,
/// starting and ending in the down pose.
pub fn exercise_labels(cycles: usize, frames_per_phase: usize) -> Vec<&'static str> {
    let mut labels = vec!["down"; frames_per_phase];
    for _ in 0..cycles {
        for label in ["up", "t3", "t2", "down"] {
            labels.extend(std::iter::repeat(label).take(frames_per_phase));
        }
    }
    labels
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
