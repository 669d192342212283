//! Landmark index convention and landmark-set helpers.
//!
//! A landmark set is the ordered 33-point output of a BlazePose-style pose
//! model. Indices are fixed by that model; the embedding reads them
//! positionally, so they must be preserved exactly.

use crate::error::{PoseError, Result};
use crate::math::vector::{point, scale_all_per_axis, Point3D};

/// Number of landmarks per pose.
pub const NUM_LANDMARKS: usize = 33;

/// Coordinates per landmark.
pub const NUM_DIMS: usize = 3;

pub const NOSE: usize = 0;
pub const LEFT_EYE_INNER: usize = 1;
pub const LEFT_EYE: usize = 2;
pub const LEFT_EYE_OUTER: usize = 3;
pub const RIGHT_EYE_INNER: usize = 4;
pub const RIGHT_EYE: usize = 5;
pub const RIGHT_EYE_OUTER: usize = 6;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_MOUTH: usize = 9;
pub const RIGHT_MOUTH: usize = 10;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_PINKY: usize = 17;
pub const RIGHT_PINKY: usize = 18;
pub const LEFT_INDEX: usize = 19;
pub const RIGHT_INDEX: usize = 20;
pub const LEFT_THUMB: usize = 21;
pub const RIGHT_THUMB: usize = 22;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Check that a landmark set is complete and finite.
///
/// # Errors
///
/// Returns [`PoseError::InvalidLandmarkCount`] for a set that is not exactly
/// [`NUM_LANDMARKS`] long and [`PoseError::NonFiniteLandmark`] for NaN or
/// infinite coordinates.
pub fn validate_landmarks(landmarks: &[Point3D]) -> Result<()> {
    if landmarks.len() != NUM_LANDMARKS {
        return Err(PoseError::invalid_landmark_count(
            NUM_LANDMARKS,
            landmarks.len(),
        ));
    }

    if let Some(index) = landmarks
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(PoseError::NonFiniteLandmark { index });
    }

    Ok(())
}

/// Mirror a landmark set horizontally by negating every x coordinate.
///
/// Indices are kept as-is: the left hip stays at [`LEFT_HIP`] even though it
/// now sits where a right hip would.
#[must_use]
pub fn mirror_x(landmarks: &[Point3D]) -> Vec<Point3D> {
    let mut flipped = landmarks.to_vec();
    scale_all_per_axis(&mut flipped, &point(-1.0, 1.0, 1.0));
    flipped
}

/// Build a landmark set from a flat `[x0, y0, z0, x1, ...]` slice.
///
/// # Errors
///
/// Returns [`PoseError::InvalidLandmarkCount`] if the slice does not hold
/// exactly `NUM_LANDMARKS * NUM_DIMS` values.
pub fn landmarks_from_flat(values: &[f32]) -> Result<Vec<Point3D>> {
    if values.len() != NUM_LANDMARKS * NUM_DIMS {
        return Err(PoseError::invalid_landmark_count(
            NUM_LANDMARKS,
            values.len() / NUM_DIMS,
        ));
    }

    Ok(values
        .chunks_exact(NUM_DIMS)
        .map(|c| point(c[0], c[1], c[2]))
        .collect())
}
