//! Pose embedding: normalized joint-to-joint difference vectors.
//!
//! # Normalization
//!
//! 1. Translate so the hip center is the origin.
//! 2. Divide by the pose size: the largest 2D distance from the hip center to
//!    any landmark, floored at `torso_size * 2.5`.
//! 3. Multiply by 100. Reference sample files were embedded at this scale, so
//!    the factor is part of the format.
//!
//! # Embedding Layout (23 vectors)
//!
//! | Index | Pair | Group |
//! |-------|------|-------|
//! | 0 | hip center → shoulder center | one joint |
//! | 1:3 | shoulder → elbow (L, R) | one joint |
//! | 3:5 | elbow → wrist (L, R) | one joint |
//! | 5:7 | hip → knee (L, R) | one joint |
//! | 7:9 | knee → ankle (L, R) | one joint |
//! | 9:11 | shoulder → wrist (L, R) | two joints |
//! | 11:13 | hip → ankle (L, R) | two joints |
//! | 13:15 | hip → wrist (L, R) | four joints |
//! | 15:17 | shoulder → ankle (L, R) | five joints |
//! | 17:19 | hip → wrist (L, R) | five joints (repeated) |
//! | 19:23 | elbows, knees, wrists, ankles (L → R) | cross body |
//!
//! Each entry is `to - from`.

use crate::error::{PoseError, Result};
use crate::landmarks::{
    validate_landmarks, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::math::vector::{average, l2_norm_2d, scale_all, subtract, subtract_all, Point3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of feature vectors in an embedding.
pub const EMBEDDING_LEN: usize = 23;

/// Minimum body size as a multiple of the torso length.
pub const TORSO_MULTIPLIER: f32 = 2.5;

/// Scale applied after size normalization.
pub const EMBEDDING_SCALE: f32 = 100.0;

/// Single-landmark pairs, `(from, to)`, for indices 1..23 of the layout.
const JOINT_PAIRS: [(usize, usize); EMBEDDING_LEN - 1] = [
    // One joint.
    (LEFT_SHOULDER, LEFT_ELBOW),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_HIP, LEFT_KNEE),
    (RIGHT_HIP, RIGHT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_KNEE, RIGHT_ANKLE),
    // Two joints.
    (LEFT_SHOULDER, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_WRIST),
    (LEFT_HIP, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_ANKLE),
    // Four joints.
    (LEFT_HIP, LEFT_WRIST),
    (RIGHT_HIP, RIGHT_WRIST),
    // Five joints.
    (LEFT_SHOULDER, LEFT_ANKLE),
    (RIGHT_SHOULDER, RIGHT_ANKLE),
    (LEFT_HIP, LEFT_WRIST),
    (RIGHT_HIP, RIGHT_WRIST),
    // Cross body.
    (LEFT_ELBOW, RIGHT_ELBOW),
    (LEFT_KNEE, RIGHT_KNEE),
    (LEFT_WRIST, RIGHT_WRIST),
    (LEFT_ANKLE, RIGHT_ANKLE),
];

/// Fixed-length ordered embedding of a single pose.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseEmbedding {
    vectors: Vec<Point3D>,
}

impl PoseEmbedding {
    /// Wrap precomputed feature vectors.
    ///
    /// No length check happens here; distance computation rejects mismatched
    /// lengths and stores reject inconsistent samples.
    #[must_use]
    pub fn from_vectors(vectors: Vec<Point3D>) -> Self {
        Self { vectors }
    }

    /// Number of feature vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the embedding holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Feature vectors in layout order.
    #[must_use]
    pub fn vectors(&self) -> &[Point3D] {
        &self.vectors
    }

    /// Flatten to `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn to_flat_vec(&self) -> Vec<f32> {
        self.vectors.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }
}

/// Compute the embedding of a raw landmark set.
///
/// # Errors
///
/// Returns an error if the landmark set is not a complete, finite 33-point
/// set, or if the pose has zero extent and cannot be scale-normalized.
///
/// # Example
///
/// ```
/// use pose_classification::{compute_pose_embedding, math::vector::point, EMBEDDING_LEN};
///
/// let landmarks: Vec<_> = (0..33)
///     .map(|i| point(i as f32 * 0.01, (i % 7) as f32 * 0.1, 0.0))
///     .collect();
/// let embedding = compute_pose_embedding(&landmarks)?;
/// assert_eq!(embedding.len(), EMBEDDING_LEN);
/// # Ok::<(), pose_classification::PoseError>(())
/// ```
pub fn compute_pose_embedding(landmarks: &[Point3D]) -> Result<PoseEmbedding> {
    validate_landmarks(landmarks)?;
    let normalized = normalize(landmarks)?;
    Ok(PoseEmbedding::from_vectors(embed_normalized(&normalized)))
}

/// Translation and scale normalization.
fn normalize(landmarks: &[Point3D]) -> Result<Vec<Point3D>> {
    let mut normalized = landmarks.to_vec();

    let center = hips_center(landmarks);
    subtract_all(&mut normalized, &center);

    let size = pose_size(&normalized);
    if !(size.is_finite() && size > 0.0) {
        return Err(PoseError::DegeneratePose);
    }

    scale_all(&mut normalized, 1.0 / size);
    scale_all(&mut normalized, EMBEDDING_SCALE);
    Ok(normalized)
}

/// Body size of a translation-normalized pose, using only x/y.
fn pose_size(landmarks: &[Point3D]) -> f32 {
    let hips = hips_center(landmarks);
    let shoulders = shoulders_center(landmarks);

    let torso_size = l2_norm_2d(&subtract(&shoulders, &hips));

    landmarks
        .iter()
        .map(|p| l2_norm_2d(&subtract(p, &hips)))
        .fold(torso_size * TORSO_MULTIPLIER, f32::max)
}

fn hips_center(lm: &[Point3D]) -> Point3D {
    average(&lm[LEFT_HIP], &lm[RIGHT_HIP])
}

fn shoulders_center(lm: &[Point3D]) -> Point3D {
    average(&lm[LEFT_SHOULDER], &lm[RIGHT_SHOULDER])
}

fn embed_normalized(lm: &[Point3D]) -> Vec<Point3D> {
    let mut vectors = Vec::with_capacity(EMBEDDING_LEN);
    vectors.push(subtract(&shoulders_center(lm), &hips_center(lm)));
    vectors.extend(
        JOINT_PAIRS
            .iter()
            .map(|&(from, to)| subtract(&lm[to], &lm[from])),
    );
    vectors
}
