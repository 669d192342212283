//! Axis-weighted distances between pose embeddings.
//!
//! Two measures are used by the classifier:
//!
//! | Measure | Per component | Across components |
//! |---------|---------------|-------------------|
//! | max distance | `max(|w * (a - b)|)` | max |
//! | mean distance | `sum(|w * (a - b)|)` | sum / (len * 2) |
//!
//! Both are taken against the query and its X-mirrored copy, keeping the
//! smaller value, so a pose and its horizontal flip score identically.

use crate::embedding::{compute_pose_embedding, PoseEmbedding};
use crate::error::{PoseError, Result};
use crate::landmarks::mirror_x;
use crate::math::vector::{max_abs, scale_per_axis, subtract, sum_abs, Point3D};

/// Largest weighted absolute coordinate difference over all components.
///
/// # Errors
///
/// Returns [`PoseError::EmbeddingLengthMismatch`] if the embeddings differ
/// in length.
pub fn weighted_max_distance(a: &PoseEmbedding, b: &PoseEmbedding, weights: &Point3D) -> Result<f32> {
    check_lengths(a, b)?;
    Ok(a.vectors()
        .iter()
        .zip(b.vectors())
        .map(|(va, vb)| max_abs(&scale_per_axis(&subtract(va, vb), weights)))
        .fold(0.0, f32::max))
}

/// Sum of weighted absolute coordinate differences over all components.
///
/// # Errors
///
/// Returns [`PoseError::EmbeddingLengthMismatch`] if the embeddings differ
/// in length.
pub fn weighted_sum_distance(a: &PoseEmbedding, b: &PoseEmbedding, weights: &Point3D) -> Result<f32> {
    check_lengths(a, b)?;
    Ok(a.vectors()
        .iter()
        .zip(b.vectors())
        .map(|(va, vb)| sum_abs(&scale_per_axis(&subtract(va, vb), weights)))
        .sum())
}

fn check_lengths(a: &PoseEmbedding, b: &PoseEmbedding) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(PoseError::embedding_length_mismatch(a.len(), b.len()))
    }
}

/// A query pose embedded as-is and X-mirrored.
#[derive(Debug, Clone)]
pub struct MirroredQuery {
    original: PoseEmbedding,
    flipped: PoseEmbedding,
}

impl MirroredQuery {
    /// Embed `landmarks` and their horizontal mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the landmarks cannot be embedded.
    pub fn from_landmarks(landmarks: &[Point3D]) -> Result<Self> {
        Ok(Self {
            original: compute_pose_embedding(landmarks)?,
            flipped: compute_pose_embedding(&mirror_x(landmarks))?,
        })
    }

    /// Embedding of the query as given.
    #[must_use]
    pub const fn original(&self) -> &PoseEmbedding {
        &self.original
    }

    /// Embedding of the X-mirrored query.
    #[must_use]
    pub const fn flipped(&self) -> &PoseEmbedding {
        &self.flipped
    }

    /// Mirror-invariant max distance to `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::EmbeddingLengthMismatch`] on a length mismatch.
    pub fn max_distance(&self, sample: &PoseEmbedding, weights: &Point3D) -> Result<f32> {
        let original = weighted_max_distance(&self.original, sample, weights)?;
        let flipped = weighted_max_distance(&self.flipped, sample, weights)?;
        Ok(original.min(flipped))
    }

    /// Mirror-invariant mean distance to `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::EmbeddingLengthMismatch`] on a length mismatch.
    pub fn mean_distance(&self, sample: &PoseEmbedding, weights: &Point3D) -> Result<f32> {
        let original = weighted_sum_distance(&self.original, sample, weights)?;
        let flipped = weighted_sum_distance(&self.flipped, sample, weights)?;
        Ok(original.min(flipped) / (self.original.len() * 2) as f32)
    }
}
