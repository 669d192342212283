//! Labeled reference poses.
//!
//! Sample files are line oriented:
//!
//! ```text
//! name,className,x1,y1,z1,x2,y2,z2,...,x33,y33,z33
//! ```
//!
//! Exactly `2 + 33 * 3 = 101` fields per line. The embedding is computed once
//! when the sample is built and never recomputed.

use crate::embedding::{compute_pose_embedding, PoseEmbedding};
use crate::error::{PoseError, Result};
use crate::landmarks::{NUM_DIMS, NUM_LANDMARKS};
use crate::math::vector::{point, Point3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default field separator in sample files.
pub const DEFAULT_SEPARATOR: char = ',';

/// Fields per valid sample line.
pub const FIELDS_PER_LINE: usize = NUM_LANDMARKS * NUM_DIMS + 2;

/// A labeled reference pose.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseSample {
    name: String,
    class_name: String,
    embedding: PoseEmbedding,
}

impl PoseSample {
    /// Build a sample from raw landmarks.
    ///
    /// # Errors
    ///
    /// Returns an error if the landmarks cannot be embedded.
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        landmarks: &[Point3D],
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            class_name: class_name.into(),
            embedding: compute_pose_embedding(landmarks)?,
        })
    }

    /// Build a sample around an already computed embedding.
    #[must_use]
    pub fn with_embedding(
        name: impl Into<String>,
        class_name: impl Into<String>,
        embedding: PoseEmbedding,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            embedding,
        }
    }

    /// Parse one sample file line.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidTokenCount`] if the line does not have
    /// [`FIELDS_PER_LINE`] fields, [`PoseError::InvalidCoordinate`] for a
    /// field that is not a float, or an embedding error for unusable poses.
    pub fn from_csv_line(line: &str, separator: char) -> Result<Self> {
        let tokens: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(separator).collect();
        if tokens.len() != FIELDS_PER_LINE {
            return Err(PoseError::invalid_token_count(FIELDS_PER_LINE, tokens.len()));
        }

        let coords = tokens[2..]
            .iter()
            .enumerate()
            .map(|(i, token)| {
                token
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| PoseError::invalid_coordinate(*token, i + 2))
            })
            .collect::<Result<Vec<f32>>>()?;

        let landmarks: Vec<Point3D> = coords
            .chunks_exact(NUM_DIMS)
            .map(|c| point(c[0], c[1], c[2]))
            .collect();

        Self::new(tokens[0], tokens[1], &landmarks)
    }

    /// Sample name, e.g. `"squat_down_017"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class label this sample votes for.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Precomputed embedding.
    #[must_use]
    pub const fn embedding(&self) -> &PoseEmbedding {
        &self.embedding
    }
}
