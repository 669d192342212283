//! Error types for pose classification.
//!
//! Most per-frame failures are recovered locally (an invalid landmark set
//! classifies to an empty result), so these errors surface mainly while
//! parsing samples, building a sample store, or validating configuration.

use thiserror::Error;

/// Main error type for pose classification operations.
#[derive(Error, Debug)]
pub enum PoseError {
    /// Landmark set does not carry the expected number of points.
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    /// A landmark coordinate is NaN or infinite.
    #[error("Non-finite landmark at index {index}")]
    NonFiniteLandmark { index: usize },

    /// Pose collapses to a single point and cannot be scale-normalized.
    #[error("Degenerate pose: body size is zero")]
    DegeneratePose,

    /// Sample line has the wrong number of fields.
    #[error("Invalid number of tokens: expected {expected}, got {actual}")]
    InvalidTokenCount { expected: usize, actual: usize },

    /// Sample line carries a coordinate that is not a float.
    #[error("Invalid value '{token}' for landmark position at field {index}")]
    InvalidCoordinate { token: String, index: usize },

    /// Two embeddings being compared differ in length.
    #[error("Embedding length mismatch: expected {expected}, got {actual}")]
    EmbeddingLengthMismatch { expected: usize, actual: usize },

    /// A sample's embedding disagrees with the rest of the store.
    #[error("Inconsistent sample store: sample '{sample}' has embedding length {actual}, expected {expected}")]
    InconsistentStore {
        sample: String,
        expected: usize,
        actual: usize,
    },

    /// Reading sample data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The frame worker thread is gone.
    #[error("Worker unavailable: {0}")]
    WorkerUnavailable(String),
}

/// Result type alias for pose classification operations.
pub type Result<T> = std::result::Result<T, PoseError>;

impl PoseError {
    /// Create an invalid landmark count error.
    #[must_use]
    pub const fn invalid_landmark_count(expected: usize, actual: usize) -> Self {
        Self::InvalidLandmarkCount { expected, actual }
    }

    /// Create an invalid token count error.
    #[must_use]
    pub const fn invalid_token_count(expected: usize, actual: usize) -> Self {
        Self::InvalidTokenCount { expected, actual }
    }

    /// Create an invalid coordinate error.
    #[must_use]
    pub fn invalid_coordinate(token: impl Into<String>, index: usize) -> Self {
        Self::InvalidCoordinate {
            token: token.into(),
            index,
        }
    }

    /// Create an embedding length mismatch error.
    #[must_use]
    pub const fn embedding_length_mismatch(expected: usize, actual: usize) -> Self {
        Self::EmbeddingLengthMismatch { expected, actual }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a worker unavailable error.
    #[must_use]
    pub fn worker_unavailable(msg: impl Into<String>) -> Self {
        Self::WorkerUnavailable(msg.into())
    }

    /// Whether this error only invalidates a single sample line.
    ///
    /// Store loading skips lines that fail with a recoverable error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidTokenCount { .. }
                | Self::InvalidCoordinate { .. }
                | Self::InvalidLandmarkCount { .. }
                | Self::NonFiniteLandmark { .. }
                | Self::DegeneratePose
        )
    }
}
