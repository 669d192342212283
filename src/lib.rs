//! Pose Classification Library
//!
//! K-nearest-neighbor classification of 33-landmark body poses with temporal
//! smoothing and repetition counting.
//!
//! Each frame goes through:
//!
//! 1. **Embedding**: landmarks are normalized for translation and scale and
//!    turned into 23 joint-to-joint difference vectors.
//! 2. **Classification**: a two-stage nearest-neighbor search over labeled
//!    reference samples votes per class, mirror-invariant.
//! 3. **Smoothing**: an exponential moving average over recent results.
//! 4. **Counting**: per-class hysteresis counters and a four-phase exercise
//!    state machine.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pose_classification::{
//!     math::point, PoseClassifierProcessor, PoseSample, PoseSampleStore, ProcessorConfig,
//! };
//!
//! // A synthetic pose; real landmarks come from a pose estimator.
//! let pose: Vec<_> = (0..33)
//!     .map(|i| point(0.3 + (i % 5) as f32 * 0.1, (i / 5) as f32 * 0.12, 0.0))
//!     .collect();
//!
//! let store = PoseSampleStore::from_samples(vec![PoseSample::new("s0", "up", &pose)?])?;
//! let processor = PoseClassifierProcessor::new(Arc::new(store), ProcessorConfig::default())?;
//!
//! let session = processor.new_session();
//! let (_session, report) = processor.process_frame(session, &pose, Duration::ZERO);
//! assert_eq!(report.best_class.unwrap().class_name, "up");
//! # Ok::<(), pose_classification::PoseError>(())
//! ```
//!
//! # Sample Files
//!
//! Reference samples are loaded from text files with one pose per line:
//!
//! | Field | Count | Content |
//! |-------|-------|---------|
//! | name | 1 | sample identifier |
//! | class | 1 | class label |
//! | coordinates | 99 | `x, y, z` for each of the 33 landmarks |
//!
//! # Presets
//!
//! ```
//! use pose_classification::ProcessorConfig;
//!
//! let stream = ProcessorConfig::default();
//! let still = ProcessorConfig::single_image();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod classifier;
pub mod config;
pub mod distance;
pub mod embedding;
pub mod error;
pub mod landmarks;
pub mod math;
pub mod phase;
pub mod processor;
pub mod repetition;
pub mod result;
pub mod sample;
pub mod smoothing;
pub mod store;
pub mod worker;

// Re-exports for convenient access
pub use classifier::{Neighbor, PoseClassifier};
pub use config::{
    ClassifierConfig, PhaseConfig, PhaseLabels, ProcessorConfig, RepetitionConfig, SmoothingConfig,
};
pub use distance::{weighted_max_distance, weighted_sum_distance, MirroredQuery};
pub use embedding::{compute_pose_embedding, PoseEmbedding, EMBEDDING_LEN};
pub use error::{PoseError, Result};
pub use landmarks::{mirror_x, validate_landmarks, NUM_LANDMARKS};
pub use phase::{transition, ExercisePhase, PhaseEffect, PhaseState, Transition};
pub use processor::{BestClass, FrameReport, PhaseSummary, PoseClassifierProcessor, SessionState};
pub use repetition::RepetitionCounter;
pub use result::ClassificationResult;
pub use sample::PoseSample;
pub use smoothing::EmaSmoother;
pub use store::PoseSampleStore;
pub use worker::FrameWorker;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
