//! K-nearest-neighbor pose classifier.
//!
//! Classification runs in two stages over the sample store:
//!
//! 1. **Max-distance filter.** Every sample is scored by its mirror-invariant
//!    max distance and only the `max_distance_top_k` closest survive. A
//!    single badly placed joint is enough to push a sample out here.
//! 2. **Mean-distance refinement.** Survivors are re-scored by mean distance
//!    and the `mean_distance_top_k` closest each cast one vote for their class.
//!
//! Confidences are therefore whole vote counts in `[0, confidence_range()]`.

use std::sync::Arc;

use log::warn;

use crate::config::ClassifierConfig;
use crate::distance::MirroredQuery;
use crate::error::Result;
use crate::math::top_k::BoundedTopK;
use crate::math::vector::Point3D;
use crate::result::ClassificationResult;
use crate::sample::PoseSample;
use crate::store::PoseSampleStore;

/// A sample that survived both stages, with its scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    /// The matching reference sample.
    pub sample: &'a PoseSample,
    /// Mirror-invariant max distance (stage 1 score).
    pub max_distance: f32,
    /// Mirror-invariant mean distance (stage 2 score).
    pub mean_distance: f32,
}

impl Neighbor<'_> {
    /// Name of the matching sample.
    #[must_use]
    pub fn name(&self) -> &str {
        self.sample.name()
    }

    /// Class the matching sample votes for.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.sample.class_name()
    }
}

/// Classifies landmark sets against a shared, read-only sample store.
#[derive(Debug, Clone)]
pub struct PoseClassifier {
    store: Arc<PoseSampleStore>,
    config: ClassifierConfig,
}

impl PoseClassifier {
    /// Create a classifier with the default configuration.
    #[must_use]
    pub fn new(store: Arc<PoseSampleStore>) -> Self {
        Self {
            store,
            config: ClassifierConfig::default(),
        }
    }

    /// Create a classifier with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::InvalidConfig`] if `config` is invalid.
    pub fn with_config(store: Arc<PoseSampleStore>, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Largest confidence any class can receive.
    #[must_use]
    pub fn confidence_range(&self) -> usize {
        self.config.confidence_range()
    }

    /// Classifier configuration.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Shared sample store.
    #[must_use]
    pub fn store(&self) -> &Arc<PoseSampleStore> {
        &self.store
    }

    /// Samples surviving both stages, closest mean distance first.
    ///
    /// An empty or invalid landmark set has no neighbors. Samples whose
    /// embedding length disagrees with the query are logged and skipped.
    #[must_use]
    pub fn nearest_neighbors(&self, landmarks: &[Point3D]) -> Vec<Neighbor<'_>> {
        if landmarks.is_empty() {
            return Vec::new();
        }

        let query = match MirroredQuery::from_landmarks(landmarks) {
            Ok(query) => query,
            Err(err) => {
                warn!("cannot classify pose: {err}");
                return Vec::new();
            }
        };
        let weights = &self.config.axes_weights;

        let mut by_max = BoundedTopK::new(self.config.max_distance_top_k);
        for sample in self.store.iter() {
            match query.max_distance(sample.embedding(), weights) {
                Ok(distance) => by_max.push(sample, distance),
                Err(err) => warn!("skipping sample '{}': {err}", sample.name()),
            }
        }

        let mut by_mean = BoundedTopK::new(self.config.mean_distance_top_k);
        for (sample, max_distance) in by_max.into_sorted_vec() {
            match query.mean_distance(sample.embedding(), weights) {
                Ok(mean_distance) => by_mean.push((sample, max_distance), mean_distance),
                Err(err) => warn!("skipping sample '{}': {err}", sample.name()),
            }
        }

        by_mean
            .into_sorted_vec()
            .into_iter()
            .map(|((sample, max_distance), mean_distance)| Neighbor {
                sample,
                max_distance,
                mean_distance,
            })
            .collect()
    }

    /// Vote counts per class for `landmarks`.
    ///
    /// Votes are cast nearest neighbor first, so an equal vote count goes to
    /// the class of the closer sample.
    ///
    /// Never fails: an empty or invalid landmark set yields an empty result.
    #[must_use]
    pub fn classify(&self, landmarks: &[Point3D]) -> ClassificationResult {
        let mut result = ClassificationResult::new();
        for neighbor in self.nearest_neighbors(landmarks) {
            result.increment_class_confidence(neighbor.class_name());
        }
        result
    }
}
