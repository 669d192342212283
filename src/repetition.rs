//! Hysteresis repetition counting for a single pose class.

use log::debug;

use crate::config::RepetitionConfig;
use crate::error::Result;
use crate::result::ClassificationResult;

/// Counts how many times a class is entered and then left.
///
/// A repetition is counted on the way out: confidence must first rise above
/// `enter_threshold`, then fall below `exit_threshold`. Values between the two
/// thresholds never change state.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionCounter {
    class_name: String,
    enter_threshold: f32,
    exit_threshold: f32,
    num_repeats: u32,
    pose_entered: bool,
}

impl RepetitionCounter {
    /// Counter with the default thresholds (6 / 4 out of 10).
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self::from_valid_config(class_name, RepetitionConfig::default())
    }

    /// Counter with explicit thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::InvalidConfig`] if `exit_threshold` exceeds
    /// `enter_threshold`.
    pub fn with_thresholds(
        class_name: impl Into<String>,
        enter_threshold: f32,
        exit_threshold: f32,
    ) -> Result<Self> {
        let config = RepetitionConfig {
            enter_threshold,
            exit_threshold,
        };
        config.validate()?;
        Ok(Self::from_valid_config(class_name, config))
    }

    pub(crate) fn from_valid_config(class_name: impl Into<String>, config: RepetitionConfig) -> Self {
        Self {
            class_name: class_name.into(),
            enter_threshold: config.enter_threshold,
            exit_threshold: config.exit_threshold,
            num_repeats: 0,
            pose_entered: false,
        }
    }

    /// Feed one (usually smoothed) result and return the running count.
    pub fn add_classification_result(&mut self, result: &ClassificationResult) -> u32 {
        let confidence = result.class_confidence(&self.class_name);

        if !self.pose_entered {
            self.pose_entered = confidence > self.enter_threshold;
            return self.num_repeats;
        }

        if confidence < self.exit_threshold {
            self.num_repeats += 1;
            self.pose_entered = false;
            debug!("{} repetition {}", self.class_name, self.num_repeats);
        }

        self.num_repeats
    }

    /// Tracked class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Repetitions counted so far.
    #[must_use]
    pub const fn num_repeats(&self) -> u32 {
        self.num_repeats
    }

    /// Whether the pose is currently held above the enter threshold.
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        self.pose_entered
    }
}
