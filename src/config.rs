//! Configuration for classification, smoothing and repetition counting.
//!
//! Each stage has its own config struct with defaults matching the reference
//! sample sets; [`ProcessorConfig`] bundles them for the per-frame pipeline.
//!
//! # Example
//!
//! ```
//! use pose_classification::ProcessorConfig;
//!
//! let config = ProcessorConfig::default()
//!     .with_rep_classes(["squats_down", "pushups_down"]);
//! assert!(config.validate().is_ok());
//!
//! let still = ProcessorConfig::single_image();
//! assert!(!still.stream_mode);
//! ```

use crate::error::{PoseError, Result};
use crate::math::vector::{point, Point3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nearest-neighbor classifier parameters.
///
/// Confidence is a vote count, so its range is
/// `min(max_distance_top_k, mean_distance_top_k)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifierConfig {
    /// Samples kept by the max-distance outlier filter.
    pub max_distance_top_k: usize,

    /// Samples kept by the mean-distance refinement; each one votes.
    pub mean_distance_top_k: usize,

    /// Per-axis weights applied to embedding differences.
    /// Z is under-weighted as the least accurate axis.
    pub axes_weights: Point3D,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_distance_top_k: 30,
            mean_distance_top_k: 10,
            axes_weights: point(1.0, 1.0, 0.2),
        }
    }
}

impl ClassifierConfig {
    /// Upper bound of any confidence the classifier returns.
    #[must_use]
    pub fn confidence_range(&self) -> usize {
        self.max_distance_top_k.min(self.mean_distance_top_k)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for zero top-K values or non-positive axis weights.
    pub fn validate(&self) -> Result<()> {
        if self.max_distance_top_k == 0 {
            return Err(PoseError::invalid_config(
                "max_distance_top_k must be at least 1",
            ));
        }
        if self.mean_distance_top_k == 0 {
            return Err(PoseError::invalid_config(
                "mean_distance_top_k must be at least 1",
            ));
        }
        if !self.axes_weights.iter().all(|w| w.is_finite() && *w > 0.0) {
            return Err(PoseError::invalid_config(
                "axes_weights must be finite and positive",
            ));
        }
        Ok(())
    }

    /// Set both top-K values.
    #[must_use]
    pub const fn with_top_k(mut self, max_distance_top_k: usize, mean_distance_top_k: usize) -> Self {
        self.max_distance_top_k = max_distance_top_k;
        self.mean_distance_top_k = mean_distance_top_k;
        self
    }

    /// Set the axis weights.
    #[must_use]
    pub fn with_axes_weights(mut self, x: f32, y: f32, z: f32) -> Self {
        self.axes_weights = point(x, y, z);
        self
    }
}

/// EMA smoothing parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmoothingConfig {
    /// Number of recent results averaged.
    pub window_size: usize,

    /// Decay rate; the i-th most recent result has weight `(1 - alpha)^i`.
    pub alpha: f32,

    /// A gap between inputs longer than this clears the window.
    pub reset_threshold_ms: u64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            alpha: 0.2,
            reset_threshold_ms: 100,
        }
    }
}

impl SmoothingConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty window or `alpha` outside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(PoseError::invalid_config("window_size must be at least 1"));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(PoseError::invalid_config("alpha must be in (0, 1]"));
        }
        Ok(())
    }

    /// Set the window size.
    #[must_use]
    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the decay rate.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the reset gap.
    #[must_use]
    pub const fn with_reset_threshold_ms(mut self, reset_threshold_ms: u64) -> Self {
        self.reset_threshold_ms = reset_threshold_ms;
        self
    }
}

/// Hysteresis thresholds for repetition counting.
///
/// Tuned against the classifier's confidence range (10 by default).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepetitionConfig {
    /// Confidence above which the pose is entered.
    pub enter_threshold: f32,

    /// Confidence below which an entered pose is left, counting one rep.
    pub exit_threshold: f32,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            enter_threshold: 6.0,
            exit_threshold: 4.0,
        }
    }
}

impl RepetitionConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the exit threshold lies above the enter threshold.
    pub fn validate(&self) -> Result<()> {
        if !(self.enter_threshold.is_finite() && self.exit_threshold.is_finite()) {
            return Err(PoseError::invalid_config("thresholds must be finite"));
        }
        if self.exit_threshold > self.enter_threshold {
            return Err(PoseError::invalid_config(
                "exit_threshold must not exceed enter_threshold",
            ));
        }
        Ok(())
    }
}

/// Class labels driving the exercise-phase machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseLabels {
    /// Label that moves DOWN to UP.
    pub up: String,
    /// Label that moves UP to T1.
    pub top: String,
    /// Label that moves T1 to T2.
    pub hold: String,
    /// Label that moves T2 back to DOWN, completing a repetition.
    pub down: String,
}

impl Default for PhaseLabels {
    fn default() -> Self {
        Self {
            up: "up".to_string(),
            top: "t3".to_string(),
            hold: "t2".to_string(),
            down: "down".to_string(),
        }
    }
}

/// Exercise-phase machine parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseConfig {
    /// Transition labels.
    pub labels: PhaseLabels,

    /// Confidence samples averaged into the quality score.
    pub quality_window: usize,

    /// Most recent phase durations kept and reported.
    pub duration_window: usize,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            labels: PhaseLabels::default(),
            quality_window: 10,
            duration_window: 30,
        }
    }
}

impl PhaseConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for empty labels or a zero quality or duration window.
    pub fn validate(&self) -> Result<()> {
        let l = &self.labels;
        if [&l.up, &l.top, &l.hold, &l.down].iter().any(|s| s.is_empty()) {
            return Err(PoseError::invalid_config("phase labels must not be empty"));
        }
        if self.quality_window == 0 {
            return Err(PoseError::invalid_config(
                "quality_window must be at least 1",
            ));
        }
        if self.duration_window == 0 {
            return Err(PoseError::invalid_config(
                "duration_window must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Full per-frame pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessorConfig {
    pub classifier: ClassifierConfig,
    pub smoothing: SmoothingConfig,
    pub repetition: RepetitionConfig,
    pub phase: PhaseConfig,

    /// Classes that get a hysteresis repetition counter, in reporting order.
    pub rep_classes: Vec<String>,

    /// Stream mode smooths and counts across frames; single-image mode only
    /// classifies each frame independently.
    pub stream_mode: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            smoothing: SmoothingConfig::default(),
            repetition: RepetitionConfig::default(),
            phase: PhaseConfig::default(),
            rep_classes: ["down", "up", "t2", "t3"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            stream_mode: true,
        }
    }
}

impl ProcessorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for classifying independent still images.
    #[must_use]
    pub fn single_image() -> Self {
        Self {
            stream_mode: false,
            ..Self::default()
        }
    }

    /// Validate every stage.
    ///
    /// # Errors
    ///
    /// Returns the first stage validation error.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        self.smoothing.validate()?;
        self.repetition.validate()?;
        self.phase.validate()?;
        if self.rep_classes.iter().any(String::is_empty) {
            return Err(PoseError::invalid_config("rep_classes must not be empty strings"));
        }
        Ok(())
    }

    /// Set the classes that get repetition counters.
    #[must_use]
    pub fn with_rep_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rep_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the classifier configuration.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the smoothing configuration.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the repetition thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, enter_threshold: f32, exit_threshold: f32) -> Self {
        self.repetition = RepetitionConfig {
            enter_threshold,
            exit_threshold,
        };
        self
    }

    /// Set the phase labels.
    #[must_use]
    pub fn with_phase_labels(mut self, labels: PhaseLabels) -> Self {
        self.phase.labels = labels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.max_distance_top_k, 30);
        assert_eq!(config.classifier.mean_distance_top_k, 10);
        assert_eq!(config.classifier.confidence_range(), 10);
        assert_eq!(config.smoothing.window_size, 10);
        assert_eq!(config.smoothing.reset_threshold_ms, 100);
        assert_eq!(config.rep_classes, vec!["down", "up", "t2", "t3"]);
        assert!(config.stream_mode);
    }

    #[test]
    fn test_validation() {
        let mut config = ProcessorConfig::default();

        config.classifier.mean_distance_top_k = 0;
        assert!(config.validate().is_err());

        config.classifier.mean_distance_top_k = 10;
        config.smoothing.alpha = 0.0;
        assert!(config.validate().is_err());

        config.smoothing.alpha = 0.2;
        config.repetition.exit_threshold = 8.0;
        assert!(config.validate().is_err());

        config.repetition.exit_threshold = 4.0;
        config.classifier.axes_weights = point(1.0, -1.0, 0.2);
        assert!(config.validate().is_err());

        config.classifier.axes_weights = point(1.0, 1.0, 0.2);
        config.phase.labels.top = String::new();
        assert!(config.validate().is_err());

        config.phase.labels.top = "t3".to_string();
        config.phase.duration_window = 0;
        assert!(config.validate().is_err());

        config.phase.duration_window = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProcessorConfig::default()
            .with_classifier(ClassifierConfig::default().with_top_k(20, 5))
            .with_smoothing(SmoothingConfig::default().with_alpha(0.5).with_window_size(4))
            .with_thresholds(3.0, 2.0)
            .with_rep_classes(["squats_down"]);

        assert_eq!(config.classifier.confidence_range(), 5);
        assert_eq!(config.smoothing.window_size, 4);
        assert_eq!(config.repetition.enter_threshold, 3.0);
        assert_eq!(config.rep_classes, vec!["squats_down"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_image_preset() {
        let config = ProcessorConfig::single_image();
        assert!(!config.stream_mode);
        assert!(config.validate().is_ok());
    }
}
