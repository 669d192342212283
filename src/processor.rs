//! Per-frame classification pipeline.
//!
//! [`PoseClassifierProcessor`] holds only read-only parts (the classifier
//! and its configuration) and can be shared across threads. Everything that
//! changes from frame to frame lives in a [`SessionState`] that the caller
//! passes in and gets back from [`PoseClassifierProcessor::process_frame`], so
//! independent sessions never share mutable state.
//!
//! In stream mode each frame is classified, smoothed, fed to every repetition
//! counter and to the phase machine. In single-image mode frames are only
//! classified.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pose_classification::{PoseClassifierProcessor, PoseSampleStore, ProcessorConfig};
//!
//! let store = Arc::new(PoseSampleStore::default());
//! let processor = PoseClassifierProcessor::new(store, ProcessorConfig::default())?;
//!
//! let session = processor.new_session();
//! let (_session, report) = processor.process_frame(session, &[], Duration::ZERO);
//! assert!(report.lines().is_empty());
//! # Ok::<(), pose_classification::PoseError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classifier::PoseClassifier;
use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::math::vector::Point3D;
use crate::phase::{ExercisePhase, PhaseState};
use crate::repetition::RepetitionCounter;
use crate::result::ClassificationResult;
use crate::smoothing::EmaSmoother;
use crate::store::PoseSampleStore;

/// Mutable per-session state threaded through every frame.
#[derive(Debug, Clone)]
pub struct SessionState {
    smoother: EmaSmoother,
    rep_counters: Vec<RepetitionCounter>,
    phase: PhaseState,
    last_rep_message: Option<String>,
}

impl SessionState {
    /// Per-class repetition counters in configured order.
    #[must_use]
    pub fn rep_counters(&self) -> &[RepetitionCounter] {
        &self.rep_counters
    }

    /// Phase machine state.
    #[must_use]
    pub const fn phase(&self) -> &PhaseState {
        &self.phase
    }

    /// Most recent repetition message, kept until another counter increments.
    #[must_use]
    pub fn last_rep_message(&self) -> Option<&str> {
        self.last_rep_message.as_deref()
    }
}

/// Best class of a frame with its normalized confidence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BestClass {
    pub class_name: String,
    /// Confidence divided by the classifier's confidence range.
    pub confidence: f32,
}

/// Phase machine snapshot after a frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseSummary {
    pub phase: ExercisePhase,
    pub rep_count: u32,
    pub quality: f32,
    pub durations: Vec<f64>,
}

/// Output of one processed frame.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameReport {
    /// Latest repetition message (stream mode only).
    pub rep_message: Option<String>,
    /// Best class, present when the frame had a pose.
    pub best_class: Option<BestClass>,
    /// Phase snapshot, present in stream mode when the frame had a pose.
    pub phase: Option<PhaseSummary>,
    /// Classification the report is based on (smoothed in stream mode).
    pub classification: ClassificationResult,
}

impl FrameReport {
    /// Human-readable overlay lines.
    ///
    /// ```text
    /// squats_down : 5 reps
    /// up : 0.80 confidence
    /// phase reps : 2
    /// quality : 0.76
    /// phase 1 duration: 0.85 s
    /// ```
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(message) = &self.rep_message {
            lines.push(message.clone());
        }

        if let Some(best) = &self.best_class {
            lines.push(format!("{} : {:.2} confidence", best.class_name, best.confidence));
        }

        if let Some(phase) = &self.phase {
            lines.push(format!("phase reps : {}", phase.rep_count));
            lines.push(format!("quality : {:.2}", phase.quality));
            lines.extend(
                phase
                    .durations
                    .iter()
                    .enumerate()
                    .map(|(i, d)| format!("phase {} duration: {d:.2} s", i + 1)),
            );
        }

        lines
    }
}

/// Shared, read-only frame processor.
#[derive(Debug, Clone)]
pub struct PoseClassifierProcessor {
    classifier: PoseClassifier,
    config: ProcessorConfig,
}

impl PoseClassifierProcessor {
    /// Build a processor over an already loaded store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::InvalidConfig`] if `config` is invalid.
    pub fn new(store: Arc<PoseSampleStore>, config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let classifier = PoseClassifier::with_config(store, config.classifier.clone())?;
        info!(
            "pose processor ready: {} samples, {} mode",
            classifier.store().len(),
            if config.stream_mode { "stream" } else { "single image" }
        );
        Ok(Self { classifier, config })
    }

    /// Load the sample file at `path` and build a processor over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or `config` is invalid.
    pub fn from_path(path: impl AsRef<Path>, config: ProcessorConfig) -> Result<Self> {
        let store = PoseSampleStore::from_path(path)?;
        Self::new(Arc::new(store), config)
    }

    /// Underlying classifier.
    #[must_use]
    pub const fn classifier(&self) -> &PoseClassifier {
        &self.classifier
    }

    /// Processor configuration.
    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Fresh state for a new tracking session.
    #[must_use]
    pub fn new_session(&self) -> SessionState {
        let rep_counters = if self.config.stream_mode {
            self.config
                .rep_classes
                .iter()
                .map(|class| RepetitionCounter::from_valid_config(class.as_str(), self.config.repetition))
                .collect()
        } else {
            Vec::new()
        };

        SessionState {
            smoother: EmaSmoother::from_valid_config(self.config.smoothing.clone()),
            rep_counters,
            phase: PhaseState::from_valid_config(&self.config.phase),
            last_rep_message: None,
        }
    }

    /// Process one frame.
    ///
    /// `landmarks` is empty when no pose was detected; such frames still feed
    /// the smoother in stream mode. `timestamp` is the frame time on a
    /// monotonic clock shared by every frame of the session.
    pub fn process_frame(
        &self,
        mut session: SessionState,
        landmarks: &[Point3D],
        timestamp: Duration,
    ) -> (SessionState, FrameReport) {
        let mut classification = self.classifier.classify(landmarks);
        let mut report = FrameReport::default();

        if self.config.stream_mode {
            let timestamp_ms = u64::try_from(timestamp.as_millis()).unwrap_or(u64::MAX);
            classification = session
                .smoother
                .smoothed_result_at(&classification, timestamp_ms);
            self.update_rep_counters(&mut session, &classification);
            report.rep_message.clone_from(&session.last_rep_message);
        }

        if !landmarks.is_empty() {
            if let Some(class_name) = classification.max_confidence_class() {
                let confidence = self.normalized(classification.class_confidence(class_name));
                report.best_class = Some(BestClass {
                    class_name: class_name.to_string(),
                    confidence,
                });

                if self.config.stream_mode {
                    session.phase.step(
                        class_name,
                        confidence,
                        timestamp.as_secs_f64(),
                        &self.config.phase.labels,
                    );
                    report.phase = Some(PhaseSummary {
                        phase: session.phase.phase(),
                        rep_count: session.phase.rep_count(),
                        quality: session.phase.quality(),
                        durations: session.phase.durations().iter().copied().collect(),
                    });
                }
            }
        }

        report.classification = classification;
        (session, report)
    }

    /// Update every counter; the first one (in configured order) that
    /// incremented sets the session's repetition message.
    fn update_rep_counters(&self, session: &mut SessionState, classification: &ClassificationResult) {
        let mut message = None;
        for counter in &mut session.rep_counters {
            let before = counter.num_repeats();
            let after = counter.add_classification_result(classification);
            if after > before && message.is_none() {
                message = Some(format!("{} : {} reps", counter.class_name(), after));
            }
        }
        if message.is_some() {
            session.last_rep_message = message;
        }
    }

    fn normalized(&self, confidence: f32) -> f32 {
        confidence / self.classifier.confidence_range() as f32
    }
}
