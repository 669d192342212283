//! Four-phase exercise state machine.
//!
//! A repetition is the cycle `DOWN -> UP -> T1 -> T2 -> DOWN`, driven by the
//! best class of each smoothed frame. Every phase has an entry label (the
//! label that brought the machine there) and a target label (the label that
//! moves it on):
//!
//! | Phase | Entry label | Target label | Next |
//! |-------|-------------|--------------|------|
//! | `Down` | `down` | `up` | `Up` |
//! | `Up` | `up` | `t3` | `T1` |
//! | `T1` | `t3` | `t2` | `T2` |
//! | `T2` | `t2` | `down` | `Down` (one repetition) |
//!
//! The entry label holds the phase. Any other label abandons the cycle and
//! resets to `Down`. `Down` has no cycle to abandon and ignores everything but
//! its target.
//!
//! Labels are configurable through [`PhaseLabels`].

use std::collections::VecDeque;

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{PhaseConfig, PhaseLabels};
use crate::error::Result;

/// Phase of the exercise cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExercisePhase {
    #[default]
    Down,
    Up,
    T1,
    T2,
}

impl ExercisePhase {
    /// Label that holds this phase.
    #[must_use]
    pub fn entry_label(self, labels: &PhaseLabels) -> &str {
        match self {
            Self::Down => &labels.down,
            Self::Up => &labels.up,
            Self::T1 => &labels.top,
            Self::T2 => &labels.hold,
        }
    }

    /// Label that advances out of this phase.
    #[must_use]
    pub fn target_label(self, labels: &PhaseLabels) -> &str {
        self.next().entry_label(labels)
    }

    /// Phase reached by observing the target label.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::T1,
            Self::T1 => Self::T2,
            Self::T2 => Self::Down,
        }
    }
}

/// Side effect of a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhaseEffect {
    /// Stay in the current phase.
    Hold,
    /// Move to the next phase within the cycle.
    Advance,
    /// Close the cycle, counting one repetition.
    CompleteRep,
    /// Abandon the cycle and return to `Down`.
    Reset,
}

/// Result of looking up `(phase, label)` in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: ExercisePhase,
    pub effect: PhaseEffect,
}

/// Transition table lookup.
#[must_use]
pub fn transition(phase: ExercisePhase, label: &str, labels: &PhaseLabels) -> Transition {
    let (next, effect) = if label == phase.target_label(labels) {
        match phase {
            ExercisePhase::T2 => (ExercisePhase::Down, PhaseEffect::CompleteRep),
            _ => (phase.next(), PhaseEffect::Advance),
        }
    } else if label == phase.entry_label(labels) || phase == ExercisePhase::Down {
        (phase, PhaseEffect::Hold)
    } else {
        (ExercisePhase::Down, PhaseEffect::Reset)
    };
    Transition { next, effect }
}

/// Phase machine state for one session: current phase, repetitions,
/// per-phase durations and a rolling quality score.
///
/// Durations are measured between consecutive advancing transitions. The
/// `Down -> Up` transition of each cycle starts the clock, so every
/// completed repetition contributes one duration per phase from `Up` to `T2`.
/// Durations of an abandoned cycle are discarded, and only the last
/// `duration_window` durations are kept.
///
/// Quality is the mean of the last `quality_window` normalized confidences
/// sampled at advancing transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    phase: ExercisePhase,
    rep_count: u32,
    last_transition_s: Option<f64>,
    durations: VecDeque<f64>,
    duration_window: usize,
    cycle_durations: usize,
    quality_samples: VecDeque<f32>,
    quality_window: usize,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::from_valid_config(&PhaseConfig::default())
    }
}

impl PhaseState {
    /// Fresh state in `Down` with the default quality window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state from a validated phase configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::InvalidConfig`] if `config` is invalid.
    pub fn from_config(config: &PhaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub(crate) fn from_valid_config(config: &PhaseConfig) -> Self {
        Self {
            phase: ExercisePhase::Down,
            rep_count: 0,
            last_transition_s: None,
            durations: VecDeque::new(),
            duration_window: config.duration_window,
            cycle_durations: 0,
            quality_samples: VecDeque::new(),
            quality_window: config.quality_window,
        }
    }

    /// Apply one observed label.
    ///
    /// `confidence` is the label's smoothed confidence normalized to `[0, 1]`
    /// and `time_s` the frame time in seconds on a monotonic clock.
    pub fn step(
        &mut self,
        label: &str,
        confidence: f32,
        time_s: f64,
        labels: &PhaseLabels,
    ) -> Transition {
        let t = transition(self.phase, label, labels);

        match t.effect {
            PhaseEffect::Hold => {}
            PhaseEffect::Advance => {
                if self.phase == ExercisePhase::Down {
                    self.cycle_durations = 0;
                } else {
                    self.record_duration(time_s);
                }
                self.last_transition_s = Some(time_s);
                self.sample_quality(confidence);
            }
            PhaseEffect::CompleteRep => {
                self.record_duration(time_s);
                self.last_transition_s = None;
                self.cycle_durations = 0;
                self.rep_count += 1;
                self.sample_quality(confidence);
                debug!("phase cycle complete, {} repetitions", self.rep_count);
            }
            PhaseEffect::Reset => {
                let abandoned = self.cycle_durations.min(self.durations.len());
                self.durations.truncate(self.durations.len() - abandoned);
                self.cycle_durations = 0;
                self.last_transition_s = None;
                debug!("phase cycle abandoned in {:?} on '{label}'", self.phase);
            }
        }

        if t.next != self.phase {
            debug!("phase {:?} -> {:?}", self.phase, t.next);
        }
        self.phase = t.next;
        t
    }

    fn record_duration(&mut self, time_s: f64) {
        if let Some(start) = self.last_transition_s {
            if self.durations.len() == self.duration_window {
                self.durations.pop_front();
            }
            self.durations.push_back((time_s - start).max(0.0));
            self.cycle_durations += 1;
        }
    }

    fn sample_quality(&mut self, confidence: f32) {
        if self.quality_samples.len() == self.quality_window {
            self.quality_samples.pop_front();
        }
        self.quality_samples.push_back(confidence);
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ExercisePhase {
        self.phase
    }

    /// Completed cycles.
    #[must_use]
    pub const fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Most recent phase durations in seconds, oldest first.
    #[must_use]
    pub fn durations(&self) -> &VecDeque<f64> {
        &self.durations
    }

    /// Rolling quality score in `[0, 1]`, 0 before any sample.
    #[must_use]
    pub fn quality(&self) -> f32 {
        if self.quality_samples.is_empty() {
            return 0.0;
        }
        self.quality_samples.iter().sum::<f32>() / self.quality_samples.len() as f32
    }
}
