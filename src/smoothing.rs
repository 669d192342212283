//! Exponential moving average over recent classification results.
//!
//! The window holds at most `window_size` results, most recent first. The
//! i-th most recent entry is weighted by `(1 - alpha)^i`, which is a true EMA
//! only for evenly spaced frames. Uneven spacing is handled solely by a hard
//! reset: a gap longer than `reset_threshold_ms` clears the window.

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;

use crate::config::SmoothingConfig;
use crate::error::Result;
use crate::result::ClassificationResult;

/// Windowed EMA smoother for one tracking session.
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    config: SmoothingConfig,
    window: VecDeque<ClassificationResult>,
    last_input_ms: Option<u64>,
    origin: Instant,
}

impl Default for EmaSmoother {
    fn default() -> Self {
        Self::from_valid_config(SmoothingConfig::default())
    }
}

impl EmaSmoother {
    /// Create a smoother with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a smoother with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoseError::InvalidConfig`] if `config` is invalid.
    pub fn with_config(config: SmoothingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub(crate) fn from_valid_config(config: SmoothingConfig) -> Self {
        Self {
            window: VecDeque::new(),
            config,
            last_input_ms: None,
            origin: Instant::now(),
        }
    }

    /// Smooth `result` using wall-clock time since this smoother was created.
    pub fn smoothed_result(&mut self, result: &ClassificationResult) -> ClassificationResult {
        let now_ms = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.smoothed_result_at(result, now_ms)
    }

    /// Smooth `result` received at `timestamp_ms`.
    ///
    /// Timestamps are milliseconds on any monotonic clock shared by every
    /// call on this smoother. A timestamp earlier than the previous one is
    /// treated as no gap.
    pub fn smoothed_result_at(
        &mut self,
        result: &ClassificationResult,
        timestamp_ms: u64,
    ) -> ClassificationResult {
        if let Some(last) = self.last_input_ms {
            let gap = timestamp_ms.saturating_sub(last);
            if gap > self.config.reset_threshold_ms && !self.window.is_empty() {
                debug!("smoothing window reset after {gap} ms gap");
                self.window.clear();
            }
        }
        self.last_input_ms = Some(timestamp_ms);

        if self.window.len() == self.config.window_size {
            self.window.pop_back();
        }
        self.window.push_front(result.clone());

        self.average()
    }

    fn average(&self) -> ClassificationResult {
        // Newest entry first, so ties keep the latest frame's ranking.
        let mut classes: Vec<&str> = Vec::new();
        for class in self.window.iter().flat_map(|entry| entry.all_classes()) {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }

        let decay = 1.0 - self.config.alpha;
        let mut smoothed = ClassificationResult::new();
        for class in classes {
            let mut factor = 1.0;
            let mut top_sum = 0.0;
            let mut bottom_sum = 0.0;
            for entry in &self.window {
                top_sum += factor * entry.class_confidence(class);
                bottom_sum += factor;
                factor *= decay;
            }
            smoothed.put_class_confidence(class, top_sum / bottom_sum);
        }
        smoothed
    }

    /// Number of results currently in the window.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Drop all buffered results.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_input_ms = None;
    }

    /// Smoother configuration.
    #[must_use]
    pub const fn config(&self) -> &SmoothingConfig {
        &self.config
    }
}
