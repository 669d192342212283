//! Per-class confidence map.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mapping from class name to confidence.
///
/// Straight out of the classifier a confidence is a vote count in
/// `[0, confidence_range]`; after smoothing it is a weighted average in the
/// same range. A class that is absent has confidence 0.
///
/// Classes keep the order in which they were first added. The classifier
/// votes nearest neighbor first, so that order ranks classes by proximity.
/// Equality ignores order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassificationResult {
    class_confidences: Vec<(String, f32)>,
}

impl PartialEq for ClassificationResult {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, confidence)| other.get(name) == Some(confidence))
    }
}

impl ClassificationResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, class_name: &str) -> Option<f32> {
        self.class_confidences
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|&(_, confidence)| confidence)
    }

    fn get_mut(&mut self, class_name: &str) -> Option<&mut f32> {
        self.class_confidences
            .iter_mut()
            .find(|(name, _)| name == class_name)
            .map(|(_, confidence)| confidence)
    }

    /// All class names present, in first-added order.
    pub fn all_classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.class_confidences.iter().map(|(name, _)| name.as_str())
    }

    /// Confidence for `class_name`, 0 if absent.
    #[must_use]
    pub fn class_confidence(&self, class_name: &str) -> f32 {
        self.get(class_name).unwrap_or(0.0)
    }

    /// Class with the highest confidence, `None` for an empty result.
    ///
    /// Equal confidences resolve to the class added first.
    #[must_use]
    pub fn max_confidence_class(&self) -> Option<&str> {
        let mut best: Option<&(String, f32)> = None;
        for entry in &self.class_confidences {
            if best.map_or(true, |b| entry.1.total_cmp(&b.1).is_gt()) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.as_str())
    }

    /// Add one vote for `class_name`.
    pub fn increment_class_confidence(&mut self, class_name: &str) {
        match self.get_mut(class_name) {
            Some(confidence) => *confidence += 1.0,
            None => self.class_confidences.push((class_name.to_string(), 1.0)),
        }
    }

    /// Overwrite the confidence for `class_name`, keeping its position.
    pub fn put_class_confidence(&mut self, class_name: impl Into<String>, confidence: f32) {
        let class_name = class_name.into();
        match self.get_mut(&class_name) {
            Some(existing) => *existing = confidence,
            None => self.class_confidences.push((class_name, confidence)),
        }
    }

    /// Number of classes present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.class_confidences.len()
    }

    /// Whether no class is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class_confidences.is_empty()
    }

    /// Iterate `(class, confidence)` pairs in first-added order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.class_confidences
            .iter()
            .map(|(name, confidence)| (name.as_str(), *confidence))
    }
}
