//! Immutable collection of reference samples.
//!
//! Loading is forgiving: lines that fail to parse are logged and skipped, and
//! a file with no usable lines yields an empty store. Only a store whose
//! samples disagree on embedding length is rejected, since every later
//! distance computation would be meaningless.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

use crate::embedding::EMBEDDING_LEN;
use crate::error::{PoseError, Result};
use crate::sample::{PoseSample, DEFAULT_SEPARATOR};

/// Read-only set of labeled reference samples.
#[derive(Debug, Clone, Default)]
pub struct PoseSampleStore {
    samples: Vec<PoseSample>,
}

impl PoseSampleStore {
    /// Build a store from already constructed samples.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InconsistentStore`] if any sample's embedding
    /// length differs from [`EMBEDDING_LEN`].
    pub fn from_samples(samples: Vec<PoseSample>) -> Result<Self> {
        if let Some(bad) = samples
            .iter()
            .find(|s| s.embedding().len() != EMBEDDING_LEN)
        {
            return Err(PoseError::InconsistentStore {
                sample: bad.name().to_string(),
                expected: EMBEDDING_LEN,
                actual: bad.embedding().len(),
            });
        }
        Ok(Self { samples })
    }

    /// Load samples from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::Io`] if reading fails. Malformed lines are
    /// skipped; invalid UTF-8 is replaced before parsing, so a corrupt line
    /// only loses that line.
    pub fn from_reader<R: BufRead>(mut reader: R, separator: char) -> Result<Self> {
        let mut samples = Vec::new();
        let mut skipped = 0usize;
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            match PoseSample::from_csv_line(line, separator) {
                Ok(sample) => samples.push(sample),
                Err(err) if err.is_recoverable() => {
                    skipped += 1;
                    warn!("skipping pose sample at line {line_no}: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        let store = Self::from_samples(samples)?;
        info!(
            "loaded {} pose samples across {} classes ({} lines skipped)",
            store.len(),
            store.class_names().len(),
            skipped
        );
        Ok(store)
    }

    /// Load samples from in-memory text using the default separator.
    ///
    /// # Errors
    ///
    /// See [`PoseSampleStore::from_reader`].
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), DEFAULT_SEPARATOR)
    }

    /// Load samples from a file using the default separator.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::Io`] if the file cannot be opened or read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), DEFAULT_SEPARATOR)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the store holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in load order.
    #[must_use]
    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    /// Iterate samples in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, PoseSample> {
        self.samples.iter()
    }

    /// Distinct class names in first-seen order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for sample in &self.samples {
            if !names.contains(&sample.class_name()) {
                names.push(sample.class_name());
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a PoseSampleStore {
    type Item = &'a PoseSample;
    type IntoIter = std::slice::Iter<'a, PoseSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
