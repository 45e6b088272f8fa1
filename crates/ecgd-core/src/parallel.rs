//! Parallel Processing Module
//!
//! Batch R-peak detection over many records using Rayon.
//! Enable with the `parallel` feature flag.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! ecgd-core = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! Detectors keep no state between calls, so each record (or each
//! algorithm) runs on its own worker with no sharing beyond `&Detectors`.
//! A single short record is usually faster sequentially.

use rayon::prelude::*;

use crate::detectors::{DetectorKind, Detectors};
use crate::types::{DetectorResult, RPeakList};

/// Parallel batch detector for processing many records
pub struct ParallelDetector {
    detectors: Detectors,
}

impl ParallelDetector {
    pub fn new(detectors: Detectors) -> Self {
        Self { detectors }
    }

    pub fn detectors(&self) -> &Detectors {
        &self.detectors
    }

    /// Run one algorithm over every record.
    ///
    /// Results are in record order.
    pub fn detect_batch(&self, kind: DetectorKind, records: &[&[f64]]) -> Vec<DetectorResult<RPeakList>> {
        detect_batch(&self.detectors, kind, records)
    }

    /// Run all seven algorithms over one record, in [`DetectorKind::ALL`] order.
    pub fn detect_all(&self, signal: &[f64]) -> Vec<(DetectorKind, DetectorResult<RPeakList>)> {
        detect_all(&self.detectors, signal)
    }

    /// Every algorithm over every record: `result[record][kind]`.
    pub fn detect_matrix(&self, records: &[&[f64]]) -> Vec<Vec<DetectorResult<RPeakList>>> {
        records
            .par_iter()
            .map(|record| {
                DetectorKind::ALL
                    .iter()
                    .map(|&kind| self.detectors.detect(kind, record))
                    .collect()
            })
            .collect()
    }
}

/// Run `kind` over every record, one record per worker.
pub fn detect_batch(detectors: &Detectors, kind: DetectorKind, records: &[&[f64]]) -> Vec<DetectorResult<RPeakList>> {
    records
        .par_iter()
        .map(|record| detectors.detect(kind, record))
        .collect()
}

/// Run every algorithm over `signal`, one algorithm per worker.
pub fn detect_all(detectors: &Detectors, signal: &[f64]) -> Vec<(DetectorKind, DetectorResult<RPeakList>)> {
    DetectorKind::ALL
        .par_iter()
        .map(|&kind| (kind, detectors.detect(kind, signal)))
        .collect()
}
