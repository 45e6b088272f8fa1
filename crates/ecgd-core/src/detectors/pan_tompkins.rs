//! Pan-Tompkins QRS detection.
//!
//! ```text
//! ECG → Band-pass 5–15 Hz → diff → square → MWA (120 ms) → blank 200 ms → picker → align
//! ```
//!
//! The picker is the exponential adaptive dual-threshold configuration of
//! [`AdaptiveThresholdPicker`], so missed beats are recovered once eight RR
//! intervals are known. The integration window delays every detection, so
//! each one is moved back to the ECG maximum in the preceding 150 ms.

use crate::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
use crate::peaks::align_to_signal;
use crate::primitives::{bandpass, diff, moving_average, square, zero_leading};
use crate::types::{samples, DetectorResult, RPeakList};

use super::RPeakDetector;

/// Pan-Tompkins detector for one sampling rate.
#[derive(Debug, Clone)]
pub struct PanTompkins {
    fs: f64,
}

impl PanTompkins {
    pub const LOW_HZ: f64 = 5.0;
    pub const HIGH_HZ: f64 = 15.0;

    pub fn new(fs: f64) -> Self {
        Self { fs }
    }

    /// Integrated squared slope, one sample shorter than the input.
    pub fn integrated(&self, signal: &[f64]) -> DetectorResult<Vec<f64>> {
        let filtered = bandpass(signal, self.fs, Self::LOW_HZ, Self::HIGH_HZ, 1)?;
        let slope = diff(&filtered);
        let mut mwa = moving_average(&square(&slope), samples(0.12, self.fs));
        zero_leading(&mut mwa, samples(0.2, self.fs));
        Ok(mwa)
    }
}

impl RPeakDetector for PanTompkins {
    fn name(&self) -> &'static str {
        "Pan Tompkins"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let mwa = self.integrated(signal)?;
        let peaks = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), self.fs).detect(&mwa);
        Ok(align_to_signal(&peaks, signal, samples(0.15, self.fs)))
    }
}
