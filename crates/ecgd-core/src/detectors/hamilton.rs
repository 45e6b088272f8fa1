//! Hamilton QRS detection.
//!
//! ```text
//! ECG → Band-pass 8–16 Hz → |diff| → boxcar (80 ms) → blank 2 × taps → picker → align
//! ```
//!
//! The picker uses windowed-mean signal and noise levels with a 0.45
//! threshold weight (see [`AdaptiveConfig::hamilton`]). Detections are moved
//! back to the ECG maximum in the preceding 100 ms.

use crate::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
use crate::peaks::align_to_signal;
use crate::primitives::{abs_value, bandpass, boxcar, diff, zero_leading};
use crate::types::{samples, DetectorResult, RPeakList};

use super::RPeakDetector;

#[derive(Debug, Clone)]
pub struct Hamilton {
    fs: f64,
}

impl Hamilton {
    pub fn new(fs: f64) -> Self {
        Self { fs }
    }

    /// Smoothed absolute slope, one sample shorter than the input.
    pub fn smoothed_slope(&self, signal: &[f64]) -> DetectorResult<Vec<f64>> {
        let filtered = bandpass(signal, self.fs, 8.0, 16.0, 1)?;
        let slope = abs_value(&diff(&filtered));
        let taps = samples(0.08, self.fs);
        let mut ma = boxcar(&slope, taps);
        zero_leading(&mut ma, 2 * taps);
        Ok(ma)
    }
}

impl RPeakDetector for Hamilton {
    fn name(&self) -> &'static str {
        "Hamilton"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let ma = self.smoothed_slope(signal)?;
        let peaks = AdaptiveThresholdPicker::new(AdaptiveConfig::hamilton(), self.fs).detect(&ma);
        Ok(align_to_signal(&peaks, signal, samples(0.1, self.fs)))
    }
}
