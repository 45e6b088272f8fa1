//! Matched-filter QRS detection.
//!
//! ```text
//! ECG → Band-pass 0.1–48 Hz → FIR(reversed template) → square → blank len(template) → picker
//! ```
//!
//! The template must have been recorded at the signal's sampling rate. By
//! default the bundled template for the rate is used; rates without one are
//! rejected rather than correlated against a mismatched shape.

use crate::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
use crate::filters::{FirFilter, RealFilter};
use crate::primitives::{bandpass, square, zero_leading};
use crate::template::QrsTemplate;
use crate::types::{DetectorResult, RPeakList};

use super::RPeakDetector;

#[derive(Debug, Clone)]
pub struct MatchedFilter {
    fs: f64,
    template: Option<QrsTemplate>,
}

impl MatchedFilter {
    /// Use the bundled template for `fs`, looked up when detecting.
    pub fn new(fs: f64) -> Self {
        Self { fs, template: None }
    }

    /// Use a caller-supplied template.
    pub fn with_template(fs: f64, template: QrsTemplate) -> Self {
        Self {
            fs,
            template: Some(template),
        }
    }

    /// The template that will be applied, or why none can be.
    pub fn template(&self) -> DetectorResult<QrsTemplate> {
        match &self.template {
            Some(t) => {
                t.check_rate(self.fs)?;
                Ok(t.clone())
            }
            None => QrsTemplate::for_sampling_rate(self.fs),
        }
    }

    /// Squared template correlation, same length as the input.
    pub fn correlation(&self, signal: &[f64]) -> DetectorResult<Vec<f64>> {
        let template = self.template()?;
        let filtered = bandpass(signal, self.fs, 0.1, 48.0, 4)?;
        let correlated = FirFilter::matched(template.coefficients()).process_real_block(&filtered);
        let mut energy = square(&correlated);
        zero_leading(&mut energy, template.len());
        Ok(energy)
    }
}

impl RPeakDetector for MatchedFilter {
    fn name(&self) -> &'static str {
        "Matched Filter"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let energy = self.correlation(signal)?;
        Ok(AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), self.fs).detect(&energy))
    }
}
