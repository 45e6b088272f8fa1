//! Stationary-wavelet QRS detection (Kalidas and Tamil).
//!
//! ```text
//! ECG → pad to 2^level → SWT detail (db3, level 3) → square → Band-pass 0.01–10 Hz → picker
//! ```
//!
//! Peaks that land in the padding are dropped.

use crate::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
use crate::primitives::{bandpass, square};
use crate::types::{DetectorResult, RPeakList};
use crate::wavelet::{pad_to_level, SwtAnalyzer, WaveletType};

use super::RPeakDetector;

/// Wavelet settings for [`Swt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwtSettings {
    pub wavelet: WaveletType,
    pub level: u32,
    /// Largest number of padding samples tried.
    pub max_padding: usize,
}

impl Default for SwtSettings {
    fn default() -> Self {
        Self {
            wavelet: WaveletType::Db3,
            level: 3,
            max_padding: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Swt {
    fs: f64,
    settings: SwtSettings,
}

impl Swt {
    pub fn new(fs: f64) -> Self {
        Self::with_settings(fs, SwtSettings::default())
    }

    pub fn with_settings(fs: f64, settings: SwtSettings) -> Self {
        Self { fs, settings }
    }

    pub fn settings(&self) -> &SwtSettings {
        &self.settings
    }

    /// Band-limited detail energy over the padded signal.
    pub fn detail_energy(&self, signal: &[f64]) -> DetectorResult<Vec<f64>> {
        let padded = pad_to_level(signal, self.settings.level, self.settings.max_padding)?;
        let detail = SwtAnalyzer::new(self.settings.wavelet, self.settings.level).detail(&padded);
        bandpass(&square(&detail), self.fs, 0.01, 10.0, 3)
    }
}

impl RPeakDetector for Swt {
    fn name(&self) -> &'static str {
        "Wavelet Transform"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let energy = self.detail_energy(signal)?;
        let mut peaks = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), self.fs).detect(&energy);
        peaks.retain(|&p| p < signal.len());
        Ok(peaks)
    }
}
