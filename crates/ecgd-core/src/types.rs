//! Core types for ECG R-peak detection
//!
//! Every detector consumes a borrowed slice of real-valued samples plus the
//! sampling rate it was recorded at, and produces an ordered list of sample
//! indices ("R-peaks").
//!
//! ```text
//!   raw ECG ──► filters ──► derived signal ──► picker ──► RPeakList
//!   &[Sample]               Vec<Sample>                   Vec<PeakIndex>
//! ```
//!
//! Time constants are converted to sample counts with truncation, so
//! `samples(0.12, 250.0) == 30` and `samples(0.028, 360.0) == 10`.

/// A single real-valued ECG sample (nominally volts).
pub type Sample = f64;

/// A sample index into a signal.
pub type PeakIndex = usize;

/// The output of every detector: strictly increasing, unique indices, each
/// smaller than the input length.
pub type RPeakList = Vec<PeakIndex>;

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Errors that can occur while configuring or running a detector
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectorError {
    #[error("{detector} has no QRS template for a sampling rate of {fs} Hz (supported: 250, 360)")]
    UnsupportedSamplingRate { detector: &'static str, fs: f64 },

    #[error("QRS template recorded at {template_fs} Hz cannot be applied to a {fs} Hz signal")]
    TemplateRateMismatch { template_fs: f64, fs: f64 },

    #[error("No padding below {max_padding} samples makes a length of {len} divisible by 2^{level}")]
    PaddingNotFound { len: usize, level: u32, max_padding: usize },

    #[error("SWT level {level} is outside 1..={max}")]
    InvalidSwtLevel { level: u32, max: u32 },

    #[error("Invalid sampling rate: {0} Hz. Must be positive and finite")]
    InvalidSamplingRate(f64),

    #[error("Invalid filter band {low_hz}..{high_hz} Hz at a sampling rate of {fs} Hz")]
    InvalidFilterBand { low_hz: f64, high_hz: f64, fs: f64 },

    #[error("Template parse failed at line {line}: {message}")]
    TemplateParse { line: usize, message: String },

    #[error("Unknown detector: {0}")]
    UnknownDetector(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convert a duration in seconds to a whole number of samples, truncating.
#[inline]
pub fn samples(seconds: f64, fs: f64) -> usize {
    let n = seconds * fs;
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Check that a sampling rate can drive a detector.
pub fn validate_sampling_rate(fs: f64) -> DetectorResult<f64> {
    if fs.is_finite() && fs > 0.0 {
        Ok(fs)
    } else {
        Err(DetectorError::InvalidSamplingRate(fs))
    }
}
