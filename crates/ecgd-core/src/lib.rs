//! # ECG R-Peak Detection Library
//!
//! This crate provides seven classic QRS (R-peak) detectors for single-lead
//! ECG records, together with the filter and peak-picking machinery they
//! share.
//!
//! ## Overview
//!
//! Each detector turns the raw ECG into a derived signal in which QRS
//! complexes stand out, then picks one index per heartbeat from it:
//!
//! - **Filtering**: causal Butterworth band-pass and band-stop, boxcar and
//!   matched FIR filters, moving-window integration
//! - **Wavelets**: undecimated (stationary) wavelet transform, Haar and db3
//! - **Peak picking**: adaptive signal/noise thresholds with missed-beat
//!   search-back, and the steep-slope envelope used by Christov and Engzee
//! - **Templates**: QRS templates bundled for 250 Hz and 360 Hz
//!
//! ## Signal Flow
//!
//! ```text
//! ECG → Band-pass → Slope / Energy / Correlation → Integrate → Threshold → R-peak indices
//! ```
//!
//! Indices refer to positions in the input ECG. Pan-Tompkins, Hamilton and
//! the two-average detector move each detection back onto the ECG maximum
//! ([`peaks::align_to_signal`]); the matched-filter and wavelet detectors
//! report the derived-signal position, a few samples after the R wave.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ecgd_core::{DetectorKind, Detectors};
//!
//! let detectors = Detectors::new(250.0)?;
//! let ecg: Vec<f64> = load_record();
//!
//! let peaks = detectors.pan_tompkins_detector(&ecg)?;
//! let same = detectors.detect(DetectorKind::PanTompkins, &ecg)?;
//! assert_eq!(peaks, same);
//! # fn load_record() -> Vec<f64> { vec![0.0; 2500] }
//! # Ok::<(), ecgd_core::DetectorError>(())
//! ```

pub mod adaptive;
pub mod config;
pub mod detectors;
pub mod envelope;
pub mod filters;
pub mod observe;
pub mod peaks;
pub mod primitives;
pub mod rolling;
pub mod template;
pub mod types;
pub mod wavelet;

// Parallel processing (requires `parallel` feature)
#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod test_signals;

// Re-export main types
pub use adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
pub use config::{ConfigError, EcgdConfig};
pub use detectors::{DetectorKind, Detectors, RPeakDetector, SwtSettings};
pub use template::QrsTemplate;
pub use types::{DetectorError, DetectorResult, PeakIndex, RPeakList, Sample};
pub use wavelet::WaveletType;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::EcgdConfig;
    pub use crate::detectors::{DetectorKind, Detectors, RPeakDetector};
    pub use crate::observe::{init_logging, LogConfig};
    pub use crate::template::QrsTemplate;
    pub use crate::types::{DetectorError, DetectorResult, RPeakList};
}
