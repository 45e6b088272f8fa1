//! R-peak detectors
//!
//! Seven algorithms behind one [`RPeakDetector`] trait, and the [`Detectors`]
//! facade that binds them to a sampling rate:
//!
//! | Kind             | Derived signal                                   | Picker                 |
//! |------------------|--------------------------------------------------|------------------------|
//! | `TwoAverage`     | rectified 8–20 Hz band                           | block comparison       |
//! | `MatchedFilter`  | squared template correlation                     | adaptive (exponential) |
//! | `Swt`            | band-limited squared SWT detail                  | adaptive (exponential) |
//! | `Engzee`         | notched, differenced, smoothed                   | envelope + tail check  |
//! | `Christov`       | triple-boxcar absolute slope                     | `M + F + R` threshold  |
//! | `Hamilton`       | boxcar of absolute 8–16 Hz slope                 | adaptive (windowed)    |
//! | `PanTompkins`    | integrated squared 5–15 Hz slope                 | adaptive (exponential) |
//!
//! Every detector is a pure function of `(signal, fs)` and returns strictly
//! increasing, unique indices below `signal.len()`.
//!
//! ```
//! use ecgd_core::detectors::{DetectorKind, Detectors};
//!
//! let detectors = Detectors::new(250.0).unwrap();
//! let ecg = vec![0.0; 2500];
//! for kind in DetectorKind::ALL {
//!     assert!(detectors.detect(kind, &ecg).unwrap().is_empty());
//! }
//! ```

pub mod christov;
pub mod engzee;
pub mod hamilton;
pub mod matched_filter;
pub mod pan_tompkins;
pub mod swt;
pub mod two_average;

pub use christov::Christov;
pub use engzee::Engzee;
pub use hamilton::Hamilton;
pub use matched_filter::MatchedFilter;
pub use pan_tompkins::PanTompkins;
pub use swt::{Swt, SwtSettings};
pub use two_average::TwoAverage;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EcgdConfig;
use crate::template::QrsTemplate;
use crate::types::{samples, validate_sampling_rate, DetectorError, DetectorResult, RPeakList};

/// An R-peak detection algorithm bound to one sampling rate.
pub trait RPeakDetector: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Sampling rate in Hz.
    fn sampling_rate(&self) -> f64;

    /// Detect R-peaks in a complete record.
    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The seven detection algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    TwoAverage,
    MatchedFilter,
    Swt,
    Engzee,
    Christov,
    Hamilton,
    PanTompkins,
}

impl DetectorKind {
    /// Every kind, in menu order.
    pub const ALL: [DetectorKind; 7] = [
        DetectorKind::TwoAverage,
        DetectorKind::MatchedFilter,
        DetectorKind::Swt,
        DetectorKind::Engzee,
        DetectorKind::Christov,
        DetectorKind::Hamilton,
        DetectorKind::PanTompkins,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::TwoAverage => "Two Average",
            DetectorKind::MatchedFilter => "Matched Filter",
            DetectorKind::Swt => "Wavelet Transform",
            DetectorKind::Engzee => "Engzee",
            DetectorKind::Christov => "Christov",
            DetectorKind::Hamilton => "Hamilton",
            DetectorKind::PanTompkins => "Pan Tompkins",
        }
    }

    /// Short identifier used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            DetectorKind::TwoAverage => "two_average",
            DetectorKind::MatchedFilter => "matched_filter",
            DetectorKind::Swt => "swt",
            DetectorKind::Engzee => "engzee",
            DetectorKind::Christov => "christov",
            DetectorKind::Hamilton => "hamilton",
            DetectorKind::PanTompkins => "pan_tompkins",
        }
    }
}

impl Default for DetectorKind {
    fn default() -> Self {
        DetectorKind::PanTompkins
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DetectorKind {
    type Err = DetectorError;

    /// Accepts the key or the display name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DetectorKind::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(wanted) || k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DetectorError::UnknownDetector(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// All seven detectors for one sampling rate.
#[derive(Debug, Clone)]
pub struct Detectors {
    fs: f64,
    engzee_delay: usize,
    swt: SwtSettings,
    default_detector: DetectorKind,
}

impl Detectors {
    /// Bind the detectors to a positive, finite sampling rate.
    pub fn new(fs: f64) -> DetectorResult<Self> {
        Ok(Self {
            fs: validate_sampling_rate(fs)?,
            engzee_delay: 0,
            swt: SwtSettings::default(),
            default_detector: DetectorKind::default(),
        })
    }

    /// Build from the `detector` and `swt` sections of a configuration.
    pub fn from_config(config: &EcgdConfig) -> DetectorResult<Self> {
        config.validate()?;
        Ok(Self::new(config.detector.sampling_rate)?
            .with_engzee_delay(config.detector.engzee_delay)
            .with_swt_settings(config.swt.settings())
            .with_default_detector(config.detector.default_detector))
    }

    /// Samples added to every Engzee peak.
    pub fn with_engzee_delay(mut self, delay: usize) -> Self {
        self.engzee_delay = delay;
        self
    }

    pub fn with_swt_settings(mut self, settings: SwtSettings) -> Self {
        self.swt = settings;
        self
    }

    /// Algorithm run by [`Detectors::detect_default`].
    pub fn with_default_detector(mut self, kind: DetectorKind) -> Self {
        self.default_detector = kind;
        self
    }

    pub fn sampling_rate(&self) -> f64 {
        self.fs
    }

    pub fn engzee_delay(&self) -> usize {
        self.engzee_delay
    }

    pub fn swt_settings(&self) -> &SwtSettings {
        &self.swt
    }

    pub fn default_detector(&self) -> DetectorKind {
        self.default_detector
    }

    /// `(name, kind)` pairs in menu order.
    pub fn detector_list() -> Vec<(&'static str, DetectorKind)> {
        DetectorKind::ALL.iter().map(|&k| (k.name(), k)).collect()
    }

    /// A boxed detector for `kind`, configured like this facade.
    pub fn detector(&self, kind: DetectorKind) -> Box<dyn RPeakDetector> {
        match kind {
            DetectorKind::TwoAverage => Box::new(TwoAverage::new(self.fs)),
            DetectorKind::MatchedFilter => Box::new(MatchedFilter::new(self.fs)),
            DetectorKind::Swt => Box::new(Swt::with_settings(self.fs, self.swt)),
            DetectorKind::Engzee => Box::new(Engzee::new(self.fs).with_delay(self.engzee_delay)),
            DetectorKind::Christov => Box::new(Christov::new(self.fs)),
            DetectorKind::Hamilton => Box::new(Hamilton::new(self.fs)),
            DetectorKind::PanTompkins => Box::new(PanTompkins::new(self.fs)),
        }
    }

    /// Run the detector selected by `kind`.
    pub fn detect(&self, kind: DetectorKind, signal: &[f64]) -> DetectorResult<RPeakList> {
        run(self.detector(kind).as_ref(), signal)
    }

    /// Run the configured default detector (Pan-Tompkins unless set).
    pub fn detect_default(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(self.default_detector, signal)
    }

    pub fn two_average_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::TwoAverage, signal)
    }

    /// Fails with `UnsupportedSamplingRate` unless a template ships for this rate.
    pub fn matched_filter_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::MatchedFilter, signal)
    }

    /// Matched filter with a caller-supplied template recorded at this rate.
    pub fn matched_filter_with_template(&self, signal: &[f64], template: &QrsTemplate) -> DetectorResult<RPeakList> {
        run(&MatchedFilter::with_template(self.fs, template.clone()), signal)
    }

    pub fn swt_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::Swt, signal)
    }

    pub fn engzee_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::Engzee, signal)
    }

    pub fn christov_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::Christov, signal)
    }

    pub fn hamilton_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::Hamilton, signal)
    }

    pub fn pan_tompkins_detector(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        self.detect(DetectorKind::PanTompkins, signal)
    }
}

fn run(detector: &dyn RPeakDetector, signal: &[f64]) -> DetectorResult<RPeakList> {
    tracing::debug!(
        algorithm = detector.name(),
        samples = signal.len(),
        fs = detector.sampling_rate(),
        "detector start"
    );
    if signal.len() < samples(1.0, detector.sampling_rate()) {
        tracing::warn!(
            algorithm = detector.name(),
            samples = signal.len(),
            "record shorter than one second"
        );
    }
    let peaks = detector.detect(signal)?;
    tracing::debug!(algorithm = detector.name(), peaks = peaks.len(), "detector done");
    Ok(peaks)
}
