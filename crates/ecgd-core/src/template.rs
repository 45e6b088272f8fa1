//! QRS templates for the matched-filter detector.
//!
//! A template is a short, sampling-rate-specific QRS shape stored as plain
//! text, one coefficient per line. Templates for 250 Hz and 360 Hz ship with
//! the crate and are embedded at compile time.
//!
//! ```rust
//! use ecgd_core::template::QrsTemplate;
//!
//! let t = QrsTemplate::for_sampling_rate(250.0).unwrap();
//! assert_eq!(t.len(), 15);
//! assert!(QrsTemplate::for_sampling_rate(500.0).is_err());
//!
//! let custom = QrsTemplate::parse(500.0, "0.1\n\n1.0\n0.1\n").unwrap();
//! assert_eq!(custom.coefficients(), &[0.1, 1.0, 0.1]);
//! ```

use std::path::Path;

use crate::types::{DetectorError, DetectorResult};

const TEMPLATE_250HZ: &str = include_str!("../templates/template_250hz.csv");
const TEMPLATE_360HZ: &str = include_str!("../templates/template_360hz.csv");

/// Sampling rates with a bundled template.
pub const SUPPORTED_RATES: [f64; 2] = [250.0, 360.0];

/// A QRS template bound to the sampling rate it was recorded at.
#[derive(Debug, Clone, PartialEq)]
pub struct QrsTemplate {
    sampling_rate: f64,
    coefficients: Vec<f64>,
}

impl QrsTemplate {
    pub fn new(sampling_rate: f64, coefficients: Vec<f64>) -> Self {
        Self {
            sampling_rate,
            coefficients,
        }
    }

    /// Bundled template for an exact sampling rate.
    pub fn for_sampling_rate(fs: f64) -> DetectorResult<Self> {
        let text = if fs == 250.0 {
            TEMPLATE_250HZ
        } else if fs == 360.0 {
            TEMPLATE_360HZ
        } else {
            return Err(DetectorError::UnsupportedSamplingRate {
                detector: "Matched Filter",
                fs,
            });
        };
        Self::parse(fs, text)
    }

    /// Parse one coefficient per line. Blank lines are skipped.
    pub fn parse(sampling_rate: f64, text: &str) -> DetectorResult<Self> {
        let mut coefficients = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let value: f64 = line.parse().map_err(|e| DetectorError::TemplateParse {
                line: idx + 1,
                message: format!("{}: {:?}", e, line),
            })?;
            if !value.is_finite() {
                return Err(DetectorError::TemplateParse {
                    line: idx + 1,
                    message: format!("non-finite coefficient {:?}", line),
                });
            }
            coefficients.push(value);
        }

        if coefficients.is_empty() {
            return Err(DetectorError::TemplateParse {
                line: 0,
                message: "template has no coefficients".to_string(),
            });
        }

        Ok(Self::new(sampling_rate, coefficients))
    }

    /// Read and parse a template file.
    pub fn from_file<P: AsRef<Path>>(sampling_rate: f64, path: P) -> DetectorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DetectorError::TemplateParse {
            line: 0,
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(sampling_rate, &text)
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Fail unless the template was recorded at `fs`.
    pub fn check_rate(&self, fs: f64) -> DetectorResult<()> {
        if self.sampling_rate == fs {
            Ok(())
        } else {
            Err(DetectorError::TemplateRateMismatch {
                template_fs: self.sampling_rate,
                fs,
            })
        }
    }
}
