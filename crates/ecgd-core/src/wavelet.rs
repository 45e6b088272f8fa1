//! Stationary Wavelet Transform
//!
//! Undecimated (à trous) wavelet analysis for QRS energy extraction. Each level
//! convolves the previous approximation with the analysis filters upsampled by
//! `2^(j-1)`, so every level keeps the input length and the transform is
//! shift-equivariant under circular shifts.
//!
//! ## Blocks
//!
//! - **WaveletFilter**: lowpass/highpass decomposition pair (QMF)
//! - **SwtAnalyzer**: multi-level periodic decomposition
//! - **pad_to_level**: edge-replication padding to a multiple of `2^level`,
//!   for levels `1..=MAX_LEVEL`
//!
//! ## Supported Wavelets
//!
//! - Haar (db1): two taps
//! - Daubechies-3 (db3): six taps, the default for QRS detection
//!
//! ## Example
//!
//! ```rust
//! use ecgd_core::wavelet::{pad_to_level, SwtAnalyzer, WaveletType};
//!
//! let signal: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
//! let padded = pad_to_level(&signal, 3, 1000).unwrap();
//! assert_eq!(padded.len(), 104);
//!
//! let swt = SwtAnalyzer::new(WaveletType::Db3, 3);
//! let detail = swt.detail(&padded);
//! assert_eq!(detail.len(), padded.len());
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{DetectorError, DetectorResult};

/// Wavelet family selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveletType {
    /// Haar wavelet (db1). Taps: [1/√2, 1/√2].
    Haar,
    /// Daubechies-3 wavelet. 6-tap lowpass.
    #[default]
    Db3,
}

impl std::fmt::Display for WaveletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveletType::Haar => write!(f, "haar"),
            WaveletType::Db3 => write!(f, "db3"),
        }
    }
}

/// Deepest decomposition level supported.
pub const MAX_LEVEL: u32 = 10;

/// Reject levels outside `1..=MAX_LEVEL`.
pub fn check_level(level: u32) -> DetectorResult<u32> {
    if (1..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(DetectorError::InvalidSwtLevel {
            level,
            max: MAX_LEVEL,
        })
    }
}

const DB3_LO: [f64; 6] = [
    0.035226291882100656,
    -0.08544127388224149,
    -0.13501102001039084,
    0.4598775021193313,
    0.8068915093133388,
    0.3326705529509569,
];

/// Wavelet decomposition filters.
#[derive(Debug, Clone)]
pub struct WaveletFilter {
    /// Lowpass decomposition filter.
    pub lo_d: Vec<f64>,
    /// Highpass decomposition filter.
    pub hi_d: Vec<f64>,
}

impl WaveletFilter {
    /// Decomposition filters for the given wavelet.
    ///
    /// - hi_d[m] = (-1)^(N-1-m) * lo_d[N-1-m]  (QMF relation)
    pub fn new(wavelet: WaveletType) -> Self {
        let lo_d = match wavelet {
            WaveletType::Haar => {
                let v = std::f64::consts::FRAC_1_SQRT_2;
                vec![v, v]
            }
            WaveletType::Db3 => DB3_LO.to_vec(),
        };

        let n = lo_d.len();
        let hi_d: Vec<f64> = (0..n)
            .map(|m| {
                let sign = if (n - 1 - m) % 2 == 0 { 1.0 } else { -1.0 };
                sign * lo_d[n - 1 - m]
            })
            .collect();

        Self { lo_d, hi_d }
    }

    /// Filter length.
    pub fn len(&self) -> usize {
        self.lo_d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lo_d.is_empty()
    }
}

/// Stationary wavelet analyzer.
#[derive(Debug, Clone)]
pub struct SwtAnalyzer {
    filter: WaveletFilter,
    levels: u32,
    wavelet: WaveletType,
}

impl SwtAnalyzer {
    /// `levels` is clamped to `1..=MAX_LEVEL`.
    pub fn new(wavelet: WaveletType, levels: u32) -> Self {
        Self {
            filter: WaveletFilter::new(wavelet),
            levels: levels.clamp(1, MAX_LEVEL),
            wavelet,
        }
    }

    /// Detail coefficients at the coarsest configured level.
    pub fn detail(&self, signal: &[f64]) -> Vec<f64> {
        let mut approx = signal.to_vec();
        let mut detail = Vec::new();
        for level in 1..=self.levels {
            detail = periodic_level_conv(&approx, &self.filter.hi_d, level);
            if level < self.levels {
                approx = periodic_level_conv(&approx, &self.filter.lo_d, level);
            }
        }
        detail
    }

    pub fn wavelet(&self) -> WaveletType {
        self.wavelet
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }
}

/// One à trous level: circular convolution with `filter` upsampled by
/// `2^(level-1)`, output aligned by half the upsampled filter length.
fn periodic_level_conv(x: &[f64], filter: &[f64], level: u32) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    let step = 1usize << (level - 1);
    let shift = (filter.len() << (level - 1)) / 2;

    (0..n)
        .map(|o| {
            let i = o + shift;
            filter
                .iter()
                .enumerate()
                .map(|(j, &c)| {
                    // (i - j*step) mod n, kept non-negative
                    let back = (j * step) % n;
                    c * x[(i % n + n - back) % n]
                })
                .fold(0.0, |acc, v| acc + v)
        })
        .collect()
}

/// Extend `signal` by repeating its last sample until its length is a
/// multiple of `2^level`, trying `0..max_padding` extra samples.
pub fn pad_to_level(signal: &[f64], level: u32, max_padding: usize) -> DetectorResult<Vec<f64>> {
    let level = check_level(level)?;
    let len = signal.len();
    let block = 1usize << level;
    let pad = (0..max_padding)
        .find(|p| (len + p) % block == 0)
        .ok_or(DetectorError::PaddingNotFound {
            len,
            level,
            max_padding,
        })?;

    let mut padded = Vec::with_capacity(len + pad);
    padded.extend_from_slice(signal);
    if let Some(&edge) = signal.last() {
        padded.resize(len + pad, edge);
    }
    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_filter_orthogonality() {
        for wavelet in [WaveletType::Haar, WaveletType::Db3] {
            let f = WaveletFilter::new(wavelet);
            let dot: f64 = f.lo_d.iter().zip(f.hi_d.iter()).map(|(a, b)| a * b).sum();
            assert!(dot.abs() < 1e-10, "{} filters should be orthogonal", wavelet);
            let energy: f64 = f.lo_d.iter().map(|x| x * x).sum();
            assert!((energy - 1.0).abs() < 1e-10, "{} should have unit energy", wavelet);
            let hi_sum: f64 = f.hi_d.iter().sum();
            assert!(hi_sum.abs() < 1e-10, "{} highpass should reject DC", wavelet);
        }
    }

    #[test]
    fn test_filter_lengths() {
        assert_eq!(WaveletFilter::new(WaveletType::Haar).len(), 2);
        assert_eq!(WaveletFilter::new(WaveletType::Db3).len(), 6);
    }

    #[test]
    fn test_haar_level_one_by_hand() {
        // hi = [-1/√2, 1/√2]; d[o] = (x[o] - x[o+1]) / √2, wrapping at the end
        let swt = SwtAnalyzer::new(WaveletType::Haar, 1);
        let d = swt.detail(&[1.0, 2.0, 4.0, 8.0]);
        let v = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(d[0], -v, epsilon = 1e-12);
        assert_relative_eq!(d[1], -2.0 * v, epsilon = 1e-12);
        assert_relative_eq!(d[2], -4.0 * v, epsilon = 1e-12);
        assert_relative_eq!(d[3], 7.0 * v, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_signal_has_zero_detail() {
        for level in 1..=3 {
            let detail = SwtAnalyzer::new(WaveletType::Db3, level).detail(&[3.0; 64]);
            assert_eq!(detail.len(), 64);
            for &d in &detail {
                assert!(d.abs() < 1e-10, "Constant signal should have zero details");
            }
        }
    }

    #[test]
    fn test_detail_is_linear() {
        let x: Vec<f64> = (0..64).map(|i| (i as f64 * 0.37).sin()).collect();
        let y: Vec<f64> = (0..64).map(|i| (i % 7) as f64).collect();
        let mixed: Vec<f64> = x.iter().zip(&y).map(|(a, b)| 2.5 * a + b).collect();

        let swt = SwtAnalyzer::new(WaveletType::Db3, 3);
        let (dx, dy) = (swt.detail(&x), swt.detail(&y));
        for (i, d) in swt.detail(&mixed).iter().enumerate() {
            assert_relative_eq!(*d, 2.5 * dx[i] + dy[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_shift_equivariance() {
        let signal: Vec<f64> = (0..64).map(|i| if i == 20 { 1.0 } else { 0.0 }).collect();
        let mut shifted = signal.clone();
        shifted.rotate_right(8);

        let swt = SwtAnalyzer::new(WaveletType::Db3, 3);
        let mut expected = swt.detail(&signal);
        expected.rotate_right(8);
        let got = swt.detail(&shifted);
        for (a, b) in got.iter().zip(&expected) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_haar_level_one_energy() {
        // Per-sample differences over √2, so energy halves the squared differences
        let signal: Vec<f64> = (0..32).map(|i| ((i * i) % 11) as f64).collect();
        let expected: f64 = (0..32)
            .map(|o| {
                let diff = signal[o] - signal[(o + 1) % 32];
                diff * diff / 2.0
            })
            .sum();
        let detail = SwtAnalyzer::new(WaveletType::Haar, 1).detail(&signal);
        let energy: f64 = detail.iter().map(|d| d * d).sum();
        assert_relative_eq!(energy, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_padding() {
        let x = vec![1.0; 1250];
        let padded = pad_to_level(&x, 3, 1000).unwrap();
        assert_eq!(padded.len(), 1256);
        assert_eq!(pad_to_level(&x[..1248], 3, 1000).unwrap().len(), 1248);

        let ramp: Vec<f64> = (0..5).map(|i| i as f64).collect();
        assert_eq!(pad_to_level(&ramp, 3, 1000).unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_padding_not_found() {
        let err = pad_to_level(&[0.0; 1250], 3, 6).unwrap_err();
        assert_eq!(
            err,
            DetectorError::PaddingNotFound {
                len: 1250,
                level: 3,
                max_padding: 6
            }
        );
    }

    #[test]
    fn test_level_out_of_range() {
        for level in [0, MAX_LEVEL + 1, 64] {
            assert_eq!(
                pad_to_level(&[0.0; 100], level, 1000),
                Err(DetectorError::InvalidSwtLevel {
                    level,
                    max: MAX_LEVEL
                })
            );
        }
        assert_eq!(check_level(MAX_LEVEL), Ok(MAX_LEVEL));
        assert_eq!(SwtAnalyzer::new(WaveletType::Haar, 64).levels(), MAX_LEVEL);
        assert_eq!(SwtAnalyzer::new(WaveletType::Haar, 0).levels(), 1);
    }

    #[test]
    fn test_empty_input() {
        let swt = SwtAnalyzer::new(WaveletType::Db3, 3);
        assert!(swt.detail(&[]).is_empty());
        assert!(pad_to_level(&[], 3, 1000).unwrap().is_empty());
    }

    #[test]
    fn test_wavelet_serde_names() {
        assert_eq!(serde_yaml::to_string(&WaveletType::Db3).unwrap().trim(), "db3");
        let w: WaveletType = serde_yaml::from_str("haar").unwrap();
        assert_eq!(w, WaveletType::Haar);
    }
}
