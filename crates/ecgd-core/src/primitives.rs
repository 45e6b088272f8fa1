//! Signal-conditioning primitives shared by the detector front ends.
//!
//! Each function is a pure transform from one sample slice to a new vector.
//! Filtering is causal and starts from a zero state; callers blank the startup
//! transient with [`zero_leading`].
//!
//! # Example
//!
//! ```
//! use ecgd_core::primitives::{diff, square, moving_average};
//!
//! let x = [0.0, 1.0, 3.0, 6.0];
//! let d = diff(&x);
//! assert_eq!(d, vec![1.0, 2.0, 3.0]);
//! let e = moving_average(&square(&d), 2);
//! assert_eq!(e, vec![1.0, 1.0, 2.5]);
//! ```

use crate::filters::{FirFilter, IirFilter, MovingAverage, RealFilter};
use crate::types::DetectorResult;

/// Causal Butterworth band-pass of the given prototype order.
pub fn bandpass(signal: &[f64], fs: f64, low_hz: f64, high_hz: f64, order: usize) -> DetectorResult<Vec<f64>> {
    let mut filter = IirFilter::butterworth_bandpass(order, low_hz, high_hz, fs)?;
    Ok(filter.process_real_block(signal))
}

/// Causal Butterworth band-stop of the given prototype order.
pub fn bandstop(signal: &[f64], fs: f64, low_hz: f64, high_hz: f64, order: usize) -> DetectorResult<Vec<f64>> {
    let mut filter = IirFilter::butterworth_bandstop(order, low_hz, high_hz, fs)?;
    Ok(filter.process_real_block(signal))
}

/// Trailing moving-window average whose window grows from the record start.
///
/// See [`MovingAverage`] for the exact edge policy.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    MovingAverage::new(window).process_block(signal)
}

/// Causal boxcar FIR of `taps` coefficients `1/taps`, zero initial state.
///
/// `taps == 0` yields all zeros.
pub fn boxcar(signal: &[f64], taps: usize) -> Vec<f64> {
    FirFilter::moving_average(taps).process_real_block(signal)
}

/// Causal FIR with arbitrary coefficients, zero initial state.
pub fn fir(signal: &[f64], coeffs: &[f64]) -> Vec<f64> {
    FirFilter::new(coeffs.to_vec()).process_real_block(signal)
}

/// First difference; the output is one sample shorter than the input.
pub fn diff(signal: &[f64]) -> Vec<f64> {
    signal.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Difference against the sample `lag` positions earlier, same length as the
/// input; the first `lag` outputs are zero.
pub fn lag_diff(signal: &[f64], lag: usize) -> Vec<f64> {
    (0..signal.len())
        .map(|i| if i >= lag { signal[i] - signal[i - lag] } else { 0.0 })
        .collect()
}

/// Element-wise square.
pub fn square(signal: &[f64]) -> Vec<f64> {
    signal.iter().map(|&x| x * x).collect()
}

/// Element-wise absolute value.
pub fn abs_value(signal: &[f64]) -> Vec<f64> {
    signal.iter().map(|x| x.abs()).collect()
}

/// Min-max scale into `[0, 1]`.
///
/// A constant (or empty) signal has no range and maps to all zeros.
pub fn normalise(signal: &[f64]) -> Vec<f64> {
    let (lo, hi) = signal
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let range = hi - lo;
    if !(range.is_finite() && range > 0.0) {
        if !signal.is_empty() {
            tracing::warn!(samples = signal.len(), "normalise: signal has no range, returning zeros");
        }
        return vec![0.0; signal.len()];
    }
    signal.iter().map(|&x| (x - lo) / range).collect()
}

/// Overwrite the first `n` samples (or all, if shorter) with zero.
pub fn zero_leading(signal: &mut [f64], n: usize) {
    let n = n.min(signal.len());
    signal[..n].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diff_lengths() {
        assert!(diff(&[]).is_empty());
        assert!(diff(&[1.0]).is_empty());
        assert_eq!(diff(&[1.0, 4.0, 2.0]), vec![3.0, -2.0]);
    }

    #[test]
    fn test_lag_diff() {
        let x = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        assert_eq!(lag_diff(&x, 4), vec![0.0, 0.0, 0.0, 0.0, 15.0, 30.0]);
        assert_eq!(lag_diff(&x[..3], 4), vec![0.0; 3]);
    }

    #[test]
    fn test_square_and_abs() {
        assert_eq!(square(&[-2.0, 3.0]), vec![4.0, 9.0]);
        assert_eq!(abs_value(&[-2.0, 3.0, -0.0]), vec![2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_normalise() {
        let n = normalise(&[2.0, 4.0, 3.0]);
        assert_relative_eq!(n[0], 0.0);
        assert_relative_eq!(n[1], 1.0);
        assert_relative_eq!(n[2], 0.5);
    }

    #[test]
    fn test_normalise_constant() {
        assert_eq!(normalise(&[5.0; 4]), vec![0.0; 4]);
        assert!(normalise(&[]).is_empty());
    }

    #[test]
    fn test_zero_leading() {
        let mut x = vec![1.0; 5];
        zero_leading(&mut x, 2);
        assert_eq!(x, vec![0.0, 0.0, 1.0, 1.0, 1.0]);
        zero_leading(&mut x, 50);
        assert_eq!(x, vec![0.0; 5]);
    }

    #[test]
    fn test_boxcar_matches_fir() {
        let x: Vec<f64> = (0..20).map(|i| (i as f64 * 0.3).sin()).collect();
        let a = boxcar(&x, 5);
        let b = fir(&x, &[0.2; 5]);
        for (p, q) in a.iter().zip(&b) {
            assert_relative_eq!(*p, *q, epsilon = 1e-15);
        }
        assert_eq!(boxcar(&x, 0), vec![0.0; 20]);
    }

    #[test]
    fn test_moving_average_edge_policy() {
        let out = moving_average(&[3.0, 1.0, 2.0, 6.0], 10);
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 3.0);
        assert_eq!(out[2], 2.0);
        assert_eq!(out[3], 2.0);
    }

    #[test]
    fn test_bandpass_rejects_bad_band() {
        assert!(bandpass(&[0.0; 10], 250.0, 15.0, 5.0, 1).is_err());
        assert!(bandstop(&[0.0; 10], 80.0, 48.0, 52.0, 4).is_err());
        assert_eq!(bandpass(&[], 250.0, 5.0, 15.0, 1).unwrap(), Vec::<f64>::new());
    }
}
