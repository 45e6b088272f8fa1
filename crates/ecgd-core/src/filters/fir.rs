//! FIR Filter implementations
//!
//! Direct-form convolution over a circular delay line, starting from a zero
//! state. The detectors use three kinds of FIR kernel:
//!
//! - **Boxcar**: `moving_average(n)`, all taps `1/n`
//! - **Binomial smoother**: `binomial(4)`, taps `[1, 4, 6, 4, 1]`
//! - **Matched filter**: `matched(template)`, the time-reversed template
//!
//! ## Example
//!
//! ```rust
//! use ecgd_core::filters::{FirFilter, RealFilter};
//!
//! let mut smoother = FirFilter::binomial(4);
//! let output = smoother.process_real_block(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
//! assert_eq!(output, vec![1.0, 4.0, 6.0, 4.0, 1.0, 0.0]);
//! ```

use super::traits::RealFilter;

/// FIR filter using direct convolution.
#[derive(Debug, Clone)]
pub struct FirFilter {
    /// Filter coefficients (impulse response)
    coeffs: Vec<f64>,
    /// Delay line for input samples
    delay_line: Vec<f64>,
    /// Current position in delay line
    delay_idx: usize,
}

impl FirFilter {
    /// Create a new FIR filter with the given coefficients.
    ///
    /// An empty coefficient list yields a filter whose output is always zero.
    pub fn new(coeffs: Vec<f64>) -> Self {
        let len = coeffs.len();
        Self {
            coeffs,
            delay_line: vec![0.0; len],
            delay_idx: 0,
        }
    }

    /// Create a moving average (boxcar) filter.
    ///
    /// All coefficients equal 1/N. A length of zero produces the all-zero filter.
    pub fn moving_average(length: usize) -> Self {
        if length == 0 {
            return Self::new(Vec::new());
        }
        let value = 1.0 / length as f64;
        Self::new(vec![value; length])
    }

    /// Unnormalised binomial smoother of the given order (`order + 1` taps).
    ///
    /// `binomial(4)` is `[1, 4, 6, 4, 1]`.
    pub fn binomial(order: usize) -> Self {
        let mut coeffs = vec![1.0];
        for _ in 0..order {
            let mut next = vec![1.0; coeffs.len() + 1];
            for k in 1..coeffs.len() {
                next[k] = coeffs[k - 1] + coeffs[k];
            }
            coeffs = next;
        }
        Self::new(coeffs)
    }

    /// Matched filter for a reference waveform: convolution with the
    /// time-reversed template, i.e. causal cross-correlation.
    pub fn matched(template: &[f64]) -> Self {
        Self::new(template.iter().rev().copied().collect())
    }

    /// Get the filter coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Get the number of taps.
    pub fn num_taps(&self) -> usize {
        self.coeffs.len()
    }
}

impl RealFilter for FirFilter {
    fn process_real(&mut self, input: f64) -> f64 {
        let len = self.coeffs.len();
        if len == 0 {
            return 0.0;
        }

        self.delay_line[self.delay_idx] = input;

        let mut output = 0.0;
        for i in 0..len {
            let delay_pos = (self.delay_idx + len - i) % len;
            output += self.delay_line[delay_pos] * self.coeffs[i];
        }

        self.delay_idx = (self.delay_idx + 1) % len;

        output
    }

    fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.delay_idx = 0;
    }

    fn order(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }
}
