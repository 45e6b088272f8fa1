//! IIR Filter implementations
//!
//! Butterworth designs realised as cascaded biquad sections. The analog
//! prototype is moved to the requested band in the s-plane, mapped to the
//! z-plane with the bilinear transform (cutoffs pre-warped), and the resulting
//! poles and zeros are grouped into second-order sections.
//!
//! ```text
//!  prototype poles ──► lp2bp / lp2bs ──► bilinear ──► biquads
//!  (unit circle)        (zeros, poles, gain) (z-plane)
//! ```
//!
//! Filters run causally from a zero state, so the first few samples of any
//! output carry a startup transient proportional to the order.
//!
//! ## Example
//!
//! ```rust
//! use ecgd_core::filters::{IirFilter, RealFilter};
//!
//! // Pan-Tompkins band: first-order Butterworth band-pass, 5-15 Hz at 250 Hz
//! let mut filter = IirFilter::butterworth_bandpass(1, 5.0, 15.0, 250.0).unwrap();
//! let output = filter.process_real_block(&vec![0.0; 100]);
//! assert_eq!(output.len(), 100);
//! ```

use super::traits::RealFilter;
use crate::types::{DetectorError, DetectorResult};
use num_complex::Complex64;
use std::f64::consts::PI;

/// A single biquad (second-order section) filter.
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
///
/// Using Direct Form II Transposed for better numerical properties.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Numerator coefficients [b0, b1, b2]
    b: [f64; 3],
    /// Denominator coefficients [a1, a2] (a0 is normalized to 1)
    a: [f64; 2],
    /// State variables for Direct Form II Transposed
    state: [f64; 2],
}

impl Biquad {
    /// Create a new biquad section with given coefficients.
    ///
    /// # Arguments
    /// * `b` - Numerator coefficients [b0, b1, b2]
    /// * `a` - Denominator coefficients [a1, a2] (a0 assumed to be 1)
    pub fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self { b, a, state: [0.0; 2] }
    }

    /// Create a pass-through (unity gain) biquad.
    pub fn unity() -> Self {
        Self::new([1.0, 0.0, 0.0], [0.0, 0.0])
    }

    /// Process a single real sample using Direct Form II Transposed.
    #[inline]
    pub fn process_real(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.state[0];
        self.state[0] = self.b[1] * input - self.a[0] * output + self.state[1];
        self.state[1] = self.b[2] * input - self.a[1] * output;
        output
    }

    /// Reset the filter state.
    pub fn reset(&mut self) {
        self.state = [0.0; 2];
    }

    /// Check if this biquad is stable (poles inside unit circle).
    pub fn is_stable(&self) -> bool {
        // Denominator 1 + a1*z^-1 + a2*z^-2 is stable when
        // |a2| < 1 and |a1| < 1 + a2
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }
}

/// IIR filter implemented as a cascade of biquad sections.
///
/// The overall gain is applied at the input of the first section.
#[derive(Debug, Clone)]
pub struct IirFilter {
    /// Cascade of biquad sections
    sections: Vec<Biquad>,
    /// Overall gain factor
    gain: f64,
    /// Filter order
    order: usize,
}

impl IirFilter {
    /// Create a new IIR filter from biquad sections.
    pub fn new(sections: Vec<Biquad>, gain: f64) -> Self {
        let order = sections.len() * 2;
        Self { sections, gain, order }
    }

    /// Design a Butterworth bandpass filter.
    ///
    /// Unity gain at the geometric band centre and -3 dB at both edges.
    ///
    /// # Arguments
    /// * `order` - Prototype order (total order = 2*order)
    /// * `low_hz` - Lower cutoff frequency in Hz
    /// * `high_hz` - Upper cutoff frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    pub fn butterworth_bandpass(
        order: usize,
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
    ) -> DetectorResult<Self> {
        check_design(order, low_hz, high_hz, sample_rate)?;
        let (wo, bw) = band_edges(low_hz, high_hz, sample_rate);
        let zpk = lp2bp(&butterworth_poles(order), wo, bw).bilinear(sample_rate);
        Ok(Self::from_zpk(zpk, order * 2))
    }

    /// Design a Butterworth bandstop (notch) filter.
    ///
    /// # Arguments
    /// * `order` - Prototype order (total order = 2*order)
    /// * `low_hz` - Lower edge of the rejected band in Hz
    /// * `high_hz` - Upper edge of the rejected band in Hz
    /// * `sample_rate` - Sample rate in Hz
    pub fn butterworth_bandstop(
        order: usize,
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
    ) -> DetectorResult<Self> {
        check_design(order, low_hz, high_hz, sample_rate)?;
        let (wo, bw) = band_edges(low_hz, high_hz, sample_rate);
        let zpk = lp2bs(&butterworth_poles(order), wo, bw).bilinear(sample_rate);
        Ok(Self::from_zpk(zpk, order * 2))
    }

    fn from_zpk(zpk: Zpk, order: usize) -> Self {
        let gain = zpk.gain;
        let mut filter = Self::new(zpk.into_sections(), gain);
        filter.order = order;
        filter
    }

    /// Get the number of biquad sections.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Overall gain applied ahead of the cascade.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Check if the filter is stable (all poles inside unit circle).
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(|s| s.is_stable())
    }

    /// Get the complex frequency response H(e^jω) at a given frequency.
    pub fn frequency_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        let z_inv = Complex64::new(omega.cos(), -omega.sin());
        let z_inv2 = z_inv * z_inv;

        let mut response = Complex64::new(self.gain, 0.0);
        for section in &self.sections {
            let num = section.b[0] + section.b[1] * z_inv + section.b[2] * z_inv2;
            let den = 1.0 + section.a[0] * z_inv + section.a[1] * z_inv2;
            response *= num / den;
        }

        response
    }

    /// Get the magnitude response in dB at a given frequency.
    pub fn magnitude_response_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        20.0 * self.frequency_response(freq_hz, sample_rate).norm().log10()
    }

    /// Get access to biquad sections for analysis.
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }
}

impl RealFilter for IirFilter {
    fn process_real(&mut self, input: f64) -> f64 {
        let mut output = input * self.gain;
        for section in &mut self.sections {
            output = section.process_real(output);
        }
        output
    }

    fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }

    fn order(&self) -> usize {
        self.order
    }
}

// ============================================================================
// Design Functions
// ============================================================================

const MAX_ORDER: usize = 10;

fn check_design(order: usize, low_hz: f64, high_hz: f64, sample_rate: f64) -> DetectorResult<()> {
    crate::types::validate_sampling_rate(sample_rate)?;
    let nyquist = sample_rate / 2.0;
    let band_ok = low_hz > 0.0 && low_hz <= high_hz && high_hz < nyquist;
    if order == 0 || order > MAX_ORDER || !band_ok {
        return Err(DetectorError::InvalidFilterBand {
            low_hz,
            high_hz,
            fs: sample_rate,
        });
    }
    Ok(())
}

/// Pre-warp frequency for bilinear transform.
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Pre-warped band centre and width.
fn band_edges(low_hz: f64, high_hz: f64, sample_rate: f64) -> (f64, f64) {
    let wl = prewarp(low_hz, sample_rate);
    let wh = prewarp(high_hz, sample_rate);
    ((wl * wh).sqrt(), wh - wl)
}

/// Calculate Butterworth analog prototype poles.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    let mut poles = Vec::with_capacity(order);
    for k in 0..order {
        let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
        poles.push(Complex64::new(theta.cos(), theta.sin()));
    }
    poles
}

/// Zeros, poles and gain of a transfer function.
#[derive(Debug, Clone)]
struct Zpk {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
}

fn neg_product(values: &[Complex64]) -> Complex64 {
    values.iter().fold(Complex64::new(1.0, 0.0), |acc, v| acc * -*v)
}

fn lp2bp(proto: &[Complex64], wo: f64, bw: f64) -> Zpk {
    let scaled: Vec<Complex64> = proto.iter().map(|p| *p * (bw / 2.0)).collect();
    let spread: Vec<Complex64> = scaled.iter().map(|pl| (*pl * *pl - wo * wo).sqrt()).collect();

    let mut poles = Vec::with_capacity(2 * proto.len());
    poles.extend(scaled.iter().zip(&spread).map(|(pl, s)| *pl + *s));
    poles.extend(scaled.iter().zip(&spread).map(|(pl, s)| *pl - *s));

    Zpk {
        zeros: vec![Complex64::new(0.0, 0.0); proto.len()],
        poles,
        gain: bw.powi(proto.len() as i32),
    }
}

fn lp2bs(proto: &[Complex64], wo: f64, bw: f64) -> Zpk {
    let scaled: Vec<Complex64> = proto.iter().map(|p| (bw / 2.0) / *p).collect();
    let spread: Vec<Complex64> = scaled.iter().map(|ph| (*ph * *ph - wo * wo).sqrt()).collect();

    let mut poles = Vec::with_capacity(2 * proto.len());
    poles.extend(scaled.iter().zip(&spread).map(|(ph, s)| *ph + *s));
    poles.extend(scaled.iter().zip(&spread).map(|(ph, s)| *ph - *s));

    let mut zeros = vec![Complex64::new(0.0, wo); proto.len()];
    zeros.extend(std::iter::repeat(Complex64::new(0.0, -wo)).take(proto.len()));

    Zpk {
        zeros,
        poles,
        gain: (1.0 / neg_product(proto)).re,
    }
}

impl Zpk {
    /// Map an analog design to the z-plane. Zeros at infinity land on z = -1.
    fn bilinear(self, sample_rate: f64) -> Zpk {
        let fs2 = 2.0 * sample_rate;
        let degree = self.poles.len().saturating_sub(self.zeros.len());

        let map = |s: &Complex64| (fs2 + *s) / (fs2 - *s);
        let mut zeros: Vec<Complex64> = self.zeros.iter().map(map).collect();
        zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));
        let poles = self.poles.iter().map(map).collect();

        let num = self.zeros.iter().fold(Complex64::new(1.0, 0.0), |acc, z| acc * (fs2 - *z));
        let den = self.poles.iter().fold(Complex64::new(1.0, 0.0), |acc, p| acc * (fs2 - *p));

        Zpk {
            zeros,
            poles,
            gain: self.gain * (num / den).re,
        }
    }

    /// Pair zeros and poles into biquads, i-th zero quadratic with i-th pole quadratic.
    fn into_sections(self) -> Vec<Biquad> {
        let zero_quads = quadratics(&self.zeros);
        let pole_quads = quadratics(&self.poles);
        let count = zero_quads.len().max(pole_quads.len());
        let identity = [1.0, 0.0, 0.0];

        (0..count)
            .map(|i| {
                let b = zero_quads.get(i).copied().unwrap_or(identity);
                let a = pole_quads.get(i).copied().unwrap_or(identity);
                Biquad::new(b, [a[1], a[2]])
            })
            .collect()
    }
}

/// Expand roots into monic quadratics `[1, c1, c2]`.
///
/// Conjugate pairs are represented by their upper-half member; real roots are
/// paired in order and a leftover real root yields a first-order factor.
fn quadratics(roots: &[Complex64]) -> Vec<[f64; 3]> {
    let tolerance = |r: &Complex64| 1e-9 * r.norm().max(1.0);

    let mut quads: Vec<[f64; 3]> = roots
        .iter()
        .filter(|r| r.im > tolerance(r))
        .map(|c| [1.0, -2.0 * c.re, c.norm_sqr()])
        .collect();

    let reals: Vec<f64> = roots
        .iter()
        .filter(|r| r.im.abs() <= tolerance(r))
        .map(|r| r.re)
        .collect();

    for pair in reals.chunks(2) {
        match *pair {
            [a, b] => quads.push([1.0, -(a + b), a * b]),
            [a] => quads.push([1.0, -a, 0.0]),
            _ => {}
        }
    }

    quads
}
