//! Deterministic synthetic ECG-like signals for unit tests.
//!
//! Narrow Gaussian pulses stand in for QRS complexes, on top of a slow
//! 0.5 Hz baseline wander and a little uniform noise from a seeded LCG.

use std::f64::consts::PI;

/// Pulse positions of the five-pulse scenario at 250 Hz.
pub const PULSE_POSITIONS: [usize; 5] = [100, 350, 600, 850, 1100];

/// 64-bit linear congruential generator (Knuth's MMIX constants).
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Baseline wander plus `±1e-5` uniform noise, with unit-sigma-scaled
/// Gaussian pulses of the given `(position, amplitude)`.
pub fn pulse_signal(seed: u64, fs: f64, len: usize, pulses: &[(usize, f64)], sigma: f64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    let mut x: Vec<f64> = (0..len)
        .map(|i| 1e-5 * (2.0 * rng.uniform() - 1.0) + 0.1 * (2.0 * PI * 0.5 * i as f64 / fs + 0.7).sin())
        .collect();

    let half = (6.0 * sigma) as usize;
    for &(p, amplitude) in pulses {
        let lo = p.saturating_sub(half);
        let hi = (p + half + 1).min(len);
        for (i, sample) in x.iter_mut().enumerate().take(hi).skip(lo) {
            let z = (i as f64 - p as f64) / sigma;
            *sample += amplitude * (-0.5 * (z * z)).exp();
        }
    }
    x
}

/// Five identical pulses at [`PULSE_POSITIONS`], 250 Hz, 1250 samples.
pub fn five_pulse_scenario(seed: u64) -> Vec<f64> {
    let pulses: Vec<(usize, f64)> = PULSE_POSITIONS.iter().map(|&p| (p, 1.0)).collect();
    pulse_signal(seed, 250.0, 1250, &pulses, 3.0)
}

/// Fourteen pulses every 200 samples from 100, 250 Hz, 3000 samples, with the
/// pulse at 2100 scaled to `weak`.
pub fn missed_beat_train(seed: u64, weak: f64) -> Vec<f64> {
    let pulses: Vec<(usize, f64)> = (100..2900)
        .step_by(200)
        .map(|p| (p, if p == 2100 { weak } else { 1.0 }))
        .collect();
    pulse_signal(seed, 250.0, 3000, &pulses, 3.0)
}

/// Six-beat train every 200 samples from 100, 250 Hz, 1250 samples, with the
/// second beat (300) left out.
pub fn six_pulse_missing_second(seed: u64) -> Vec<f64> {
    let pulses: Vec<(usize, f64)> = (100..1250)
        .step_by(200)
        .filter(|&p| p != 300)
        .map(|p| (p, 1.0))
        .collect();
    pulse_signal(seed, 250.0, 1250, &pulses, 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_reproducible() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            let u = a.uniform();
            assert_eq!(u, b.uniform());
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_pulse_peaks_at_position() {
        let x = five_pulse_scenario(7);
        assert_eq!(x.len(), 1250);
        for &p in &PULSE_POSITIONS {
            assert!(x[p] > x[p - 1] && x[p] > x[p + 1]);
            assert!(x[p] > 0.85);
        }
    }
}
