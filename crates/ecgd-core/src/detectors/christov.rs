//! Christov QRS detection.
//!
//! The derived signal is a smoothed absolute central difference:
//!
//! ```text
//! ECG → boxcar 20 ms → boxcar 28 ms → |y[i+1] - y[i-1]| → boxcar 40 ms → blank taps
//! ```
//!
//! A sample is a beat when it exceeds `M + F + R`:
//!
//! - `M`, the steep-slope envelope ([`MEnvelope`])
//! - `F`, a slow accumulator of the rise between the first and last 50 ms of
//!   the trailing 350 ms
//! - `R`, zero for two thirds of the mean RR interval after a beat, then
//!   `(M - mean(MM)) / 1.4` until a full mean RR has elapsed
//!
//! The first sample above threshold only seeds the detector and is not
//! reported. Reported indices refer to the derived signal, which is two
//! samples shorter than the input.

use crate::envelope::{CommitFallback, MEnvelope};
use crate::primitives::{boxcar, zero_leading};
use crate::rolling::RollingWindow;
use crate::types::{samples, DetectorResult, PeakIndex, RPeakList};

use super::RPeakDetector;

/// Intervals averaged into the RR estimate.
const RR_HISTORY: usize = 5;

#[derive(Debug, Clone)]
pub struct Christov {
    fs: f64,
}

impl Christov {
    pub fn new(fs: f64) -> Self {
        Self { fs }
    }

    /// Triple-boxcar slope signal, `len - 2` samples long.
    pub fn derived(&self, signal: &[f64]) -> Vec<f64> {
        let t1 = samples(0.02, self.fs);
        let t2 = samples(0.028, self.fs);
        let t3 = samples(0.04, self.fs);

        let ma1 = boxcar(signal, t1);
        let ma2 = boxcar(&ma1, t2);
        let slope: Vec<f64> = ma2.windows(3).map(|w| (w[2] - w[0]).abs()).collect();
        let mut ma3 = boxcar(&slope, t3);
        zero_leading(&mut ma3, t1 + t2 + t3);
        ma3
    }
}

impl RPeakDetector for Christov {
    fn name(&self) -> &'static str {
        "Christov"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let y = self.derived(signal);

        let ms50 = samples(0.05, self.fs);
        let ms200 = samples(0.2, self.fs);
        let ms350 = samples(0.35, self.fs);

        let mut envelope = MEnvelope::new(self.fs, CommitFallback::UnsetOrZero);
        let mut f = 0.0;
        let mut r = 0.0;
        let mut rr: RollingWindow<RR_HISTORY> = RollingWindow::new();
        let mut rm: usize = 0;

        let mut seed: Option<PeakIndex> = None;
        let mut peaks = RPeakList::new();

        for i in 0..y.len() {
            let last = peaks.last().copied().or(seed);
            let m = envelope.update(&y, i, last);

            if i > ms350 && ms50 > 0 {
                let window = &y[i - ms350..i];
                let latest = max_of(&window[window.len() - ms50..]);
                let earliest = max_of(&window[..ms50]);
                f += (latest - earliest) / 150.0;
            }

            if let Some(last) = last {
                let two_thirds = (2.0 / 3.0 * rm as f64) as usize;
                if i < last + two_thirds {
                    r = 0.0;
                } else if last + two_thirds < i && i < last + rm {
                    r = (m - envelope.mm_mean()) / 1.4;
                }
            }

            let threshold = m + f + r;
            match last {
                None if y[i] > threshold => seed = Some(i),
                Some(last) if i > last + ms200 && y[i] > threshold => {
                    peaks.push(i);
                    if let [.., prev, cur] = peaks[..] {
                        rr.push((cur - prev) as f64);
                        rm = rr.mean().map_or(0, |v| v as usize);
                    }
                }
                _ => {}
            }
        }

        Ok(peaks)
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_signals::five_pulse_scenario;

    #[test]
    fn test_five_pulses() {
        let peaks = Christov::new(250.0).detect(&five_pulse_scenario(7)).unwrap();
        assert_eq!(peaks, vec![92, 350, 600, 850, 1100]);
    }

    #[test]
    fn test_derived_length() {
        let c = Christov::new(250.0);
        assert_eq!(c.derived(&[0.0; 100]).len(), 98);
        assert!(c.derived(&[1.0, 2.0]).is_empty());
        assert!(c.derived(&[]).is_empty());
    }

    #[test]
    fn test_derived_blanks_startup() {
        let y = Christov::new(250.0).derived(&five_pulse_scenario(2));
        // 5 + 7 + 10 taps at 250 Hz
        assert!(y[..22].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_short_inputs() {
        let c = Christov::new(250.0);
        assert!(c.detect(&[]).unwrap().is_empty());
        assert!(c.detect(&[1.0]).unwrap().is_empty());
        assert!(c.detect(&[1.0, 0.0, 1.0]).unwrap().is_empty());
    }
}
