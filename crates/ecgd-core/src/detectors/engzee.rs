//! Engzee QRS detection (with the Lourenço modifications).
//!
//! ```text
//! ECG → Band-stop 48–52 Hz → x[i] - x[i-4] → FIR [1 4 6 4 1] → blank 200 ms
//! ```
//!
//! A beat is armed when the smoothed slope crosses `+M` ([`MEnvelope`]) and
//! confirmed when, within 160 ms of arming, it then stays below `-M` for more
//! than 10 ms. The reported R-peak is the largest raw sample between 10 ms
//! before the arming point and the confirming sample, shifted by a fixed
//! delay used when comparing against reference annotations.

use crate::envelope::{CommitFallback, MEnvelope};
use crate::filters::{FirFilter, RealFilter};
use crate::peaks::argmax;
use crate::primitives::{bandstop, lag_diff, zero_leading};
use crate::types::{samples, DetectorResult, PeakIndex, RPeakList};

use super::RPeakDetector;

/// Arm/confirm state of the negative-tail check.
#[derive(Debug, Clone, Copy, Default)]
struct TailCheck {
    armed: bool,
    in_tail: bool,
    below: usize,
}

impl TailCheck {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct Engzee {
    fs: f64,
    delay: usize,
}

impl Engzee {
    pub fn new(fs: f64) -> Self {
        Self { fs, delay: 0 }
    }

    /// Add `delay` samples to every reported peak.
    pub fn with_delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Notch-filtered, differenced and smoothed signal, same length as the input.
    pub fn smoothed_slope(&self, signal: &[f64]) -> DetectorResult<Vec<f64>> {
        let notched = bandstop(signal, self.fs, 48.0, 52.0, 4)?;
        let slope = lag_diff(&notched, 4);
        let mut lp = FirFilter::binomial(4).process_real_block(&slope);
        zero_leading(&mut lp, samples(0.2, self.fs));
        Ok(lp)
    }
}

impl RPeakDetector for Engzee {
    fn name(&self) -> &'static str {
        "Engzee"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let lp = self.smoothed_slope(signal)?;
        let n = lp.len();

        let ms10 = samples(0.01, self.fs);
        let ms160 = samples(0.16, self.fs);
        let ms200 = samples(0.2, self.fs);

        let mut envelope = MEnvelope::new(self.fs, CommitFallback::Unset);
        let mut armed_at: Option<PeakIndex> = None;
        let mut tail = TailCheck::default();
        let mut peaks = RPeakList::new();

        for i in 0..n {
            let m = envelope.update(&lp, i, armed_at);

            let arms = match armed_at {
                None => lp[i] > m,
                Some(last) => i > last + ms200 && lp[i] > m,
            };
            if arms {
                armed_at = Some(i);
                tail.arm();
            }

            let Some(arm) = armed_at else {
                continue;
            };

            if tail.armed && i < arm + ms160 {
                if lp[i] < -m && i > 0 && lp[i - 1] > -m {
                    tail.in_tail = true;
                }
                if tail.in_tail && lp[i] < -m {
                    tail.below += 1;
                } else if lp[i] > -m && tail.in_tail {
                    tail.reset();
                }
            } else if tail.armed && i > arm + ms160 {
                tail.reset();
            }

            if tail.below > ms10 {
                let start = arm.saturating_sub(ms10);
                if let Some(offset) = argmax(&signal[start..i]) {
                    let peak = (start + offset + self.delay).min(n - 1);
                    if peaks.last().map_or(true, |&p| peak > p) {
                        peaks.push(peak);
                    }
                }
                tail.reset();
            }
        }

        Ok(peaks)
    }
}
