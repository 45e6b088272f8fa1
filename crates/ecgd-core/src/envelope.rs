//! Steep-slope amplitude envelope `M` shared by the Christov and Engzee
//! detectors.
//!
//! `M` follows the signal through five phases, chosen per sample from the
//! sample index and the most recent detection:
//!
//! | Phase        | When                                   | Update                                   |
//! |--------------|----------------------------------------|------------------------------------------|
//! | `Seeding`    | first 5 s of the record                | `M = 0.6 * running max`, pushed into MM  |
//! | `Arming`     | `last < i < last + 200 ms`             | candidate `0.6 * max(x[last..i])`, capped |
//! | `Committing` | `i == last + 200 ms`                   | candidate pushed into MM, `M = mean(MM)` |
//! | `Decaying`   | `last + 200 ms < i < last + 1200 ms`   | `M = mean(MM) * linspace(1.0, 0.6)[k]`   |
//! | `Flat`       | `i > last + 1200 ms`                   | `M = 0.6 * mean(MM)`                     |
//!
//! Outside those windows (no detection yet after seeding, or exactly at
//! `last + 1200 ms`) `M` keeps its previous value. MM holds the last five
//! committed values.
//!
//! The armed candidate is limited to `1.1 * MM[last]` when it exceeds
//! `1.5 * MM[last]`.

use crate::rolling::RollingWindow;
use crate::types::{samples, PeakIndex};

/// Length of the seeding period, in seconds.
pub const SEEDING_S: f64 = 5.0;

/// Number of committed envelope values averaged into `M`.
pub const MM_LEN: usize = 5;

/// What to commit when the arming window produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFallback {
    /// Reuse the newest MM value only if no candidate was ever armed.
    Unset,
    /// Also reuse it when the pending candidate is exactly zero.
    UnsetOrZero,
}

/// Envelope phase for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    Seeding,
    Arming,
    Committing,
    /// Sample offset `k` past `last + 200 ms`.
    Decaying(usize),
    Flat,
    Hold,
}

/// Stateful `M` envelope over one record.
#[derive(Debug, Clone)]
pub struct MEnvelope {
    seeding_end: f64,
    ms200: usize,
    ms1200: usize,
    fallback: CommitFallback,
    m: f64,
    mm: RollingWindow<MM_LEN>,
    pending: Option<f64>,
    running_max: f64,
}

impl MEnvelope {
    pub fn new(fs: f64, fallback: CommitFallback) -> Self {
        Self {
            seeding_end: SEEDING_S * fs,
            ms200: samples(0.2, fs),
            ms1200: samples(1.2, fs),
            fallback,
            m: 0.0,
            mm: RollingWindow::new(),
            pending: None,
            running_max: f64::NEG_INFINITY,
        }
    }

    /// Current `M`.
    pub fn value(&self) -> f64 {
        self.m
    }

    /// Mean of the committed values, zero before any commit.
    pub fn mm_mean(&self) -> f64 {
        self.mm.mean_or_zero()
    }

    /// Phase of sample `i` given the latest detection.
    pub fn phase(&self, i: usize, last: Option<PeakIndex>) -> EnvelopePhase {
        if (i as f64) < self.seeding_end {
            return EnvelopePhase::Seeding;
        }
        let Some(last) = last else {
            return EnvelopePhase::Hold;
        };
        let armed_until = last + self.ms200;
        let decay_until = last + self.ms1200;
        if i < armed_until {
            EnvelopePhase::Arming
        } else if i == armed_until {
            EnvelopePhase::Committing
        } else if i < decay_until {
            EnvelopePhase::Decaying(i - armed_until)
        } else if i > decay_until {
            EnvelopePhase::Flat
        } else {
            EnvelopePhase::Hold
        }
    }

    /// Advance to sample `i` of `signal` and return the updated `M`.
    ///
    /// `last` is the latest detection strictly before `i`.
    pub fn update(&mut self, signal: &[f64], i: usize, last: Option<PeakIndex>) -> f64 {
        self.running_max = self.running_max.max(signal[i]);

        match self.phase(i, last) {
            EnvelopePhase::Seeding => {
                self.m = 0.6 * self.running_max;
                self.mm.push(self.m);
            }
            EnvelopePhase::Arming => {
                let from = last.unwrap_or(0);
                let peak = signal[from..i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let newest = self.mm.last().unwrap_or(0.0);
                let mut candidate = 0.6 * peak;
                if candidate > 1.5 * newest {
                    candidate = 1.1 * newest;
                }
                self.pending = Some(candidate);
            }
            EnvelopePhase::Committing => {
                let newest = self.mm.last().unwrap_or(0.0);
                let commit = match (self.pending, self.fallback) {
                    (None, _) => newest,
                    (Some(v), CommitFallback::UnsetOrZero) if v == 0.0 => newest,
                    (Some(v), _) => v,
                };
                self.mm.push(commit);
                self.m = self.mm.mean_or_zero();
            }
            EnvelopePhase::Decaying(k) => {
                let steps = self.ms1200 - self.ms200;
                self.m = self.mm.mean_or_zero() * linspace_at(1.0, 0.6, steps, k);
            }
            EnvelopePhase::Flat => {
                self.m = 0.6 * self.mm.mean_or_zero();
            }
            EnvelopePhase::Hold => {}
        }

        self.m
    }
}

/// Element `k` of `n` evenly spaced values from `a` to `b` inclusive.
fn linspace_at(a: f64, b: f64, n: usize, k: usize) -> f64 {
    if n <= 1 {
        return a;
    }
    a + (b - a) * k as f64 / (n - 1) as f64
}
