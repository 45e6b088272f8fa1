//! Adaptive dual-threshold peak picking.
//!
//! One engine drives both the Pan-Tompkins family (Pan-Tompkins, wavelet and
//! matched-filter detectors) and the Hamilton detector. The two differ only in
//! how they track the signal and noise levels, how strongly the threshold
//! leans towards the signal level, how the expected RR interval is estimated,
//! and how they pick a missed beat.
//!
//! Candidates are the strict local maxima of the derived signal, visited in
//! index order:
//!
//! ```text
//!             value > threshold  and  (candidate - last peak) > refractory
//!  candidate ─────────────────────────────────────────────────────────────► accept
//!      │                                                                      │
//!      └──► noise level update              gap > multiplier * mean RR ? ────┤
//!                                                                             ▼
//!                                          insert a missed beat between the
//!                                          previous and the current peak
//! ```
//!
//! `threshold = noise + weight * (signal - noise)` is recomputed after every
//! candidate. A recovered beat must exceed half of the threshold in force when
//! the current peak was accepted.
//!
//! Before the first acceptance, refractory distance is measured from the
//! start of the record.
//!
//! # Example
//!
//! ```
//! use ecgd_core::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
//!
//! let mut derived = vec![0.0; 1000];
//! for c in [200, 400, 600, 800] {
//!     derived[c] = 1.0;
//! }
//! let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
//! assert_eq!(picker.detect(&derived), vec![200, 400, 600, 800]);
//! ```

use crate::peaks::LocalMaxima;
use crate::rolling::RollingWindow;
use crate::types::{samples, PeakIndex};

/// Number of values retained by windowed level and RR statistics.
pub const HISTORY: usize = 8;

/// How signal and noise peak levels are tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelSmoothing {
    /// `level = alpha * value + (1 - alpha) * level`
    Exponential { alpha: f64 },
    /// Plain mean of the last [`HISTORY`] values.
    WindowedMean,
}

/// How the expected RR interval is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrTracking {
    /// Mean of the last [`HISTORY`] intervals of the accepted peak list,
    /// with the record start counted as a peak. Unavailable until
    /// [`HISTORY`] peaks have been accepted.
    PeakHistory,
    /// Rolling mean over the interval that closes each acceptance after the
    /// first one (the interval to the peak just before it).
    PerAcceptance,
}

/// Which candidate a missed-beat search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySelection {
    /// The largest qualifying candidate (first one on ties).
    Strongest,
    /// The earliest qualifying candidate.
    First,
}

/// Per-variant constants of the adaptive picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConfig {
    pub smoothing: LevelSmoothing,
    /// Weight of `(signal - noise)` in the primary threshold.
    pub threshold_weight: f64,
    /// Minimum gap to the previous peak, in seconds (strict).
    pub refractory_s: f64,
    pub rr_tracking: RrTracking,
    /// A gap larger than `missed_multiplier * mean RR` triggers recovery.
    pub missed_multiplier: f64,
    /// Minimum distance (strict, truncated to samples) between a recovered
    /// beat and the previous peak.
    pub recovery_spacing_s: f64,
    /// Also require the spacing towards the current peak.
    pub recovery_spacing_both_sides: bool,
    pub recovery_selection: RecoverySelection,
}

impl AdaptiveConfig {
    /// Exponentially smoothed levels (1/8), weight 0.25, missed-beat bound of
    /// 1.66 x the mean of the last eight intervals.
    pub const fn pan_tompkins() -> Self {
        Self {
            smoothing: LevelSmoothing::Exponential { alpha: 0.125 },
            threshold_weight: 0.25,
            refractory_s: 0.3,
            rr_tracking: RrTracking::PeakHistory,
            missed_multiplier: 1.66,
            recovery_spacing_s: 0.25,
            recovery_spacing_both_sides: true,
            recovery_selection: RecoverySelection::Strongest,
        }
    }

    /// Windowed-mean levels, weight 0.45, missed-beat bound of 1.5 x mean RR.
    pub const fn hamilton() -> Self {
        Self {
            smoothing: LevelSmoothing::WindowedMean,
            threshold_weight: 0.45,
            refractory_s: 0.3,
            rr_tracking: RrTracking::PerAcceptance,
            missed_multiplier: 1.5,
            recovery_spacing_s: 0.36,
            recovery_spacing_both_sides: false,
            recovery_selection: RecoverySelection::First,
        }
    }
}

/// Accepted peaks and the subset that was inserted by missed-beat recovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickOutcome {
    /// Strictly increasing accepted peaks, recovered beats included.
    pub peaks: Vec<PeakIndex>,
    /// Recovered beats, in the order they were inserted.
    pub recovered: Vec<PeakIndex>,
}

/// Adaptive dual-threshold picker over a derived signal.
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdPicker {
    config: AdaptiveConfig,
    fs: f64,
}

impl AdaptiveThresholdPicker {
    pub fn new(config: AdaptiveConfig, fs: f64) -> Self {
        Self { config, fs }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Accepted peak indices only.
    pub fn detect(&self, derived: &[f64]) -> Vec<PeakIndex> {
        self.pick(derived).peaks
    }

    /// Run the picker over `derived`.
    pub fn pick(&self, derived: &[f64]) -> PickOutcome {
        let cfg = &self.config;
        let refractory = cfg.refractory_s * self.fs;
        let spacing = samples(cfg.recovery_spacing_s, self.fs);

        let mut levels = Levels::new(cfg.smoothing);
        let mut rr = RrEstimate::new(cfg.rr_tracking);
        let mut threshold = 0.0;

        let mut candidates: Vec<PeakIndex> = Vec::new();
        let mut outcome = PickOutcome::default();

        for candidate in LocalMaxima::new(derived) {
            candidates.push(candidate);
            let value = derived[candidate];
            let previous = outcome.peaks.last().copied();

            if value > threshold && elapsed_since(previous, candidate) as f64 > refractory {
                outcome.peaks.push(candidate);
                levels.add_signal(value);

                let gap = elapsed_since(previous, candidate);
                let missed = rr
                    .average()
                    .is_some_and(|avg| gap as f64 > cfg.missed_multiplier * avg as f64);
                if missed {
                    let lo = previous.unwrap_or(0);
                    let search = RecoverySearch {
                        lo,
                        hi: candidate,
                        spacing,
                        both_sides: cfg.recovery_spacing_both_sides,
                        min_value: 0.5 * threshold,
                    };
                    if let Some(beat) = search.run(derived, &candidates, cfg.recovery_selection) {
                        tracing::trace!(beat, lo, hi = candidate, "missed beat recovered");
                        let at = outcome.peaks.len() - 1;
                        outcome.peaks.insert(at, beat);
                        outcome.recovered.push(beat);
                    }
                }

                rr.update(&outcome.peaks);
            } else {
                levels.add_noise(value);
            }

            threshold = levels.threshold(cfg.threshold_weight);
        }

        outcome
    }
}

/// Samples elapsed since the last peak, or since the start of the record.
fn elapsed_since(last: Option<PeakIndex>, index: PeakIndex) -> usize {
    index - last.unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Level tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Levels {
    Exponential { alpha: f64, signal: f64, noise: f64 },
    Windowed { signal: RollingWindow<HISTORY>, noise: RollingWindow<HISTORY> },
}

impl Levels {
    fn new(smoothing: LevelSmoothing) -> Self {
        match smoothing {
            LevelSmoothing::Exponential { alpha } => Levels::Exponential {
                alpha,
                signal: 0.0,
                noise: 0.0,
            },
            LevelSmoothing::WindowedMean => Levels::Windowed {
                signal: RollingWindow::new(),
                noise: RollingWindow::new(),
            },
        }
    }

    fn add_signal(&mut self, value: f64) {
        match self {
            Levels::Exponential { alpha, signal, .. } => {
                *signal = *alpha * value + (1.0 - *alpha) * *signal;
            }
            Levels::Windowed { signal, .. } => signal.push(value),
        }
    }

    fn add_noise(&mut self, value: f64) {
        match self {
            Levels::Exponential { alpha, noise, .. } => {
                *noise = *alpha * value + (1.0 - *alpha) * *noise;
            }
            Levels::Windowed { noise, .. } => noise.push(value),
        }
    }

    fn threshold(&self, weight: f64) -> f64 {
        let (signal, noise) = match self {
            Levels::Exponential { signal, noise, .. } => (*signal, *noise),
            Levels::Windowed { signal, noise } => (signal.mean_or_zero(), noise.mean_or_zero()),
        };
        noise + weight * (signal - noise)
    }
}

// ---------------------------------------------------------------------------
// RR estimation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct RrEstimate {
    tracking: RrTracking,
    intervals: RollingWindow<HISTORY>,
    average: Option<usize>,
}

impl RrEstimate {
    fn new(tracking: RrTracking) -> Self {
        Self {
            tracking,
            intervals: RollingWindow::new(),
            average: None,
        }
    }

    /// Truncated mean RR interval in samples, once known.
    fn average(&self) -> Option<usize> {
        self.average
    }

    fn update(&mut self, peaks: &[PeakIndex]) {
        let n = peaks.len();
        match self.tracking {
            RrTracking::PeakHistory => {
                if n >= HISTORY {
                    // The mean of consecutive differences telescopes to the span
                    let first = if n > HISTORY { peaks[n - HISTORY - 1] } else { 0 };
                    self.average = Some((peaks[n - 1] - first) / HISTORY);
                }
            }
            RrTracking::PerAcceptance => {
                if n >= 2 {
                    self.intervals.push((peaks[n - 1] - peaks[n - 2]) as f64);
                    self.average = self.intervals.mean().map(|m| m as usize);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Missed-beat search
// ---------------------------------------------------------------------------

struct RecoverySearch {
    lo: PeakIndex,
    hi: PeakIndex,
    spacing: usize,
    both_sides: bool,
    min_value: f64,
}

impl RecoverySearch {
    fn run(&self, derived: &[f64], candidates: &[PeakIndex], selection: RecoverySelection) -> Option<PeakIndex> {
        let start = candidates.partition_point(|&m| m <= self.lo);
        let mut qualifying = candidates[start..]
            .iter()
            .copied()
            .take_while(|&m| m < self.hi)
            .filter(|&m| {
                m - self.lo > self.spacing
                    && (!self.both_sides || self.hi - m > self.spacing)
                    && derived[m] > self.min_value
            });

        match selection {
            RecoverySelection::First => qualifying.next(),
            RecoverySelection::Strongest => qualifying.fold(None, |best, m| match best {
                Some(b) if derived[b] >= derived[m] => Some(b),
                _ => Some(m),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three-sample triangles of the given heights.
    fn triangles(len: usize, beats: &[(usize, f64)]) -> Vec<f64> {
        let mut x = vec![0.0; len];
        for &(c, v) in beats {
            x[c - 1] = v / 2.0;
            x[c] = v;
            x[c + 1] = v / 2.0;
        }
        x
    }

    fn regular_train(weak: f64) -> Vec<f64> {
        let beats: Vec<(usize, f64)> = (200..2900)
            .step_by(200)
            .map(|c| (c, if c == 2200 { weak } else { 1.0 }))
            .collect();
        triangles(3000, &beats)
    }

    #[test]
    fn test_empty_and_flat() {
        for config in [AdaptiveConfig::pan_tompkins(), AdaptiveConfig::hamilton()] {
            let picker = AdaptiveThresholdPicker::new(config, 250.0);
            assert!(picker.detect(&[]).is_empty());
            assert!(picker.detect(&[0.0; 3]).is_empty());
            assert!(picker.detect(&vec![0.0; 2000]).is_empty());
        }
    }

    #[test]
    fn test_refractory_rejects_close_peak() {
        let x = triangles(1000, &[(200, 1.0), (250, 1.0), (500, 1.0)]);
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
        assert_eq!(picker.detect(&x), vec![200, 500]);
    }

    #[test]
    fn test_refractory_counts_from_record_start() {
        // 50 samples after the start is inside the 75-sample refractory window
        let x = triangles(1000, &[(50, 1.0), (300, 1.0)]);
        for config in [AdaptiveConfig::pan_tompkins(), AdaptiveConfig::hamilton()] {
            let picker = AdaptiveThresholdPicker::new(config, 250.0);
            assert_eq!(picker.detect(&x), vec![300]);
        }
    }

    #[test]
    fn test_small_peak_below_threshold_is_noise() {
        let x = triangles(1000, &[(200, 1.0), (400, 0.01), (600, 1.0)]);
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
        assert_eq!(picker.detect(&x), vec![200, 600]);
    }

    #[test]
    fn test_pan_tompkins_recovers_weak_beat() {
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
        let outcome = picker.pick(&regular_train(0.15));
        let expected: Vec<usize> = (200..2900).step_by(200).collect();
        assert_eq!(outcome.peaks, expected);
        assert_eq!(outcome.recovered, vec![2200]);
    }

    #[test]
    fn test_hamilton_recovers_weak_beat() {
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::hamilton(), 250.0);
        let outcome = picker.pick(&regular_train(0.35));
        let expected: Vec<usize> = (200..2900).step_by(200).collect();
        assert_eq!(outcome.peaks, expected);
        assert_eq!(outcome.recovered, vec![2200]);
    }

    #[test]
    fn test_missing_beat_without_candidate_stays_missing() {
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
        let outcome = picker.pick(&regular_train(0.0));
        assert!(!outcome.peaks.contains(&2200));
        assert!(outcome.recovered.is_empty());
        assert_eq!(outcome.peaks.len(), 13);
    }

    #[test]
    fn test_no_recovery_before_rr_history() {
        // Only three beats: PeakHistory needs eight peaks before it can flag a gap
        let x = triangles(2000, &[(200, 1.0), (400, 1.0), (700, 0.02), (1000, 1.0)]);
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), 250.0);
        let outcome = picker.pick(&x);
        assert!(outcome.recovered.is_empty());
        assert_eq!(outcome.peaks, vec![200, 400, 1000]);
    }

    #[test]
    fn test_refractory_invariant_for_non_recovered() {
        let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::hamilton(), 250.0);
        let outcome = picker.pick(&regular_train(0.35));
        let accepted: Vec<usize> = outcome
            .peaks
            .iter()
            .copied()
            .filter(|p| !outcome.recovered.contains(p))
            .collect();
        for w in accepted.windows(2) {
            assert!((w[1] - w[0]) as f64 > 0.3 * 250.0, "refractory violated: {:?}", w);
        }
        for &r in &outcome.recovered {
            let pos = outcome.peaks.iter().position(|&p| p == r).unwrap();
            assert!(pos > 0 && pos + 1 < outcome.peaks.len());
            assert!(outcome.peaks[pos - 1] < r && r < outcome.peaks[pos + 1]);
        }
    }

    #[test]
    fn test_rr_peak_history_counts_origin() {
        let mut rr = RrEstimate::new(RrTracking::PeakHistory);
        let peaks: Vec<usize> = (1..=7).map(|k| k * 100).collect();
        rr.update(&peaks);
        assert_eq!(rr.average(), None);
        let peaks: Vec<usize> = (1..=8).map(|k| k * 100).collect();
        rr.update(&peaks);
        assert_eq!(rr.average(), Some(100));
        let peaks: Vec<usize> = (1..=9).map(|k| k * 100 + if k == 9 { 9 } else { 0 }).collect();
        rr.update(&peaks);
        // (909 - 100) / 8, truncated
        assert_eq!(rr.average(), Some(101));
    }

    #[test]
    fn test_rr_per_acceptance_skips_origin() {
        let mut rr = RrEstimate::new(RrTracking::PerAcceptance);
        rr.update(&[150]);
        assert_eq!(rr.average(), None);
        rr.update(&[150, 350]);
        assert_eq!(rr.average(), Some(200));
        rr.update(&[150, 350, 651]);
        // mean(200, 301) = 250.5
        assert_eq!(rr.average(), Some(250));
    }

    #[test]
    fn test_config_constants() {
        let pt = AdaptiveConfig::pan_tompkins();
        assert_eq!(pt.threshold_weight, 0.25);
        assert_eq!(pt.smoothing, LevelSmoothing::Exponential { alpha: 0.125 });
        let ham = AdaptiveConfig::hamilton();
        assert_eq!(ham.threshold_weight, 0.45);
        assert_eq!(ham.missed_multiplier, 1.5);
        assert_eq!(ham.recovery_selection, RecoverySelection::First);
    }
}
