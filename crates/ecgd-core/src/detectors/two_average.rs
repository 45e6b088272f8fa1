//! Two moving averages block detection (Elgendi et al.).
//!
//! The rectified 8–20 Hz band is averaged over a QRS-length (120 ms) and a
//! beat-length (600 ms) window. Wherever the short average exceeds the long
//! one a block of interest is open; each block wider than 80 ms contributes
//! the position of its largest filtered sample, provided it lies more than
//! 300 ms after the previous detection. The band-pass delays that sample, so
//! the result is moved back to the ECG maximum in the preceding 100 ms.

use crate::peaks::{align_to_signal, argmax};
use crate::primitives::{abs_value, bandpass, moving_average};
use crate::types::{samples, DetectorResult, RPeakList};

use super::RPeakDetector;

#[derive(Debug, Clone)]
pub struct TwoAverage {
    fs: f64,
}

impl TwoAverage {
    pub fn new(fs: f64) -> Self {
        Self { fs }
    }

    /// Closed `(start, end)` sample ranges where the short average exceeds the
    /// long one, paired with the band-passed signal they refer to.
    ///
    /// A block already open at sample 0, or still open at the end of the
    /// record, is not returned.
    pub fn blocks(&self, signal: &[f64]) -> DetectorResult<(Vec<(usize, usize)>, Vec<f64>)> {
        let filtered = bandpass(signal, self.fs, 8.0, 20.0, 2)?;
        let rectified = abs_value(&filtered);
        let qrs_avg = moving_average(&rectified, samples(0.12, self.fs));
        let beat_avg = moving_average(&rectified, samples(0.6, self.fs));

        let open: Vec<bool> = qrs_avg.iter().zip(&beat_avg).map(|(q, b)| q > b).collect();

        let mut blocks = Vec::new();
        let mut start = None;
        for i in 1..open.len() {
            match (open[i - 1], open[i]) {
                (false, true) => start = Some(i),
                (true, false) => {
                    if let Some(s) = start {
                        blocks.push((s, i - 1));
                    }
                }
                _ => {}
            }
        }

        Ok((blocks, filtered))
    }
}

impl RPeakDetector for TwoAverage {
    fn name(&self) -> &'static str {
        "Two Average"
    }

    fn sampling_rate(&self) -> f64 {
        self.fs
    }

    fn detect(&self, signal: &[f64]) -> DetectorResult<RPeakList> {
        let (blocks, filtered) = self.blocks(signal)?;
        let min_width = samples(0.08, self.fs);
        let spacing = samples(0.3, self.fs);

        let mut peaks = RPeakList::new();
        for (start, end) in blocks {
            if end - start <= min_width {
                continue;
            }
            let Some(offset) = argmax(&filtered[start..=end]) else {
                continue;
            };
            let candidate = start + offset;
            if peaks.last().map_or(true, |&last| candidate - last > spacing) {
                peaks.push(candidate);
            }
        }

        Ok(align_to_signal(&peaks, signal, samples(0.1, self.fs)))
    }
}
