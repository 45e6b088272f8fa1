//! Local maxima scan
//!
//! Candidate R-peaks are the strict local maxima of a derived signal: an index
//! `i` in `1..=n-2` with `x[i-1] < x[i]` and `x[i+1] < x[i]`. Plateaus and the
//! two end samples never qualify, and NaN samples never compare greater, so
//! they are never candidates.
//!
//! Detections made on a delayed derived signal are moved back onto the ECG by
//! [`align_to_signal`], which takes the largest ECG sample in a trailing window.
//!
//! ## Example
//!
//! ```rust
//! use ecgd_core::peaks::{local_maxima, argmax};
//!
//! let x = [0.0, 2.0, 1.0, 1.0, 3.0, 3.0, 0.0, 5.0];
//! assert_eq!(local_maxima(&x), vec![1]);
//! assert_eq!(argmax(&x), Some(7));
//! ```

use crate::types::{PeakIndex, RPeakList};

/// Iterator over strict local maxima, in increasing index order.
#[derive(Debug, Clone)]
pub struct LocalMaxima<'a> {
    signal: &'a [f64],
    next: usize,
}

impl<'a> LocalMaxima<'a> {
    /// Scan `signal` from its second sample.
    pub fn new(signal: &'a [f64]) -> Self {
        Self { signal, next: 1 }
    }
}

impl Iterator for LocalMaxima<'_> {
    type Item = PeakIndex;

    fn next(&mut self) -> Option<PeakIndex> {
        let x = self.signal;
        while self.next + 1 < x.len() {
            let i = self.next;
            self.next += 1;
            if x[i - 1] < x[i] && x[i + 1] < x[i] {
                return Some(i);
            }
        }
        None
    }
}

/// Collect every strict local maximum of `signal`.
pub fn local_maxima(signal: &[f64]) -> Vec<PeakIndex> {
    LocalMaxima::new(signal).collect()
}

/// Index of the first occurrence of the maximum value, or `None` when empty.
pub fn argmax(signal: &[f64]) -> Option<usize> {
    if signal.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, &v) in signal.iter().enumerate().skip(1) {
        if v > signal[best] {
            best = i;
        }
    }
    Some(best)
}

/// Move each detection to the largest `signal` sample in
/// `[p - window, p]`.
///
/// Detections past the end of `signal` are dropped, and a detection that
/// lands on or before the previous one is merged into it, so the result stays
/// strictly increasing.
pub fn align_to_signal(peaks: &[PeakIndex], signal: &[f64], window: usize) -> RPeakList {
    let mut aligned = RPeakList::with_capacity(peaks.len());
    for &p in peaks.iter().filter(|&&p| p < signal.len()) {
        let start = p.saturating_sub(window);
        let Some(offset) = argmax(&signal[start..=p]) else {
            continue;
        };
        let peak = start + offset;
        if aligned.last().map_or(true, |&last| peak > last) {
            aligned.push(peak);
        }
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_signals() {
        assert!(local_maxima(&[]).is_empty());
        assert!(local_maxima(&[1.0]).is_empty());
        assert!(local_maxima(&[0.0, 1.0]).is_empty());
        assert_eq!(local_maxima(&[0.0, 1.0, 0.0]), vec![1]);
    }

    #[test]
    fn test_endpoints_excluded() {
        assert!(local_maxima(&[5.0, 1.0, 5.0]).is_empty());
    }

    #[test]
    fn test_plateau_not_a_peak() {
        assert!(local_maxima(&[0.0, 2.0, 2.0, 0.0]).is_empty());
        assert!(local_maxima(&[1.0; 10]).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let x = [0.0, 3.0, 0.0, 1.0, 0.0, 2.0, 0.0];
        assert_eq!(local_maxima(&x), vec![1, 3, 5]);
    }

    #[test]
    fn test_nan_ignored() {
        let x = [0.0, f64::NAN, 0.0, 1.0, 0.5];
        assert_eq!(local_maxima(&x), vec![3]);
    }

    #[test]
    fn test_iterator_is_lazy() {
        let x = [0.0, 1.0, 0.0, 1.0, 0.0];
        let mut it = LocalMaxima::new(&x);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next(), Some(3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[-1.0]), Some(0));
    }

    #[test]
    fn test_align_moves_back_to_signal_maximum() {
        let mut x = vec![0.0; 40];
        x[10] = 1.0;
        x[30] = 2.0;
        assert_eq!(align_to_signal(&[16, 35], &x, 8), vec![10, 30]);
        // Window too short to reach the maximum
        assert_eq!(align_to_signal(&[16], &x, 3), vec![13]);
    }

    #[test]
    fn test_align_merges_and_drops() {
        let mut x = vec![0.0; 20];
        x[5] = 1.0;
        // Both detections fall back onto sample 5; 25 is past the end
        assert_eq!(align_to_signal(&[7, 9, 25], &x, 6), vec![5]);
        assert!(align_to_signal(&[3], &[], 5).is_empty());
        assert_eq!(align_to_signal(&[0, 2], &[1.0, 0.0, 0.0], 10), vec![0]);
    }
}
