//! Moving Window Average
//!
//! O(1)-per-sample moving average using a circular buffer and a running sum.
//! The sum is recomputed from the buffer each time the write index wraps, so
//! rounding error never outlives one window.
//!
//! The window trails the current sample and grows from the start of the
//! record instead of being zero-padded:
//!
//! ```text
//! out[0] = x[0]
//! out[i] = mean(x[0 .. i])        for 0 < i < N
//! out[i] = mean(x[i - N .. i])    for i >= N
//! ```
//!
//! The current sample only enters the window for the next output, so a step
//! at index `k` first shows up at `out[k + 1]`.
//!
//! ## Example
//!
//! ```rust
//! use ecgd_core::filters::MovingAverage;
//!
//! let mut mwa = MovingAverage::new(2);
//! let out = mwa.process_block(&[1.0, 3.0, 5.0, 7.0]);
//! assert_eq!(out, vec![1.0, 1.0, 2.0, 4.0]);
//! ```

use super::traits::RealFilter;

/// Growing-window moving average with O(1) per-sample cost.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Window length
    length: usize,
    /// Circular buffer of the most recent samples
    buffer: Vec<f64>,
    /// Write index
    write_idx: usize,
    /// Running sum of the buffered samples
    sum: f64,
    /// Number of samples in the window (up to length)
    count: usize,
    /// Whether the first sample has been seen
    primed: bool,
}

impl MovingAverage {
    /// Create a new moving average with the given window length.
    ///
    /// A zero-length window passes the first sample through and outputs zero
    /// afterwards.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            buffer: vec![0.0; length],
            write_idx: 0,
            sum: 0.0,
            count: 0,
            primed: false,
        }
    }

    /// Process a single sample.
    pub fn process(&mut self, input: f64) -> f64 {
        let output = if !self.primed {
            self.primed = true;
            input
        } else if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        };

        if self.length > 0 {
            if self.count == self.length {
                self.sum -= self.buffer[self.write_idx];
            } else {
                self.count += 1;
            }
            self.buffer[self.write_idx] = input;
            self.sum += input;
            self.write_idx = (self.write_idx + 1) % self.length;
            if self.write_idx == 0 {
                self.sum = self.buffer.iter().sum();
            }
        }

        output
    }

    /// Process a block of samples.
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process(s)).collect()
    }

    /// Get the window length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl RealFilter for MovingAverage {
    fn process_real(&mut self, input: f64) -> f64 {
        self.process(input)
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_idx = 0;
        self.sum = 0.0;
        self.count = 0;
        self.primed = false;
    }

    fn order(&self) -> usize {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut ma = MovingAverage::new(4);
        assert_eq!(ma.process(7.0), 7.0);
    }

    #[test]
    fn test_growing_window() {
        let mut ma = MovingAverage::new(3);
        let out = ma.process_block(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 2.0); // mean(2)
        assert_eq!(out[2], 3.0); // mean(2, 4)
        assert_eq!(out[3], 4.0); // mean(2, 4, 6)
        assert_eq!(out[4], 6.0); // mean(4, 6, 8)
        assert_eq!(out[5], 8.0); // mean(6, 8, 10)
    }

    #[test]
    fn test_dc_convergence() {
        let mut ma = MovingAverage::new(30);
        let out = ma.process_block(&vec![1.0; 100]);
        for &v in &out {
            assert!((v - 1.0).abs() < 1e-12, "Expected 1.0, got {}", v);
        }
    }

    #[test]
    fn test_step_is_lagged() {
        let mut ma = MovingAverage::new(2);
        let out = ma.process_block(&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_flat_after_burst_is_exactly_zero() {
        let mut ma = MovingAverage::new(5);
        let mut input = vec![1e6, 3.3, 7e5, 0.1, 2.7e-3, 1e-7, 5e5];
        input.extend(std::iter::repeat(0.0).take(15));
        let out = ma.process_block(&input);
        assert!(out[out.len() - 5..].iter().all(|&v| v == 0.0), "{:?}", &out[17..]);
    }

    #[test]
    fn test_zero_length() {
        let mut ma = MovingAverage::new(0);
        assert_eq!(ma.process_block(&[5.0, 3.0, 1.0]), vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset() {
        let mut ma = MovingAverage::new(4);
        ma.process_block(&[100.0, 50.0]);
        ma.reset();
        assert_eq!(ma.process(1.0), 1.0, "After reset, first output should pass through");
        assert_eq!(ma.process(3.0), 1.0);
    }

    #[test]
    fn test_output_length_matches_input() {
        let mut ma = MovingAverage::new(8);
        assert_eq!(ma.process_block(&vec![1.0; 100]).len(), 100);
        assert_eq!(ma.length(), 8);
    }
}
