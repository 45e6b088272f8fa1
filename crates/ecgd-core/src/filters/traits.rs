//! Core Filter Trait
//!
//! ECG samples are real-valued, so every filter in the crate implements a
//! single real-sample trait. Detector front ends chain them block by block.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecgd_core::filters::{RealFilter, FirFilter};
//!
//! fn apply(filter: &mut dyn RealFilter, samples: &[f64]) -> Vec<f64> {
//!     filter.process_real_block(samples)
//! }
//! ```

/// Core trait for causal, real-valued filters.
///
/// Filters start from a zero state and keep their delay lines between calls.
/// No output sample depends on a later input sample.
pub trait RealFilter: Send + Sync {
    /// Process a single real-valued sample.
    fn process_real(&mut self, input: f64) -> f64;

    /// Process a block of real samples, returning filtered output.
    fn process_real_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process_real(s)).collect()
    }

    /// Reset filter state (clear delay lines, accumulators).
    fn reset(&mut self);

    /// Get the filter order.
    ///
    /// For FIR filters: number of taps - 1.
    /// For IIR filters: the analog prototype order after band transformation.
    fn order(&self) -> usize;
}
