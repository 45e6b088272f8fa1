//! Digital Filters for ECG Conditioning
//!
//! Every detector front end is a cascade of causal filters over the raw ECG:
//!
//! - **IIR**: Butterworth band-pass to isolate QRS energy, band-stop to remove
//!   mains interference (cascaded biquads)
//! - **FIR**: boxcar averages, the `[1, 4, 6, 4, 1]` smoother, and the
//!   matched filter for template correlation
//! - **Moving window average**: trailing, growing-window integration
//!
//! ```text
//! ECG → Band-pass (IIR) → Derivative → Square → Moving average → Picker
//! ```
//!
//! All filters start from a zero state and never look ahead, so each output
//! sample depends only on the current and earlier inputs.

pub mod fir;
pub mod iir;
pub mod moving_average;
pub mod traits;

pub use fir::FirFilter;
pub use iir::{Biquad, IirFilter};
pub use moving_average::MovingAverage;
pub use traits::RealFilter;
