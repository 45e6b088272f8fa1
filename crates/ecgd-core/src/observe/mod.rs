//! # Observability
//!
//! Structured logging for detector runs via `tracing`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ecgd_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! let peaks = detectors.pan_tompkins_detector(&ecg)?;
//! tracing::info!(beats = peaks.len(), "record done");
//! ```
//!
//! ```text
//! detectors ── debug!(entry / exit) ──┐
//! adaptive  ── trace!(missed beat) ───┼──► EnvFilter ──► fmt layer ──► stderr / file
//! primitives ─ warn!(flat signal) ────┘                  (json | pretty | compact)
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
