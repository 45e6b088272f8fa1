//! # Structured Logging
//!
//! Structured logging via the `tracing` ecosystem:
//!
//! - Multiple output formats (JSON, Pretty, Compact)
//! - Level and per-module filtering
//! - Stderr or file output (stdout is left free for detector output)
//! - `RUST_LOG` override
//!
//! Detectors emit `debug` events on entry and exit and `trace` events for
//! every missed-beat insertion; [`LogConfig::picker_trace`] turns the latter on.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ecgd_core::observe::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..Default::default()
//! };
//!
//! init_logging(&config)?;
//!
//! tracing::info!(records = 48, "Benchmark started");
//! ```

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable)
    Json,
    /// Pretty format (human-readable, colored)
    #[default]
    Pretty,
    /// Compact format (one line per event)
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
    pub timestamps: bool,
    /// Include source location (file:line)
    pub source_location: bool,
    pub thread_ids: bool,
    pub thread_names: bool,
    /// Include span events (enter/exit)
    pub span_events: bool,
    /// Module filter (e.g., "ecgd_core=debug,ecgd_core::adaptive=trace")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            file: None,
            timestamps: true,
            source_location: false,
            thread_ids: false,
            thread_names: false,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Verbose, pretty output with source locations.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            thread_names: true,
            span_events: true,
            ..Default::default()
        }
    }

    /// JSON at info level.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            timestamps: true,
            ..Default::default()
        }
    }

    /// Errors only.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            ..Default::default()
        }
    }

    /// Detector entry/exit plus every missed-beat insertion.
    pub fn picker_trace() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Compact,
            filter: Some("ecgd_core=debug,ecgd_core::adaptive=trace".to_string()),
            ..Default::default()
        }
    }

    /// The filter directive string `init_logging` starts from.
    pub fn directives(&self) -> String {
        self.filter.clone().unwrap_or_else(|| self.level.to_string())
    }
}

/// Initialize the global logging subscriber.
///
/// Call once at application startup; later calls are ignored. Fails only
/// when a log file is configured and cannot be opened.
pub fn init_logging(config: &LogConfig) -> std::io::Result<()> {
    // Custom filter, then RUST_LOG, then the configured level
    let filter = if let Some(ref custom) = config.filter {
        EnvFilter::try_new(custom).unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
    };

    let span_events = if config.span_events {
        fmt::format::FmtSpan::FULL
    } else {
        fmt::format::FmtSpan::NONE
    };

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };
    let ansi = config.file.is_none();

    let result = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_thread_ids(config.thread_ids)
                .with_thread_names(config.thread_names)
                .with_span_events(span_events);
            if config.timestamps {
                tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))
            } else {
                tracing::subscriber::set_global_default(
                    tracing_subscriber::registry().with(filter).with(layer.without_time()),
                )
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(ansi)
                .with_writer(writer)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_thread_ids(config.thread_ids)
                .with_thread_names(config.thread_names)
                .with_span_events(span_events);
            if config.timestamps {
                tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))
            } else {
                tracing::subscriber::set_global_default(
                    tracing_subscriber::registry().with(filter).with(layer.without_time()),
                )
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(ansi)
                .with_writer(writer)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_thread_ids(config.thread_ids)
                .with_thread_names(config.thread_names)
                .with_span_events(span_events);
            if config.timestamps {
                tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))
            } else {
                tracing::subscriber::set_global_default(
                    tracing_subscriber::registry().with(filter).with(layer.without_time()),
                )
            }
        }
    };

    // Already initialised elsewhere
    let _ = result;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Debug), "debug");
        assert_eq!(format!("{}", LogLevel::Info), "info");
        assert_eq!(format!("{}", LogLevel::Error), "error");
    }

    #[test]
    fn test_config_presets() {
        let dev = LogConfig::development();
        assert_eq!(dev.level, LogLevel::Debug);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.source_location);

        let prod = LogConfig::production();
        assert_eq!(prod.format, LogFormat::Json);

        let quiet = LogConfig::quiet();
        assert_eq!(quiet.level, LogLevel::Error);
        assert!(!quiet.timestamps);
    }

    #[test]
    fn test_directives() {
        assert_eq!(LogConfig::default().directives(), "info");
        assert_eq!(LogConfig::quiet().directives(), "error");
        assert!(LogConfig::picker_trace().directives().contains("ecgd_core::adaptive=trace"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: LogConfig = serde_yaml::from_str("level: warn\nformat: json\n").unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.timestamps);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_unopenable_log_file() {
        let config = LogConfig {
            file: Some(PathBuf::from("/nonexistent-dir/ecgd/ecgd.log")),
            ..Default::default()
        };
        assert!(init_logging(&config).is_err());
    }
}
