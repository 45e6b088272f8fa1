//! # Configuration System
//!
//! YAML configuration for detector runs:
//!
//! - Sampling rate and default detector
//! - Engzee latency compensation
//! - Wavelet settings for the SWT detector
//! - Logging
//! - Named recording profiles (one per database or front end)
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `ECGD_CONFIG` environment variable
//! 2. `./ecgd.yaml` (current directory)
//! 3. `~/.config/ecgd/config.yaml` (user config)
//! 4. `/etc/ecgd/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! detector:
//!   sampling_rate: 360.0
//!   default_detector: hamilton
//!   engzee_delay: 0
//!
//! swt:
//!   wavelet: db3
//!   level: 3
//!   max_padding: 1000
//!
//! logging:
//!   level: debug
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::detectors::{DetectorKind, SwtSettings};
use crate::observe::LogConfig;
use crate::types::DetectorError;
use crate::wavelet::WaveletType;

/// Deepest SWT level accepted from configuration.
pub const MAX_SWT_LEVEL: u32 = crate::wavelet::MAX_LEVEL;

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file or profile not found
    NotFound(String),
    /// Failed to read configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for DetectorError {
    fn from(err: ConfigError) -> Self {
        DetectorError::Config(err.to_string())
    }
}

/// Recording and detector selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Detector used when none is named
    pub default_detector: DetectorKind,
    /// Samples added to every Engzee peak
    pub engzee_delay: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 250.0,
            default_detector: DetectorKind::PanTompkins,
            engzee_delay: 0,
        }
    }
}

/// Stationary wavelet transform settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwtConfig {
    pub wavelet: WaveletType,
    /// Decomposition level whose detail is used
    pub level: u32,
    /// Largest padding tried to reach a multiple of `2^level`
    pub max_padding: usize,
}

impl Default for SwtConfig {
    fn default() -> Self {
        let settings = SwtSettings::default();
        Self {
            wavelet: settings.wavelet,
            level: settings.level,
            max_padding: settings.max_padding,
        }
    }
}

impl SwtConfig {
    pub fn settings(&self) -> SwtSettings {
        SwtSettings {
            wavelet: self.wavelet,
            level: self.level,
            max_padding: self.max_padding,
        }
    }
}

/// Complete detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcgdConfig {
    /// Configuration version
    pub version: String,
    pub detector: DetectorConfig,
    pub swt: SwtConfig,
    pub logging: LogConfig,
    /// Recording profiles (name -> detector config)
    pub profiles: HashMap<String, DetectorConfig>,
}

impl Default for EcgdConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            detector: DetectorConfig::default(),
            swt: SwtConfig::default(),
            logging: LogConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

impl EcgdConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("ECGD_CONFIG") {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load_from(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Replace the detector section with a named profile.
    pub fn with_profile(&self, name: &str) -> Result<Self, ConfigError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("profile '{}' not found", name)))?;

        let mut config = self.clone();
        config.detector = profile.clone();
        Ok(config)
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./ecgd.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "ecgd") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/ecgd/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fs = self.detector.sampling_rate;
        if !(fs.is_finite() && fs > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "sampling_rate must be positive and finite, got {}",
                fs
            )));
        }

        if !(1..=MAX_SWT_LEVEL).contains(&self.swt.level) {
            return Err(ConfigError::ValidationError(format!(
                "swt.level must be 1-{}, got {}",
                MAX_SWT_LEVEL, self.swt.level
            )));
        }

        if self.swt.max_padding == 0 {
            return Err(ConfigError::ValidationError("swt.max_padding must be > 0".to_string()));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            profiles: {
                let mut profiles = HashMap::new();
                profiles.insert(
                    "mitdb".to_string(),
                    DetectorConfig {
                        sampling_rate: 360.0,
                        ..Default::default()
                    },
                );
                profiles.insert(
                    "gudb".to_string(),
                    DetectorConfig {
                        sampling_rate: 250.0,
                        default_detector: DetectorKind::Engzee,
                        ..Default::default()
                    },
                );
                profiles
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
