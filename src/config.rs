//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; an empty file yields the built-in
//! calibration, no extra validation checks and `info` logging to stderr.
//!
//! ```toml
//! [decoder]
//! check_utc_time = true
//!
//! [calibration]
//! adc_to_voltage = 0.004888
//! pressure = { offset = 1.04, scale = 0.267 }
//!
//! [logging]
//! level = "debug"
//! log_dir = "./logs"
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::envelope::record::EnvelopeParser;
use crate::error::{Result, TelemetryError};
use crate::rockblock::calibration::CalibrationTable;
use crate::rockblock::decoder::{FrameDecoder, ValidationPolicy};

/// Accepted values for `logging.level`
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub decoder: ValidationPolicy,

    #[serde(default)]
    pub calibration: CalibrationTable,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files; empty logs to stderr only
    #[serde(default)]
    pub log_dir: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }
fn default_file_prefix() -> String { "rockblock-decode.log".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rockblock_telemetry::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a frame decoder from the calibration and decoder sections
    pub fn frame_decoder(&self) -> FrameDecoder {
        FrameDecoder::new(self.calibration.clone(), self.decoder)
    }

    /// Build an envelope parser around [`Config::frame_decoder`]
    pub fn envelope_parser(&self) -> EnvelopeParser {
        EnvelopeParser::new(self.frame_decoder())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if let Err(e) = self.calibration.validate() {
            return Err(TelemetryError::Config(toml::de::Error::custom(e)));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(TelemetryError::Config(toml::de::Error::custom(format!(
                "logging level must be one of: {}",
                LOG_LEVELS.join(", ")
            ))));
        }

        if !self.logging.log_dir.is_empty() && self.logging.file_prefix.is_empty() {
            return Err(TelemetryError::Config(toml::de::Error::custom(
                "logging file_prefix cannot be empty when log_dir is set",
            )));
        }

        Ok(())
    }
}
