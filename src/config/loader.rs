//! Configuration file loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::Px;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Smooth-scroll speed in pixels per millisecond.
    #[serde(default)]
    pub smooth_speed_px_per_ms: Option<f32>,

    /// Fixed smooth-scroll duration for long jumps.
    #[serde(default)]
    pub smooth_default_duration_ms: Option<u32>,

    /// Estimated travel distance beyond which the fixed duration applies.
    #[serde(default)]
    pub smooth_distance_threshold_px: Option<Px>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Load a config file from an explicit path.
///
/// # Errors
/// - [`ConfigError::ReadError`] if the file cannot be read
/// - [`ConfigError::ParseError`] if the contents are not valid TOML
pub fn load_from_path(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
