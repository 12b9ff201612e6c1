//! Configuration module.

pub mod loader;

pub use loader::{ConfigError, ConfigFile};

use crate::model::Px;

/// Engine tuning knobs.
///
/// All values have sensible defaults; embedders override them directly or
/// through a TOML file via [`loader::load_from_path`] + [`EngineConfig::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Smooth-scroll speed in pixels per millisecond, used to derive a
    /// speed-proportional duration for short programmatic jumps.
    pub smooth_speed_px_per_ms: f32,

    /// Fixed duration used once the estimated travel distance exceeds
    /// [`EngineConfig::smooth_distance_threshold_px`]. Decouples perceived
    /// scroll speed from distance for very long jumps.
    pub smooth_default_duration_ms: u32,

    /// Estimated travel distance beyond which the fixed default duration
    /// applies.
    pub smooth_distance_threshold_px: Px,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smooth_speed_px_per_ms: 2.0,
            smooth_default_duration_ms: 300,
            smooth_distance_threshold_px: 8_000,
        }
    }
}

impl EngineConfig {
    /// Apply an optional loaded config file on top of the defaults.
    pub fn resolve(file: Option<&ConfigFile>) -> Self {
        let mut config = Self::default();
        if let Some(file) = file {
            if let Some(speed) = file.smooth_speed_px_per_ms {
                config.smooth_speed_px_per_ms = speed;
            }
            if let Some(duration) = file.smooth_default_duration_ms {
                config.smooth_default_duration_ms = duration;
            }
            if let Some(threshold) = file.smooth_distance_threshold_px {
                config.smooth_distance_threshold_px = threshold;
            }
        }
        config
    }
}
