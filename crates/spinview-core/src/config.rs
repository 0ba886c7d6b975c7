//! Tunable constants for rotation, inertia and auto-rotation.
//!
//! Every knob the engine exposes lives here so all viewers tune
//! consistently. Values can be overridden per-field from
//! `~/.config/spinview/config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Base auto-rotation interval in milliseconds, per fetched frame
    #[serde(default = "default_auto_rotate_delay")]
    pub auto_rotate_delay_ms: u64,
    /// Delay before auto-rotation starts after construction
    #[serde(default = "default_auto_rotate_start_delay")]
    pub auto_rotate_start_delay_ms: u64,
    /// |deltaY| / |deltaX| at or above which a drag counts as a vertical scroll
    #[serde(default = "default_vertical_scroll_ratio")]
    pub vertical_scroll_ratio: f64,
    /// Deceleration tick interval in milliseconds
    #[serde(default = "default_decel_time_step")]
    pub decel_time_step_ms: u64,
    /// Velocity shed per deceleration tick, in pixels
    #[serde(default = "default_decel")]
    pub decel: f64,
    /// Velocity ceiling at inertia launch, in pixels per tick
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// Frame stride when the host lacks a smooth-animation primitive
    #[serde(default = "default_reduced_step_size")]
    pub reduced_step_size: u32,
    /// Re-arm auto-rotation after a release that triggered no inertia
    #[serde(default)]
    pub resume_auto_rotate: bool,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            auto_rotate_delay_ms: default_auto_rotate_delay(),
            auto_rotate_start_delay_ms: default_auto_rotate_start_delay(),
            vertical_scroll_ratio: default_vertical_scroll_ratio(),
            decel_time_step_ms: default_decel_time_step(),
            decel: default_decel(),
            max_velocity: default_max_velocity(),
            reduced_step_size: default_reduced_step_size(),
            resume_auto_rotate: false,
        }
    }
}

impl SpinConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/spinview/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("spinview")
            .join("config.toml")
    }

    #[inline]
    pub fn auto_rotate_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_rotate_start_delay_ms)
    }

    /// Auto-rotation tick interval for the given frame stride.
    /// Never zero: a zero interval would spin the tick scheduler.
    #[inline]
    pub fn auto_rotate_interval(&self, step_size: u32) -> Duration {
        Duration::from_millis(self.auto_rotate_delay_ms.max(1) * u64::from(step_size.max(1)))
    }

    /// Never zero, same as the auto-rotation interval.
    #[inline]
    pub fn decel_time_step(&self) -> Duration {
        Duration::from_millis(self.decel_time_step_ms.max(1))
    }
}

fn default_auto_rotate_delay() -> u64 {
    64
}

fn default_auto_rotate_start_delay() -> u64 {
    100
}

fn default_vertical_scroll_ratio() -> f64 {
    4.0
}

fn default_decel_time_step() -> u64 {
    // half the auto-rotate interval
    32
}

fn default_decel() -> f64 {
    // one eighth of the decel time step
    4.0
}

fn default_max_velocity() -> f64 {
    60.0
}

fn default_reduced_step_size() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpinConfig::default();
        assert_eq!(config.auto_rotate_delay_ms, 64);
        assert_eq!(config.auto_rotate_start_delay_ms, 100);
        assert_eq!(config.vertical_scroll_ratio, 4.0);
        assert_eq!(config.decel_time_step_ms, 32);
        assert_eq!(config.decel, 4.0);
        assert_eq!(config.max_velocity, 60.0);
        assert_eq!(config.reduced_step_size, 4);
        assert!(!config.resume_auto_rotate);
    }

    #[test]
    fn test_auto_rotate_interval_scales_with_stride() {
        let config = SpinConfig::default();
        assert_eq!(config.auto_rotate_interval(1), Duration::from_millis(64));
        assert_eq!(config.auto_rotate_interval(4), Duration::from_millis(256));
        // degenerate stride is treated as one
        assert_eq!(config.auto_rotate_interval(0), Duration::from_millis(64));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: SpinConfig = toml::from_str("max_velocity = 30.0").unwrap();
        assert_eq!(config.max_velocity, 30.0);
        assert_eq!(config.auto_rotate_delay_ms, 64);
        assert_eq!(config.reduced_step_size, 4);
    }
}
