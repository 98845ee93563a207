//! Configuration for the handoff simulation.
//!
//! All physical constants and simulated action durations live here, loaded
//! from an optional TOML file with environment-variable overrides
//! (`HANDOFF__ROBOT__FETCH_X_M=2.0` style). Defaults reproduce the nominal
//! warehouse setup. Loading validates explicitly; there are no silent
//! fallbacks past the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error types for configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for both machines and the simulated timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HandoffConfig {
    pub robot: RobotConfig,
    pub station: StationConfig,
    pub timing: TimingConfig,
}

/// Robot-side physical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Horizontal arm offset to reach the fetch position, meters
    pub fetch_x_m: f64,
    /// Vertical arm offset to reach the fetch position, meters
    pub fetch_y_m: f64,
    /// Mass of the simulated box sensed after placement, kilograms
    pub box_mass_kg: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            fetch_x_m: 1.5,
            fetch_y_m: 1.0,
            box_mass_kg: 5.0,
        }
    }
}

/// Station-side physical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Belt position at which the robot is permitted to grip, meters
    pub fetch_position_m: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            fetch_position_m: 10.0,
        }
    }
}

/// Nominal durations of the simulated physical actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub move_to_waiting_ms: u64,
    pub move_to_loading_ms: u64,
    pub extend_arm_ms: u64,
    pub grip_ms: u64,
    pub place_ms: u64,
    pub move_to_idle_ms: u64,
    pub transport_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_to_waiting_ms: 1000,
            move_to_loading_ms: 1000,
            extend_arm_ms: 1000,
            grip_ms: 1000,
            place_ms: 1500,
            move_to_idle_ms: 2000,
            transport_ms: 2000,
        }
    }
}

impl TimingConfig {
    pub fn move_to_waiting(&self) -> Duration {
        Duration::from_millis(self.move_to_waiting_ms)
    }

    pub fn move_to_loading(&self) -> Duration {
        Duration::from_millis(self.move_to_loading_ms)
    }

    pub fn extend_arm(&self) -> Duration {
        Duration::from_millis(self.extend_arm_ms)
    }

    pub fn grip(&self) -> Duration {
        Duration::from_millis(self.grip_ms)
    }

    pub fn place(&self) -> Duration {
        Duration::from_millis(self.place_ms)
    }

    pub fn move_to_idle(&self) -> Duration {
        Duration::from_millis(self.move_to_idle_ms)
    }

    pub fn transport(&self) -> Duration {
        Duration::from_millis(self.transport_ms)
    }
}

impl HandoffConfig {
    /// Load configuration from `config/handoff.toml` (if present) and
    /// `HANDOFF__*` environment variables, then validate.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file path plus environment
    /// overrides, then validate.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => builder.add_source(config::File::with_name("config/handoff").required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix("HANDOFF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: HandoffConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject physically meaningless values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.robot.fetch_x_m < 0.0 || self.robot.fetch_y_m < 0.0 {
            return Err(ConfigurationError::Invalid(
                "robot fetch offsets must be non-negative".to_string(),
            ));
        }
        if self.robot.box_mass_kg <= 0.0 {
            return Err(ConfigurationError::Invalid(
                "box mass must be positive".to_string(),
            ));
        }
        if self.station.fetch_position_m <= 0.0 {
            return Err(ConfigurationError::Invalid(
                "station fetch position must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
