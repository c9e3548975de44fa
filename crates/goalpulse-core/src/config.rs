//! TOML-based engine configuration.
//!
//! Holds the tunables the dashboards use:
//! - Fallback streak threshold for goals without their own
//! - Consistency windows shown on goal cards
//! - Whether to add recency-weighted consistency, and its half-life
//!
//! Every field has a default, so an empty document is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, CoreError, Result};
use crate::stats::ConsistencyParams;

/// Streak configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Threshold for goals with number tasks and no threshold of their own.
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
}

/// Consistency configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    #[serde(default = "default_windows")]
    pub windows: Vec<i64>,
    /// Also report recency-weighted figures.
    #[serde(default = "default_true")]
    pub weighted: bool,
    #[serde(default = "default_half_life")]
    pub half_life_days: f64,
}

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
}

// Default functions
fn default_threshold() -> f64 {
    100.0
}
fn default_windows() -> Vec<i64> {
    vec![7, 30, 90]
}
fn default_half_life() -> f64 {
    7.0
}
fn default_true() -> bool {
    true
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
        }
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            windows: default_windows(),
            weighted: true,
            half_life_days: default_half_life(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self).map_err(ConfigError::from)?)
    }

    /// Reject thresholds outside [0, 100], non-positive windows and
    /// non-positive half-lives.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.streak.default_threshold) {
            return Err(CoreError::invalid(
                "streak.default_threshold",
                format!(
                    "must be within 0..=100, got {}",
                    self.streak.default_threshold
                ),
            ));
        }
        for params in self.consistency_params(self.streak.default_threshold) {
            params.validate()?;
        }
        Ok(())
    }

    /// One parameter set per configured window and mode, simple first.
    pub fn consistency_params(&self, threshold: f64) -> Vec<ConsistencyParams> {
        let mut params: Vec<ConsistencyParams> = self
            .consistency
            .windows
            .iter()
            .map(|w| ConsistencyParams::simple(*w, threshold))
            .collect();

        if self.consistency.weighted {
            let h = self.consistency.half_life_days;
            params.extend(
                self.consistency
                    .windows
                    .iter()
                    .map(|w| ConsistencyParams::weighted(*w, h, threshold)),
            );
        }
        params
    }
}
