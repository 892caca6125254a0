//! Engine configuration

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// Engine tuning, fixed for the lifetime of an engine instance
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Global retention cap across all services
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Retained-sample count at which a fingerprint becomes stable
    #[serde(default = "default_min_samples_for_stable")]
    pub min_samples_for_stable: usize,

    /// Relative deviation (percent) above which drift alerts are emitted
    #[serde(default = "default_drift_threshold_pct")]
    pub drift_threshold_pct: f64,
}

fn default_max_samples() -> usize {
    1000
}

fn default_min_samples_for_stable() -> usize {
    10
}

fn default_drift_threshold_pct() -> f64 {
    50.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            min_samples_for_stable: default_min_samples_for_stable(),
            drift_threshold_pct: default_drift_threshold_pct(),
        }
    }
}

/// Configuration values the engine cannot run with
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_samples must be positive")]
    ZeroMaxSamples,

    #[error("min_samples_for_stable must be positive")]
    ZeroStableThreshold,

    #[error("drift_threshold_pct must be non-negative, got {0}")]
    NegativeDriftThreshold(f64),
}

impl EngineConfig {
    /// Load configuration from the environment (`ENGINE_` prefix),
    /// falling back to defaults for anything unset
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENGINE"))
            .build()?;

        let cfg: EngineConfig = config.try_deserialize().unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_samples == 0 {
            return Err(ConfigError::ZeroMaxSamples);
        }
        if self.min_samples_for_stable == 0 {
            return Err(ConfigError::ZeroStableThreshold);
        }
        if self.drift_threshold_pct < 0.0 {
            return Err(ConfigError::NegativeDriftThreshold(self.drift_threshold_pct));
        }
        Ok(())
    }
}
