use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ten minutes, matching the common registry default.
pub const DEFAULT_WARMUP_MS: u64 = 600_000;
pub const DEFAULT_WEIGHT: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("default weight must be positive")]
    NonPositiveDefaultWeight,
}

/// Tunables consumed from the configuration layer.
///
/// Read at construction; the collaborator may hot-reload them through
/// `SmoothWeightedRR::update_config` between selection calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Window after a candidate's start time during which its weight
    /// ramps up from 1 to the configured value. Zero disables warm-up.
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
    /// Weight applied to candidates that carry none of their own.
    #[serde(default = "default_weight")]
    pub default_weight: u32,
}

fn default_warmup_ms() -> u64 {
    DEFAULT_WARMUP_MS
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            warmup_ms: DEFAULT_WARMUP_MS,
            default_weight: DEFAULT_WEIGHT,
        }
    }
}

impl SelectorConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_weight == 0 {
            return Err(ConfigError::NonPositiveDefaultWeight);
        }
        Ok(())
    }
}
