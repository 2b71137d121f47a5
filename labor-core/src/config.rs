use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::LaborId;

/// Run about once a day.
pub const DEFAULT_INTERVAL_TICKS: u64 = 1200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("labor {labor}: minimum {minimum} exceeds maximum {maximum}")]
    InvertedBounds {
        labor: LaborId,
        minimum: u32,
        maximum: u32,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inclusive headcount bounds for one labor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct LaborBounds {
    pub minimum: u32,
    pub maximum: u32,
}

impl LaborBounds {
    pub fn new(minimum: u32, maximum: u32) -> Self {
        Self { minimum, maximum }
    }
}

/// Per-labor bounds applied on top of the registry defaults.
pub type LaborOverrides = BTreeMap<LaborId, LaborBounds>;

/// Settings read once when the controller is initialized.
///
/// Persisting these is the host's job; the controller only consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLaborConfig {
    /// Minimum ticks between two passes.
    pub interval_ticks: u64,
    /// Whether the controller starts enabled.
    pub enabled: bool,
    pub overrides: LaborOverrides,
}

impl Default for LazyLaborConfig {
    fn default() -> Self {
        Self {
            interval_ticks: DEFAULT_INTERVAL_TICKS,
            enabled: true,
            overrides: LaborOverrides::new(),
        }
    }
}

impl LazyLaborConfig {
    /// Parse a config such as
    /// `{"interval_ticks": 600, "overrides": {"mine": {"minimum": 4, "maximum": 10}}}`.
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&labor, bounds) in &self.overrides {
            if bounds.minimum > bounds.maximum {
                return Err(ConfigError::InvertedBounds {
                    labor,
                    minimum: bounds.minimum,
                    maximum: bounds.maximum,
                });
            }
        }
        Ok(())
    }
}
