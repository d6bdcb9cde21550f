//! Engine configuration
//!
//! Every field has a default, so a partial JSON document (or none at all) is a
//! valid configuration. Environment overrides:
//!
//! - `TALLY_FUZZY_THRESHOLD`: minimum fuzzy similarity, above 0 and up to 100 (default: 80)
//! - `TALLY_FALLBACK_ORDER`: comma separated strategies (default: `entity,category`)

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify::FallbackKind;
use crate::fuzzy::FuzzyConfig;
use crate::rule::{OperatorWeights, SpecificityConfig};

pub const ENV_FUZZY_THRESHOLD: &str = "TALLY_FUZZY_THRESHOLD";
pub const ENV_FALLBACK_ORDER: &str = "TALLY_FALLBACK_ORDER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: OperatorWeights,
    pub specificity: SpecificityConfig,
    pub fuzzy: FuzzyConfig,
    pub fallback_order: Vec<FallbackKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: OperatorWeights::default(),
            specificity: SpecificityConfig::default(),
            fuzzy: FuzzyConfig::default(),
            fallback_order: FallbackKind::default_order(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document. An out of range threshold is
    /// logged and replaced by the default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        if !FuzzyConfig::is_valid_threshold(config.fuzzy.threshold) {
            warn!(
                threshold = config.fuzzy.threshold,
                "ignoring invalid threshold in config, using default"
            );
            config.fuzzy.threshold = FuzzyConfig::default().threshold;
        }
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `TALLY_*` environment overrides on top of this configuration
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Invalid values are
    /// logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_FUZZY_THRESHOLD) {
            match raw.trim().parse::<f64>() {
                Ok(threshold) if FuzzyConfig::is_valid_threshold(threshold) => {
                    self.fuzzy.threshold = threshold;
                }
                _ => warn!(
                    key = ENV_FUZZY_THRESHOLD,
                    value = %raw,
                    "ignoring invalid threshold"
                ),
            }
        }

        if let Some(raw) = lookup(ENV_FALLBACK_ORDER) {
            let parsed: Option<Vec<FallbackKind>> = raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(FallbackKind::parse)
                .collect();
            match parsed {
                Some(order) => self.fallback_order = order,
                None => warn!(
                    key = ENV_FALLBACK_ORDER,
                    value = %raw,
                    "ignoring invalid fallback order"
                ),
            }
        }

        self
    }
}
