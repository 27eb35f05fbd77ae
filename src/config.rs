// File: src/config.rs
use crate::core::ranker::SortOrder;
use crate::core::similarity::FeatureWeights;
use crate::core::types::FeatureKind;
use crate::core::vectorizer::EmptyRecipePolicy;
use crate::error::{ProfileError, Result};
use crate::learning::AggregationPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Path of a JSON `EngineConfig`.
pub const CONFIG_ENV: &str = "RECIPE_PROFILE_CONFIG";
/// Path of the profile snapshot.
pub const SNAPSHOT_ENV: &str = "RECIPE_PROFILE_SNAPSHOT";
pub const DEFAULT_SNAPSHOT_PATH: &str = "recipe_profile.bin";

const DEFAULT_ASSIGN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policy: AggregationPolicy,
    pub empty_recipes: EmptyRecipePolicy,
    /// A new recipe joins its most similar group when the score reaches this;
    /// otherwise it seeds a group of its own.
    pub assign_threshold: f64,
    pub order: SortOrder,
    pub feature_weights: FeatureWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: AggregationPolicy::default(),
            empty_recipes: EmptyRecipePolicy::default(),
            assign_threshold: DEFAULT_ASSIGN_THRESHOLD,
            order: SortOrder::default(),
            feature_weights: FeatureWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file named by `RECIPE_PROFILE_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        if !self.assign_threshold.is_finite() {
            return Err(ProfileError::Config(format!(
                "assign_threshold must be finite, got {}",
                self.assign_threshold
            )));
        }
        for kind in FeatureKind::ALL {
            let weight = self.feature_weights.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ProfileError::Config(format!(
                    "feature weight for {:?} must be finite and non-negative, got {}",
                    kind, weight
                )));
            }
        }
        Ok(())
    }
}
