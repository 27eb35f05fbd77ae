// File: src/learning.rs
use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};

/// How much an existing aggregate counts against what is folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Weighting {
    /// Constant weights regardless of how many recipes each side holds.
    Fixed { existing: f64, incoming: f64 },
    /// Each side weighs as many recipes as it represents.
    ByRecipeCount,
}

impl Weighting {
    /// Returns `(existing_weight, incoming_weight)` for aggregates holding
    /// `existing_count` and `incoming_count` recipes.
    pub fn weights(&self, existing_count: usize, incoming_count: usize) -> (f64, f64) {
        match *self {
            Weighting::Fixed { existing, incoming } => (existing, incoming),
            Weighting::ByRecipeCount => (existing_count as f64, incoming_count as f64),
        }
    }

    /// Rejects fixed weights that are not finite and positive.
    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        if let Weighting::Fixed { existing, incoming } = *self {
            let valid = |w: f64| w.is_finite() && w > 0.0;
            if !valid(existing) || !valid(incoming) {
                return Err(ProfileError::Config(format!(
                    "{} weights must be finite and positive, got {}:{}",
                    name, existing, incoming
                )));
            }
        }
        Ok(())
    }
}

/// The fold-in rules used by `RecipeGroup::add` and `RecipeGroup::merge`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    pub add: Weighting,
    pub merge: Weighting,
}

impl AggregationPolicy {
    /// The existing group counts double against a single added recipe;
    /// merged groups count equally.
    pub const DEFAULT_ADD: Weighting = Weighting::Fixed {
        existing: 2.0,
        incoming: 1.0,
    };
    pub const DEFAULT_MERGE: Weighting = Weighting::Fixed {
        existing: 1.0,
        incoming: 1.0,
    };

    /// Running mean on add, recipe-count weighted blend on merge.
    pub fn running_mean() -> Self {
        Self {
            add: Weighting::ByRecipeCount,
            merge: Weighting::ByRecipeCount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.add.validate("add")?;
        self.merge.validate("merge")
    }
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            add: Self::DEFAULT_ADD,
            merge: Self::DEFAULT_MERGE,
        }
    }
}
