// File: src/core/group.rs
use crate::core::dictionary::FeatureVector;
use crate::core::types::{FeatureKind, Recipe, RecipeId};
use crate::core::vectorizer::{FeatureVectorizer, RecipeFeatures};
use crate::error::{ProfileError, Result};
use crate::learning::AggregationPolicy;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregated feature profile of one or more recipes.
///
/// A group only comes into existence through `create`, so it always holds at
/// least one recipe. `add` and `merge` compute the complete new state before
/// replacing the old one; a failed call leaves the group untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeGroup {
    ingredients: FeatureVector,
    cuisine: FeatureVector,
    preparation: FeatureVector,
    techniques: FeatureVector,
    prep_time: Duration,
    cook_time: Duration,
    recipe_ids: Vec<RecipeId>,
}

impl RecipeGroup {
    /// Seeds a group from a single recipe. Vectors hold the raw counts.
    pub fn create(recipe: &Recipe, vectorizer: &FeatureVectorizer) -> Result<Self> {
        let features = vectorizer.vectorize(recipe)?;
        Ok(Self::from_features(features))
    }

    pub fn from_features(features: RecipeFeatures) -> Self {
        Self {
            ingredients: features.ingredients,
            cuisine: features.cuisine,
            preparation: features.preparation,
            techniques: features.techniques,
            prep_time: features.prep_time,
            cook_time: features.cook_time,
            recipe_ids: vec![features.recipe_id],
        }
    }

    /// Folds one more recipe into the group using `policy.add`.
    pub fn add(
        &mut self,
        recipe: &Recipe,
        vectorizer: &FeatureVectorizer,
        policy: &AggregationPolicy,
    ) -> Result<()> {
        let features = vectorizer.vectorize(recipe)?;
        self.add_features(features, policy)
    }

    pub fn add_features(&mut self, features: RecipeFeatures, policy: &AggregationPolicy) -> Result<()> {
        policy.add.validate("add")?;
        let (existing, incoming) = policy.add.weights(self.recipe_ids.len(), 1);
        debug!(
            "adding recipe '{}' to group of {} with weights {}:{}",
            features.recipe_id,
            self.recipe_ids.len(),
            existing,
            incoming
        );

        let mut recipe_ids = self.recipe_ids.clone();
        recipe_ids.push(features.recipe_id);

        *self = Self {
            ingredients: self.ingredients.blend(&features.ingredients, existing, incoming),
            cuisine: self.cuisine.blend(&features.cuisine, existing, incoming),
            preparation: self.preparation.blend(&features.preparation, existing, incoming),
            techniques: self.techniques.blend(&features.techniques, existing, incoming),
            prep_time: blend_duration(self.prep_time, features.prep_time, existing, incoming),
            cook_time: blend_duration(self.cook_time, features.cook_time, existing, incoming),
            recipe_ids,
        };
        Ok(())
    }

    /// Combines `other` into this group using `policy.merge`.
    /// Recipe IDs are concatenated, this group's first.
    pub fn merge(&mut self, other: &RecipeGroup, policy: &AggregationPolicy) -> Result<()> {
        *self = self.merged(other, policy)?;
        Ok(())
    }

    pub fn merged(&self, other: &RecipeGroup, policy: &AggregationPolicy) -> Result<RecipeGroup> {
        policy.merge.validate("merge")?;
        let (mine, theirs) = policy.merge.weights(self.len(), other.len());
        debug!(
            "merging group of {} with group of {} at weights {}:{}",
            self.len(),
            other.len(),
            mine,
            theirs
        );

        let mut recipe_ids = Vec::with_capacity(self.len() + other.len());
        recipe_ids.extend(self.recipe_ids.iter().cloned());
        recipe_ids.extend(other.recipe_ids.iter().cloned());

        Ok(RecipeGroup {
            ingredients: self.ingredients.blend(&other.ingredients, mine, theirs),
            cuisine: self.cuisine.blend(&other.cuisine, mine, theirs),
            preparation: self.preparation.blend(&other.preparation, mine, theirs),
            techniques: self.techniques.blend(&other.techniques, mine, theirs),
            prep_time: blend_duration(self.prep_time, other.prep_time, mine, theirs),
            cook_time: blend_duration(self.cook_time, other.cook_time, mine, theirs),
            recipe_ids,
        })
    }

    pub fn feature(&self, kind: FeatureKind) -> &FeatureVector {
        match kind {
            FeatureKind::Ingredients => &self.ingredients,
            FeatureKind::Cuisine => &self.cuisine,
            FeatureKind::Preparation => &self.preparation,
            FeatureKind::Techniques => &self.techniques,
        }
    }

    pub fn ingredients(&self) -> &FeatureVector {
        &self.ingredients
    }

    pub fn cuisine(&self) -> &FeatureVector {
        &self.cuisine
    }

    pub fn preparation(&self) -> &FeatureVector {
        &self.preparation
    }

    pub fn techniques(&self) -> &FeatureVector {
        &self.techniques
    }

    pub fn prep_time(&self) -> Duration {
        self.prep_time
    }

    pub fn cook_time(&self) -> Duration {
        self.cook_time
    }

    pub fn recipe_ids(&self) -> &[RecipeId] {
        &self.recipe_ids
    }

    /// Number of recipes folded into the group, duplicates included.
    pub fn len(&self) -> usize {
        self.recipe_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_ids.is_empty()
    }

    /// Checks a group that came from outside the process, e.g. a snapshot.
    pub fn validate(&self) -> Result<()> {
        if self.recipe_ids.is_empty() {
            return Err(ProfileError::EmptyGroup);
        }
        for kind in FeatureKind::ALL {
            self.feature(kind).validate()?;
        }
        Ok(())
    }
}

/// Moves from `a` toward `b` by `weight_b / (weight_a + weight_b)` of the gap.
/// Works in integer nanoseconds so the result stays between the inputs and
/// equal inputs come back exactly.
fn blend_duration(a: Duration, b: Duration, weight_a: f64, weight_b: f64) -> Duration {
    let (a, b) = (a.as_nanos(), b.as_nanos());
    let share = weight_b / (weight_a + weight_b);
    let nanos = if b >= a {
        a + scale(b - a, share)
    } else {
        a - scale(a - b, share)
    };
    duration_from_nanos(nanos)
}

fn scale(gap: u128, share: f64) -> u128 {
    ((gap as f64 * share).round() as u128).min(gap)
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    // Never exceeds the larger input, which was itself a valid Duration.
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}
