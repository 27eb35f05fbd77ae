// File: src/core/similarity.rs
use crate::core::dictionary::FeatureVector;
use crate::core::group::RecipeGroup;
use crate::core::types::FeatureKind;
use serde::{Deserialize, Serialize};

/// Cosine similarity with tokens matched by name. Zero when either side is all zeros.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Relative importance of each feature family in `group_similarity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub ingredients: f64,
    pub cuisine: f64,
    pub preparation: f64,
    pub techniques: f64,
}

impl FeatureWeights {
    pub fn weight(&self, kind: FeatureKind) -> f64 {
        match kind {
            FeatureKind::Ingredients => self.ingredients,
            FeatureKind::Cuisine => self.cuisine,
            FeatureKind::Preparation => self.preparation,
            FeatureKind::Techniques => self.techniques,
        }
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            ingredients: 0.5,
            cuisine: 0.2,
            preparation: 0.2,
            techniques: 0.1,
        }
    }
}

/// Weighted average of the per-family cosine similarities.
pub fn group_similarity(a: &RecipeGroup, b: &RecipeGroup, weights: &FeatureWeights) -> f64 {
    let total: f64 = FeatureKind::ALL.iter().map(|k| weights.weight(*k)).sum();
    if total <= 0.0 {
        return 0.0;
    }
    FeatureKind::ALL
        .iter()
        .map(|kind| weights.weight(*kind) * cosine_similarity(a.feature(*kind), b.feature(*kind)))
        .sum::<f64>()
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vectorizer::RecipeFeatures;
    use std::time::Duration;

    fn group(ingredients: &[&str], cuisine: &str) -> RecipeGroup {
        RecipeGroup::from_features(RecipeFeatures {
            recipe_id: String::new(),
            ingredients: FeatureVector::from_weights(ingredients.iter().map(|t| (*t, 1.0))),
            cuisine: FeatureVector::from_weights([(cuisine, 1.0)]),
            preparation: FeatureVector::from_weights([("boil", 1.0)]),
            techniques: FeatureVector::from_weights([("", 1.0)]),
            prep_time: Duration::ZERO,
            cook_time: Duration::ZERO,
        })
    }

    #[test]
    fn cosine_ignores_dictionary_order() {
        let a = FeatureVector::from_weights([("x", 1.0), ("y", 1.0)]);
        let b = FeatureVector::from_weights([("y", 1.0), ("x", 1.0)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);

        let c = FeatureVector::from_weights([("z", 3.0)]);
        assert_eq!(cosine_similarity(&a, &c), 0.0);
        assert_eq!(cosine_similarity(&a, &FeatureVector::new()), 0.0);
    }

    #[test]
    fn identical_groups_score_one() {
        let a = group(&["rice", "egg"], "thai");
        let score = group_similarity(&a, &a.clone(), &FeatureWeights::default());
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn closer_groups_score_higher() {
        let query = group(&["rice", "egg", "chili"], "thai");
        let near = group(&["rice", "egg"], "thai");
        let far = group(&["flour", "butter"], "french");
        let weights = FeatureWeights::default();
        assert!(group_similarity(&query, &near, &weights) > group_similarity(&query, &far, &weights));
    }

    #[test]
    fn zero_weights_score_zero() {
        let a = group(&["rice"], "thai");
        let weights = FeatureWeights {
            ingredients: 0.0,
            cuisine: 0.0,
            preparation: 0.0,
            techniques: 0.0,
        };
        assert_eq!(group_similarity(&a, &a, &weights), 0.0);
    }
}
