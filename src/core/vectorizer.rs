// File: src/core/vectorizer.rs
use crate::core::dictionary::FeatureVector;
use crate::core::tokenizer::tokenize;
use crate::core::types::{FeatureKind, Recipe, RecipeId};
use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with a recipe that lists no ingredients or no steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyRecipePolicy {
    /// Fail with `ProfileError::EmptyInput`.
    #[default]
    Reject,
    /// Vectorize anyway; the missing family contributes an empty vector.
    ZeroContribution,
}

/// Raw per-recipe feature counts.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFeatures {
    pub recipe_id: RecipeId,
    pub ingredients: FeatureVector,
    pub cuisine: FeatureVector,
    pub preparation: FeatureVector,
    pub techniques: FeatureVector,
    pub prep_time: Duration,
    pub cook_time: Duration,
}

impl RecipeFeatures {
    pub fn feature(&self, kind: FeatureKind) -> &FeatureVector {
        match kind {
            FeatureKind::Ingredients => &self.ingredients,
            FeatureKind::Cuisine => &self.cuisine,
            FeatureKind::Preparation => &self.preparation,
            FeatureKind::Techniques => &self.techniques,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorizer {
    empty_recipes: EmptyRecipePolicy,
}

impl FeatureVectorizer {
    pub fn new(empty_recipes: EmptyRecipePolicy) -> Self {
        Self { empty_recipes }
    }

    pub fn empty_recipe_policy(&self) -> EmptyRecipePolicy {
        self.empty_recipes
    }

    pub fn vectorize(&self, recipe: &Recipe) -> Result<RecipeFeatures> {
        if self.empty_recipes == EmptyRecipePolicy::Reject {
            if recipe.ingredients.is_empty() {
                return Err(ProfileError::EmptyInput { field: "ingredients" });
            }
            if recipe.steps.is_empty() {
                return Err(ProfileError::EmptyInput { field: "steps" });
            }
        }

        // Durations first so a malformed recipe fails before any counting.
        let prep_time = parse_duration("prep_time", &recipe.prep_time)?;
        let cook_time = parse_duration("cook_time", &recipe.cook_time)?;

        let mut ingredients = FeatureVector::new();
        for ingredient in &recipe.ingredients {
            ingredients.increment(&ingredient.name, 1.0);
        }

        let mut cuisine = FeatureVector::new();
        cuisine.increment(&recipe.cuisine.to_lowercase(), 1.0);

        let text = recipe
            .steps
            .iter()
            .map(|step| step.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut preparation = FeatureVector::new();
        for token in tokenize(&text) {
            preparation.increment(&token, 1.0);
        }

        let mut techniques = FeatureVector::new();
        for step in &recipe.steps {
            techniques.increment(step.technique_id.as_deref().unwrap_or(""), 1.0);
        }

        Ok(RecipeFeatures {
            recipe_id: recipe.id.clone(),
            ingredients,
            cuisine,
            preparation,
            techniques,
            prep_time,
            cook_time,
        })
    }
}

/// Parses `HH:MM:SS`. Hours may exceed 23; minutes and seconds must be below 60.
pub fn parse_duration(field: &'static str, value: &str) -> Result<Duration> {
    let malformed = || ProfileError::Parse {
        field,
        value: value.to_string(),
    };

    let mut parts = value.trim().split(':');
    let mut next = || -> Result<u64> {
        let part = parts.next().ok_or_else(malformed)?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse::<u64>().map_err(|_| malformed())
    };
    let hours = next()?;
    let minutes = next()?;
    let seconds = next()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return Err(malformed());
    }

    let total = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(malformed)?;
    Ok(Duration::from_secs(total))
}
