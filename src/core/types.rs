// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Identifier of a recipe folded into a group. Empty when the source recipe had none.
pub type RecipeId = String;

/// A recipe as handed to the engine by the surrounding application.
/// Only the fields that feed the feature vectors are carried here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub id: RecipeId,
    pub cuisine: String,
    /// `HH:MM:SS`
    pub prep_time: String,
    /// `HH:MM:SS`
    pub cook_time: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    pub text: String,
    pub technique_id: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Step {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            technique_id: None,
        }
    }

    pub fn with_technique(mut self, technique_id: impl Into<String>) -> Self {
        self.technique_id = Some(technique_id.into());
        self
    }
}

/// The four feature families every group tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Ingredients,
    Cuisine,
    Preparation,
    Techniques,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Ingredients,
        FeatureKind::Cuisine,
        FeatureKind::Preparation,
        FeatureKind::Techniques,
    ];
}
