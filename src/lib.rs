// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;

pub use crate::config::EngineConfig;
pub use crate::core::dictionary::FeatureVector;
pub use crate::core::engine::{GroupPlacement, ProfileEngine};
pub use crate::core::group::RecipeGroup;
pub use crate::core::ranker::{Scored, SimilarityRanker, SortOrder};
pub use crate::core::types::{FeatureKind, Ingredient, Recipe, Step};
pub use crate::core::vectorizer::{EmptyRecipePolicy, FeatureVectorizer};
pub use crate::error::{ProfileError, Result};
pub use crate::learning::{AggregationPolicy, Weighting};
