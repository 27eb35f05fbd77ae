// --- File: src/core/dictionary.rs
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A token dictionary and its weight vector, grown together.
///
/// Tokens receive dense indices in first-seen order and keep them for the
/// lifetime of the value. The only way to add a token is `index_of`, which
/// appends a zero weight in the same step, so `tokens.len() == values.len()`
/// holds after every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredVector", into = "StoredVector")]
pub struct FeatureVector {
    index: HashMap<String, usize>,
    tokens: Vec<String>,
    values: Vec<f64>,
}

/// On-disk shape: two parallel arrays. The index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct StoredVector {
    tokens: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector by accumulating each `(token, weight)` pair in order.
    pub fn from_weights<'a, I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut vector = Self::new();
        for (token, weight) in weights {
            vector.increment(token, weight);
        }
        vector
    }

    /// Gets or creates the index for `token`.
    /// A new token is appended with a zero weight.
    pub fn index_of(&mut self, token: &str) -> usize {
        if let Some(&idx) = self.index.get(token) {
            return idx;
        }
        let idx = self.tokens.len();
        self.index.insert(token.to_string(), idx);
        self.tokens.push(token.to_string());
        self.values.push(0.0);
        debug_assert_eq!(self.tokens.len(), self.values.len());
        idx
    }

    pub fn increment(&mut self, token: &str, by: f64) {
        let idx = self.index_of(token);
        self.values[idx] += by;
    }

    pub fn position(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.position(token).map(|idx| self.values[idx])
    }

    pub fn value_or_zero(&self, token: &str) -> f64 {
        self.get(token).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(token, weight)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.tokens
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// A zero-weighted vector over every token of both operands.
    /// `self`'s tokens come first in their existing order, followed by the
    /// tokens only `other` knows, in `other`'s order. Indices are compact and
    /// zero-based.
    pub fn union(&self, other: &FeatureVector) -> FeatureVector {
        let mut merged = FeatureVector::new();
        for token in self.tokens.iter().chain(other.tokens.iter()) {
            merged.index_of(token);
        }
        merged
    }

    /// Weighted mean over the union of both dictionaries:
    /// `(self_weight * self[t] + other_weight * other[t]) / (self_weight + other_weight)`,
    /// with missing tokens read as zero.
    pub fn blend(&self, other: &FeatureVector, self_weight: f64, other_weight: f64) -> FeatureVector {
        let total = self_weight + other_weight;
        let mut merged = self.union(other);
        for (idx, token) in merged.tokens.iter().enumerate() {
            let mixed = self_weight * self.value_or_zero(token)
                + other_weight * other.value_or_zero(token);
            merged.values[idx] = mixed / total;
        }
        merged
    }

    /// Dot product with tokens matched by name.
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .filter_map(|(token, value)| large.get(token).map(|v| v * value))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Checks that the dictionary and vector still describe the same slots.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.tokens.len() != self.values.len() || self.index.len() != self.tokens.len() {
            return Err(ProfileError::DictionaryInvariant {
                dictionary_len: self.index.len(),
                vector_len: self.values.len(),
            });
        }
        for (idx, token) in self.tokens.iter().enumerate() {
            if self.index.get(token) != Some(&idx) {
                return Err(ProfileError::DuplicateToken(token.clone()));
            }
        }
        Ok(())
    }
}

impl TryFrom<StoredVector> for FeatureVector {
    type Error = ProfileError;

    fn try_from(stored: StoredVector) -> Result<Self, Self::Error> {
        if stored.tokens.len() != stored.values.len() {
            return Err(ProfileError::DictionaryInvariant {
                dictionary_len: stored.tokens.len(),
                vector_len: stored.values.len(),
            });
        }
        let mut index = HashMap::with_capacity(stored.tokens.len());
        for (idx, token) in stored.tokens.iter().enumerate() {
            if index.insert(token.clone(), idx).is_some() {
                return Err(ProfileError::DuplicateToken(token.clone()));
            }
        }
        Ok(Self {
            index,
            tokens: stored.tokens,
            values: stored.values,
        })
    }
}

impl From<FeatureVector> for StoredVector {
    fn from(vector: FeatureVector) -> Self {
        Self {
            tokens: vector.tokens,
            values: vector.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_of_allocates_in_first_seen_order() {
        let mut vector = FeatureVector::new();
        assert_eq!(vector.index_of("salt"), 0);
        assert_eq!(vector.index_of("spaghetti"), 1);
        assert_eq!(vector.index_of("salt"), 0);
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.values(), &[0.0, 0.0]);
    }

    #[test]
    fn increment_accumulates_repeated_tokens() {
        let vector = FeatureVector::from_weights([("egg", 1.0), ("egg", 1.0), ("flour", 1.0)]);
        assert_eq!(vector.value_or_zero("egg"), 2.0);
        assert_eq!(vector.value_or_zero("flour"), 1.0);
        assert_eq!(vector.value_or_zero("milk"), 0.0);
        assert_eq!(vector.get("milk"), None);
    }

    #[test]
    fn union_keeps_left_order_then_appends_right_exclusive_tokens() {
        let left = FeatureVector::from_weights([("hi", 1.0), ("i", 1.0), ("am", 1.0)]);
        let right = FeatureVector::from_weights([("you", 1.0), ("hi", 1.0), ("are", 1.0)]);
        let merged = left.union(&right);
        assert_eq!(merged.tokens(), &["hi", "i", "am", "you", "are"]);
        assert!(merged.values().iter().all(|v| *v == 0.0));
        assert_eq!(merged.position("are"), Some(4));
    }

    #[test]
    fn blend_with_equal_weights_averages_each_slot() {
        let left = FeatureVector::from_weights([("hi", 1.0), ("i", 1.0), ("am", 1.0), ("ben", 1.0)]);
        let right =
            FeatureVector::from_weights([("hi", 1.0), ("you", 1.0), ("are", 1.0), ("timothe", 1.0)]);
        let merged = left.blend(&right, 1.0, 1.0);
        let expected: Vec<(&str, f64)> = vec![
            ("hi", 1.0),
            ("i", 0.5),
            ("am", 0.5),
            ("ben", 0.5),
            ("you", 0.5),
            ("are", 0.5),
            ("timothe", 0.5),
        ];
        assert_eq!(merged.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn blend_two_to_one() {
        let left = FeatureVector::from_weights([("salt", 1.0)]);
        let right = FeatureVector::from_weights([("rice", 1.0)]);
        let merged = left.blend(&right, 2.0, 1.0);
        assert!((merged.value_or_zero("salt") - 2.0 / 3.0).abs() < 1e-9);
        assert!((merged.value_or_zero("rice") - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn dot_matches_tokens_by_name_not_index() {
        let a = FeatureVector::from_weights([("x", 1.0), ("y", 2.0)]);
        let b = FeatureVector::from_weights([("y", 3.0), ("z", 5.0), ("x", 4.0)]);
        assert_eq!(a.dot(&b), 1.0 * 4.0 + 2.0 * 3.0);
        assert_eq!(a.dot(&b), b.dot(&a));
        assert!((a.norm() - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn serde_round_trip_rebuilds_index() {
        let vector = FeatureVector::from_weights([("cook", 3.0), ("the", 13.0)]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"{"tokens":["cook","the"],"values":[3.0,13.0]}"#);
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn deserialize_rejects_mismatched_lengths() {
        let err = serde_json::from_str::<FeatureVector>(r#"{"tokens":["a","b"],"values":[1.0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("2 tokens"));
    }

    #[test]
    fn deserialize_rejects_duplicate_tokens() {
        let err =
            serde_json::from_str::<FeatureVector>(r#"{"tokens":["a","a"],"values":[1.0,2.0]}"#)
                .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    proptest! {
        #[test]
        fn growth_is_monotonic_and_indices_are_stable(tokens in prop::collection::vec("[a-e]{1,2}", 0..40)) {
            let mut vector = FeatureVector::new();
            let mut seen: Vec<(String, usize)> = Vec::new();
            let mut last_len = 0;
            for token in &tokens {
                let idx = vector.index_of(token);
                prop_assert!(vector.len() >= last_len);
                last_len = vector.len();
                if let Some((_, first)) = seen.iter().find(|(t, _)| t == token) {
                    prop_assert_eq!(*first, idx);
                } else {
                    prop_assert_eq!(idx, seen.len());
                    seen.push((token.clone(), idx));
                }
            }
            prop_assert!(vector.validate().is_ok());
        }

        #[test]
        fn union_contains_every_token_once(
            left in prop::collection::vec("[a-f]", 0..12),
            right in prop::collection::vec("[a-f]", 0..12),
        ) {
            let a = FeatureVector::from_weights(left.iter().map(|t| (t.as_str(), 1.0)));
            let b = FeatureVector::from_weights(right.iter().map(|t| (t.as_str(), 1.0)));
            let merged = a.union(&b);
            prop_assert!(merged.len() >= a.len().max(b.len()));
            prop_assert!(merged.len() <= a.len() + b.len());
            prop_assert_eq!(&merged.tokens()[..a.len()], a.tokens());
            for token in a.tokens().iter().chain(b.tokens()) {
                prop_assert!(merged.position(token).is_some());
            }
            prop_assert!(merged.validate().is_ok());
        }
    }
}
