// File: src/core/ranker.rs
use crate::core::group::RecipeGroup;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An item paired with its similarity to some query. Only lives for a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub item: T,
    pub score: f64,
}

impl<T> Scored<T> {
    pub fn new(item: T, score: f64) -> Self {
        Self { item, score }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Best match first.
    #[default]
    Descending,
    /// Least similar first.
    Ascending,
}

/// Orders scored groups. The sort is stable: equal scores keep their input
/// order. NaN scores go last in either direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker {
    order: SortOrder,
}

impl SimilarityRanker {
    pub fn new(order: SortOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn rank<T>(&self, mut scored: Vec<Scored<T>>) -> Vec<Scored<T>> {
        scored.sort_by(|a, b| self.compare(a.score, b.score));
        scored
    }

    pub fn rank_top<T>(&self, scored: Vec<Scored<T>>, k: usize) -> Vec<Scored<T>> {
        let mut ranked = self.rank(scored);
        ranked.truncate(k);
        ranked
    }

    /// Scores every group against `query` with `scorer`, then ranks them.
    pub fn rank_against<'g, Q, I, F>(&self, query: &Q, groups: I, scorer: F) -> Vec<Scored<&'g RecipeGroup>>
    where
        Q: ?Sized,
        I: IntoIterator<Item = &'g RecipeGroup>,
        F: Fn(&Q, &RecipeGroup) -> f64,
    {
        let scored = groups
            .into_iter()
            .map(|group| Scored::new(group, scorer(query, group)))
            .collect();
        self.rank(scored)
    }

    fn compare(&self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self.order {
                    SortOrder::Descending => ord.reverse(),
                    SortOrder::Ascending => ord,
                }
            }
        }
    }
}
