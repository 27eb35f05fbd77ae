use crate::config::EngineConfig;
use crate::core::group::RecipeGroup;
use crate::core::ranker::{Scored, SimilarityRanker};
use crate::core::similarity::group_similarity;
use crate::core::types::{Recipe, RecipeId};
use crate::core::vectorizer::FeatureVectorizer;
use crate::error::{ProfileError, Result};
use crate::persistence::{load_from_disk, save_to_disk, ProfileSnapshot};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Where `record_recipe` put a recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupPlacement {
    /// The recipe started a new group at this index.
    Seeded(usize),
    /// The recipe was folded into the existing group at `index`.
    Joined { index: usize, score: f64 },
}

// One engine per user profile. Callers serialize mutations per profile;
// nothing here is shared across threads.
pub struct ProfileEngine {
    groups: Vec<RecipeGroup>,
    vectorizer: FeatureVectorizer,
    ranker: SimilarityRanker,
    config: EngineConfig,
    snapshot_path: Option<PathBuf>,
}

impl ProfileEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_groups(config, Vec::new())
    }

    pub fn with_groups(config: EngineConfig, groups: Vec<RecipeGroup>) -> Result<Self> {
        config.validate()?;
        for group in &groups {
            group.validate()?;
        }
        Ok(Self {
            groups,
            vectorizer: FeatureVectorizer::new(config.empty_recipes),
            ranker: SimilarityRanker::new(config.order),
            config,
            snapshot_path: None,
        })
    }

    /// Restores the profile saved at `path`, or starts empty if there is none
    /// or it cannot be read. An unreadable file is first renamed to
    /// `<path>.corrupt` so the next `save` cannot overwrite it. Later `save`
    /// calls write back to `path`.
    pub fn from_file_or_new(path: &Path, config: EngineConfig) -> Result<Self> {
        let groups = match load_from_disk(path) {
            Ok(snapshot) => {
                info!("loaded {} groups from {}", snapshot.groups.len(), path.display());
                snapshot.groups
            }
            Err(ProfileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no profile at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                let aside = corrupt_path(path);
                fs::rename(path, &aside)?;
                warn!(
                    "could not load profile from {}: {}; moved it to {} and starting empty",
                    path.display(),
                    e,
                    aside.display()
                );
                Vec::new()
            }
        };
        let mut engine = Self::with_groups(config, groups)?;
        engine.snapshot_path = Some(path.to_path_buf());
        Ok(engine)
    }

    pub fn groups(&self) -> &[RecipeGroup] {
        &self.groups
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Folds `recipe` into the most similar group when that group scores at
    /// least `assign_threshold`, otherwise seeds a new group with it.
    pub fn record_recipe(&mut self, recipe: &Recipe) -> Result<GroupPlacement> {
        let features = self.vectorizer.vectorize(recipe)?;
        let candidate = RecipeGroup::from_features(features.clone());

        let mut best: Option<(usize, f64)> = None;
        for (idx, group) in self.groups.iter().enumerate() {
            let score = group_similarity(&candidate, group, &self.config.feature_weights);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((index, score)) if score >= self.config.assign_threshold => {
                self.groups[index].add_features(features, &self.config.policy)?;
                debug!("recipe '{}' joined group {} (score {:.3})", recipe.id, index, score);
                Ok(GroupPlacement::Joined { index, score })
            }
            _ => {
                self.groups.push(candidate);
                let index = self.groups.len() - 1;
                info!("recipe '{}' seeded group {}", recipe.id, index);
                Ok(GroupPlacement::Seeded(index))
            }
        }
    }

    /// Merges the group at `from` into the group at `into` and drops `from`.
    /// Returns the merged group's index after removal.
    pub fn merge_groups(&mut self, into: usize, from: usize) -> Result<usize> {
        let len = self.groups.len();
        for index in [into, from] {
            if index >= len {
                return Err(ProfileError::GroupIndex { index, len });
            }
        }
        if into == from {
            return Err(ProfileError::GroupIndex { index: from, len });
        }

        let target = self.merge_pair(into, from)?;
        info!("merged group {} into group {}", from, into);
        Ok(target)
    }

    // Callers guarantee both indices are in bounds and distinct.
    fn merge_pair(&mut self, into: usize, from: usize) -> Result<usize> {
        let merged = self.groups[into].merged(&self.groups[from], &self.config.policy)?;
        self.groups[into] = merged;
        self.groups.remove(from);
        Ok(if from < into { into - 1 } else { into })
    }

    /// Repeatedly merges the most similar pair of groups while their score is
    /// at least `threshold`. Returns how many merges happened.
    pub fn consolidate(&mut self, threshold: f64) -> Result<usize> {
        let mut merges = 0;
        loop {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in 0..self.groups.len() {
                for j in (i + 1)..self.groups.len() {
                    let score = group_similarity(
                        &self.groups[i],
                        &self.groups[j],
                        &self.config.feature_weights,
                    );
                    if score >= threshold && best.map_or(true, |(_, _, top)| score > top) {
                        best = Some((i, j, score));
                    }
                }
            }
            let Some((i, j, score)) = best else {
                break;
            };
            debug!("consolidating groups {} and {} (score {:.3})", i, j, score);
            // i < j, so removing j leaves i in place
            self.merge_pair(i, j)?;
            merges += 1;
        }
        Ok(merges)
    }

    /// Scores every group against `query` and returns the top `count`.
    pub fn recommend(&self, query: &Recipe, count: usize) -> Result<Vec<Scored<&RecipeGroup>>> {
        let candidate = RecipeGroup::create(query, &self.vectorizer)?;
        let weights = self.config.feature_weights;
        let mut ranked = self
            .ranker
            .rank_against(&candidate, &self.groups, |q, g| group_similarity(q, g, &weights));
        ranked.truncate(count);
        Ok(ranked)
    }

    /// Recipe IDs of the recommended groups, in rank order.
    pub fn recommended_recipe_ids(&self, query: &Recipe, count: usize) -> Result<Vec<RecipeId>> {
        Ok(self
            .recommend(query, count)?
            .into_iter()
            .flat_map(|scored| scored.item.recipe_ids().iter().cloned())
            .collect())
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot::new(self.groups.clone())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            save_to_disk(&self.snapshot(), path)?;
            info!("saved {} groups to {}", self.groups.len(), path.display());
        }
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}
