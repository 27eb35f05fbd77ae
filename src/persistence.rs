// File: src/persistence.rs
use crate::core::group::RecipeGroup;
use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to restore a profile's groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub version: u32,
    pub groups: Vec<RecipeGroup>,
}

impl ProfileSnapshot {
    pub fn new(groups: Vec<RecipeGroup>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            groups,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ProfileError::Config(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        self.groups.iter().try_for_each(RecipeGroup::validate)
    }
}

/// Writes the snapshot to a temp file next to `path`, then renames it into place.
pub fn save_to_disk(snapshot: &ProfileSnapshot, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(temp_file.as_file());
    bincode::serialize_into(&mut writer, snapshot)?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<ProfileSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: ProfileSnapshot = bincode::deserialize_from(reader)?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn to_json(snapshot: &ProfileSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn from_json(json: &str) -> Result<ProfileSnapshot> {
    let snapshot: ProfileSnapshot = serde_json::from_str(json)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Ingredient, Recipe, Step};
    use crate::core::vectorizer::FeatureVectorizer;
    use crate::learning::AggregationPolicy;
    use tempfile::tempdir;

    fn sample_groups() -> Vec<RecipeGroup> {
        let vectorizer = FeatureVectorizer::default();
        let recipe = |id: &str, ingredient: &str| Recipe {
            id: id.into(),
            cuisine: "Thai".into(),
            prep_time: "00:15:00".into(),
            cook_time: "00:20:00".into(),
            ingredients: vec![Ingredient::new(ingredient)],
            steps: vec![Step::new("Stir fry quickly.").with_technique("wok")],
        };
        let mut first = RecipeGroup::create(&recipe("a", "rice"), &vectorizer).unwrap();
        first
            .add(&recipe("b", "noodles"), &vectorizer, &AggregationPolicy::default())
            .unwrap();
        let second = RecipeGroup::create(&recipe("c", "tofu"), &vectorizer).unwrap();
        vec![first, second]
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.bin");
        let snapshot = ProfileSnapshot::new(sample_groups());

        save_to_disk(&snapshot, &path).unwrap();
        let loaded = load_from_disk(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.bin");
        save_to_disk(&ProfileSnapshot::new(sample_groups()), &path).unwrap();
        save_to_disk(&ProfileSnapshot::new(Vec::new()), &path).unwrap();
        assert!(load_from_disk(&path).unwrap().groups.is_empty());
    }

    #[test]
    fn json_round_trip_and_validation() {
        let snapshot = ProfileSnapshot::new(sample_groups());
        let json = to_json(&snapshot).unwrap();
        assert!(json.contains("\"recipe_ids\""));
        let back = from_json(&json).unwrap();
        assert_eq!(back.groups.len(), 2);
        assert_eq!(back.groups[0].recipe_ids(), snapshot.groups[0].recipe_ids());
        assert_eq!(back.groups[0].prep_time(), snapshot.groups[0].prep_time());
        let expected = snapshot.groups[0].ingredients();
        let restored = back.groups[0].ingredients();
        assert_eq!(restored.tokens(), expected.tokens());
        for (a, b) in restored.values().iter().zip(expected.values()) {
            assert!((a - b).abs() < 1e-12);
        }

        let tampered = json.replacen("\"version\": 1", "\"version\": 99", 1);
        assert!(matches!(from_json(&tampered), Err(ProfileError::Config(_))));
    }

    #[test]
    fn garbage_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.bin");
        fs::write(&path, b"definitely not bincode").unwrap();
        assert!(load_from_disk(&path).is_err());
        assert!(matches!(
            load_from_disk(&dir.path().join("missing.bin")),
            Err(ProfileError::Io(_))
        ));
    }
}
