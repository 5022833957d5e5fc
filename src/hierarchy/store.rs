// src/hierarchy/store.rs - Read-only lookup of loaded district hierarchies
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::models::hierarchy::District;

/// Source of reference hierarchies. Lookups are case-insensitive on the district name.
pub trait HierarchyStore: Send + Sync {
    fn get_hierarchy(&self, district_name: &str) -> Option<Arc<District>>;

    /// Loaded district names, in a stable order.
    fn district_names(&self) -> Vec<String>;
}

fn store_key(district_name: &str) -> String {
    district_name.trim().to_lowercase()
}

/// Hierarchies held in memory after a one-time load. Immutable once shared.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHierarchyStore {
    districts: HashMap<String, Arc<District>>,
}

impl InMemoryHierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, district: District) {
        debug!(
            "Registered hierarchy for district '{}' ({} mandals, {} villages)",
            district.name,
            district.mandals.len(),
            district.village_count()
        );
        self.districts
            .insert(store_key(&district.name), Arc::new(district));
    }

    pub fn insert_json(&mut self, district_name: &str, json: &str) -> Result<()> {
        let district = District::from_json(district_name, json)
            .with_context(|| format!("Failed to parse hierarchy for district {}", district_name))?;
        self.insert(district);
        Ok(())
    }

    /// Loads every `*.json` file in `dir`; the file stem is the district name.
    pub fn from_json_dir(dir: &Path) -> Result<Self> {
        let mut store = Self::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read hierarchy directory {}", dir.display()))?;

        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list hierarchy directory {}", dir.display()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(district_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read hierarchy file {}", path.display()))?;
            store.insert_json(district_name, &json)?;
        }

        info!(
            "Loaded {} district hierarchies from {}",
            store.len(),
            dir.display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

impl HierarchyStore for InMemoryHierarchyStore {
    fn get_hierarchy(&self, district_name: &str) -> Option<Arc<District>> {
        self.districts.get(&store_key(district_name)).cloned()
    }

    fn district_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.districts.values().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{ADILABAD_JSON, NIRMAL_JSON};

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut store = InMemoryHierarchyStore::new();
        store.insert_json("Adilabad", ADILABAD_JSON).unwrap();

        assert!(store.get_hierarchy("adilabad").is_some());
        assert!(store.get_hierarchy("  ADILABAD ").is_some());
        assert!(store.get_hierarchy("Nirmal").is_none());
    }

    #[test]
    fn test_from_json_dir_uses_file_stems() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Adilabad.json"), ADILABAD_JSON).unwrap();
        std::fs::write(dir.path().join("Nirmal.json"), NIRMAL_JSON).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = InMemoryHierarchyStore::from_json_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.district_names(), vec!["Adilabad", "Nirmal"]);
        assert_eq!(
            store.get_hierarchy("nirmal").map(|d| d.mandals.len()),
            Some(3)
        );
    }

    #[test]
    fn test_from_json_dir_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();
        assert!(InMemoryHierarchyStore::from_json_dir(dir.path()).is_err());
    }
}
