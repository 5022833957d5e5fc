// src/hierarchy/loader.rs - One-time hierarchy load from a directory or Postgres
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::hierarchy::store::InMemoryHierarchyStore;
use crate::utils::db_connect::PgPool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchySource {
    /// Directory of `<District>.json` documents.
    Directory(PathBuf),
    /// `public.district_hierarchy(district_name, hierarchy_json)`.
    Database,
}

impl HierarchySource {
    pub fn from_env() -> Self {
        match std::env::var("HIERARCHY_DIR") {
            Ok(dir) if !dir.trim().is_empty() => HierarchySource::Directory(PathBuf::from(dir)),
            _ => HierarchySource::Database,
        }
    }

    pub fn log_config(&self) {
        match self {
            HierarchySource::Directory(dir) => {
                info!("🗺️  Hierarchy source: directory {}", dir.display())
            }
            HierarchySource::Database => info!("🗺️  Hierarchy source: district_hierarchy table"),
        }
    }
}

pub async fn load_from_db(pool: &PgPool) -> Result<InMemoryHierarchyStore> {
    let conn = pool
        .get()
        .await
        .context("Failed to get DB connection for hierarchy load")?;

    let rows = conn
        .query(
            "SELECT district_name, hierarchy_json::text AS hierarchy_json
             FROM public.district_hierarchy
             ORDER BY district_name",
            &[],
        )
        .await
        .context("Failed to query district_hierarchy")?;

    let mut store = InMemoryHierarchyStore::new();
    for row in rows {
        let district_name: String = row.get("district_name");
        let json: Option<String> = row.get("hierarchy_json");
        match json {
            Some(json) => store.insert_json(&district_name, &json)?,
            None => warn!("District {} has no hierarchy document, skipping", district_name),
        }
    }

    info!("Loaded {} district hierarchies from database", store.len());
    Ok(store)
}

/// Loads every available hierarchy. A database source requires a pool.
pub async fn load_hierarchy_store(
    source: &HierarchySource,
    pool: Option<&PgPool>,
) -> Result<InMemoryHierarchyStore> {
    let store = match source {
        HierarchySource::Directory(dir) => InMemoryHierarchyStore::from_json_dir(dir)?,
        HierarchySource::Database => {
            let pool = pool.ok_or_else(|| {
                anyhow!("A database connection is required when HIERARCHY_DIR is not set")
            })?;
            load_from_db(pool).await?
        }
    };

    if store.is_empty() {
        warn!("No district hierarchies were loaded");
    }
    Ok(store)
}
