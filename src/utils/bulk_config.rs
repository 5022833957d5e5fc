// src/utils/bulk_config.rs
use log::info;
use std::env;

/// Settings for bulk runs over the unit records table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkConfig {
    /// District every record is resolved in
    pub district: String,
    /// Records fetched per page
    pub chunk_size: usize,
    /// Concurrent parse workers
    pub workers: usize,
    /// Rows per batched village update
    pub update_batch_size: usize,
    /// Memoize results per distinct raw address for the run
    pub cache_enabled: bool,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            district: "Adilabad".to_string(),
            chunk_size: 2000,
            workers: num_cpus::get().max(2),
            update_batch_size: 500,
            cache_enabled: true,
        }
    }
}

impl BulkConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            district: env::var("RESOLVER_DISTRICT")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(defaults.district),
            chunk_size: env::var("BULK_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.chunk_size),
            workers: env::var("BULK_WORKERS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(2))
                .unwrap_or(defaults.workers),
            update_batch_size: env::var("BULK_UPDATE_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.update_batch_size),
            cache_enabled: env::var("BULK_CACHE_ENABLED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.cache_enabled),
        }
    }

    pub fn with_district(mut self, district: Option<String>) -> Self {
        if let Some(district) = district.filter(|d| !d.trim().is_empty()) {
            self.district = district;
        }
        self
    }

    pub fn log_config(&self) {
        info!("📦 Bulk run configuration:");
        info!("   District: {}", self.district);
        info!("   Chunk size: {}", self.chunk_size);
        info!("   Parse workers: {}", self.workers);
        info!("   Update batch size: {}", self.update_batch_size);
        info!(
            "   Address cache: {}",
            if self.cache_enabled { "enabled" } else { "disabled" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "RESOLVER_DISTRICT",
        "BULK_CHUNK_SIZE",
        "BULK_WORKERS",
        "BULK_UPDATE_BATCH_SIZE",
        "BULK_CACHE_ENABLED",
    ];

    #[test]
    fn test_bulk_config_env() {
        for var in VARS {
            env::remove_var(var);
        }
        let config = BulkConfig::from_env();
        assert_eq!(config, BulkConfig::default());
        assert!(config.workers >= 2);

        env::set_var("RESOLVER_DISTRICT", "Nirmal");
        env::set_var("BULK_CHUNK_SIZE", "250");
        env::set_var("BULK_WORKERS", "1");
        env::set_var("BULK_UPDATE_BATCH_SIZE", "0");
        env::set_var("BULK_CACHE_ENABLED", "false");

        let config = BulkConfig::from_env();
        assert_eq!(config.district, "Nirmal");
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.workers, 2);
        assert_eq!(config.update_batch_size, 500);
        assert!(!config.cache_enabled);

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_district_override() {
        let config = BulkConfig::default().with_district(Some("Nirmal".into()));
        assert_eq!(config.district, "Nirmal");
        let config = BulkConfig::default().with_district(Some("  ".into()));
        assert_eq!(config.district, "Adilabad");
    }
}
