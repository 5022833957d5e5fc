// src/utils/progress_bars/progress_config.rs - Which bars and status fields a run shows
use indicatif::MultiProgress;
use log::info;
use std::env;

/// Terminal display switches, read from `PROGRESS_*`. Every switch is off when
/// `enabled` is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub enabled: bool,
    /// Per-chunk bars for the update and report stages
    pub detailed: bool,
    pub show_memory: bool,
    /// Parse cache hits in the final phase message
    pub show_cache_stats: bool,
    pub show_db_connection_stats: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            show_memory: true,
            show_cache_stats: true,
            show_db_connection_stats: true,
        }
    }
}

// Unparseable values keep the default.
fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

impl ProgressConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: flag("PROGRESS_ENABLED", defaults.enabled),
            detailed: flag("PROGRESS_DETAILED", defaults.detailed),
            show_memory: flag("PROGRESS_SHOW_MEMORY", defaults.show_memory),
            show_cache_stats: flag("PROGRESS_SHOW_CACHE_STATS", defaults.show_cache_stats),
            show_db_connection_stats: flag(
                "PROGRESS_SHOW_DB_CONNECTIONS",
                defaults.show_db_connection_stats,
            ),
        }
    }

    pub fn log_config(&self) {
        info!(
            "Progress display: enabled={} detailed={} memory={} cache_stats={} db_stats={}",
            self.enabled,
            self.detailed,
            self.show_memory,
            self.show_cache_stats,
            self.show_db_connection_stats
        );
    }

    pub fn create_multi_progress(&self) -> Option<MultiProgress> {
        self.enabled.then(MultiProgress::new)
    }

    /// The container stage bars attach to, or `None` when only the overall bar is wanted.
    pub fn stage_progress<'a>(&self, multi: Option<&'a MultiProgress>) -> Option<&'a MultiProgress> {
        multi.filter(|_| self.should_show_detailed())
    }

    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }

    pub fn should_show_cache_stats(&self) -> bool {
        self.enabled && self.show_cache_stats
    }

    pub fn should_show_db_connection_stats(&self) -> bool {
        self.enabled && self.show_db_connection_stats
    }
}
