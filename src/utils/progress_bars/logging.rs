// src/utils/progress_bars/logging.rs - Stage-tagged logging for bulk runs
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    HierarchyLoad,
    BulkUpdate,
    ReportExport,
}

#[derive(Clone)]
pub struct ResolutionLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl ResolutionLogger {
    pub fn new(stage: ResolutionStage) -> Self {
        let (stage_name, stage_emoji) = match stage {
            ResolutionStage::HierarchyLoad => ("HIERARCHY", "🗺️"),
            ResolutionStage::BulkUpdate => ("VILLAGE-UPDATE", "🏘️"),
            ResolutionStage::ReportExport => ("REPORT", "📄"),
        };
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, district: &str) {
        info!(
            "[{}] {} 🚀 Starting for district {} (run ID: {})",
            self.stage_name, self.stage_emoji, district, run_id
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name,
                self.stage_emoji,
                phase,
                details,
                elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name,
                self.stage_emoji,
                phase,
                elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_chunk(&self, chunk_num: usize, records: usize, last_slno: i32) {
        if chunk_num % 5 == 0 || chunk_num == 1 {
            info!(
                "[{}] {} 📦 Chunk {}: {} records (up to slno {})",
                self.stage_name, self.stage_emoji, chunk_num, records, last_slno
            );
        }
    }

    pub fn log_cache_results(&self, cache_hits: usize, cache_misses: usize) {
        let total = cache_hits + cache_misses;
        if total > 0 {
            let hit_rate = (cache_hits as f64 / total as f64) * 100.0;
            info!(
                "[{}] {} 💾 Address cache: {} hits, {} misses ({:.1}% hit rate)",
                self.stage_name, self.stage_emoji, cache_hits, cache_misses, hit_rate
            );
        }
    }

    pub fn log_completion(&self, seen: usize, resolved: usize, written: usize, failures: usize) {
        info!(
            "[{}] {} 🎉 COMPLETED in {:.2?}: {} records seen, {} resolved, {} written",
            self.stage_name,
            self.stage_emoji,
            self.start_time.elapsed(),
            seen,
            resolved,
            written
        );
        if failures > 0 {
            warn!(
                "[{}] {} ⚠️  {} records failed to parse and were reported as not found",
                self.stage_name, self.stage_emoji, failures
            );
        }
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_error(&self, message: &str) {
        error!("[{}] {} ❌ {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn get_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub fn log_run_summary(run_id: &str, district: &str, duration: Duration, memory_mb: u64) {
    info!("🎉 ===== ADDRESS RESOLUTION RUN COMPLETED =====");
    info!("📅 Run ID: {}", run_id);
    info!("🗺️  District: {}", district);
    info!("⏱️  Total Duration: {:.2?}", duration);
    info!("🧠 Memory in use: {} MB", memory_mb);
    info!("==============================================");
}
