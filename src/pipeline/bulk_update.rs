// src/pipeline/bulk_update.rs - Resolve every unit address and write back the village
use anyhow::{Context, Result};
use indicatif::MultiProgress;
use log::info;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::pipeline::parse_pool::{create_shared_cache, parse_addresses_ordered, ParseOutcome};
use crate::records::store::UnitRecordStore;
use crate::service::address_parse::AddressParseService;
use crate::utils::bulk_config::BulkConfig;
use crate::utils::progress_bars::logging::{ResolutionLogger, ResolutionStage};
use crate::utils::progress_bars::stage_bar;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkUpdateStats {
    pub run_id: String,
    pub chunks: usize,
    pub records_seen: usize,
    pub parsed: usize,
    pub cache_hits: usize,
    pub skipped: usize,
    pub failures: usize,
    /// Records whose village resolved to a single name.
    pub villages_resolved: usize,
    /// Rows the store reported as written; zero on a dry run.
    pub rows_updated: usize,
    pub dry_run: bool,
}

impl BulkUpdateStats {
    fn tally(&mut self, outcome: &ParseOutcome) {
        match outcome {
            ParseOutcome::Parsed(_) => self.parsed += 1,
            ParseOutcome::Cached(_) => self.cache_hits += 1,
            ParseOutcome::Skipped => self.skipped += 1,
            ParseOutcome::Failed { .. } => self.failures += 1,
        }
    }
}

/// Pages through every unit record by ascending `slno`, resolves its address in the
/// configured district and writes back villages that resolved to exactly one name.
pub async fn update_all_units_village(
    store: &dyn UnitRecordStore,
    service: Arc<AddressParseService>,
    config: &BulkConfig,
    dry_run: bool,
    multi_progress: Option<&MultiProgress>,
) -> Result<BulkUpdateStats> {
    let run_id = Uuid::new_v4().to_string();
    let logger = ResolutionLogger::new(ResolutionStage::BulkUpdate);
    logger.log_start(&run_id, &config.district);
    if dry_run {
        logger.log_warning("DRY RUN: no village will be written");
    }

    let district: Arc<str> = Arc::from(config.district.as_str());
    let cache = config.cache_enabled.then(create_shared_cache);
    let pb = stage_bar(
        multi_progress,
        0,
        "  🏘️  [{elapsed_precise}] {spinner} {pos} records resolved {msg}",
    );

    let mut stats = BulkUpdateStats {
        run_id,
        dry_run,
        ..Default::default()
    };
    let mut last_slno = 0;

    loop {
        let chunk = store
            .fetch_next_chunk(last_slno, config.chunk_size)
            .await
            .with_context(|| format!("Failed to fetch unit records after slno {}", last_slno))?;
        let Some(last) = chunk.last() else {
            break;
        };
        last_slno = last.slno;
        stats.chunks += 1;
        stats.records_seen += chunk.len();
        logger.log_chunk(stats.chunks, chunk.len(), last_slno);

        let addresses = chunk.iter().map(|r| r.unit_address.clone()).collect();
        let outcomes = parse_addresses_ordered(
            service.clone(),
            district.clone(),
            addresses,
            cache.clone(),
            config.workers,
        )
        .await;

        let mut updates: Vec<(i32, String)> = Vec::new();
        for (record, outcome) in chunk.iter().zip(outcomes.iter()) {
            stats.tally(outcome);
            if let Some(village) = outcome.result().and_then(|r| r.village_name()) {
                updates.push((record.slno, village.to_string()));
            }
        }
        stats.villages_resolved += updates.len();

        if !dry_run {
            for batch in updates.chunks(config.update_batch_size.max(1)) {
                stats.rows_updated += store
                    .batch_update_village(batch)
                    .await
                    .context("Failed to write resolved villages")?;
            }
        } else if !updates.is_empty() {
            logger.log_debug(&format!(
                "DRY RUN: would update {} units in chunk {}",
                updates.len(),
                stats.chunks
            ));
        }

        if let Some(pb) = &pb {
            pb.inc(chunk.len() as u64);
            pb.set_message(format!(
                "({} villages, {} failures)",
                stats.villages_resolved, stats.failures
            ));
        }
    }

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("({} villages resolved)", stats.villages_resolved));
    }
    if let Some(cache) = &cache {
        let (hits, misses, entries) = cache.stats();
        logger.log_cache_results(hits, misses);
        info!("Address cache held {} distinct addresses", entries);
    }
    logger.log_completion(
        stats.records_seen,
        stats.villages_resolved,
        stats.rows_updated,
        stats.failures,
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::policy::MatchPolicy;
    use crate::records::store::{InMemoryUnitRecordStore, UnitRecord};
    use crate::test_fixtures::adilabad_store;

    fn unit(slno: i32, address: Option<&str>) -> UnitRecord {
        UnitRecord {
            slno,
            unit_name: Some(format!("Unit {}", slno)),
            unit_address: address.map(str::to_string),
            village: None,
            district: Some("Adilabad".into()),
        }
    }

    fn records() -> InMemoryUnitRecordStore {
        InMemoryUnitRecordStore::new(vec![
            unit(1, Some("H.No 4-12, Muthnoor (V), Indervelly Mandal")),
            unit(2, Some("gundala ichoda bela road")),
            unit(3, None),
            unit(4, Some("H.No 4-12, Muthnoor (V), Indervelly Mandal")),
            unit(7, Some("waghapur mavala")),
        ])
    }

    fn config(district: &str) -> BulkConfig {
        BulkConfig {
            district: district.to_string(),
            chunk_size: 2,
            workers: 2,
            update_batch_size: 1,
            cache_enabled: true,
        }
    }

    fn service() -> Arc<AddressParseService> {
        Arc::new(AddressParseService::new(adilabad_store(), MatchPolicy::default()))
    }

    #[tokio::test]
    async fn test_bulk_update_writes_single_villages() {
        let store = records();
        let stats = update_all_units_village(&store, service(), &config("Adilabad"), false, None)
            .await
            .unwrap();

        assert_eq!(stats.chunks, 3);
        assert_eq!(stats.records_seen, 5);
        assert_eq!(stats.parsed, 3);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.villages_resolved, 3);
        assert_eq!(stats.rows_updated, 3);

        assert_eq!(
            store.applied_updates().await,
            vec![
                (1, "Muthnur".to_string()),
                (4, "Muthnur".to_string()),
                (7, "Waghapur".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = records();
        let stats = update_all_units_village(&store, service(), &config("Adilabad"), true, None)
            .await
            .unwrap();
        assert!(stats.dry_run);
        assert_eq!(stats.villages_resolved, 3);
        assert_eq!(stats.rows_updated, 0);
        assert!(store.applied_updates().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_district_counts_failures_and_continues() {
        let store = records();
        let stats = update_all_units_village(&store, service(), &config("Warangal"), false, None)
            .await
            .unwrap();
        assert_eq!(stats.records_seen, 5);
        assert_eq!(stats.failures, 4);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.rows_updated, 0);
    }
}
