use address_resolver_lib::hierarchy::loader::{load_hierarchy_store, HierarchySource};
use address_resolver_lib::matching::policy::MatchPolicy;
use address_resolver_lib::pipeline::bulk_update::update_all_units_village;
use address_resolver_lib::records::store::PgUnitRecordStore;
use address_resolver_lib::service::address_parse::AddressParseService;
use address_resolver_lib::utils::bulk_config::BulkConfig;
use address_resolver_lib::utils::db_connect::{connect, get_pool_status, PgPool};
use address_resolver_lib::utils::env::load_env;
use address_resolver_lib::utils::get_memory_usage;
use address_resolver_lib::utils::progress_bars::logging::{
    log_run_summary, ResolutionLogger, ResolutionStage,
};
use address_resolver_lib::utils::progress_bars::progress_config::ProgressConfig;
use address_resolver_lib::utils::progress_bars::stage_bar;
use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Resolve the village of every registered unit", long_about = None)]
struct Args {
    /// District to resolve addresses in (overrides RESOLVER_DISTRICT)
    #[arg(long)]
    district: Option<String>,

    /// Resolve without writing villages back
    #[arg(long)]
    dry_run: bool,
}

async fn update_main_message(pb: &ProgressBar, phase: &str, config: &ProgressConfig, pool: &PgPool) {
    let mut parts = Vec::new();
    if config.should_show_memory() {
        parts.push(format!("Memory: {} MB", get_memory_usage().await));
    }
    if config.should_show_db_connection_stats() {
        let (size, idle, open) = get_pool_status(pool);
        parts.push(format!("DB: {}/{} open, {} idle", open, size, idle));
    }
    if parts.is_empty() {
        pb.set_message(phase.to_string());
    } else {
        pb.set_message(format!("{} ({})", phase, parts.join(", ")));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("Starting unit village resolution");
    load_env();

    let config = BulkConfig::from_env().with_district(args.district);
    config.log_config();
    let policy = MatchPolicy::from_env();
    policy.log_config();
    let source = HierarchySource::from_env();
    source.log_config();

    let progress_config = ProgressConfig::from_env();
    progress_config.log_config();
    let multi_progress = progress_config.create_multi_progress();
    let main_pb = stage_bar(
        multi_progress.as_ref(),
        2,
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    );

    let run_start = Instant::now();
    let pool = connect().await.context("Failed to connect to database")?;

    // Phase 1: hierarchy
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 1: Loading hierarchies", &progress_config, &pool).await;
    }
    let hierarchy_logger = ResolutionLogger::new(ResolutionStage::HierarchyLoad);
    let store = load_hierarchy_store(&source, Some(&pool))
        .await
        .context("Failed to load district hierarchies")?;
    if store.is_empty() {
        bail!("No district hierarchies available, nothing to resolve against");
    }
    hierarchy_logger.log_phase(
        "Hierarchies loaded",
        Some(&format!("{} districts", store.len())),
    );
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    // Phase 2: resolution and write-back
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 2: Resolving villages", &progress_config, &pool).await;
    }
    let service = Arc::new(AddressParseService::new(Arc::new(store), policy));
    let records = PgUnitRecordStore::new(pool.clone());
    let stats = update_all_units_village(
        &records,
        service,
        &config,
        args.dry_run,
        progress_config.stage_progress(multi_progress.as_ref()),
    )
    .await
    .context("Village update run failed")?;
    if let Some(pb) = &main_pb {
        pb.inc(1);
        if progress_config.should_show_cache_stats() {
            pb.finish_with_message(format!(
                "Resolution complete (cache hits: {})",
                stats.cache_hits
            ));
        } else {
            pb.finish_with_message("Resolution complete");
        }
    }

    info!("Run statistics:");
    info!("  Chunks processed: {}", stats.chunks);
    info!("  Records seen: {}", stats.records_seen);
    info!(
        "  Parsed: {}, cache hits: {}, skipped: {}, failures: {}",
        stats.parsed, stats.cache_hits, stats.skipped, stats.failures
    );
    info!("  Villages resolved: {}", stats.villages_resolved);
    info!(
        "  Rows updated: {}{}",
        stats.rows_updated,
        if stats.dry_run { " (dry run)" } else { "" }
    );

    log_run_summary(
        &stats.run_id,
        &config.district,
        run_start.elapsed(),
        get_memory_usage().await,
    );
    Ok(())
}
