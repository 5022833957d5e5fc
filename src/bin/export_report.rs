// src/bin/export_report.rs - Write a CSV of detected villages for a slice of units
use address_resolver_lib::hierarchy::loader::{load_hierarchy_store, HierarchySource};
use address_resolver_lib::matching::policy::MatchPolicy;
use address_resolver_lib::pipeline::report::export_report;
use address_resolver_lib::records::store::PgUnitRecordStore;
use address_resolver_lib::service::address_parse::AddressParseService;
use address_resolver_lib::utils::bulk_config::BulkConfig;
use address_resolver_lib::utils::db_connect::connect;
use address_resolver_lib::utils::env::load_env;
use address_resolver_lib::utils::progress_bars::progress_config::ProgressConfig;
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about = "Export the address resolution report", long_about = None)]
struct Args {
    /// Start after this slno (0 starts from the beginning)
    #[arg(long, default_value_t = 0)]
    start_after: i32,

    /// Number of units to include
    #[arg(long, default_value_t = 10)]
    total: usize,

    /// Output file; defaults to a timestamped name in the working directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// District to resolve addresses in (overrides RESOLVER_DISTRICT)
    #[arg(long)]
    district: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    load_env();

    let config = BulkConfig::from_env().with_district(args.district);
    config.log_config();
    let source = HierarchySource::from_env();
    source.log_config();
    let progress_config = ProgressConfig::from_env();
    progress_config.log_config();
    let multi_progress = progress_config.create_multi_progress();

    let pool = connect().await.context("Failed to connect to database")?;
    let store = load_hierarchy_store(&source, Some(&pool))
        .await
        .context("Failed to load district hierarchies")?;
    let service = Arc::new(AddressParseService::new(Arc::new(store), MatchPolicy::from_env()));

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "msme_address_report_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    let file = File::create(&output)
        .with_context(|| format!("Failed to create report file {}", output.display()))?;

    let records = PgUnitRecordStore::new(pool);
    let stats = export_report(
        &records,
        service,
        &config,
        args.start_after,
        args.total,
        BufWriter::new(file),
        progress_config.stage_progress(multi_progress.as_ref()),
    )
    .await
    .context("Report export failed")?;

    info!(
        "Wrote {} rows to {} ({} villages resolved, last slno {})",
        stats.rows_written,
        output.display(),
        stats.villages_resolved,
        stats.last_slno
    );
    Ok(())
}
