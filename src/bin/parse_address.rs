// src/bin/parse_address.rs - Resolve a single address from the command line
use address_resolver_lib::hierarchy::loader::{load_hierarchy_store, HierarchySource};
use address_resolver_lib::hierarchy::store::{HierarchyStore, InMemoryHierarchyStore};
use address_resolver_lib::matching::policy::MatchPolicy;
use address_resolver_lib::models::verdict::AdminLevel;
use address_resolver_lib::service::address_parse::AddressParseService;
use address_resolver_lib::utils::db_connect::connect;
use address_resolver_lib::utils::env::load_env;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Mandal, then village, with all fallbacks
    Full,
    /// Mandal detection only
    Mandal,
    /// Village detection only; scoped when --mandal is given
    Village,
    /// Locate the district as well
    Any,
}

#[derive(Parser)]
#[command(author, version, about = "Resolve one free-text address", long_about = None)]
struct Args {
    /// District the address belongs to
    #[arg(long, default_value = "Adilabad")]
    district: String,

    /// Raw address text
    #[arg(long)]
    address: Option<String>,

    /// Restrict village detection to this mandal
    #[arg(long)]
    mandal: Option<String>,

    #[arg(long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Directory of <District>.json hierarchy files (overrides HIERARCHY_DIR)
    #[arg(long)]
    hierarchy_dir: Option<PathBuf>,

    /// Print the mandals of the district and exit
    #[arg(long)]
    list_mandals: bool,

    /// Print the villages of --mandal and exit
    #[arg(long)]
    list_villages: bool,
}

async fn load_store(hierarchy_dir: Option<PathBuf>) -> Result<InMemoryHierarchyStore> {
    let source = match hierarchy_dir {
        Some(dir) => HierarchySource::Directory(dir),
        None => HierarchySource::from_env(),
    };
    source.log_config();
    match source {
        HierarchySource::Database => {
            let pool = connect().await.context("Failed to connect to database")?;
            load_hierarchy_store(&source, Some(&pool)).await
        }
        HierarchySource::Directory(_) => load_hierarchy_store(&source, None).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    load_env();

    let store = Arc::new(load_store(args.hierarchy_dir.clone()).await?);
    info!("Districts available: {:?}", store.district_names());

    if args.list_mandals || args.list_villages {
        let district = store
            .get_hierarchy(&args.district)
            .ok_or_else(|| anyhow!("District {} is not loaded", args.district))?;
        let output = if args.list_villages {
            let mandal = args
                .mandal
                .as_deref()
                .ok_or_else(|| anyhow!("--list-villages needs --mandal"))?;
            let villages = district
                .villages_of(mandal)
                .ok_or_else(|| anyhow!("Mandal {} not found in {}", mandal, district.name))?;
            json!({ "district": district.name, "mandal": mandal, "villages": villages })
        } else {
            json!({
                "district": district.name,
                "headquarters": district.headquarters_mandal().map(|m| m.name.as_str()),
                "villageCount": district.village_count(),
                "mandals": district.mandal_names(),
            })
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let address = args
        .address
        .as_deref()
        .ok_or_else(|| anyhow!("--address is required"))?;
    let service = AddressParseService::new(store, MatchPolicy::from_env());

    let output = match args.mode {
        Mode::Full => serde_json::to_value(service.parse(&args.district, address)?)?,
        Mode::Any => serde_json::to_value(service.parse_any_district(address))?,
        Mode::Mandal => {
            let verdict = service
                .mandal_detector()
                .detect_mandal(&args.district, address)?;
            json!({
                "mandalStatus": verdict.status().label(AdminLevel::Mandal),
                "verdict": verdict,
            })
        }
        Mode::Village => {
            let villages = service.village_detector();
            let verdict = match args.mandal.as_deref() {
                Some(mandal) => villages.detect_village(&args.district, mandal, address)?,
                None => villages.detect_village_across_district(&args.district, address)?,
            };
            json!({
                "villageStatus": verdict.status().label(AdminLevel::Village),
                "verdict": verdict,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
