// src/pipeline/report.rs - CSV report of detected villages and mandals per unit
use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::io::Write;
use std::sync::Arc;

use crate::models::parse_result::ParseResult;
use crate::pipeline::parse_pool::{create_shared_cache, parse_addresses_ordered, ParseOutcome};
use crate::records::store::UnitRecordStore;
use crate::service::address_parse::AddressParseService;
use crate::utils::bulk_config::BulkConfig;
use crate::utils::progress_bars::logging::{ResolutionLogger, ResolutionStage};
use crate::utils::progress_bars::stage_bar;

pub const REPORT_HEADERS: [&str; 9] = [
    "SL NO",
    "Unit Name",
    "RAW ADDRESS",
    "Village Name",
    "DETECTED VILLAGE",
    "DETECTED MANDAL",
    "DETECTED DISTRICT",
    "ADDRESS STATUS",
    "DETAILS",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub rows_written: usize,
    pub villages_resolved: usize,
    pub failures: usize,
    pub last_slno: i32,
}

fn join_or_not_found(candidates: Option<&[String]>) -> String {
    match candidates {
        Some(names) => names.join(", "),
        None => "NOT_FOUND".to_string(),
    }
}

/// Multi-line summary of both verdicts for the DETAILS cell.
pub fn build_details(result: &ParseResult) -> String {
    [
        format!("Mandal: {}", result.mandal_name().unwrap_or("")),
        format!("Mandal Status: {}", result.mandal_status_label()),
        format!(
            "Multiple Mandals: {}",
            join_or_not_found(result.mandal().candidates())
        ),
        format!("Village: {}", result.village_name().unwrap_or("")),
        format!("Village Status: {}", result.village_status_label()),
        format!(
            "Multiple Villages: {}",
            join_or_not_found(result.village().candidates())
        ),
    ]
    .join("\n")
}

/// Writes up to `total_records` report rows for units after `start_after`, in `slno`
/// order.
pub async fn export_report<W: Write>(
    store: &dyn UnitRecordStore,
    service: Arc<AddressParseService>,
    config: &BulkConfig,
    start_after: i32,
    total_records: usize,
    writer: W,
    multi_progress: Option<&MultiProgress>,
) -> Result<ReportStats> {
    let logger = ResolutionLogger::new(ResolutionStage::ReportExport);
    logger.log_phase(
        "Exporting report",
        Some(&format!("{} records after slno {}", total_records, start_after)),
    );

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(REPORT_HEADERS)
        .context("Failed to write report header")?;

    let district: Arc<str> = Arc::from(config.district.as_str());
    let cache = config.cache_enabled.then(create_shared_cache);
    let pb = stage_bar(
        multi_progress,
        total_records as u64,
        "  📄 [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} Writing report rows...",
    );

    let mut stats = ReportStats {
        last_slno: start_after,
        ..Default::default()
    };
    let mut chunk_num = 0;

    while stats.rows_written < total_records {
        let limit = config.chunk_size.min(total_records - stats.rows_written);
        let chunk = store
            .fetch_next_chunk(stats.last_slno, limit)
            .await
            .with_context(|| format!("Failed to fetch unit records after slno {}", stats.last_slno))?;
        if chunk.is_empty() {
            break;
        }
        chunk_num += 1;
        logger.log_chunk(chunk_num, chunk.len(), chunk[chunk.len() - 1].slno);

        let addresses = chunk.iter().map(|r| r.unit_address.clone()).collect();
        let outcomes = parse_addresses_ordered(
            service.clone(),
            district.clone(),
            addresses,
            cache.clone(),
            config.workers,
        )
        .await;

        for (record, outcome) in chunk.iter().zip(outcomes) {
            if matches!(outcome, ParseOutcome::Failed { .. }) {
                stats.failures += 1;
            }
            let result = outcome.into_result();
            if result.village_name().is_some() {
                stats.villages_resolved += 1;
            }

            let slno = record.slno.to_string();
            let details = build_details(&result);
            let row = [
                slno.as_str(),
                record.unit_name.as_deref().unwrap_or(""),
                record.unit_address.as_deref().unwrap_or(""),
                record.village.as_deref().unwrap_or(""),
                result.village_name().unwrap_or(""),
                result.mandal_name().unwrap_or(""),
                record.district.as_deref().unwrap_or(""),
                result.village_status_label(),
                details.as_str(),
            ];
            csv_writer
                .write_record(row)
                .with_context(|| format!("Failed to write report row for slno {}", record.slno))?;

            stats.rows_written += 1;
            stats.last_slno = record.slno;
        }

        if let Some(pb) = &pb {
            pb.set_position(stats.rows_written as u64);
        }
    }

    csv_writer.flush().context("Failed to flush report")?;
    if let Some(pb) = &pb {
        pb.finish_with_message("Report complete");
    }
    logger.log_completion(
        stats.rows_written,
        stats.villages_resolved,
        stats.rows_written,
        stats.failures,
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::policy::MatchPolicy;
    use crate::models::verdict::DetectionVerdict;
    use crate::records::store::{InMemoryUnitRecordStore, UnitRecord};
    use crate::test_fixtures::adilabad_store;

    fn unit(slno: i32, address: &str) -> UnitRecord {
        UnitRecord {
            slno,
            unit_name: Some(format!("Unit {}", slno)),
            unit_address: Some(address.to_string()),
            village: Some("Muthnoor".into()),
            district: Some("ADILABAD".into()),
        }
    }

    fn config() -> BulkConfig {
        BulkConfig {
            district: "Adilabad".into(),
            chunk_size: 2,
            workers: 2,
            update_batch_size: 10,
            cache_enabled: false,
        }
    }

    #[test]
    fn test_build_details() {
        let result = ParseResult::new(
            DetectionVerdict::Multiple(vec!["Ichoda".into(), "Bela".into()]),
            DetectionVerdict::NotFound,
        );
        assert_eq!(
            build_details(&result),
            "Mandal: \nMandal Status: MULTIPLE_MANDALS\nMultiple Mandals: Ichoda, Bela\n\
             Village: \nVillage Status: VILLAGE_NOT_FOUND\nMultiple Villages: NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_export_respects_start_and_total() {
        let store = InMemoryUnitRecordStore::new(vec![
            unit(1, "ichoda"),
            unit(2, "muthnoor post"),
            unit(3, "gundala ichoda bela road"),
            unit(4, "waghapur mavala"),
            unit(5, "kadem"),
        ]);
        let service = Arc::new(AddressParseService::new(adilabad_store(), MatchPolicy::default()));

        let mut buffer = Vec::new();
        let stats = export_report(&store, service, &config(), 1, 3, &mut buffer, None)
            .await
            .unwrap();
        assert_eq!(stats.rows_written, 3);
        assert_eq!(stats.last_slno, 4);
        assert_eq!(stats.villages_resolved, 2);

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), REPORT_HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "2");
        assert_eq!(&rows[0][4], "Muthnur");
        assert_eq!(&rows[0][5], "Indervelly");
        assert_eq!(&rows[0][6], "ADILABAD");
        assert_eq!(&rows[0][7], "SINGLE_VILLAGE");
        assert_eq!(&rows[1][7], "VILLAGE_NOT_FOUND");
        assert!(rows[1][8].contains("Multiple Mandals: Ichoda, Bela"));
        assert_eq!(&rows[2][5], "Mavala");
    }
}
