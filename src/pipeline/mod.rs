pub mod bulk_update;
pub mod parse_pool;
pub mod report;

pub use bulk_update::{update_all_units_village, BulkUpdateStats};
pub use parse_pool::{create_shared_cache, parse_addresses_ordered, ParseOutcome, SharedParseCache};
pub use report::{export_report, ReportStats};
