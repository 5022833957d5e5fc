pub mod store;

pub use store::{InMemoryUnitRecordStore, PgUnitRecordStore, UnitRecord, UnitRecordStore};
