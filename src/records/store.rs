// src/records/store.rs - Cursor-paged access to registered unit records
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

use crate::utils::db_connect::PgPool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRecord {
    pub slno: i32,
    pub unit_name: Option<String>,
    pub unit_address: Option<String>,
    /// Village as entered at registration, not the resolved one.
    pub village: Option<String>,
    pub district: Option<String>,
}

#[async_trait]
pub trait UnitRecordStore: Send + Sync {
    /// Up to `limit` records with `slno > after_slno`, ascending by `slno`.
    async fn fetch_next_chunk(&self, after_slno: i32, limit: usize) -> Result<Vec<UnitRecord>>;

    /// Writes resolved village names keyed by `slno`. Returns rows touched.
    async fn batch_update_village(&self, updates: &[(i32, String)]) -> Result<usize>;
}

pub struct PgUnitRecordStore {
    pool: PgPool,
}

impl PgUnitRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitRecordStore for PgUnitRecordStore {
    async fn fetch_next_chunk(&self, after_slno: i32, limit: usize) -> Result<Vec<UnitRecord>> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for unit chunk")?;

        let rows = conn
            .query(
                "SELECT slno, unitname, unitaddress, village, district
                 FROM public.msme_unit_details
                 WHERE slno > $1
                 ORDER BY slno ASC
                 LIMIT $2",
                &[&after_slno, &(limit as i64)],
            )
            .await
            .with_context(|| format!("Failed to fetch unit records after slno {}", after_slno))?;

        Ok(rows
            .iter()
            .map(|row| UnitRecord {
                slno: row.get("slno"),
                unit_name: row.get("unitname"),
                unit_address: row.get("unitaddress"),
                village: row.get("village"),
                district: row.get("district"),
            })
            .collect())
    }

    async fn batch_update_village(&self, updates: &[(i32, String)]) -> Result<usize> {
        if updates.is_empty() {
            return Ok(0);
        }

        let mut client = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for village update")?;
        let transaction = client
            .transaction()
            .await
            .context("Failed to start transaction for village update")?;

        let slnos: Vec<i32> = updates.iter().map(|(slno, _)| *slno).collect();
        let villages: Vec<&str> = updates.iter().map(|(_, v)| v.as_str()).collect();

        let query = "
            UPDATE public.msme_unit_details
            SET villageid = data_table.village
            FROM (
                SELECT unnest($1::int4[]) AS slno,
                       unnest($2::text[]) AS village
            ) AS data_table
            WHERE msme_unit_details.slno = data_table.slno
        ";

        let rows_updated = transaction
            .execute(query, &[&slnos, &villages])
            .await
            .context("Failed to execute batched village update")?;
        transaction
            .commit()
            .await
            .context("Failed to commit village update transaction")?;

        debug!("Updated villageid for {} units", rows_updated);
        Ok(rows_updated as usize)
    }
}

/// Record store held in memory. Updates are kept for inspection.
#[derive(Default)]
pub struct InMemoryUnitRecordStore {
    records: Vec<UnitRecord>,
    updates: Mutex<Vec<(i32, String)>>,
}

impl InMemoryUnitRecordStore {
    pub fn new(mut records: Vec<UnitRecord>) -> Self {
        records.sort_by_key(|r| r.slno);
        Self {
            records,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub async fn applied_updates(&self) -> Vec<(i32, String)> {
        self.updates.lock().await.clone()
    }
}

#[async_trait]
impl UnitRecordStore for InMemoryUnitRecordStore {
    async fn fetch_next_chunk(&self, after_slno: i32, limit: usize) -> Result<Vec<UnitRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.slno > after_slno)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn batch_update_village(&self, updates: &[(i32, String)]) -> Result<usize> {
        let known = updates
            .iter()
            .filter(|(slno, _)| self.records.iter().any(|r| r.slno == *slno))
            .count();
        self.updates.lock().await.extend_from_slice(updates);
        Ok(known)
    }
}
