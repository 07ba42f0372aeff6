use super::InsightStore;
use crate::{customer::CustomerRecord, error::InsightResult};
use rusqlite::params;

impl InsightStore {
    // ── Customer ──────────────────────────────────────────────────

    /// Replace the whole customer table with `customers` in one transaction.
    /// Duplicate ids keep the last row. Returns the number of stored rows.
    pub fn replace_customers(&mut self, customers: &[CustomerRecord]) -> InsightResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM customer", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO customer (
                    uid, region_city_group, region_city, age_group, age,
                    visit_days, total_duration_min, total_payment_may, retained_90
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(uid) DO UPDATE SET
                    region_city_group  = excluded.region_city_group,
                    region_city        = excluded.region_city,
                    age_group          = excluded.age_group,
                    age                = excluded.age,
                    visit_days         = excluded.visit_days,
                    total_duration_min = excluded.total_duration_min,
                    total_payment_may  = excluded.total_payment_may,
                    retained_90        = excluded.retained_90",
            )?;
            for c in customers {
                stmt.execute(params![
                    &c.id,
                    &c.region,
                    &c.city,
                    &c.age_group,
                    c.age as i64,
                    c.visit_days as i64,
                    c.total_duration_min,
                    c.revenue,
                    if c.retained { 1 } else { 0 },
                ])?;
            }
        }
        tx.commit()?;
        let stored = self.customer_count()? as usize;
        log::info!("store: replaced customer table ({} input rows, {stored} stored)", customers.len());
        Ok(stored)
    }

    pub fn all_customers(&self) -> InsightResult<Vec<CustomerRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uid, region_city_group, region_city, age_group, age,
                    visit_days, total_duration_min, total_payment_may, retained_90
             FROM customer ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CustomerRecord {
                id: row.get(0)?,
                region: row.get(1)?,
                city: row.get(2)?,
                age_group: row.get(3)?,
                age: row.get::<_, i64>(4)?.max(0) as u32,
                visit_days: row.get::<_, i64>(5)?.max(0) as u32,
                total_duration_min: row.get(6)?,
                revenue: row.get(7)?,
                retained: row.get::<_, i32>(8)? != 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_count(&self) -> InsightResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(n)
    }
}
