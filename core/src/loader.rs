//! Customer file loading.
//!
//! Accepts the JSON array served by the customers endpoint (or written by
//! the upload pipeline). Every row passes through the coercion rules in
//! `customer`, so a malformed cell never fails the load. Rows without a
//! `uid` get `row-{n}` (1-based position in the file) so they stay distinct
//! customers once stored.

use crate::{
    customer::{CustomerRecord, RawCustomerRow},
    error::{InsightError, InsightResult},
};

pub fn parse_customers_json(json: &str) -> InsightResult<Vec<CustomerRecord>> {
    let rows: Vec<RawCustomerRow> = serde_json::from_str(json)?;
    let mut missing_ids = 0usize;
    let customers: Vec<CustomerRecord> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut customer = CustomerRecord::from(row);
            if customer.id.is_empty() {
                customer.id = format!("row-{}", i + 1);
                missing_ids += 1;
            }
            customer
        })
        .collect();

    if missing_ids > 0 {
        log::warn!("{missing_ids} rows have no uid; assigned row-<n> ids by position");
    }
    Ok(customers)
}

pub fn load_customers_json(path: &str) -> InsightResult<Vec<CustomerRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| InsightError::Io {
        path: path.to_string(),
        source,
    })?;
    let customers = parse_customers_json(&content)?;

    let unsegmented = customers.iter().filter(|c| c.visit_days == 0).count();
    if unsegmented > 0 {
        log::warn!("{path}: {unsegmented} of {} rows have no visit days", customers.len());
    }
    log::info!("loaded {} customers from {path}", customers.len());
    Ok(customers)
}
