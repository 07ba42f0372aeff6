//! Churn-risk listing: customers who did not return within 90 days.

use crate::customer::CustomerRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnRiskList {
    /// Every at-risk customer in the input, not just the listed ones.
    pub total:     u64,
    pub customers: Vec<CustomerRecord>,
}

/// At-risk customers in input order, truncated to `limit` rows.
pub fn churn_risk_list(records: &[CustomerRecord], limit: usize) -> ChurnRiskList {
    let mut total = 0u64;
    let mut customers = Vec::with_capacity(limit.min(records.len()));

    for c in records.iter().filter(|c| c.is_churn_risk()) {
        total += 1;
        if customers.len() < limit {
            customers.push(c.clone());
        }
    }

    ChurnRiskList { total, customers }
}
