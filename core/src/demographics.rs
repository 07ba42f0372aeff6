//! Demographic breakdowns: spend/dwell time by age group, retention by region.

use crate::{
    config::InsightConfig,
    customer::CustomerRecord,
    retention::round_to_tenth,
    types::Won,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket used when a record carries no age group or region.
pub const UNKNOWN_GROUP: &str = "Others";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroupStats {
    pub age_group:        String,
    pub customers:        u64,
    /// Rounded to whole won.
    pub avg_payment:      Won,
    /// Minutes, one decimal.
    pub avg_duration_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRetention {
    pub region:        String,
    pub label:         String,
    pub customers:     u64,
    /// Percent, one decimal.
    pub retention_pct: f64,
}

#[derive(Default)]
struct AgeAccumulator {
    total:        u64,
    sum_payment:  f64,
    sum_duration: f64,
}

#[derive(Default)]
struct RegionAccumulator {
    total:    u64,
    retained: u64,
}

fn group_key(raw: &str) -> &str {
    if raw.trim().is_empty() { UNKNOWN_GROUP } else { raw }
}

pub fn age_group_breakdown(records: &[CustomerRecord], config: &InsightConfig) -> Vec<AgeGroupStats> {
    let mut acc: HashMap<&str, AgeAccumulator> = HashMap::new();
    for c in records {
        let entry = acc.entry(group_key(&c.age_group)).or_default();
        entry.total += 1;
        entry.sum_payment += c.revenue;
        entry.sum_duration += c.total_duration_min;
    }

    let order = &config.panels.age_group_order;
    let rank = |group: &str| order.iter().position(|g| g == group).unwrap_or(usize::MAX);

    let mut rows: Vec<AgeGroupStats> = acc
        .into_iter()
        .map(|(group, a)| {
            let n = a.total as f64;
            AgeGroupStats {
                age_group:        group.to_string(),
                customers:        a.total,
                avg_payment:      (a.sum_payment / n).round(),
                avg_duration_min: round_to_tenth(a.sum_duration / n),
            }
        })
        .collect();

    // Name as tie-break keeps unknown groups in a stable order.
    rows.sort_by(|a, b| {
        rank(&a.age_group)
            .cmp(&rank(&b.age_group))
            .then_with(|| a.age_group.cmp(&b.age_group))
    });
    rows
}

pub fn region_retention_breakdown(
    records: &[CustomerRecord],
    config: &InsightConfig,
) -> Vec<RegionRetention> {
    let mut acc: HashMap<&str, RegionAccumulator> = HashMap::new();
    for c in records {
        let entry = acc.entry(group_key(&c.region)).or_default();
        entry.total += 1;
        if c.retained {
            entry.retained += 1;
        }
    }

    let mut rows: Vec<RegionRetention> = acc
        .into_iter()
        .map(|(region, a)| RegionRetention {
            region:        region.to_string(),
            label:         config.region_label(region).to_string(),
            customers:     a.total,
            retention_pct: round_to_tenth(a.retained as f64 / a.total as f64 * 100.0),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.retention_pct
            .total_cmp(&a.retention_pct)
            .then_with(|| a.region.cmp(&b.region))
    });
    rows.truncate(config.panels.top_regions);
    rows
}
