//! What-if simulation: baseline statistics and projected retention/revenue.
//!
//! The projection re-prices the whole customer base at the retention rate
//! the curve predicts for a target visit-day value:
//!
//!   simulated_revenue = total_customers × simulated_rate × avg_revenue_per_retained
//!
//! The baseline is expressed in the same shape (retained × average) so the
//! two figures are directly comparable.

use crate::{
    customer::CustomerRecord,
    retention::{interpolate, AnchorPoint},
    types::Won,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineStats {
    pub rate:                      f64,
    pub avg_revenue_per_retained:  Won,
    pub total_customers:           u64,
    pub retained_customers:        u64,
    pub baseline_retained_revenue: Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub target_day:      f64,
    pub simulated_rate:  f64,
    /// Percentage points relative to the baseline rate.
    pub rate_change_pct: f64,
    pub revenue_change:  Won,
}

// ── Baseline ─────────────────────────────────────────────────────────────────

pub fn compute_baseline(records: &[CustomerRecord]) -> BaselineStats {
    let total_customers = records.len() as u64;
    if total_customers == 0 {
        return BaselineStats::default();
    }

    let (retained_customers, retained_revenue) = records
        .iter()
        .filter(|c| c.retained)
        .fold((0u64, 0.0), |(n, sum), c| (n + 1, sum + c.revenue));

    let rate = retained_customers as f64 / total_customers as f64;
    let avg_revenue_per_retained = if retained_customers > 0 {
        retained_revenue / retained_customers as f64
    } else {
        0.0
    };

    BaselineStats {
        rate,
        avg_revenue_per_retained,
        total_customers,
        retained_customers,
        baseline_retained_revenue: retained_customers as f64 * avg_revenue_per_retained,
    }
}

// ── Simulator ────────────────────────────────────────────────────────────────

pub fn simulate(
    anchors: &[AnchorPoint],
    baseline: &BaselineStats,
    target_day: f64,
) -> SimulationResult {
    if baseline.total_customers == 0 {
        return SimulationResult { target_day, ..SimulationResult::default() };
    }

    let simulated_rate = interpolate(anchors, target_day);
    // Continuous expectation, not rounded to whole customers.
    let simulated_retained = baseline.total_customers as f64 * simulated_rate;
    let simulated_revenue = simulated_retained * baseline.avg_revenue_per_retained;

    SimulationResult {
        target_day,
        simulated_rate,
        rate_change_pct: (simulated_rate - baseline.rate) * 100.0,
        revenue_change: simulated_revenue - baseline.baseline_retained_revenue,
    }
}
