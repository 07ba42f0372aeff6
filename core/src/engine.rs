//! The insight engine. Wires the record set, the store and the analytics.
//!
//! EVALUATION ORDER (per snapshot, fixed):
//!   1. Filter            (caller-supplied or derived from saved targeting)
//!   2. Segmentation      → bucket stats
//!   3. Anchor builder    → retention curve knots
//!   4. Baseline          → aggregate retention / revenue
//!   5. Simulator         → what-if at the target day
//!   6. Panels            → age, region and churn-risk breakdowns
//!
//! RULES:
//!   - The engine never caches derived figures; every call recomputes.
//!   - Filtering always happens before segmentation.
//!   - Only the store touches SQLite.

use crate::{
    churn_risk::{churn_risk_list, ChurnRiskList},
    config::InsightConfig,
    customer::CustomerRecord,
    demographics::{age_group_breakdown, region_retention_breakdown, AgeGroupStats, RegionRetention},
    error::InsightResult,
    filter::CustomerFilter,
    retention::{
        build_anchors, bucket_rows, overall_retention_pct, round_to_tenth, segment, AnchorPoint,
        BucketRow, BucketStats,
    },
    simulation::{compute_baseline, simulate, BaselineStats, SimulationResult},
    store::{InsightStore, MarketingNote, TargetingConfig},
    types::ALL_TARGETS,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionCurve {
    pub buckets: Vec<BucketStats>,
    pub anchors: Vec<AnchorPoint>,
}

impl RetentionCurve {
    pub fn from_records(records: &[CustomerRecord]) -> Self {
        let buckets = segment(records);
        let anchors = build_anchors(&buckets);
        Self { buckets: buckets.to_vec(), anchors }
    }
}

/// Everything the dashboard renders for one (filter, target day) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub filter:                CustomerFilter,
    pub total_customers:       u64,
    /// Percent, one decimal.
    pub overall_retention_pct: f64,
    pub bucket_rows:           Vec<BucketRow>,
    pub curve:                 RetentionCurve,
    pub baseline:              BaselineStats,
    pub simulation:            SimulationResult,
    pub age_groups:            Vec<AgeGroupStats>,
    pub regions:               Vec<RegionRetention>,
    pub churn_risk:            ChurnRiskList,
}

pub struct InsightEngine {
    pub config: InsightConfig,
    pub store:  InsightStore,
    customers:  Vec<CustomerRecord>,
}

impl InsightEngine {
    /// Build an engine over whatever customer rows the store already holds.
    pub fn build(config: InsightConfig, store: InsightStore) -> InsightResult<Self> {
        let customers = store.all_customers()?;
        log::info!("engine: {} customers loaded from store", customers.len());
        Ok(Self { config, store, customers })
    }

    /// In-memory store with test config. Used by integration tests.
    pub fn build_test() -> InsightResult<Self> {
        let store = InsightStore::in_memory()?;
        store.migrate()?;
        Self::build(InsightConfig::default_test(), store)
    }

    /// Replace the stored customer rows and the in-memory record set.
    pub fn import_customers(&mut self, customers: Vec<CustomerRecord>) -> InsightResult<usize> {
        let stored = self.store.replace_customers(&customers)?;
        if stored < customers.len() {
            log::warn!(
                "engine: {} input rows shared an id with a later row and were replaced",
                customers.len() - stored
            );
        }
        self.customers = self.store.all_customers()?;
        Ok(stored)
    }

    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    // ── Analytics ──────────────────────────────────────────────

    pub fn retention_curve(&self, filter: &CustomerFilter) -> RetentionCurve {
        RetentionCurve::from_records(&filter.apply(&self.customers))
    }

    pub fn simulate(&self, filter: &CustomerFilter, target_day: f64) -> SimulationResult {
        let records = filter.apply(&self.customers);
        let curve = RetentionCurve::from_records(&records);
        let baseline = compute_baseline(&records);
        simulate(&curve.anchors, &baseline, self.config.clamp_target_day(target_day))
    }

    pub fn snapshot(&self, filter: &CustomerFilter, target_day: f64) -> DashboardSnapshot {
        let records = filter.apply(&self.customers);
        let target_day = self.config.clamp_target_day(target_day);

        let buckets = segment(&records);
        let anchors = build_anchors(&buckets);
        let baseline = compute_baseline(&records);
        let simulation = simulate(&anchors, &baseline, target_day);

        log::debug!(
            "engine: snapshot over {} of {} customers, target_day={target_day:.1} \
             rate={:.3} → {:.3}",
            records.len(),
            self.customers.len(),
            baseline.rate,
            simulation.simulated_rate,
        );

        DashboardSnapshot {
            filter:                filter.clone(),
            total_customers:       records.len() as u64,
            overall_retention_pct: round_to_tenth(overall_retention_pct(&records)),
            bucket_rows:           bucket_rows(&buckets),
            curve:                 RetentionCurve { buckets: buckets.to_vec(), anchors },
            baseline,
            simulation,
            age_groups:            age_group_breakdown(&records, &self.config),
            regions:               region_retention_breakdown(&records, &self.config),
            churn_risk:            churn_risk_list(&records, self.config.panels.churn_list_limit),
        }
    }

    /// Snapshot restricted to the user's saved targeting preference.
    pub fn targeted_snapshot(&self, user_id: &str, target_day: f64) -> InsightResult<DashboardSnapshot> {
        let targeting = self.store.targeting_config(user_id)?;
        Ok(self.snapshot(&self.targeting_filter(&targeting), target_day))
    }

    /// Translate a saved preference (`서울` / `20s`) into a record filter.
    pub fn targeting_filter(&self, targeting: &TargetingConfig) -> CustomerFilter {
        let mut filter = CustomerFilter::all();

        let region = targeting.target_region.trim();
        if !region.is_empty() && region != ALL_TARGETS {
            match self.config.region_key(region) {
                Some(key) => filter.regions.push(key.to_string()),
                None => {
                    log::warn!("engine: unknown target region '{region}', matching it verbatim");
                    filter.regions.push(region.to_string());
                }
            }
        }

        let age = targeting.target_age.trim();
        if !age.is_empty() && age != ALL_TARGETS {
            match self.config.targeting.age_brackets.get(age) {
                Some(groups) => filter.age_groups.extend(groups.iter().cloned()),
                None => {
                    log::warn!("engine: unknown target age '{age}', matching it verbatim");
                    filter.age_groups.push(age.to_string());
                }
            }
        }

        filter
    }

    // ── Targeting and notes ────────────────────────────────────

    pub fn targeting(&self, user_id: &str) -> InsightResult<TargetingConfig> {
        self.store.targeting_config(user_id)
    }

    pub fn set_targeting(&self, targeting: &TargetingConfig) -> InsightResult<TargetingConfig> {
        self.store.save_targeting_config(targeting)?;
        log::info!(
            "engine: targeting for {} set to region={} age={}",
            targeting.user_id, targeting.target_region, targeting.target_age,
        );
        self.store.targeting_config(&targeting.user_id)
    }

    pub fn add_note(&self, content: &str) -> InsightResult<MarketingNote> {
        self.store.add_marketing_note(content)
    }

    pub fn notes(&self) -> InsightResult<Vec<MarketingNote>> {
        self.store.marketing_notes()
    }

    pub fn delete_note(&self, id: &str) -> InsightResult<()> {
        self.store.delete_marketing_note(id)
    }
}
