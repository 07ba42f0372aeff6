//! Record pre-filter applied before any statistic is computed.
//!
//! An empty selection on a dimension means "everything". Dimensions are
//! combined with AND, values within one dimension with OR.

use crate::{customer::CustomerRecord, types::Won};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRange {
    UpTo10k,        // ~ 10,000원
    From10kTo50k,   // 10,001 ~ 50,000원
    From50kTo100k,  // 50,001 ~ 100,000원
    Over100k,       // 100,001원 ~
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::UpTo10k,
        PriceRange::From10kTo50k,
        PriceRange::From50kTo100k,
        PriceRange::Over100k,
    ];

    pub fn contains(self, amount: Won) -> bool {
        match self {
            Self::UpTo10k       => amount <= 10_000.0,
            Self::From10kTo50k  => amount > 10_000.0 && amount <= 50_000.0,
            Self::From50kTo100k => amount > 50_000.0 && amount <= 100_000.0,
            Self::Over100k      => amount > 100_000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpTo10k       => "~ 10,000원",
            Self::From10kTo50k  => "10,001 ~ 50,000원",
            Self::From50kTo100k => "50,001 ~ 100,000원",
            Self::Over100k      => "100,001원 ~",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilter {
    #[serde(default)]
    pub regions:      Vec<String>,
    #[serde(default)]
    pub age_groups:   Vec<String>,
    #[serde(default)]
    pub price_ranges: Vec<PriceRange>,
}

impl CustomerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty() && self.age_groups.is_empty() && self.price_ranges.is_empty()
    }

    pub fn matches(&self, customer: &CustomerRecord) -> bool {
        let region_ok = self.regions.is_empty()
            || self.regions.iter().any(|r| *r == customer.region);
        let age_ok = self.age_groups.is_empty()
            || self.age_groups.iter().any(|a| *a == customer.age_group);
        let price_ok = self.price_ranges.is_empty()
            || self.price_ranges.iter().any(|p| p.contains(customer.revenue));

        region_ok && age_ok && price_ok
    }

    /// Owned copy of the matching records, input order preserved.
    pub fn apply(&self, records: &[CustomerRecord]) -> Vec<CustomerRecord> {
        if self.is_unrestricted() {
            return records.to_vec();
        }
        records.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}
