//! Customer records and the coercion rules applied to raw source rows.
//!
//! Source rows come from CSV exports or the document store, where every
//! numeric column may arrive either as a JSON number or as a string.
//! Coercion is total: a field that cannot be read as a number becomes 0,
//! negative values become 0, and visit days are floored to whole days.

use crate::types::{CustomerId, Won};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

/// One customer as seen by the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id:                 CustomerId,
    /// Province-level region key, e.g. `Gyeonggi-do`.
    pub region:             String,
    pub city:               String,
    /// Age bucket key, e.g. `Twenties`.
    pub age_group:          String,
    pub age:                u32,
    pub visit_days:         u32,
    pub total_duration_min: f64,
    pub retained:           bool,
    pub revenue:            Won,
}

impl CustomerRecord {
    /// Record with only the fields the retention engine needs.
    pub fn new(id: impl Into<CustomerId>, visit_days: u32, retained: bool, revenue: Won) -> Self {
        Self {
            id: id.into(),
            region: String::new(),
            city: String::new(),
            age_group: String::new(),
            age: 0,
            visit_days,
            total_duration_min: 0.0,
            retained,
            revenue: revenue.max(0.0),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = age_group.into();
        self
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.total_duration_min = minutes.max(0.0);
        self
    }

    /// A customer who did not come back within the 90-day window.
    pub fn is_churn_risk(&self) -> bool {
        !self.retained
    }
}

/// A field value as it appears in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Flag(bool),
    Number(f64),
    Text(String),
    /// Objects, arrays and anything else non-scalar. Reads as 0 / false / "".
    Other(serde_json::Value),
}

impl RawField {
    pub fn as_amount(&self) -> f64 {
        match self {
            RawField::Number(n) => sanitize_amount(*n),
            RawField::Text(s)   => parse_amount(s),
            RawField::Flag(_) | RawField::Other(_) => 0.0,
        }
    }

    /// `max(0, floor(value))`, saturating at `u32::MAX`.
    pub fn as_whole_number(&self) -> u32 {
        floor_days(self.as_amount())
    }

    /// `"1"`, `1`, `true` and `"true"` mean retained; anything else does not.
    pub fn as_flag(&self) -> bool {
        match self {
            RawField::Flag(b)   => *b,
            RawField::Number(n) => *n == 1.0,
            RawField::Text(s)   => {
                let s = s.trim();
                s == "1" || s.eq_ignore_ascii_case("true")
            }
            RawField::Other(_)  => false,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            RawField::Text(s)   => s.trim().to_string(),
            RawField::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            RawField::Number(n) => n.to_string(),
            RawField::Flag(b)   => b.to_string(),
            RawField::Other(_)  => String::new(),
        }
    }
}

/// One row of the customer export (`data.csv` / `customers` collection).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCustomerRow {
    #[serde(default)]
    pub uid:                Option<RawField>,
    #[serde(default)]
    pub region_city_group:  Option<RawField>,
    #[serde(default)]
    pub region_city:        Option<RawField>,
    #[serde(default)]
    pub age_group:          Option<RawField>,
    #[serde(default)]
    pub age:                Option<RawField>,
    #[serde(default)]
    pub visit_days:         Option<RawField>,
    #[serde(default)]
    pub total_duration_min: Option<RawField>,
    #[serde(default)]
    pub total_payment_may:  Option<RawField>,
    #[serde(default)]
    pub retained_90:        Option<RawField>,
}

impl From<RawCustomerRow> for CustomerRecord {
    fn from(row: RawCustomerRow) -> Self {
        let text = |f: &Option<RawField>| f.as_ref().map(RawField::as_text).unwrap_or_default();
        Self {
            id:                 text(&row.uid),
            region:             text(&row.region_city_group),
            city:               text(&row.region_city),
            age_group:          text(&row.age_group),
            age:                row.age.as_ref().map(RawField::as_whole_number).unwrap_or(0),
            visit_days:         row.visit_days.as_ref().map(RawField::as_whole_number).unwrap_or(0),
            total_duration_min: row.total_duration_min.as_ref().map(RawField::as_amount).unwrap_or(0.0),
            retained:           row.retained_90.as_ref().map(RawField::as_flag).unwrap_or(false),
            revenue:            row.total_payment_may.as_ref().map(RawField::as_amount).unwrap_or(0.0),
        }
    }
}

// ── Coercion ─────────────────────────────────────────────────────────────────

/// Parse a money or duration field. Unparseable, empty, non-finite and
/// negative inputs all yield 0.
pub fn parse_amount(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .map(sanitize_amount)
        .unwrap_or(0.0)
}

/// Parse a visit-day count as `max(0, floor(value))`, 0 when unparseable.
pub fn parse_visit_days(text: &str) -> u32 {
    floor_days(parse_amount(text))
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

fn floor_days(value: f64) -> u32 {
    let value = sanitize_amount(value).floor();
    if value >= u32::MAX as f64 { u32::MAX } else { value as u32 }
}
