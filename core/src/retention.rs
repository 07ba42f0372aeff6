//! Retention curve: visit-day segmentation, anchor points and interpolation.
//!
//! Pipeline:
//!   1. segment()        customers → five fixed visit-day buckets
//!   2. build_anchors()  buckets   → (day, rate) knots, empty buckets forward-filled
//!   3. interpolate()    knots     → continuous rate for any target day
//!
//! All three are pure functions of their input.

use crate::customer::CustomerRecord;
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

/// Fixed visit-day ranges. Order is the chart order and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitBucket {
    OneDay,          // 1
    TwoToThree,      // 2-3
    FourToSeven,     // 4-7
    EightToFourteen, // 8-14
    FifteenPlus,     // 15+
}

impl VisitBucket {
    pub const ALL: [VisitBucket; 5] = [
        VisitBucket::OneDay,
        VisitBucket::TwoToThree,
        VisitBucket::FourToSeven,
        VisitBucket::EightToFourteen,
        VisitBucket::FifteenPlus,
    ];

    /// Bucket for a visit-day count. Zero visit days belong to no bucket.
    pub fn for_visit_days(visit_days: u32) -> Option<Self> {
        match visit_days {
            0       => None,
            1       => Some(Self::OneDay),
            2..=3   => Some(Self::TwoToThree),
            4..=7   => Some(Self::FourToSeven),
            8..=14  => Some(Self::EightToFourteen),
            _       => Some(Self::FifteenPlus),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Representative day used as the interpolation knot.
    /// `15+` is pinned at 15, which caps the curve's domain.
    pub fn anchor_day(self) -> u32 {
        match self {
            Self::OneDay          => 1,
            Self::TwoToThree      => 3,
            Self::FourToSeven     => 7,
            Self::EightToFourteen => 14,
            Self::FifteenPlus     => 15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneDay          => "1일",
            Self::TwoToThree      => "2-3일",
            Self::FourToSeven     => "4-7일",
            Self::EightToFourteen => "8-14일",
            Self::FifteenPlus     => "15일+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub bucket:   VisitBucket,
    pub total:    u64,
    pub retained: u64,
}

impl BucketStats {
    pub fn empty(bucket: VisitBucket) -> Self {
        Self { bucket, total: 0, retained: 0 }
    }

    /// Retention rate in [0,1], `None` for an empty bucket.
    pub fn rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.retained as f64 / self.total as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub day:  u32,
    pub rate: f64,
}

/// Chart row for the bucket bar chart: percent rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRow {
    pub label:         String,
    pub retention_pct: f64,
    pub customers:     u64,
}

// ── Segmentation ─────────────────────────────────────────────────────────────

pub fn segment(records: &[CustomerRecord]) -> [BucketStats; 5] {
    let mut buckets = VisitBucket::ALL.map(BucketStats::empty);

    for record in records {
        let Some(bucket) = VisitBucket::for_visit_days(record.visit_days) else {
            continue;
        };
        let stats = &mut buckets[bucket.index()];
        stats.total += 1;
        if record.retained {
            stats.retained += 1;
        }
    }

    buckets
}

// ── Anchors ──────────────────────────────────────────────────────────────────

/// One anchor per bucket, in day order. An empty bucket carries the rate
/// of the anchor before it (0 for the first).
pub fn build_anchors(buckets: &[BucketStats]) -> Vec<AnchorPoint> {
    buckets
        .iter()
        .scan(0.0, |last_rate, stats| {
            let rate = stats.rate().unwrap_or(*last_rate);
            *last_rate = rate;
            Some(AnchorPoint { day: stats.bucket.anchor_day(), rate })
        })
        .collect()
}

// ── Interpolation ────────────────────────────────────────────────────────────

/// Piecewise-linear retention estimate at `target_day`, flat outside the
/// anchor domain. Empty anchors mean "no data" and yield 0.
pub fn interpolate(anchors: &[AnchorPoint], target_day: f64) -> f64 {
    let (Some(first), Some(last)) = (anchors.first(), anchors.last()) else {
        return 0.0;
    };

    if target_day.is_nan() || target_day <= first.day as f64 {
        return first.rate;
    }
    if target_day >= last.day as f64 {
        return last.rate;
    }

    for pair in anchors.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let (d1, d2) = (p1.day as f64, p2.day as f64);
        if d1 < target_day && target_day <= d2 {
            if p2.day == p1.day {
                return p1.rate;
            }
            return p1.rate + (p2.rate - p1.rate) * (target_day - d1) / (d2 - d1);
        }
    }

    // Only reachable for anchors that are not sorted by day.
    last.rate
}

// ── Display helpers ──────────────────────────────────────────────────────────

pub fn bucket_rows(buckets: &[BucketStats]) -> Vec<BucketRow> {
    buckets
        .iter()
        .map(|b| BucketRow {
            label:         b.bucket.label().to_string(),
            retention_pct: round_to_tenth(b.rate().unwrap_or(0.0) * 100.0),
            customers:     b.total,
        })
        .collect()
}

/// Share of customers flagged as retained, in percent (unrounded).
pub fn overall_retention_pct(records: &[CustomerRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let retained = records.iter().filter(|c| c.retained).count();
    retained as f64 / records.len() as f64 * 100.0
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
