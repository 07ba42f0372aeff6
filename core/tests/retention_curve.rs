use insight_core::{
    customer::CustomerRecord,
    population::PopulationGenerator,
    retention::{build_anchors, bucket_rows, interpolate, segment, AnchorPoint, VisitBucket},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn customer(visit_days: u32, retained: bool) -> CustomerRecord {
    CustomerRecord::new(format!("c-{visit_days}-{retained}"), visit_days, retained, 0.0)
}

fn anchors(points: &[(u32, f64)]) -> Vec<AnchorPoint> {
    points.iter().map(|&(day, rate)| AnchorPoint { day, rate }).collect()
}

/// The reference curve used by the interpolation examples.
fn reference_curve() -> Vec<AnchorPoint> {
    anchors(&[(1, 0.1), (3, 0.3), (7, 0.3), (14, 0.5), (15, 0.5)])
}

const EPS: f64 = 1e-12;

// ── Segmentation ─────────────────────────────────────────────────────────────

/// Each visit-day count lands in exactly one bucket by range.
#[test]
fn visit_days_map_to_fixed_ranges() {
    let expected = [
        (1, Some(VisitBucket::OneDay)),
        (2, Some(VisitBucket::TwoToThree)),
        (3, Some(VisitBucket::TwoToThree)),
        (4, Some(VisitBucket::FourToSeven)),
        (7, Some(VisitBucket::FourToSeven)),
        (8, Some(VisitBucket::EightToFourteen)),
        (14, Some(VisitBucket::EightToFourteen)),
        (15, Some(VisitBucket::FifteenPlus)),
        (31, Some(VisitBucket::FifteenPlus)),
        (0, None),
    ];
    for (days, bucket) in expected {
        assert_eq!(VisitBucket::for_visit_days(days), bucket, "visit_days={days}");
    }
}

/// Two one-day customers, one retained → bucket `1일` at 50%, anchor (1, 0.5).
#[test]
fn single_bucket_half_retained() {
    let records = vec![
        CustomerRecord::new("a", 1, true, 10_000.0),
        CustomerRecord::new("b", 1, false, 0.0),
    ];

    let buckets = segment(&records);
    assert_eq!(buckets[0].bucket.label(), "1일");
    assert_eq!(buckets[0].total, 2);
    assert_eq!(buckets[0].retained, 1);

    let curve = build_anchors(&buckets);
    assert_eq!(curve[0], AnchorPoint { day: 1, rate: 0.5 });
    assert_eq!(interpolate(&curve, 1.0), 0.5);
}

/// Zero-visit customers are excluded without error.
#[test]
fn zero_visit_days_are_not_segmented() {
    let records = vec![customer(0, true), customer(0, false), customer(2, true)];
    let buckets = segment(&records);

    let total: u64 = buckets.iter().map(|b| b.total).sum();
    assert_eq!(total, 1, "only the 2-day customer should be bucketed");
    assert_eq!(buckets[1].total, 1);
}

/// Bucket order is fixed no matter how the input is ordered.
#[test]
fn bucket_order_ignores_input_order() {
    let mut records: Vec<_> = [20, 1, 9, 5, 2, 15, 3].iter().map(|&d| customer(d, d % 2 == 0)).collect();
    let forward = segment(&records);
    records.reverse();
    let backward = segment(&records);

    assert_eq!(forward, backward);
    let labels: Vec<_> = forward.iter().map(|b| b.bucket.label()).collect();
    assert_eq!(labels, ["1일", "2-3일", "4-7일", "8-14일", "15일+"]);
}

/// Empty input yields five all-zero buckets.
#[test]
fn empty_input_yields_zero_buckets() {
    let buckets = segment(&[]);
    assert_eq!(buckets.len(), 5);
    assert!(buckets.iter().all(|b| b.total == 0 && b.retained == 0));
}

// ── Anchors ──────────────────────────────────────────────────────────────────

/// Empty input: five anchors, all forward-filled from 0.
#[test]
fn empty_input_anchors_are_all_zero() {
    let curve = build_anchors(&segment(&[]));
    assert_eq!(curve.len(), 5);
    assert!(curve.iter().all(|a| a.rate == 0.0));
}

/// An empty middle bucket carries the previous bucket's rate.
#[test]
fn empty_middle_bucket_forward_fills() {
    let records = vec![
        customer(1, true),
        customer(1, false),
        customer(1, false),
        customer(1, false), // 1일: 0.25
        customer(3, true),  // 2-3일: 1.0
        // 4-7일 and 8-14일 empty
        customer(20, false),
        customer(20, true), // 15일+: 0.5
    ];
    let curve = build_anchors(&segment(&records));

    assert_eq!(curve[0].rate, 0.25);
    assert_eq!(curve[1].rate, 1.0);
    assert_eq!(curve[2].rate, 1.0, "4-7일 should forward-fill from 2-3일");
    assert_eq!(curve[3].rate, 1.0, "8-14일 should forward-fill from 4-7일");
    assert_eq!(curve[4].rate, 0.5);
}

/// A leading empty bucket forward-fills from 0.
#[test]
fn empty_first_bucket_starts_at_zero() {
    let curve = build_anchors(&segment(&[customer(10, true)]));
    assert_eq!(curve[0].rate, 0.0);
    assert_eq!(curve[1].rate, 0.0);
    assert_eq!(curve[2].rate, 0.0);
    assert_eq!(curve[3].rate, 1.0);
    assert_eq!(curve[4].rate, 1.0);
}

// ── Interpolation ────────────────────────────────────────────────────────────

/// Flat segment between (3, 0.3) and (7, 0.3).
#[test]
fn interpolates_flat_segment_exactly() {
    assert_eq!(interpolate(&reference_curve(), 5.0), 0.3);
}

/// Halfway between (7, 0.3) and (14, 0.5) is 0.4.
#[test]
fn interpolates_rising_segment() {
    let rate = interpolate(&reference_curve(), 10.5);
    assert!((rate - 0.4).abs() < EPS, "expected 0.4, got {rate}");
}

/// Beyond the last knot the curve is flat.
#[test]
fn clamps_above_domain() {
    assert_eq!(interpolate(&reference_curve(), 20.0), 0.5);
    assert_eq!(interpolate(&reference_curve(), f64::INFINITY), 0.5);
}

/// Below the first knot the curve is flat.
#[test]
fn clamps_below_domain() {
    let curve = reference_curve();
    assert_eq!(interpolate(&curve, 0.0), 0.1);
    assert_eq!(interpolate(&curve, -3.0), 0.1);
    assert_eq!(interpolate(&curve, f64::NEG_INFINITY), 0.1);
}

/// Evaluating at a knot returns the knot's own rate with no error.
#[test]
fn knots_are_reproduced_exactly() {
    let curve = reference_curve();
    for a in &curve {
        assert_eq!(interpolate(&curve, a.day as f64), a.rate, "knot day {}", a.day);
    }
}

/// No anchors means no data: rate 0 everywhere.
#[test]
fn empty_anchors_yield_zero() {
    assert_eq!(interpolate(&[], 1.0), 0.0);
    assert_eq!(interpolate(&[], 10.0), 0.0);
}

/// NaN target falls back to the first knot instead of propagating.
#[test]
fn nan_target_is_clamped_low() {
    assert_eq!(interpolate(&reference_curve(), f64::NAN), 0.1);
}

/// Duplicate knot days never divide by zero.
#[test]
fn duplicate_knot_days_do_not_divide_by_zero() {
    let curve = anchors(&[(1, 0.2), (5, 0.4), (5, 0.9), (10, 0.6)]);
    for day in [1.0, 3.0, 5.0, 7.5, 10.0] {
        let rate = interpolate(&curve, day);
        assert!(rate.is_finite(), "day {day} produced {rate}");
    }
    assert_eq!(interpolate(&curve, 5.0), 0.4);
}

// ── Properties over synthetic populations ────────────────────────────────────

/// Bucket totals cover exactly the customers with at least one visit day,
/// rates stay in [0,1], and anchor days never change.
#[test]
fn curve_properties_hold_across_seeds() {
    for seed in [1u64, 7, 42, 2024, 0xC0FFEE] {
        let records = PopulationGenerator::new(seed).generate(2_000);
        let buckets = segment(&records);

        let bucketed: u64 = buckets.iter().map(|b| b.total).sum();
        let active = records.iter().filter(|c| c.visit_days >= 1).count() as u64;
        assert_eq!(bucketed, active, "seed {seed}: bucket coverage");

        for b in &buckets {
            assert!(b.retained <= b.total, "seed {seed}: {:?}", b);
            if let Some(rate) = b.rate() {
                assert!((0.0..=1.0).contains(&rate), "seed {seed}: rate {rate}");
            }
        }

        let curve = build_anchors(&buckets);
        let days: Vec<u32> = curve.iter().map(|a| a.day).collect();
        assert_eq!(days, [1, 3, 7, 14, 15], "seed {seed}: anchor days");

        for step in 0..=64 {
            let day = -1.0 + step as f64 * 0.5;
            let rate = interpolate(&curve, day);
            assert!((0.0..=1.0).contains(&rate), "seed {seed}: day {day} → {rate}");
        }

        assert_eq!(interpolate(&curve, 1.0), curve[0].rate);
        assert_eq!(interpolate(&curve, 15.0), curve[4].rate);
        assert_eq!(interpolate(&curve, 0.5), curve[0].rate);
        assert_eq!(interpolate(&curve, 16.0), curve[4].rate);
    }
}

// ── Display rows ─────────────────────────────────────────────────────────────

/// Chart rows round percentages to one decimal and show empty buckets as 0.
#[test]
fn bucket_rows_round_to_one_decimal() {
    let records = vec![customer(1, true), customer(1, false), customer(1, false)];
    let rows = bucket_rows(&segment(&records));

    assert_eq!(rows[0].label, "1일");
    assert_eq!(rows[0].retention_pct, 33.3);
    assert_eq!(rows[0].customers, 3);
    assert_eq!(rows[4].retention_pct, 0.0);
    assert_eq!(rows[4].customers, 0);
}
