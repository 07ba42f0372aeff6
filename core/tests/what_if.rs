use insight_core::{
    customer::CustomerRecord,
    population::PopulationGenerator,
    retention::{build_anchors, segment, AnchorPoint},
    simulation::{compute_baseline, simulate, BaselineStats},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Ten 5-day customers, all retained, 1,000원 each.
fn loyal_five_day_cohort() -> Vec<CustomerRecord> {
    (0..10)
        .map(|i| CustomerRecord::new(format!("u-{i}"), 5, true, 1_000.0))
        .collect()
}

fn anchors_for(records: &[CustomerRecord]) -> Vec<AnchorPoint> {
    build_anchors(&segment(records))
}

const EPS: f64 = 1e-9;

// ── Baseline ─────────────────────────────────────────────────────────────────

#[test]
fn baseline_of_loyal_cohort() {
    let baseline = compute_baseline(&loyal_five_day_cohort());

    assert_eq!(baseline.rate, 1.0);
    assert_eq!(baseline.avg_revenue_per_retained, 1_000.0);
    assert_eq!(baseline.total_customers, 10);
    assert_eq!(baseline.retained_customers, 10);
    assert_eq!(baseline.baseline_retained_revenue, 10_000.0);
}

/// Churned customers count toward the denominator but not toward revenue.
#[test]
fn baseline_averages_over_retained_only() {
    let records = vec![
        CustomerRecord::new("a", 3, true, 30_000.0),
        CustomerRecord::new("b", 3, true, 10_000.0),
        CustomerRecord::new("c", 3, false, 99_000.0),
        CustomerRecord::new("d", 0, false, 0.0),
    ];
    let baseline = compute_baseline(&records);

    assert_eq!(baseline.total_customers, 4, "zero-visit rows are still customers");
    assert_eq!(baseline.rate, 0.5);
    assert_eq!(baseline.avg_revenue_per_retained, 20_000.0);
    assert_eq!(baseline.baseline_retained_revenue, 40_000.0);
}

/// Nobody retained: average revenue is 0 rather than a division by zero.
#[test]
fn baseline_without_retained_customers_is_finite() {
    let records = vec![
        CustomerRecord::new("a", 2, false, 5_000.0),
        CustomerRecord::new("b", 9, false, 8_000.0),
    ];
    let baseline = compute_baseline(&records);

    assert_eq!(baseline.rate, 0.0);
    assert_eq!(baseline.avg_revenue_per_retained, 0.0);
    assert_eq!(baseline.baseline_retained_revenue, 0.0);
}

// ── Simulator ────────────────────────────────────────────────────────────────

/// At the populated bucket's own knot the projection equals the baseline.
#[test]
fn loyal_cohort_at_its_knot_has_no_change() {
    let records = loyal_five_day_cohort();
    let anchors = anchors_for(&records);
    let baseline = compute_baseline(&records);

    assert_eq!(anchors[2], AnchorPoint { day: 7, rate: 1.0 });

    let result = simulate(&anchors, &baseline, 7.0);
    assert_eq!(result.target_day, 7.0);
    assert_eq!(result.simulated_rate, 1.0);
    assert_eq!(result.rate_change_pct, 0.0);
    assert_eq!(result.revenue_change, 0.0);
}

/// Day 5 sits between the forward-filled (3, 0) knot and (7, 1).
#[test]
fn loyal_cohort_between_knots_interpolates_from_empty_bucket() {
    let records = loyal_five_day_cohort();
    let anchors = anchors_for(&records);
    let baseline = compute_baseline(&records);

    assert_eq!(anchors[1].rate, 0.0, "2-3일 is empty and forward-fills from 0");

    let result = simulate(&anchors, &baseline, 5.0);
    assert!((result.simulated_rate - 0.5).abs() < EPS, "got {}", result.simulated_rate);
    assert!((result.rate_change_pct + 50.0).abs() < EPS, "got {}", result.rate_change_pct);
    // 10 × 0.5 × 1,000 − 10,000
    assert!((result.revenue_change + 5_000.0).abs() < EPS, "got {}", result.revenue_change);
}

#[test]
fn empty_record_set_is_all_zero() {
    let baseline = compute_baseline(&[]);
    assert_eq!(baseline, BaselineStats::default());

    let anchors = anchors_for(&[]);
    for day in [0.0, 1.0, 15.0, 30.0, f64::NAN] {
        let result = simulate(&anchors, &baseline, day);
        assert_eq!(result.simulated_rate, 0.0, "day {day}");
        assert_eq!(result.rate_change_pct, 0.0, "day {day}");
        assert_eq!(result.revenue_change, 0.0, "day {day}");
    }
}

/// Any anchor set against an empty baseline still yields zeros.
#[test]
fn empty_baseline_ignores_anchors() {
    let anchors = vec![
        AnchorPoint { day: 1, rate: 0.9 },
        AnchorPoint { day: 15, rate: 0.9 },
    ];
    let result = simulate(&anchors, &compute_baseline(&[]), 10.0);
    assert_eq!(result.simulated_rate, 0.0);
    assert_eq!(result.revenue_change, 0.0);
    assert_eq!(result.target_day, 10.0);
}

/// Projection uses the continuous expected count, not a rounded one.
#[test]
fn projected_revenue_is_not_rounded_to_whole_customers() {
    let records = vec![
        CustomerRecord::new("a", 1, true, 9_000.0),
        CustomerRecord::new("b", 1, false, 0.0),
        CustomerRecord::new("c", 1, false, 0.0),
    ];
    let anchors = vec![
        AnchorPoint { day: 1, rate: 1.0 / 3.0 },
        AnchorPoint { day: 3, rate: 0.5 },
    ];
    let baseline = compute_baseline(&records);
    let result = simulate(&anchors, &baseline, 2.0);

    // rate at day 2 = (1/3 + 1/2) / 2 = 5/12; 3 × 5/12 × 9,000 = 11,250
    assert!((result.simulated_rate - 5.0 / 12.0).abs() < EPS);
    assert!((result.revenue_change - (11_250.0 - 9_000.0)).abs() < 1e-6);
}

/// Simulated rates stay in [0,1] and deltas stay finite on generated data.
#[test]
fn simulation_is_bounded_across_seeds() {
    for seed in [3u64, 11, 99, 31337] {
        let records = PopulationGenerator::new(seed).generate(1_500);
        let anchors = anchors_for(&records);
        let baseline = compute_baseline(&records);
        assert!((0.0..=1.0).contains(&baseline.rate), "seed {seed}");

        for day in 0..=32 {
            let result = simulate(&anchors, &baseline, day as f64);
            assert!(
                (0.0..=1.0).contains(&result.simulated_rate),
                "seed {seed} day {day}: rate {}",
                result.simulated_rate
            );
            assert!(result.rate_change_pct.is_finite(), "seed {seed} day {day}");
            assert!(result.revenue_change.is_finite(), "seed {seed} day {day}");
        }
    }
}
