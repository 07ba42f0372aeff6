//! Synthetic PC방 customer population.
//!
//! Produces records with the same shape as the May export: a skewed
//! visit-day distribution, spend that scales with visits, and a 90-day
//! retention probability that rises with visit frequency. Used by the
//! runner when no data file is supplied and by the property tests.

use crate::{
    customer::CustomerRecord,
    rng::{SampleRng, SampleStream},
};

const REGIONS: &[(&str, &[&str], f64)] = &[
    ("Seoul",       &["Gangnam", "Mapo", "Gwanak", "Nowon"],   0.30),
    ("Gyeonggi-do", &["Yongin", "Suwon", "Seongnam", "Goyang"], 0.28),
    ("Incheon",     &["Bupyeong", "Yeonsu"],                    0.08),
    ("Busan",       &["Haeundae", "Busanjin"],                  0.08),
    ("Daegu",       &["Suseong", "Dalseo"],                     0.06),
    ("Daejeon",     &["Yuseong"],                               0.05),
    ("Gwangju",     &["Buk-gu"],                                0.04),
    ("Gangwon-do",  &["Chuncheon", "Wonju"],                    0.04),
    ("Jeju",        &["Jeju-si"],                               0.02),
    ("Others",      &["Others"],                                0.05),
];

const AGE_GROUPS: &[(&str, u32, u32, f64)] = &[
    ("Teens",    14, 19, 0.22),
    ("Twenties", 20, 29, 0.45),
    ("Thirties", 30, 39, 0.20),
    ("Forties",  40, 49, 0.09),
    ("Others",   50, 65, 0.04),
];

/// Won per hour at a typical PC방 counter.
const HOURLY_RATE: f64 = 1_200.0;

pub struct PopulationGenerator {
    demographics: SampleRng,
    visits:       SampleRng,
    spend:        SampleRng,
    retention:    SampleRng,
}

impl PopulationGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            demographics: SampleRng::new(seed, SampleStream::Demographics),
            visits:       SampleRng::new(seed, SampleStream::Visits),
            spend:        SampleRng::new(seed, SampleStream::Spend),
            retention:    SampleRng::new(seed, SampleStream::Retention),
        }
    }

    pub fn generate(&mut self, n: usize) -> Vec<CustomerRecord> {
        (0..n).map(|i| self.next_customer(i)).collect()
    }

    fn next_customer(&mut self, i: usize) -> CustomerRecord {
        let region_weights: Vec<f64> = REGIONS.iter().map(|r| r.2).collect();
        let (region, cities, _) = REGIONS[self.demographics.weighted_index(&region_weights)];
        let city = cities[self.demographics.next_u64_below(cities.len() as u64) as usize];

        let age_weights: Vec<f64> = AGE_GROUPS.iter().map(|a| a.3).collect();
        let (age_group, min_age, max_age, _) =
            AGE_GROUPS[self.demographics.weighted_index(&age_weights)];
        let age = min_age + self.demographics.next_u64_below((max_age - min_age + 1) as u64) as u32;

        // ~8% of exported rows have no recorded visit in the window.
        let visit_days = if self.visits.chance(0.08) {
            0
        } else {
            (self.visits.pareto(1.0, 1.1).floor() as u32).min(31)
        };

        let session_min = 60.0 + self.spend.next_f64() * 180.0;
        let total_duration_min = (visit_days as f64 * session_min).round();
        let revenue = if visit_days == 0 {
            0.0
        } else {
            let base = total_duration_min / 60.0 * HOURLY_RATE;
            // Snacks and top-ups on top of seat time.
            (base * self.spend.pareto(1.0, 3.0) / 100.0).round() * 100.0
        };

        let p_retained = 0.12 + 0.70 * (1.0 - (-(visit_days as f64) / 6.0).exp());
        let retained = self.retention.chance(p_retained);

        CustomerRecord {
            id: format!("u-{i:06}"),
            region: region.to_string(),
            city: city.to_string(),
            age_group: age_group.to_string(),
            age,
            visit_days,
            total_duration_min,
            retained,
            revenue,
        }
    }
}
