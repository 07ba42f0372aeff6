//! Dashboard configuration loaded from the data directory.
//!
//! Files:
//!   {data_dir}/dashboard/dashboard_config.json   simulator, panels, targeting
//!   {data_dir}/regions/region_labels.json        region key → Korean label
//!
//! Tests use `InsightConfig::default_test()`, which mirrors the shipped files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── What-if simulator ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub default_target_day: f64,
    /// Slider bounds shown to the operator. The engine itself accepts any day.
    pub target_day_min: f64,
    pub target_day_max: f64,
}

// ── Dashboard panels ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Rows shown in the churn-risk table.
    pub churn_list_limit: usize,
    /// Regions shown in the region retention chart.
    pub top_regions: usize,
    /// Display order of age groups; unknown groups sort last.
    pub age_group_order: Vec<String>,
}

// ── Saved targeting ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingRules {
    /// Saved age bracket (`20s`) → age groups it covers (`Twenties`).
    pub age_brackets: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardConfigFile {
    simulator: SimulatorConfig,
    panels: PanelConfig,
    targeting: TargetingRules,
}

// ── Region labels ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionLabel {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RegionLabelsFile {
    regions: Vec<RegionLabel>,
}

#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub simulator: SimulatorConfig,
    pub panels: PanelConfig,
    pub targeting: TargetingRules,
    /// Region key (`Gyeonggi-do`) → display label (`경기`).
    pub region_labels: HashMap<String, String>,
}

impl InsightConfig {
    /// Load from the data/ directory.
    /// In tests, use InsightConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let dashboard_path = format!("{data_dir}/dashboard/dashboard_config.json");
        let dashboard_content = std::fs::read_to_string(&dashboard_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {dashboard_path}: {e}"))?;
        let dashboard: DashboardConfigFile = serde_json::from_str(&dashboard_content)?;

        let regions_path = format!("{data_dir}/regions/region_labels.json");
        let regions_content = std::fs::read_to_string(&regions_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {regions_path}: {e}"))?;
        let regions_file: RegionLabelsFile = serde_json::from_str(&regions_content)?;
        let region_labels = regions_file
            .regions
            .into_iter()
            .map(|r| (r.key, r.label))
            .collect();

        let config = Self {
            simulator: dashboard.simulator,
            panels: dashboard.panels,
            targeting: dashboard.targeting,
            region_labels,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let region_labels = [
            ("Seoul", "서울"),
            ("Gyeonggi-do", "경기"),
            ("Incheon", "인천"),
            ("Gangwon-do", "강원"),
            ("Chungcheongnam-do", "충남"),
            ("Chungcheongbuk-do", "충북"),
            ("Daejeon", "대전"),
            ("Sejong", "세종"),
            ("Gyeongsangnam-do", "경남"),
            ("Gyeongsangbuk-do", "경북"),
            ("Busan", "부산"),
            ("Ulsan", "울산"),
            ("Daegu", "대구"),
            ("Jeollanam-do", "전남"),
            ("Jeollabuk-do", "전북"),
            ("Gwangju", "광주"),
            ("Jeju", "제주"),
            ("Others", "기타"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            simulator: SimulatorConfig {
                default_target_day: 15.0,
                target_day_min: 1.0,
                target_day_max: 30.0,
            },
            panels: PanelConfig {
                churn_list_limit: 100,
                top_regions: 10,
                age_group_order: ["Teens", "Twenties", "Thirties", "Forties", "Fifties", "Sixties", "Others"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            },
            targeting: TargetingRules {
                age_brackets: [
                    ("10s", &["Teens"][..]),
                    ("20s", &["Twenties"][..]),
                    ("30s", &["Thirties"][..]),
                    ("40s", &["Forties"][..]),
                    ("50s", &["Fifties", "Sixties"][..]),
                ]
                .into_iter()
                .map(|(k, groups)| (k.to_string(), groups.iter().map(|g| g.to_string()).collect()))
                .collect(),
            },
            region_labels,
        }
    }

    /// Region key for a display label (`경기` → `Gyeonggi-do`).
    /// A value that is already a key is returned unchanged.
    pub fn region_key(&self, label: &str) -> Option<&str> {
        if let Some((key, _)) = self.region_labels.get_key_value(label) {
            return Some(key.as_str());
        }
        self.region_labels
            .iter()
            .find(|(_, v)| v.as_str() == label)
            .map(|(k, _)| k.as_str())
    }

    /// Display label for a region key, falling back to the key itself.
    pub fn region_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.region_labels.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Clamp an operator-supplied target day into the slider range.
    pub fn clamp_target_day(&self, target_day: f64) -> f64 {
        if target_day.is_nan() {
            return self.simulator.default_target_day;
        }
        target_day.clamp(self.simulator.target_day_min, self.simulator.target_day_max)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let s = &self.simulator;
        if !(s.target_day_min.is_finite() && s.target_day_max.is_finite())
            || s.target_day_min > s.target_day_max
        {
            anyhow::bail!(
                "simulator target day range [{}, {}] is invalid",
                s.target_day_min,
                s.target_day_max
            );
        }
        if !(s.target_day_min..=s.target_day_max).contains(&s.default_target_day) {
            anyhow::bail!(
                "default_target_day {} outside [{}, {}]",
                s.default_target_day,
                s.target_day_min,
                s.target_day_max
            );
        }
        Ok(())
    }
}
