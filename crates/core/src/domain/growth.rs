use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const MONTHS: usize = 12;

/// Flat uplift applied to the cumulative contributions. A stand-in for
/// compounding, not a rate of return.
pub const GROWTH_FACTOR: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContributionPlan {
    #[default]
    #[serde(rename = "$500")]
    Monthly500,
    #[serde(rename = "$1000")]
    Monthly1000,
}

impl ContributionPlan {
    pub const ALL: [ContributionPlan; 2] = [ContributionPlan::Monthly500, ContributionPlan::Monthly1000];

    pub fn amount(self) -> f64 {
        match self {
            ContributionPlan::Monthly500 => 500.0,
            ContributionPlan::Monthly1000 => 1000.0,
        }
    }

    /// The label persisted in the preference object.
    pub fn label(self) -> &'static str {
        match self {
            ContributionPlan::Monthly500 => "$500",
            ContributionPlan::Monthly1000 => "$1000",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for ContributionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/mo", self.label())
    }
}

impl FromStr for ContributionPlan {
    type Err = anyhow::Error;

    /// Accepts the stored label (`$500`) or the bare amount (`500`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let label = if s.starts_with('$') {
            s.to_string()
        } else {
            format!("${s}")
        };
        Self::from_label(&label)
            .ok_or_else(|| anyhow::anyhow!("unknown contribution plan {s:?} (expected 500 or 1000)"))
    }
}

pub fn triangular(n: u32) -> f64 {
    f64::from(n) * f64::from(n + 1) / 2.0
}

/// `series[i] = amount * triangular(i) * 1.01` for i in 0..12.
pub fn growth_series(amount: f64) -> [f64; MONTHS] {
    std::array::from_fn(|i| amount * triangular(i as u32) * GROWTH_FACTOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub month: u32,
    pub label: String,
    pub monthly_500: f64,
    pub monthly_1000: f64,
}

impl GrowthPoint {
    pub fn value(&self, plan: ContributionPlan) -> f64 {
        match plan {
            ContributionPlan::Monthly500 => self.monthly_500,
            ContributionPlan::Monthly1000 => self.monthly_1000,
        }
    }
}

/// Both plans' curves, computed on first use and never changed afterwards.
pub fn projection() -> &'static [GrowthPoint] {
    static PROJECTION: OnceLock<Vec<GrowthPoint>> = OnceLock::new();
    PROJECTION.get_or_init(|| {
        let low = growth_series(ContributionPlan::Monthly500.amount());
        let high = growth_series(ContributionPlan::Monthly1000.amount());
        (0..MONTHS)
            .map(|i| GrowthPoint {
                month: i as u32 + 1,
                label: format!("Month {}", i + 1),
                monthly_500: low[i],
                monthly_1000: high[i],
            })
            .collect()
    })
}
