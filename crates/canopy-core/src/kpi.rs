//! Dashboard KPIs rolled up from a batch of analysed wards.
//!
//! Five headline figures, each with a traffic-light status:
//!
//! | KPI               | critical | warning |
//! |-------------------|----------|---------|
//! | green cover (avg) | < 20 %   | < 25 %  |
//! | heat index (avg)  | > 80     | > 70    |
//! | high-risk wards   | > 40     | > 20    |
//! | CO₂ absorption    | < 2500 t | < 3000 t|
//! | tree-loss alerts  | > 25     | > 15    |

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::alerts::AlertType;
use crate::error::Result;
use crate::numeric::{round_dp, round_score};
use crate::pipeline::WardAnalysis;
use crate::plantation::{estimate_carbon_absorption, CarbonInput};
use crate::policy::PolicyConfig;
use crate::risk::Priority;

const GREEN_COVER_CRITICAL: f64 = 20.0;
const GREEN_COVER_WARNING: f64 = 25.0;
const HEAT_INDEX_CRITICAL: f64 = 80.0;
const HEAT_INDEX_WARNING: f64 = 70.0;
const HIGH_RISK_CRITICAL: f64 = 40.0;
const HIGH_RISK_WARNING: f64 = 20.0;
const CO2_CRITICAL: f64 = 2500.0;
const CO2_WARNING: f64 = 3000.0;
const TREE_LOSS_CRITICAL: f64 = 25.0;
const TREE_LOSS_WARNING: f64 = 15.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KpiStatus {
    Normal,
    Warning,
    Critical,
}

impl KpiStatus {
    /// Higher is worse.
    fn rising(value: f64, warning: f64, critical: f64) -> Self {
        if value > critical {
            Self::Critical
        } else if value > warning {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Lower is worse.
    fn falling(value: f64, warning: f64, critical: f64) -> Self {
        if value < critical {
            Self::Critical
        } else if value < warning {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub status: KpiStatus,
}

impl Kpi {
    fn new(label: &str, value: f64, unit: &str, status: KpiStatus) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Mean green cover, 1 dp.
    pub green_cover: Kpi,
    /// Mean heat index, integer.
    pub heat_stress: Kpi,
    /// Wards assessed high or critical.
    pub high_risk_wards: Kpi,
    /// Canopy uptake summed over wards with a known area, whole tons.
    /// Absent when no ward has an area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_absorption: Option<Kpi>,
    /// Vegetation-change alerts raised in the batch.
    pub tree_loss_alerts: Kpi,
}

impl KpiSummary {
    /// KPIs in dashboard order.
    pub fn iter(&self) -> impl Iterator<Item = &Kpi> {
        [
            Some(&self.green_cover),
            Some(&self.heat_stress),
            Some(&self.high_risk_wards),
            self.co2_absorption.as_ref(),
            Some(&self.tree_loss_alerts),
        ]
        .into_iter()
        .flatten()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Roll up a batch. `ward_areas` pairs with `analyses` by position; a missing
/// or `None` area leaves that ward out of the CO₂ total. An empty batch
/// averages to zero.
pub fn summarize_kpis(
    analyses: &[WardAnalysis],
    ward_areas: &[Option<f64>],
    policy: &PolicyConfig,
) -> Result<KpiSummary> {
    let covers: Vec<f64> = analyses
        .iter()
        .map(|a| a.vegetation.green_cover_percent)
        .collect();
    let green = mean(&covers);

    let heats: Vec<f64> = analyses
        .iter()
        .map(|a| f64::from(a.heat.heat_index))
        .collect();
    let heat = f64::from(round_score(mean(&heats)));

    let high_risk = analyses
        .iter()
        .filter(|a| a.risk.priority >= Priority::High)
        .count() as f64;

    let mut co2: Option<f64> = None;
    for (analysis, area) in analyses.iter().zip(ward_areas) {
        let Some(ward_area) = *area else { continue };
        let estimate = estimate_carbon_absorption(
            &CarbonInput {
                green_cover_percent: analysis.vegetation.green_cover_percent,
                ward_area,
            },
            policy,
        )?;
        *co2.get_or_insert(0.0) += estimate.absorption_tons;
    }

    let tree_loss = analyses
        .iter()
        .flat_map(|a| &a.alerts)
        .filter(|alert| alert.alert_type == AlertType::VegetationChange)
        .count() as f64;

    let summary = KpiSummary {
        green_cover: Kpi::new(
            "Total Green Cover",
            round_dp(green, 1),
            "%",
            KpiStatus::falling(green, GREEN_COVER_WARNING, GREEN_COVER_CRITICAL),
        ),
        heat_stress: Kpi::new(
            "Heat Stress Index",
            heat,
            "/100",
            KpiStatus::rising(heat, HEAT_INDEX_WARNING, HEAT_INDEX_CRITICAL),
        ),
        high_risk_wards: Kpi::new(
            "High Risk Wards",
            high_risk,
            "zones",
            KpiStatus::rising(high_risk, HIGH_RISK_WARNING, HIGH_RISK_CRITICAL),
        ),
        co2_absorption: co2.map(|tons| {
            Kpi::new(
                "CO₂ Absorption",
                tons.round(),
                "tons/yr",
                KpiStatus::falling(tons, CO2_WARNING, CO2_CRITICAL),
            )
        }),
        tree_loss_alerts: Kpi::new(
            "Tree Loss Alerts",
            tree_loss,
            "alerts",
            KpiStatus::rising(tree_loss, TREE_LOSS_WARNING, TREE_LOSS_CRITICAL),
        ),
    };
    log::info!(
        "kpis: green {}% heat {} high-risk {} co2 {:?}",
        summary.green_cover.value,
        summary.heat_stress.value,
        summary.high_risk_wards.value,
        summary.co2_absorption.as_ref().map(|k| k.value)
    );
    Ok(summary)
}
