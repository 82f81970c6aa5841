//! Six-factor ward risk assessment.
//!
//! overall = round(0.25·heat + 0.25·vegetation + 0.15·treeLoss
//!               + 0.15·population + 0.10·airQuality + 0.10·vulnerability)
//!
//! Each factor is on a 0–100 scale before weighting.

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, percent, Result};
use crate::numeric::{clamp_pct, round_score};
use crate::policy::PolicyConfig;

use super::Priority;

const W_HEAT: f64 = 0.25;
const W_VEGETATION: f64 = 0.25;
const W_TREE_LOSS: f64 = 0.15;
const W_POPULATION: f64 = 0.15;
const W_AIR_QUALITY: f64 = 0.10;
const W_VULNERABILITY: f64 = 0.10;

/// Population factor is `density / 500 · 100`, saturating at 500 people/km².
const POPULATION_SCALE: f64 = 500.0;
/// AQI that counts as a full air-quality factor.
const AQI_SCALE: f64 = 300.0;

pub(crate) fn default_air_quality_index() -> f64 {
    150.0
}

pub(crate) fn default_vulnerability_score() -> f64 {
    50.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    /// 0–100, from the heat-stress engine.
    pub heat_index: f64,
    pub green_cover_percent: f64,
    /// Trees lost per month (count-like, ≥ 0).
    pub tree_loss_rate: f64,
    /// People per km².
    pub population_density: f64,
    #[serde(default = "default_air_quality_index")]
    pub air_quality_index: f64,
    /// 0–100 social vulnerability.
    #[serde(default = "default_vulnerability_score")]
    pub vulnerability_score: f64,
}

impl RiskInput {
    pub fn new(
        heat_index: f64,
        green_cover_percent: f64,
        tree_loss_rate: f64,
        population_density: f64,
    ) -> Self {
        Self {
            heat_index,
            green_cover_percent,
            tree_loss_rate,
            population_density,
            air_quality_index: default_air_quality_index(),
            vulnerability_score: default_vulnerability_score(),
        }
    }

    fn validate(&self) -> Result<()> {
        percent("heatIndex", self.heat_index)?;
        percent("greenCoverPercent", self.green_cover_percent)?;
        non_negative("treeLossRate", self.tree_loss_rate)?;
        non_negative("populationDensity", self.population_density)?;
        non_negative("airQualityIndex", self.air_quality_index)?;
        percent("vulnerabilityScore", self.vulnerability_score)?;
        Ok(())
    }
}

/// Fixed recommendation texts, emitted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Urgent cooling intervention needed")]
    UrgentCooling,
    #[serde(rename = "Priority plantation zone")]
    PriorityPlantation,
    #[serde(rename = "Enhanced monitoring required")]
    EnhancedMonitoring,
    #[serde(rename = "Focus on high-density public spaces")]
    HighDensityPublicSpaces,
}

impl Recommendation {
    pub fn text(self) -> &'static str {
        match self {
            Self::UrgentCooling => "Urgent cooling intervention needed",
            Self::PriorityPlantation => "Priority plantation zone",
            Self::EnhancedMonitoring => "Enhanced monitoring required",
            Self::HighDensityPublicSpaces => "Focus on high-density public spaces",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Per-factor scores, each 0–100, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub heat: f64,
    pub vegetation: f64,
    pub tree_loss: f64,
    pub population: f64,
    pub air_quality: f64,
    pub vulnerability: f64,
}

impl RiskFactors {
    fn weighted_sum(&self) -> f64 {
        self.heat * W_HEAT
            + self.vegetation * W_VEGETATION
            + self.tree_loss * W_TREE_LOSS
            + self.population * W_POPULATION
            + self.air_quality * W_AIR_QUALITY
            + self.vulnerability * W_VULNERABILITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub overall_risk_score: i32,
    pub heat_risk_score: i32,
    pub vegetation_risk_score: i32,
    pub priority: Priority,
    pub risk_factors: RiskFactors,
    pub recommendations: Vec<Recommendation>,
}

/// Vegetation deficit against the policy target, scaled ×3 and clamped.
/// A ward at or above target scores 0.
pub fn vegetation_risk_score(green_cover_percent: f64, policy: &PolicyConfig) -> f64 {
    clamp_pct((policy.green_cover_target_pct - green_cover_percent) * 3.0)
}

pub fn compute_risk_assessment(input: &RiskInput, policy: &PolicyConfig) -> Result<RiskResult> {
    input.validate()?;

    let factors = RiskFactors {
        heat: input.heat_index,
        vegetation: vegetation_risk_score(input.green_cover_percent, policy),
        tree_loss: clamp_pct(input.tree_loss_rate * 5.0),
        population: clamp_pct(input.population_density / POPULATION_SCALE * 100.0),
        air_quality: clamp_pct(input.air_quality_index / AQI_SCALE * 100.0),
        vulnerability: input.vulnerability_score,
    };

    let overall = round_score(factors.weighted_sum());

    // Conditions are independent; order is fixed.
    let recommendations = [
        (factors.heat > 70.0, Recommendation::UrgentCooling),
        (factors.vegetation > 60.0, Recommendation::PriorityPlantation),
        (factors.tree_loss > 50.0, Recommendation::EnhancedMonitoring),
        (factors.population > 70.0, Recommendation::HighDensityPublicSpaces),
    ]
    .into_iter()
    .filter_map(|(hit, rec)| hit.then_some(rec))
    .collect();

    let result = RiskResult {
        overall_risk_score: overall,
        heat_risk_score: round_score(factors.heat),
        vegetation_risk_score: round_score(factors.vegetation),
        priority: Priority::from_score(overall),
        risk_factors: factors,
        recommendations,
    };
    log::debug!(
        "risk: overall={} priority={} recommendations={}",
        result.overall_risk_score,
        result.priority,
        result.recommendations.len()
    );
    Ok(result)
}
