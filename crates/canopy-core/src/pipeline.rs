//! Per-ward orchestrator: runs every engine for one observation in order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::alerts::{derive_alerts, AlertRecord};
use crate::change::{detect_vegetation_change, ChangeInput, ChangeResult};
use crate::error::Result;
use crate::heat::{adjusted_uhi_intensity, compute_heat_stress, HeatInput, HeatResult};
use crate::numeric::round_dp;
use crate::plantation::{plan_chain, PlanOutcome, PlanRequest};
use crate::policy::PolicyConfig;
use crate::risk::{assess_ward_risk, RankingInput, RiskInput, RiskResult};
use crate::vegetation::{compute_vegetation_health, VegetationInput, VegetationResult};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// One ward, one instant: bands, thermal readings, and social context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardObservation {
    pub ward_name: String,
    pub red_band: f64,
    pub nir_band: f64,
    #[serde(default = "crate::vegetation::default_blue_band")]
    pub blue_band: f64,
    pub land_surface_temp: f64,
    pub ambient_temp: f64,
    pub humidity: f64,
    pub urban_density: f64,
    #[serde(default = "crate::heat::default_rural_reference_temp")]
    pub rural_reference_temp: f64,
    pub tree_loss_rate: f64,
    pub population_density: f64,
    #[serde(default = "crate::risk::assessment::default_air_quality_index")]
    pub air_quality_index: f64,
    #[serde(default = "crate::risk::assessment::default_vulnerability_score")]
    pub vulnerability_score: f64,
}

/// The last stored vegetation reading for the same ward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorObservation {
    #[serde(rename = "previousNDVI")]
    pub previous_ndvi: f64,
    pub days_since: f64,
}

/// Static facts about a ward used for planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardProfile {
    pub ward_name: String,
    /// km².
    pub ward_area: f64,
    pub land_type: String,
    pub urban_density: f64,
}

/// The latest scored state of a ward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardSnapshot {
    pub ndvi: f64,
    pub green_cover_percent: f64,
    pub heat_index: f64,
    pub land_surface_temp: f64,
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAnalysis {
    pub ward_name: String,
    pub vegetation: VegetationResult,
    pub heat: HeatResult,
    /// UHI corrected for green cover and urban density, °C, 2 dp.
    pub adjusted_uhi_intensity: f64,
    pub risk: RiskResult,
    /// Present when a prior observation was supplied.
    pub change: Option<ChangeResult>,
    pub alerts: Vec<AlertRecord>,
}

impl WardAnalysis {
    /// Snapshot for the planning chain.
    pub fn snapshot(&self, land_surface_temp: f64) -> WardSnapshot {
        WardSnapshot {
            ndvi: self.vegetation.ndvi,
            green_cover_percent: self.vegetation.green_cover_percent,
            heat_index: f64::from(self.heat.heat_index),
            land_surface_temp,
        }
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Runs the engines under one policy.
#[derive(Debug, Clone, Default)]
pub struct WardAnalyzer {
    policy: PolicyConfig,
}

impl WardAnalyzer {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Analyse one observation.
    ///
    /// Stage order:
    ///   1. Vegetation health
    ///   2. Heat stress and adjusted UHI, using the computed green cover
    ///   3. Risk assessment, using the computed heat index
    ///   4. Change detection, when a prior exists
    ///   5. Alerts
    pub fn analyze(
        &self,
        obs: &WardObservation,
        prior: Option<&PriorObservation>,
    ) -> Result<WardAnalysis> {
        let previous_ndvi = prior.map(|p| p.previous_ndvi);

        // ── 1. Vegetation ───────────────────────────────────────────────────
        let vegetation = compute_vegetation_health(&VegetationInput {
            red_band: obs.red_band,
            nir_band: obs.nir_band,
            blue_band: obs.blue_band,
            previous_ndvi,
        })?;

        // ── 2. Heat ─────────────────────────────────────────────────────────
        let heat = compute_heat_stress(
            &HeatInput {
                land_surface_temp: obs.land_surface_temp,
                ambient_temp: obs.ambient_temp,
                humidity: obs.humidity,
                green_cover_percent: vegetation.green_cover_percent,
                urban_density: obs.urban_density,
                rural_reference_temp: obs.rural_reference_temp,
            },
            &self.policy,
        )?;
        let adjusted_uhi = adjusted_uhi_intensity(
            obs.land_surface_temp,
            obs.rural_reference_temp,
            vegetation.green_cover_percent / 100.0,
            obs.urban_density / 100.0,
        )?;

        // ── 3. Risk ─────────────────────────────────────────────────────────
        let risk = assess_ward_risk(
            &RiskInput {
                heat_index: f64::from(heat.heat_index),
                green_cover_percent: vegetation.green_cover_percent,
                tree_loss_rate: obs.tree_loss_rate,
                population_density: obs.population_density,
                air_quality_index: obs.air_quality_index,
                vulnerability_score: obs.vulnerability_score,
            },
            &self.policy,
        )?;

        // ── 4. Change ───────────────────────────────────────────────────────
        let change = prior
            .map(|p| {
                detect_vegetation_change(&ChangeInput::new(
                    vegetation.ndvi,
                    p.previous_ndvi,
                    p.days_since,
                ))
            })
            .transpose()?;

        // ── 5. Alerts ───────────────────────────────────────────────────────
        let alerts = derive_alerts(&vegetation, previous_ndvi, &heat, &risk)?;

        log::info!(
            "{}: ndvi={} heat={} risk={} ({}) alerts={}",
            obs.ward_name,
            vegetation.ndvi,
            heat.heat_index,
            risk.overall_risk_score,
            risk.priority,
            alerts.len()
        );

        Ok(WardAnalysis {
            ward_name: obs.ward_name.clone(),
            vegetation,
            heat,
            adjusted_uhi_intensity: round_dp(adjusted_uhi, 2),
            risk,
            change,
            alerts,
        })
    }

    /// Ward-list ranking row for an analysed observation.
    pub fn ranking_input(&self, obs: &WardObservation, analysis: &WardAnalysis) -> RankingInput {
        RankingInput::from_green_cover(
            analysis.ward_name.clone(),
            f64::from(analysis.heat.heat_index),
            analysis.vegetation.green_cover_percent,
            obs.tree_loss_rate,
            obs.population_density,
            &self.policy,
        )
    }

    /// Vision → correlation → strategy for one ward.
    pub fn plan_ward<R: Rng + ?Sized>(
        &self,
        profile: &WardProfile,
        snapshot: &WardSnapshot,
        rng: &mut R,
    ) -> Result<PlanOutcome> {
        plan_chain(
            &PlanRequest {
                ward_name: profile.ward_name.clone(),
                ward_area: profile.ward_area,
                land_type: profile.land_type.clone(),
                urban_density: profile.urban_density,
                ndvi: snapshot.ndvi,
                green_cover_percent: snapshot.green_cover_percent,
                heat_index: snapshot.heat_index,
                land_surface_temp: snapshot.land_surface_temp,
            },
            &self.policy,
            rng,
        )
    }
}
