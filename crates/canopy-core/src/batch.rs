//! Multi-ward batch analysis, ranking, KPIs, and plantation planning.
//!
//! Wards are independent, so with the `threading` feature the batch runs on
//! rayon's pool. Output order always equals input order. Random draws are made
//! sequentially from one RNG before any ward is processed, which keeps seeded
//! batches identical with or without threading.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::error::Result;
use crate::kpi::{summarize_kpis, KpiSummary};
use crate::pipeline::{
    PriorObservation, WardAnalysis, WardAnalyzer, WardObservation, WardProfile, WardSnapshot,
};
use crate::plantation::{PlanOutcome, PlanSummary};
use crate::risk::{rank_wards, RankedWard};

// ── Analysis ──────────────────────────────────────────────────────────────────

/// One batch row: the observation plus an optional prior reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardInput {
    #[serde(flatten)]
    pub observation: WardObservation,
    #[serde(default)]
    pub prior: Option<PriorObservation>,
    /// km²; wards without one are left out of the CO₂ KPI.
    #[serde(default)]
    pub ward_area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub analyses: Vec<WardAnalysis>,
    pub ranking: Vec<RankedWard>,
    pub kpis: KpiSummary,
}

/// Draw one plausible Delhi observation.
///
/// Ranges: base temperature 28–43 °C (LST = base + 5), humidity 40–80 %,
/// urban density 50–100, red 0.1–0.4, NIR 0.2–0.7, tree loss 0–20 per month,
/// population 10 000–40 000 per km².
pub fn simulate_observation<R: Rng + ?Sized>(
    ward_name: impl Into<String>,
    rng: &mut R,
) -> WardObservation {
    let base_temp = rng.gen_range(28.0..43.0);
    let humidity = rng.gen_range(40.0..80.0);
    let urban_density = rng.gen_range(50.0..100.0);
    let red_band = rng.gen_range(0.1..0.4);
    let nir_band = rng.gen_range(0.2..0.7);
    let tree_loss_rate = rng.gen_range(0.0..20.0);
    let population_density = rng.gen_range(10_000.0..40_000.0);

    WardObservation {
        ward_name: ward_name.into(),
        red_band,
        nir_band,
        blue_band: crate::vegetation::default_blue_band(),
        land_surface_temp: base_temp + 5.0,
        ambient_temp: base_temp,
        humidity,
        urban_density,
        rural_reference_temp: crate::heat::default_rural_reference_temp(),
        tree_loss_rate,
        population_density,
        air_quality_index: crate::risk::assessment::default_air_quality_index(),
        vulnerability_score: crate::risk::assessment::default_vulnerability_score(),
    }
}

fn analyze_one(analyzer: &WardAnalyzer, ward: &WardInput) -> Result<WardAnalysis> {
    analyzer.analyze(&ward.observation, ward.prior.as_ref())
}

/// Analyse every ward independently. The first invalid ward fails the batch.
pub fn analyze_batch(analyzer: &WardAnalyzer, wards: &[WardInput]) -> Result<Vec<WardAnalysis>> {
    #[cfg(feature = "threading")]
    let analyses = wards
        .par_iter()
        .map(|w| analyze_one(analyzer, w))
        .collect::<Result<Vec<_>>>();

    #[cfg(not(feature = "threading"))]
    let analyses = wards
        .iter()
        .map(|w| analyze_one(analyzer, w))
        .collect::<Result<Vec<_>>>();

    analyses
}

/// Analyse, rank, and roll up a batch.
pub fn run_batch(analyzer: &WardAnalyzer, wards: &[WardInput]) -> Result<BatchReport> {
    let analyses = analyze_batch(analyzer, wards)?;
    let rows: Vec<_> = wards
        .iter()
        .zip(&analyses)
        .map(|(w, a)| analyzer.ranking_input(&w.observation, a))
        .collect();
    let ranking = rank_wards(&rows)?;

    let areas: Vec<_> = wards.iter().map(|w| w.ward_area).collect();
    let kpis = summarize_kpis(&analyses, &areas, analyzer.policy())?;

    log::info!(
        "batch: {} wards analysed, {} alerts raised",
        analyses.len(),
        analyses.iter().map(|a| a.alerts.len()).sum::<usize>()
    );
    Ok(BatchReport {
        analyses,
        ranking,
        kpis,
    })
}

/// Simulate `count` wards from `seed`, then analyse and rank them.
///
/// Each ward also gets an area of 8–23 km².
pub fn simulate_batch(analyzer: &WardAnalyzer, count: usize, seed: u64) -> Result<BatchReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let wards: Vec<_> = (1..=count)
        .map(|n| {
            let observation = simulate_observation(format!("Ward {n}"), &mut rng);
            WardInput {
                observation,
                prior: None,
                ward_area: Some(rng.gen_range(8.0..23.0)),
            }
        })
        .collect();
    run_batch(analyzer, &wards)
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// One ward to plan: static profile plus latest scored state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTarget {
    #[serde(flatten)]
    pub profile: WardProfile,
    #[serde(flatten)]
    pub snapshot: WardSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardPlan {
    pub ward_name: String,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBatch {
    /// Number of wards planned.
    pub count: usize,
    pub results: Vec<WardPlan>,
    /// Wards whose inputs failed validation.
    pub skipped: Vec<String>,
}

impl PlanBatch {
    /// Dashboard rows, ready for [`crate::plantation::filter_plans`].
    pub fn summaries(&self) -> Vec<PlanSummary> {
        self.results.iter().map(|r| r.outcome.summary.clone()).collect()
    }
}

fn plan_one(analyzer: &WardAnalyzer, target: &PlanTarget, seed: u64) -> Result<PlanOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);
    analyzer.plan_ward(&target.profile, &target.snapshot, &mut rng)
}

/// Plan every ward in one pass. A ward that fails validation is logged and
/// skipped; the rest are still planned.
///
/// One seed per ward is drawn from `rng` in input order before planning.
pub fn plan_batch<R: Rng + ?Sized>(
    analyzer: &WardAnalyzer,
    targets: &[PlanTarget],
    rng: &mut R,
) -> PlanBatch {
    let seeds: Vec<u64> = targets.iter().map(|_| rng.gen()).collect();

    #[cfg(feature = "threading")]
    let outcomes: Vec<_> = targets
        .par_iter()
        .zip(&seeds)
        .map(|(t, &seed)| plan_one(analyzer, t, seed))
        .collect();

    #[cfg(not(feature = "threading"))]
    let outcomes: Vec<_> = targets
        .iter()
        .zip(&seeds)
        .map(|(t, &seed)| plan_one(analyzer, t, seed))
        .collect();

    let mut results = Vec::with_capacity(targets.len());
    let mut skipped = Vec::new();
    for (target, outcome) in targets.iter().zip(outcomes) {
        let ward_name = target.profile.ward_name.clone();
        match outcome {
            Ok(outcome) => results.push(WardPlan { ward_name, outcome }),
            Err(e) => {
                log::warn!("skipping plan for {ward_name}: {e}");
                skipped.push(ward_name);
            }
        }
    }

    log::info!("generated plans for {} wards", results.len());
    PlanBatch {
        count: results.len(),
        results,
        skipped,
    }
}
