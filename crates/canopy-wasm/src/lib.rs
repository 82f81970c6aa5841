//! Browser bindings for the scoring engines.
//!
//! Every export takes the engine's input record as a JSON string and returns
//! the result as a plain JS object. Validation failures come back as a string
//! error naming the offending field. An optional TOML policy override may be
//! passed to any engine that reads policy.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use canopy_core::batch::{PlanTarget, WardInput};
use canopy_core::plantation::{PlanRequest, PlanSummary};
use canopy_core::{
    ChangeInput, CorrelationInput, HeatInput, PolicyConfig, RankingInput, RiskInput,
    StrategyInput, VegetationInput, VisionInput, WardAnalyzer,
};

// ── Native core ───────────────────────────────────────────────────────────────
//
// Returns `Result<_, String>` so it runs and tests off-wasm.

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {what}: {e}"))
}

fn policy(policy_toml: Option<String>) -> Result<PolicyConfig, String> {
    match policy_toml {
        Some(text) => PolicyConfig::from_toml_str(&text).map_err(|e| e.to_string()),
        None => Ok(PolicyConfig::default()),
    }
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

pub mod native {
    //! The bindings' logic, callable from native code and tests.

    use super::*;
    use canopy_core::WardAnalysis;

    pub fn analyze_ward(input_json: &str, policy_toml: Option<String>) -> Result<WardAnalysis, String> {
        let ward: WardInput = parse("ward", input_json)?;
        WardAnalyzer::new(policy(policy_toml)?)
            .analyze(&ward.observation, ward.prior.as_ref())
            .map_err(|e| e.to_string())
    }

    pub fn plan_ward(
        input_json: &str,
        seed: Option<u64>,
        policy_toml: Option<String>,
    ) -> Result<canopy_core::PlanOutcome, String> {
        let request: PlanRequest = parse("plan request", input_json)?;
        canopy_core::plan_chain(&request, &policy(policy_toml)?, &mut rng(seed))
            .map_err(|e| e.to_string())
    }

    pub fn run_batch(
        wards_json: &str,
        policy_toml: Option<String>,
    ) -> Result<canopy_core::BatchReport, String> {
        let wards: Vec<WardInput> = parse("wards", wards_json)?;
        canopy_core::run_batch(&WardAnalyzer::new(policy(policy_toml)?), &wards)
            .map_err(|e| e.to_string())
    }

    pub fn plan_batch(
        targets_json: &str,
        seed: Option<u64>,
        policy_toml: Option<String>,
    ) -> Result<canopy_core::PlanBatch, String> {
        let targets: Vec<PlanTarget> = parse("plan targets", targets_json)?;
        let analyzer = WardAnalyzer::new(policy(policy_toml)?);
        Ok(canopy_core::plan_batch(&analyzer, &targets, &mut rng(seed)))
    }

    pub fn filter_plan_summaries(
        plans_json: &str,
        filter: Option<String>,
    ) -> Result<Vec<PlanSummary>, String> {
        let plans: Vec<PlanSummary> = parse("plan summaries", plans_json)?;
        Ok(canopy_core::plantation::filter_plans(&plans, filter.as_deref())
            .into_iter()
            .cloned()
            .collect())
    }
}

// ── JS surface ────────────────────────────────────────────────────────────────

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn engine<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(js_name = computeVegetationHealth)]
pub fn compute_vegetation_health(input_json: &str) -> Result<JsValue, JsValue> {
    let input: VegetationInput = parse("vegetation input", input_json).map_err(js_err)?;
    to_js(&canopy_core::compute_vegetation_health(&input).map_err(engine)?)
}

#[wasm_bindgen(js_name = computeHeatStress)]
pub fn compute_heat_stress(input_json: &str, policy_toml: Option<String>) -> Result<JsValue, JsValue> {
    let input: HeatInput = parse("heat input", input_json).map_err(js_err)?;
    let policy = policy(policy_toml).map_err(js_err)?;
    to_js(&canopy_core::compute_heat_stress(&input, &policy).map_err(engine)?)
}

#[wasm_bindgen(js_name = detectVegetationChange)]
pub fn detect_vegetation_change(input_json: &str) -> Result<JsValue, JsValue> {
    let input: ChangeInput = parse("change input", input_json).map_err(js_err)?;
    to_js(&canopy_core::detect_vegetation_change(&input).map_err(engine)?)
}

#[wasm_bindgen(js_name = computeRiskAssessment)]
pub fn compute_risk_assessment(
    input_json: &str,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    let input: RiskInput = parse("risk input", input_json).map_err(js_err)?;
    let policy = policy(policy_toml).map_err(js_err)?;
    to_js(&canopy_core::compute_risk_assessment(&input, &policy).map_err(engine)?)
}

#[wasm_bindgen(js_name = rankWards)]
pub fn rank_wards(rows_json: &str) -> Result<JsValue, JsValue> {
    let rows: Vec<RankingInput> = parse("ranking rows", rows_json).map_err(js_err)?;
    to_js(&canopy_core::rank_wards(&rows).map_err(engine)?)
}

#[wasm_bindgen(js_name = visionAgentAnalyze)]
pub fn vision_agent_analyze(
    input_json: &str,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    let input: VisionInput = parse("vision input", input_json).map_err(js_err)?;
    let policy = policy(policy_toml).map_err(js_err)?;
    to_js(&canopy_core::vision_agent_analyze(&input, &policy).map_err(engine)?)
}

/// Without a `seed` the correlation jitter draws from browser entropy.
#[wasm_bindgen(js_name = correlationAgentAnalyze)]
pub fn correlation_agent_analyze(
    input_json: &str,
    seed: Option<u64>,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    let input: CorrelationInput = parse("correlation input", input_json).map_err(js_err)?;
    let policy = policy(policy_toml).map_err(js_err)?;
    let result = canopy_core::correlation_agent_analyze(&input, &policy, &mut rng(seed))
        .map_err(engine)?;
    to_js(&result)
}

#[wasm_bindgen(js_name = strategyAgentPlan)]
pub fn strategy_agent_plan(
    input_json: &str,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    let input: StrategyInput = parse("strategy input", input_json).map_err(js_err)?;
    let policy = policy(policy_toml).map_err(js_err)?;
    to_js(&canopy_core::strategy_agent_plan(&input, &policy).map_err(engine)?)
}

/// Full per-ward analysis: vegetation, heat, risk, change, alerts.
#[wasm_bindgen(js_name = analyzeWard)]
pub fn analyze_ward(input_json: &str, policy_toml: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&native::analyze_ward(input_json, policy_toml).map_err(js_err)?)
}

/// Vision → correlation → strategy plus the dashboard summary.
#[wasm_bindgen(js_name = planWard)]
pub fn plan_ward(
    input_json: &str,
    seed: Option<u64>,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    to_js(&native::plan_ward(input_json, seed, policy_toml).map_err(js_err)?)
}

/// Analyse, rank, and roll up a batch of wards into `{analyses, ranking, kpis}`.
#[wasm_bindgen(js_name = runBatch)]
pub fn run_batch(wards_json: &str, policy_toml: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&native::run_batch(wards_json, policy_toml).map_err(js_err)?)
}

/// Plan every ward; invalid wards are listed under `skipped`.
#[wasm_bindgen(js_name = planBatch)]
pub fn plan_batch(
    targets_json: &str,
    seed: Option<u64>,
    policy_toml: Option<String>,
) -> Result<JsValue, JsValue> {
    to_js(&native::plan_batch(targets_json, seed, policy_toml).map_err(js_err)?)
}

/// Filter stored plan summaries by `"high"` / `"medium"` and sort by urgency.
#[wasm_bindgen(js_name = filterPlans)]
pub fn filter_plans(plans_json: &str, filter: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&native::filter_plan_summaries(plans_json, filter).map_err(js_err)?)
}
