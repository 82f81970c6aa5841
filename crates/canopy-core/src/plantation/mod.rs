//! Plantation strategy: Vision → Correlation → Strategy.
//!
//! Each stage is a pure function over its own input record. Stages run in
//! order because each consumes the previous stage's output; [`plan_chain`]
//! does the wiring for callers that just want a plan.
//!
//! ```text
//!   VisionInput ──► VisionResult ─┐
//!                                 ├──► StrategyInput ──► PlantationPlan
//!   CorrelationInput ──► CorrelationResult ─┘
//! ```

pub mod carbon;
pub mod correlation;
pub mod strategy;
pub mod summary;
pub mod vision;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::PolicyConfig;

pub use carbon::{estimate_carbon_absorption, CarbonEstimate, CarbonInput};
pub use correlation::{correlation_agent_analyze, CorrelationInput, CorrelationResult};
pub use strategy::{strategy_agent_plan, ImplementationTimeline, PlantationPlan, StrategyInput};
pub use summary::{filter_plans, land_type_label, priority_floor, PlanPriority, PlanSummary};
pub use vision::{vision_agent_analyze, ThermalStatus, VegetationStatus, VisionInput, VisionResult};

/// Everything the chain needs about one ward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub ward_name: String,
    pub ward_area: f64,
    pub land_type: String,
    pub urban_density: f64,
    pub ndvi: f64,
    pub green_cover_percent: f64,
    pub heat_index: f64,
    pub land_surface_temp: f64,
}

/// Output of all three stages plus the dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub vision: VisionResult,
    pub correlation: CorrelationResult,
    pub plan: PlantationPlan,
    pub summary: PlanSummary,
}

/// Run vision, then correlation, then strategy for one ward.
pub fn plan_chain<R: Rng + ?Sized>(
    request: &PlanRequest,
    policy: &PolicyConfig,
    rng: &mut R,
) -> Result<PlanOutcome> {
    let vision = vision_agent_analyze(
        &VisionInput {
            ndvi: request.ndvi,
            green_cover_percent: request.green_cover_percent,
            heat_index: request.heat_index,
            land_surface_temp: request.land_surface_temp,
        },
        policy,
    )?;

    let correlation = correlation_agent_analyze(
        &CorrelationInput {
            heat_index: request.heat_index,
            green_cover_percent: request.green_cover_percent,
            urban_density: request.urban_density,
        },
        policy,
        rng,
    )?;

    let plan = strategy_agent_plan(
        &StrategyInput {
            ward_name: request.ward_name.clone(),
            ward_area: request.ward_area,
            land_type: request.land_type.clone(),
            coverage_gap: vision.coverage_gap,
            priority_level: f64::from(vision.priority_level),
            cooling_potential: correlation.cooling_potential,
            urban_density: request.urban_density,
        },
        policy,
    )?;

    let summary = PlanSummary::new(&request.ward_name, &plan);
    log::info!(
        "planned {}: {} trees, priority {} ({})",
        request.ward_name,
        plan.required_trees,
        plan.priority_score,
        summary.priority
    );

    Ok(PlanOutcome {
        vision,
        correlation,
        plan,
        summary,
    })
}
