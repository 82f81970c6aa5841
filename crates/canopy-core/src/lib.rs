//! Environmental scoring core for city wards.
//!
//! Turns spectral bands, temperature, humidity, and density readings into
//! vegetation indices, heat stress, change alerts, risk scores, plantation
//! plans, and batch-level dashboard KPIs. Every engine is a pure function of
//! its input record and a [`PolicyConfig`]; persistence and transport belong
//! to the caller.

pub mod alerts;
pub mod batch;
pub mod change;
pub mod error;
pub mod heat;
pub mod kpi;
pub mod numeric;
pub mod pipeline;
pub mod plantation;
pub mod policy;
pub mod risk;
pub mod vegetation;

pub use alerts::{derive_alerts, AlertRecord, AlertType};
pub use batch::{
    analyze_batch, plan_batch, run_batch, simulate_batch, simulate_observation, BatchReport,
    PlanBatch, PlanTarget, WardInput, WardPlan,
};
pub use change::{detect_vegetation_change, AlertLevel, ChangeInput, ChangeResult, ChangeType};
pub use error::{Result, ScoringError};
pub use heat::{compute_heat_stress, HeatInput, HeatResult, HeatRiskCategory};
pub use kpi::{summarize_kpis, Kpi, KpiStatus, KpiSummary};
pub use pipeline::{
    PriorObservation, WardAnalysis, WardAnalyzer, WardObservation, WardProfile, WardSnapshot,
};
pub use plantation::{
    correlation_agent_analyze, plan_chain, strategy_agent_plan, vision_agent_analyze,
    CorrelationInput, CorrelationResult, PlanOutcome, PlanRequest, PlantationPlan, StrategyInput,
    VisionInput, VisionResult,
};
pub use policy::{LandProfile, LandType, PolicyConfig};
pub use risk::{
    assess_ward_risk, compute_risk_assessment, rank_wards, ranking_risk_score, Priority,
    RankedWard, RankingInput, Recommendation, RiskInput, RiskResult,
};
pub use vegetation::{compute_vegetation_health, VegetationDensity, VegetationInput, VegetationResult};
