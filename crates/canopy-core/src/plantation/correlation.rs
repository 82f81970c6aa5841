//! Stage 2: link heat stress to vegetation deficiency.
//!
//! The heat/vegetation correlation is a placeholder empirical constant with a
//! little uniform jitter, not a fitted value. The jitter is drawn from the
//! caller's RNG so a seeded run reproduces exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{percent, Result};
use crate::numeric::round_dp;
use crate::policy::PolicyConfig;

/// Heat index regarded as comfortable; cooling potential counts from here.
const COMFORT_HEAT_INDEX: f64 = 60.0;
/// °C of amplification at full urban density.
const MAX_URBAN_AMPLIFICATION_C: f64 = 1.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationInput {
    pub heat_index: f64,
    pub green_cover_percent: f64,
    pub urban_density: f64,
}

impl CorrelationInput {
    fn validate(&self) -> Result<()> {
        percent("heatIndex", self.heat_index)?;
        percent("greenCoverPercent", self.green_cover_percent)?;
        percent("urbanDensity", self.urban_density)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    /// Baseline plus jitter in `[baseline, baseline + jitter)`, 2 dp.
    pub heat_vegetation_correlation: f64,
    /// °C, 2 dp.
    pub urban_heat_amplification: f64,
    /// Heat-index points above comfort, halved; 2 dp.
    pub cooling_potential: f64,
    pub trees_per_degree: i32,
}

pub fn correlation_agent_analyze<R: Rng + ?Sized>(
    input: &CorrelationInput,
    policy: &PolicyConfig,
    rng: &mut R,
) -> Result<CorrelationResult> {
    input.validate()?;

    let jitter = rng.gen::<f64>() * policy.correlation_jitter;
    let correlation = policy.correlation_baseline + jitter;
    let amplification = input.urban_density / 100.0 * MAX_URBAN_AMPLIFICATION_C;
    let cooling_potential = (input.heat_index - COMFORT_HEAT_INDEX).max(0.0) * 0.5;

    Ok(CorrelationResult {
        heat_vegetation_correlation: round_dp(correlation, 2),
        urban_heat_amplification: round_dp(amplification, 2),
        cooling_potential: round_dp(cooling_potential, 2),
        trees_per_degree: policy.trees_per_degree().round() as i32,
    })
}
