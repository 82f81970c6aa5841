//! Carbon uptake of a ward's existing canopy.

use serde::{Deserialize, Serialize};

use crate::error::{percent, positive, Result};
use crate::policy::PolicyConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonInput {
    pub green_cover_percent: f64,
    /// km².
    pub ward_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonEstimate {
    pub tree_count_estimate: u64,
    /// t CO₂ per year.
    pub absorption_tons: f64,
    /// t CO₂ per year per km².
    pub carbon_density: f64,
}

pub fn estimate_carbon_absorption(
    input: &CarbonInput,
    policy: &PolicyConfig,
) -> Result<CarbonEstimate> {
    percent("greenCoverPercent", input.green_cover_percent)?;
    positive("wardArea", input.ward_area)?;

    let trees = (input.green_cover_percent * input.ward_area * policy.canopy_trees_per_pct_km2)
        .round() as u64;
    let absorption = trees as f64 * policy.co2_tonnes_per_tree;

    Ok(CarbonEstimate {
        tree_count_estimate: trees,
        absorption_tons: absorption,
        carbon_density: absorption / input.ward_area,
    })
}
