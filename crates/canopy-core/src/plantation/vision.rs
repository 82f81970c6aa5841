//! Stage 1: read the ward's vegetation and thermal state and size the gap.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{finite, index, percent, Result};
use crate::numeric::{clamp_pct, round_score};
use crate::policy::PolicyConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionInput {
    pub ndvi: f64,
    pub green_cover_percent: f64,
    pub heat_index: f64,
    pub land_surface_temp: f64,
}

impl VisionInput {
    fn validate(&self) -> Result<()> {
        index("ndvi", self.ndvi)?;
        percent("greenCoverPercent", self.green_cover_percent)?;
        percent("heatIndex", self.heat_index)?;
        finite("landSurfaceTemp", self.land_surface_temp)?;
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VegetationStatus {
    CriticallyLow,
    Sparse,
    Moderate,
    Adequate,
}

impl VegetationStatus {
    /// <0.1 critically low, <0.2 sparse, <0.35 moderate, otherwise adequate.
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi < 0.1 {
            Self::CriticallyLow
        } else if ndvi < 0.2 {
            Self::Sparse
        } else if ndvi < 0.35 {
            Self::Moderate
        } else {
            Self::Adequate
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThermalStatus {
    Normal,
    ModerateHeat,
    HighHeat,
    ExtremeHeat,
}

impl ThermalStatus {
    /// ≥90 extreme, ≥75 high, ≥50 moderate, otherwise normal.
    pub fn from_heat_index(heat_index: f64) -> Self {
        if heat_index >= 90.0 {
            Self::ExtremeHeat
        } else if heat_index >= 75.0 {
            Self::HighHeat
        } else if heat_index >= 50.0 {
            Self::ModerateHeat
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionResult {
    pub vegetation_status: VegetationStatus,
    pub thermal_status: ThermalStatus,
    /// Percentage points below the city green-cover target, ≥ 0.
    pub coverage_gap: f64,
    /// 0–100 integer.
    pub priority_level: i32,
}

pub fn vision_agent_analyze(input: &VisionInput, policy: &PolicyConfig) -> Result<VisionResult> {
    input.validate()?;

    let coverage_gap = (policy.green_cover_target_pct - input.green_cover_percent).max(0.0);
    let priority_level = round_score(clamp_pct(
        coverage_gap * 2.0 + input.heat_index * 0.3 + (0.5 - input.ndvi) * 50.0,
    ));

    Ok(VisionResult {
        vegetation_status: VegetationStatus::from_ndvi(input.ndvi),
        thermal_status: ThermalStatus::from_heat_index(input.heat_index),
        coverage_gap,
        priority_level,
    })
}
