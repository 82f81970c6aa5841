//! Heat stress for a ward: heat index, UHI intensity, thermal comfort, risk
//! category, and how much added canopy could cool it.
//!
//! The heat index here is a 0–100 stress score. It is not the overall ward
//! risk score; see `risk` for that.

pub mod uhi;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{finite, percent, Result};
use crate::numeric::{clamp_pct, round_dp, round_score};
use crate::policy::PolicyConfig;

pub use uhi::adjusted_uhi_intensity;

// ── Heat index weights ────────────────────────────────────────────────────────

/// LST at which the temperature term starts contributing (°C).
const TEMP_FLOOR_C: f64 = 25.0;
const TEMP_WEIGHT: f64 = 2.5;
const HUMIDITY_WEIGHT: f64 = 0.2;
const GREEN_MITIGATION_WEIGHT: f64 = 0.3;
const URBAN_WEIGHT: f64 = 0.15;

pub(crate) fn default_rural_reference_temp() -> f64 {
    28.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatInput {
    /// °C.
    pub land_surface_temp: f64,
    /// °C.
    pub ambient_temp: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    pub green_cover_percent: f64,
    /// 0–100.
    pub urban_density: f64,
    /// LST of the surrounding rural reference (°C).
    #[serde(default = "default_rural_reference_temp")]
    pub rural_reference_temp: f64,
}

impl HeatInput {
    pub fn new(
        land_surface_temp: f64,
        ambient_temp: f64,
        humidity: f64,
        green_cover_percent: f64,
        urban_density: f64,
    ) -> Self {
        Self {
            land_surface_temp,
            ambient_temp,
            humidity,
            green_cover_percent,
            urban_density,
            rural_reference_temp: default_rural_reference_temp(),
        }
    }

    fn validate(&self) -> Result<()> {
        finite("landSurfaceTemp", self.land_surface_temp)?;
        finite("ambientTemp", self.ambient_temp)?;
        finite("ruralReferenceTemp", self.rural_reference_temp)?;
        percent("humidity", self.humidity)?;
        percent("greenCoverPercent", self.green_cover_percent)?;
        percent("urbanDensity", self.urban_density)?;
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeatRiskCategory {
    Low,
    Moderate,
    High,
    Extreme,
}

impl HeatRiskCategory {
    /// ≥85 extreme, ≥70 high, ≥50 moderate, otherwise low.
    pub fn from_heat_index(heat_index: i32) -> Self {
        if heat_index >= 85 {
            Self::Extreme
        } else if heat_index >= 70 {
            Self::High
        } else if heat_index >= 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatResult {
    /// 0–100 integer.
    pub heat_index: i32,
    /// `max(0, LST − rural)`, °C.
    pub uhi_intensity: f64,
    /// 0–100.
    pub thermal_comfort_index: f64,
    pub risk_category: HeatRiskCategory,
    /// °C of cooling still available by reaching the mitigation target.
    pub mitigation_potential: f64,
}

/// Heat stress index, 0–100.
///
/// `clamp(tempFactor + 0.2·humidity − 0.3·greenCover + 0.15·urbanDensity)`,
/// with `tempFactor = clamp((LST − 25)·2.5)`.
pub fn heat_index(
    land_surface_temp: f64,
    humidity: f64,
    green_cover_percent: f64,
    urban_density: f64,
) -> i32 {
    let temp_factor = clamp_pct((land_surface_temp - TEMP_FLOOR_C) * TEMP_WEIGHT);
    let humidity_factor = humidity * HUMIDITY_WEIGHT;
    let green_mitigation = green_cover_percent * GREEN_MITIGATION_WEIGHT;
    let urban_factor = urban_density * URBAN_WEIGHT;
    round_score(clamp_pct(
        temp_factor + humidity_factor - green_mitigation + urban_factor,
    ))
}

/// Simplified UTCI-style comfort index, 0–100 (higher is less comfortable).
pub fn thermal_comfort_index(ambient_temp: f64, green_cover_percent: f64, humidity: f64) -> f64 {
    clamp_pct(50.0 + (ambient_temp - 25.0) * 2.0 - green_cover_percent * 0.3 + humidity * 0.1)
}

pub fn compute_heat_stress(input: &HeatInput, policy: &PolicyConfig) -> Result<HeatResult> {
    input.validate()?;

    let heat_index = heat_index(
        input.land_surface_temp,
        input.humidity,
        input.green_cover_percent,
        input.urban_density,
    );
    let uhi_intensity = (input.land_surface_temp - input.rural_reference_temp).max(0.0);
    let comfort = thermal_comfort_index(input.ambient_temp, input.green_cover_percent, input.humidity);
    let mitigation = (policy.mitigation_target_pct - input.green_cover_percent).max(0.0)
        * policy.mitigation_deg_per_pct;

    let result = HeatResult {
        heat_index,
        uhi_intensity: round_dp(uhi_intensity, 2),
        thermal_comfort_index: round_dp(comfort, 2),
        risk_category: HeatRiskCategory::from_heat_index(heat_index),
        mitigation_potential: round_dp(mitigation, 2),
    };
    log::debug!(
        "heat: index={} uhi={} comfort={} category={}",
        result.heat_index,
        result.uhi_intensity,
        result.thermal_comfort_index,
        result.risk_category
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;

    fn policy() -> PolicyConfig {
        PolicyConfig::default()
    }

    #[test]
    fn hot_dense_ward() {
        // tempFactor = (40.2−25)·2.5 = 38; +12 humidity −6 green +12 urban = 56
        let r = compute_heat_stress(&HeatInput::new(40.2, 35.0, 60.0, 20.0, 80.0), &policy())
            .unwrap();
        assert_eq!(r.heat_index, 56);
        assert_eq!(r.risk_category, HeatRiskCategory::Moderate);
        assert_eq!(r.uhi_intensity, 12.2);
        // 50 + 20 − 6 + 6 = 70
        assert_eq!(r.thermal_comfort_index, 70.0);
        // (40 − 20)·0.3
        assert_eq!(r.mitigation_potential, 6.0);
    }

    #[test]
    fn cool_ward_has_zero_uhi_and_low_risk() {
        let r = compute_heat_stress(&HeatInput::new(22.0, 20.0, 30.0, 45.0, 10.0), &policy())
            .unwrap();
        assert_eq!(r.uhi_intensity, 0.0);
        assert_eq!(r.heat_index, 0);
        assert_eq!(r.risk_category, HeatRiskCategory::Low);
        assert_eq!(r.mitigation_potential, 0.0, "already above the 40% target");
    }

    #[test]
    fn heat_index_saturates_at_100() {
        assert_eq!(heat_index(90.0, 100.0, 0.0, 100.0), 100);
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(HeatRiskCategory::from_heat_index(85), HeatRiskCategory::Extreme);
        assert_eq!(HeatRiskCategory::from_heat_index(84), HeatRiskCategory::High);
        assert_eq!(HeatRiskCategory::from_heat_index(70), HeatRiskCategory::High);
        assert_eq!(HeatRiskCategory::from_heat_index(50), HeatRiskCategory::Moderate);
        assert_eq!(HeatRiskCategory::from_heat_index(49), HeatRiskCategory::Low);
    }

    /// ✓ Heat index is non-decreasing in LST and humidity, non-increasing in
    /// green cover.
    #[test]
    fn heat_index_monotonicity() {
        let mut prev = heat_index(10.0, 50.0, 20.0, 60.0);
        for i in 0..=400 {
            let lst = 10.0 + i as f64 * 0.1;
            let h = heat_index(lst, 50.0, 20.0, 60.0);
            assert!(h >= prev, "lst={lst:.1}: {h} < {prev}");
            prev = h;
        }

        let mut prev = heat_index(38.0, 0.0, 20.0, 60.0);
        for i in 0..=100 {
            let h = heat_index(38.0, i as f64, 20.0, 60.0);
            assert!(h >= prev, "humidity={i}: {h} < {prev}");
            prev = h;
        }

        let mut prev = heat_index(38.0, 50.0, 0.0, 60.0);
        for i in 0..=100 {
            let h = heat_index(38.0, 50.0, i as f64, 60.0);
            assert!(h <= prev, "green={i}: {h} > {prev}");
            prev = h;
        }
    }

    #[test]
    fn mitigation_uses_policy_target() {
        let mut p = policy();
        p.mitigation_target_pct = 50.0;
        let r = compute_heat_stress(&HeatInput::new(40.0, 35.0, 60.0, 20.0, 80.0), &p).unwrap();
        assert_eq!(r.mitigation_potential, 9.0);
    }

    #[test]
    fn humidity_above_100_is_rejected() {
        let err = compute_heat_stress(&HeatInput::new(40.0, 35.0, 120.0, 20.0, 80.0), &policy())
            .unwrap_err();
        assert!(matches!(err, ScoringError::OutOfRange { field: "humidity", .. }));
    }

    #[test]
    fn rural_reference_defaults_to_28() {
        let json = r#"{"landSurfaceTemp":33,"ambientTemp":30,"humidity":50,
                       "greenCoverPercent":20,"urbanDensity":70}"#;
        let input: HeatInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.rural_reference_temp, 28.0);
        let r = compute_heat_stress(&input, &policy()).unwrap();
        assert_eq!(r.uhi_intensity, 5.0);
    }

    #[test]
    fn idempotent() {
        let input = HeatInput::new(41.3, 36.0, 65.0, 17.5, 85.0);
        let a = serde_json::to_string(&compute_heat_stress(&input, &policy()).unwrap()).unwrap();
        let b = serde_json::to_string(&compute_heat_stress(&input, &policy()).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
