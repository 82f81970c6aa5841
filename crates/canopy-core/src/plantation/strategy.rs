//! Stage 3: turn the gap and cooling estimate into a concrete plan.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{non_negative, percent, positive, Result};
use crate::numeric::{clamp_pct, round_dp, round_score};
use crate::policy::{LandType, PolicyConfig};

fn default_land_type() -> String {
    LandType::MixedUrban.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInput {
    pub ward_name: String,
    /// km².
    pub ward_area: f64,
    /// Land-type key; unknown keys use the policy's fallback row.
    #[serde(default = "default_land_type")]
    pub land_type: String,
    pub coverage_gap: f64,
    pub priority_level: f64,
    pub cooling_potential: f64,
    pub urban_density: f64,
}

impl StrategyInput {
    fn validate(&self) -> Result<()> {
        positive("wardArea", self.ward_area)?;
        non_negative("coverageGap", self.coverage_gap)?;
        non_negative("priorityLevel", self.priority_level)?;
        non_negative("coolingPotential", self.cooling_potential)?;
        percent("urbanDensity", self.urban_density)?;
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ImplementationTimeline {
    #[serde(rename = "3-6 months")]
    #[strum(serialize = "3-6 months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12 months")]
    #[strum(serialize = "6-12 months")]
    SixToTwelveMonths,
    #[serde(rename = "12-24 months")]
    #[strum(serialize = "12-24 months")]
    OneToTwoYears,
    #[serde(rename = "24-36 months")]
    #[strum(serialize = "24-36 months")]
    TwoToThreeYears,
}

impl ImplementationTimeline {
    /// >1000 trees: 24-36 months, >500: 12-24, >200: 6-12, otherwise 3-6.
    pub fn for_trees(required_trees: u64) -> Self {
        if required_trees > 1000 {
            Self::TwoToThreeYears
        } else if required_trees > 500 {
            Self::OneToTwoYears
        } else if required_trees > 200 {
            Self::SixToTwelveMonths
        } else {
            Self::ThreeToSixMonths
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantationPlan {
    /// Land type whose planting row was used.
    pub land_type: LandType,
    pub required_trees: u64,
    /// °C, capped by policy, 2 dp.
    pub estimated_heat_reduction: f64,
    /// t CO₂ per year, 2 dp.
    #[serde(rename = "estimatedCO2Offset")]
    pub estimated_co2_offset: f64,
    /// Rupees.
    pub estimated_cost: f64,
    pub implementation_timeline: ImplementationTimeline,
    pub recommended_species: Vec<String>,
    /// 0–100 integer.
    pub priority_score: i32,
    pub reasoning: String,
}

pub fn strategy_agent_plan(input: &StrategyInput, policy: &PolicyConfig) -> Result<PlantationPlan> {
    input.validate()?;

    let requested = LandType::parse_or_fallback(&input.land_type, policy.fallback_land_type);
    let (land_type, profile) = policy.profile(requested)?;

    let required_trees =
        (input.coverage_gap / 100.0 * input.ward_area * profile.trees_per_sq_km).round() as u64;
    let trees = required_trees as f64;

    let heat_reduction = (trees * policy.heat_reduction_per_tree / input.ward_area)
        .min(policy.max_heat_reduction_c);
    let co2_offset = trees * policy.co2_tonnes_per_tree;
    let cost = trees * profile.cost_per_tree;
    let timeline = ImplementationTimeline::for_trees(required_trees);

    let priority_score = round_score(clamp_pct(
        input.priority_level * 0.4
            + input.cooling_potential * 5.0
            + input.coverage_gap * 1.5
            + input.urban_density * 0.2,
    ));

    let reasoning = reasoning(
        &input.ward_name,
        land_type,
        required_trees,
        input.coverage_gap,
        heat_reduction,
        co2_offset,
        timeline,
        cost,
    );

    log::debug!(
        "strategy: {} trees={required_trees} timeline={timeline} priority={priority_score}",
        input.ward_name
    );

    Ok(PlantationPlan {
        land_type,
        required_trees,
        estimated_heat_reduction: round_dp(heat_reduction, 2),
        estimated_co2_offset: round_dp(co2_offset, 2),
        estimated_cost: cost,
        implementation_timeline: timeline,
        recommended_species: profile.species.clone(),
        priority_score,
        reasoning,
    })
}

/// Rupees → lakh, one decimal, ties rounded up.
pub(crate) fn format_lakh(cost: f64) -> String {
    format!("₹{:.1}L", round_dp(cost / 100_000.0, 1))
}

#[allow(clippy::too_many_arguments)]
fn reasoning(
    ward_name: &str,
    land_type: LandType,
    required_trees: u64,
    coverage_gap: f64,
    heat_reduction: f64,
    co2_offset: f64,
    timeline: ImplementationTimeline,
    cost: f64,
) -> String {
    let species_note = if land_type == LandType::Industrial {
        "Industrial zones prioritize pollution-resistant species. "
    } else {
        ""
    };
    // `{:.N}` alone rounds ties to even.
    let coverage_gap = round_dp(coverage_gap, 1);
    let heat_reduction = round_dp(heat_reduction, 1);
    let co2_offset = round_dp(co2_offset, 0);
    format!(
        "{ward_name} requires {required_trees} trees to address {coverage_gap:.1}% green cover deficit. \
         This intervention can reduce local temperatures by up to {heat_reduction:.1}°C \
         and offset {co2_offset:.0} tons of CO₂ annually. \
         {species_note}Implementation across {timeline} with estimated investment of {}.",
        format_lakh(cost)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;

    fn input(land_type: &str, gap: f64, area: f64) -> StrategyInput {
        StrategyInput {
            ward_name: "Karol Bagh".to_string(),
            ward_area: area,
            land_type: land_type.to_string(),
            coverage_gap: gap,
            priority_level: 76.0,
            cooling_potential: 7.5,
            urban_density: 70.0,
        }
    }

    /// ✓ gap 20, 10 km², mixed urban → 800 trees, 2 °C, 16.8 t, ₹7.2L.
    #[test]
    fn mixed_urban_worked_example() {
        let plan = strategy_agent_plan(&input("mixed_urban", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 800);
        assert_eq!(plan.estimated_heat_reduction, 2.0);
        assert_eq!(plan.estimated_co2_offset, 16.8);
        assert_eq!(plan.estimated_cost, 720_000.0);
        assert_eq!(plan.implementation_timeline, ImplementationTimeline::OneToTwoYears);
        assert_eq!(plan.land_type, LandType::MixedUrban);
        assert_eq!(plan.recommended_species[2], "Banyan (Ficus benghalensis)");
    }

    #[test]
    fn reasoning_interpolates_plan_numbers() {
        let plan = strategy_agent_plan(&input("mixed_urban", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(
            plan.reasoning,
            "Karol Bagh requires 800 trees to address 20.0% green cover deficit. \
             This intervention can reduce local temperatures by up to 2.0°C and offset 17 tons \
             of CO₂ annually. Implementation across 12-24 months with estimated investment of ₹7.2L."
        );
    }

    #[test]
    fn industrial_reasoning_mentions_species() {
        let plan = strategy_agent_plan(&input("industrial", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 400);
        assert!(
            plan.reasoning
                .contains("annually. Industrial zones prioritize pollution-resistant species. Implementation"),
            "reasoning: {}",
            plan.reasoning
        );
    }

    #[test]
    fn unknown_land_type_uses_mixed_urban_row_throughout() {
        let plan = strategy_agent_plan(&input("orchard", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.land_type, LandType::MixedUrban);
        assert_eq!(plan.required_trees, 800);
        assert_eq!(plan.estimated_cost, 720_000.0);
        assert_eq!(plan.recommended_species[0], "Neem");
    }

    #[test]
    fn heat_reduction_is_capped() {
        // 0.3 · 1 · 800 = 240 trees on 1 km² → 6 °C, capped at 5
        let plan = strategy_agent_plan(&input("green_zone", 30.0, 1.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 240);
        assert_eq!(plan.estimated_heat_reduction, 5.0);
    }

    #[test]
    fn timeline_thresholds() {
        assert_eq!(ImplementationTimeline::for_trees(1001), ImplementationTimeline::TwoToThreeYears);
        assert_eq!(ImplementationTimeline::for_trees(1000), ImplementationTimeline::OneToTwoYears);
        assert_eq!(ImplementationTimeline::for_trees(500), ImplementationTimeline::SixToTwelveMonths);
        assert_eq!(ImplementationTimeline::for_trees(200), ImplementationTimeline::ThreeToSixMonths);
        assert_eq!(ImplementationTimeline::OneToTwoYears.to_string(), "12-24 months");
    }

    #[test]
    fn priority_score_combines_and_clamps() {
        // 30.4 + 37.5 + 30 + 14 = 111.9 → 100
        let plan = strategy_agent_plan(&input("residential", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.priority_score, 100);

        let mut quiet = input("residential", 2.0, 10.0);
        quiet.priority_level = 20.0;
        quiet.cooling_potential = 0.0;
        quiet.urban_density = 50.0;
        // 8 + 0 + 3 + 10 = 21
        let plan = strategy_agent_plan(&quiet, &PolicyConfig::default()).unwrap();
        assert_eq!(plan.priority_score, 21);
    }

    #[test]
    fn zero_gap_plans_nothing() {
        let plan = strategy_agent_plan(&input("commercial", 0.0, 10.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 0);
        assert_eq!(plan.estimated_cost, 0.0);
        assert_eq!(plan.implementation_timeline, ImplementationTimeline::ThreeToSixMonths);
    }

    #[test]
    fn non_positive_area_is_rejected() {
        let err = strategy_agent_plan(&input("residential", 20.0, 0.0), &PolicyConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScoringError::NonPositive { field: "wardArea", .. }));
    }

    #[test]
    fn reasoning_rounds_ties_up() {
        // gap 20.25 on 1 km² → 81 trees: 2.025 °C, 1.701 t
        let plan = strategy_agent_plan(&input("mixed_urban", 20.25, 1.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 81);
        assert!(
            plan.reasoning.contains("address 20.3% green cover deficit"),
            "reasoning: {}",
            plan.reasoning
        );
        assert!(plan.reasoning.contains("up to 2.0°C and offset 2 tons"), "reasoning: {}", plan.reasoning);
    }

    #[test]
    fn small_green_zone_cost_rounds_up_to_next_tenth_lakh() {
        // 0.0625 · 1 · 800 = 50 trees at ₹500 → ₹25 000 = 0.25 lakh
        let plan = strategy_agent_plan(&input("green_zone", 6.25, 1.0), &PolicyConfig::default())
            .unwrap();
        assert_eq!(plan.required_trees, 50);
        assert_eq!(plan.estimated_cost, 25_000.0);
        assert_eq!(format_lakh(plan.estimated_cost), "₹0.3L");
        assert!(plan.reasoning.ends_with("investment of ₹0.3L."), "reasoning: {}", plan.reasoning);
    }

    #[test]
    fn plan_wire_format() {
        let plan = strategy_agent_plan(&input("mixed_urban", 20.0, 10.0), &PolicyConfig::default())
            .unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["implementationTimeline"], "12-24 months");
        assert_eq!(json["estimatedCO2Offset"], 16.8);
        assert_eq!(json["landType"], "mixed_urban");
    }

    #[test]
    fn idempotent() {
        let policy = PolicyConfig::default();
        let plan = || strategy_agent_plan(&input("commercial", 17.3, 7.5), &policy).unwrap();
        let a = serde_json::to_string(&plan()).unwrap();
        let b = serde_json::to_string(&plan()).unwrap();
        assert_eq!(a, b);
    }
}
