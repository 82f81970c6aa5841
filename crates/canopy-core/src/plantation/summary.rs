//! Plan summaries in the shape the dashboard lists them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::policy::LandType;

use super::strategy::{format_lakh, ImplementationTimeline, PlantationPlan};

/// Coarse label shown next to a plan; there is no "low" plan label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanPriority {
    Medium,
    High,
    Critical,
}

impl PlanPriority {
    /// ≥80 critical, ≥60 high, otherwise medium.
    pub fn from_score(priority_score: i32) -> Self {
        if priority_score >= 80 {
            Self::Critical
        } else if priority_score >= 60 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// `Ward {name}`.
    pub ward: String,
    pub priority: PlanPriority,
    pub required_trees: u64,
    pub heat_reduction: f64,
    pub carbon_offset: f64,
    /// The plan's priority score.
    pub urgency_index: i32,
    /// Title case, e.g. "Mixed Urban".
    pub land_type: String,
    /// Lakh rupees, e.g. "₹7.2L".
    pub estimated_cost: String,
    pub timeline: ImplementationTimeline,
    pub species: Vec<String>,
    pub reasoning: String,
}

impl PlanSummary {
    /// `ward` is rendered as `Ward {name}`.
    pub fn new(ward_name: impl AsRef<str>, plan: &PlantationPlan) -> Self {
        Self {
            ward: format!("Ward {}", ward_name.as_ref()),
            priority: PlanPriority::from_score(plan.priority_score),
            required_trees: plan.required_trees,
            heat_reduction: plan.estimated_heat_reduction,
            carbon_offset: plan.estimated_co2_offset,
            urgency_index: plan.priority_score,
            land_type: land_type_label(plan.land_type),
            estimated_cost: format_lakh(plan.estimated_cost),
            timeline: plan.implementation_timeline,
            species: plan.recommended_species.clone(),
            reasoning: plan.reasoning.clone(),
        }
    }
}

/// `mixed_urban` → `Mixed Urban`.
pub fn land_type_label(land_type: LandType) -> String {
    land_type
        .as_ref()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimum priority score for a list filter: high → 70, medium → 40,
/// anything else → 0.
pub fn priority_floor(filter: &str) -> i32 {
    match filter.trim().to_ascii_lowercase().as_str() {
        "high" => 70,
        "medium" => 40,
        _ => 0,
    }
}

/// Plans at or above the filter's floor, highest urgency first.
pub fn filter_plans<'a>(plans: &'a [PlanSummary], filter: Option<&str>) -> Vec<&'a PlanSummary> {
    let floor = filter.map(priority_floor).unwrap_or(0);
    let mut kept: Vec<_> = plans.iter().filter(|p| p.urgency_index >= floor).collect();
    kept.sort_by(|a, b| b.urgency_index.cmp(&a.urgency_index));
    kept
}
