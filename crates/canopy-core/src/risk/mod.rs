//! Ward risk scoring.
//!
//! Two deliberately separate weightings live here:
//!
//! * [`assessment`]: the six-factor assessment (heat, vegetation deficit, tree
//!   loss, population, air quality, vulnerability) used per ward for alerting
//!   and planning.
//! * [`ranking`]: the four-factor score used only to order the ward list.
//!
//! They encode different policy decisions and are not interchangeable.

pub mod assessment;
pub mod ranking;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub use assessment::{
    compute_risk_assessment, compute_risk_assessment as assess_ward_risk, Recommendation,
    RiskFactors, RiskInput, RiskResult,
};
pub use ranking::{rank_wards, ranking_risk_score, RankedWard, RankingInput};

/// Intervention priority tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// ≥80 critical, ≥60 high, ≥40 medium, otherwise low.
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            Self::Critical
        } else if score >= 60 {
            Self::High
        } else if score >= 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
