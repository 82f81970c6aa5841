//! Vegetation change detection between two NDVI observations.
//!
//! Rates are normalised to a 30-day month. Confidence grows with the size of
//! the excursion: a large NDVI swing is less likely to be sensor noise. This is
//! a heuristic, not a statistical estimator.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{index, non_negative, positive, Result};
use crate::numeric::round_dp;

const DAYS_PER_MONTH: f64 = 30.0;
const CONFIDENCE_FLOOR: f64 = 70.0;
const CONFIDENCE_CAP: f64 = 99.0;

fn default_threshold() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInput {
    #[serde(rename = "currentNDVI")]
    pub current_ndvi: f64,
    #[serde(rename = "previousNDVI")]
    pub previous_ndvi: f64,
    /// Days between the two observations; must be > 0.
    pub time_interval_days: f64,
    /// |Δ NDVI| above which a change counts as loss or gain.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ChangeInput {
    pub fn new(current_ndvi: f64, previous_ndvi: f64, time_interval_days: f64) -> Self {
        Self {
            current_ndvi,
            previous_ndvi,
            time_interval_days,
            threshold: default_threshold(),
        }
    }

    fn validate(&self) -> Result<()> {
        index("currentNDVI", self.current_ndvi)?;
        index("previousNDVI", self.previous_ndvi)?;
        positive("timeIntervalDays", self.time_interval_days)?;
        non_negative("threshold", self.threshold)?;
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeType {
    Loss,
    Gain,
    Stable,
}

/// Severity shared by change alerts and risk priority tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    /// Loss magnitude: >0.3 critical, >0.15 high, >0.05 medium, else low.
    /// Gains and stable readings are always low.
    pub fn for_change(change_type: ChangeType, magnitude: f64) -> Self {
        if change_type != ChangeType::Loss {
            return Self::Low;
        }
        if magnitude > 0.3 {
            Self::Critical
        } else if magnitude > 0.15 {
            Self::High
        } else if magnitude > 0.05 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResult {
    pub change_type: ChangeType,
    /// |Δ NDVI|, 4 dp.
    pub change_magnitude: f64,
    /// |Δ NDVI| per 30 days, 4 dp.
    pub change_rate: f64,
    pub alert_level: AlertLevel,
    /// [70, 99], 2 dp.
    pub confidence: f64,
}

pub fn detect_vegetation_change(input: &ChangeInput) -> Result<ChangeResult> {
    input.validate()?;

    let change = input.current_ndvi - input.previous_ndvi;
    let magnitude = change.abs();
    let rate = magnitude / input.time_interval_days * DAYS_PER_MONTH;

    let change_type = if change < -input.threshold {
        ChangeType::Loss
    } else if change > input.threshold {
        ChangeType::Gain
    } else {
        ChangeType::Stable
    };

    let confidence = (CONFIDENCE_FLOOR + magnitude * 100.0).min(CONFIDENCE_CAP);

    let result = ChangeResult {
        change_type,
        change_magnitude: round_dp(magnitude, 4),
        change_rate: round_dp(rate, 4),
        alert_level: AlertLevel::for_change(change_type, magnitude),
        confidence: round_dp(confidence, 2),
    };
    log::debug!(
        "change: {} Δ={} rate={}/30d alert={}",
        result.change_type,
        result.change_magnitude,
        result.change_rate,
        result.alert_level
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;

    /// ✓ 0.5 → 0.1 over 30 days is a critical loss at full confidence.
    #[test]
    fn sharp_loss_is_critical() {
        let r = detect_vegetation_change(&ChangeInput::new(0.1, 0.5, 30.0)).unwrap();
        assert_eq!(r.change_type, ChangeType::Loss);
        assert_eq!(r.change_magnitude, 0.4);
        assert_eq!(r.change_rate, 0.4);
        assert_eq!(r.alert_level, AlertLevel::Critical);
        assert_eq!(r.confidence, 99.0);
    }

    #[test]
    fn loss_alert_tiers() {
        let level = |current: f64| {
            detect_vegetation_change(&ChangeInput::new(current, 0.6, 30.0))
                .unwrap()
                .alert_level
        };
        assert_eq!(level(0.4), AlertLevel::High); // Δ 0.2
        assert_eq!(level(0.48), AlertLevel::Medium); // Δ 0.12
        assert_eq!(level(0.25), AlertLevel::Critical); // Δ 0.35
    }

    #[test]
    fn small_loss_with_low_threshold_is_low_alert() {
        let mut input = ChangeInput::new(0.46, 0.5, 30.0);
        input.threshold = 0.02;
        let r = detect_vegetation_change(&input).unwrap();
        assert_eq!(r.change_type, ChangeType::Loss);
        assert_eq!(r.alert_level, AlertLevel::Low);
    }

    #[test]
    fn gain_never_raises_alert() {
        let r = detect_vegetation_change(&ChangeInput::new(0.8, 0.2, 30.0)).unwrap();
        assert_eq!(r.change_type, ChangeType::Gain);
        assert_eq!(r.alert_level, AlertLevel::Low);
        assert_eq!(r.confidence, 99.0);
    }

    #[test]
    fn within_threshold_is_stable() {
        let r = detect_vegetation_change(&ChangeInput::new(0.45, 0.5, 30.0)).unwrap();
        assert_eq!(r.change_type, ChangeType::Stable);
        assert_eq!(r.confidence, 75.0);
    }

    #[test]
    fn rate_normalises_to_thirty_days() {
        let r = detect_vegetation_change(&ChangeInput::new(0.3, 0.5, 60.0)).unwrap();
        assert_eq!(r.change_rate, 0.1);
        let r = detect_vegetation_change(&ChangeInput::new(0.3, 0.5, 15.0)).unwrap();
        assert_eq!(r.change_rate, 0.4);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = detect_vegetation_change(&ChangeInput::new(0.3, 0.5, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::NonPositive { field: "timeIntervalDays", .. }
        ));
    }

    #[test]
    fn wire_names_use_ndvi_capitals() {
        let json = r#"{"currentNDVI":0.1,"previousNDVI":0.5,"timeIntervalDays":30}"#;
        let input: ChangeInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.threshold, 0.1);
        let out = serde_json::to_value(detect_vegetation_change(&input).unwrap()).unwrap();
        assert_eq!(out["changeType"], "loss");
        assert_eq!(out["alertLevel"], "critical");
    }

    #[test]
    fn idempotent() {
        let input = ChangeInput::new(0.23, 0.41, 45.0);
        let a = serde_json::to_string(&detect_vegetation_change(&input).unwrap()).unwrap();
        let b = serde_json::to_string(&detect_vegetation_change(&input).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
