//! Alert derivation from engine outputs.
//!
//! Pure: the caller decides whether and where to persist the records.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::change::{detect_vegetation_change, AlertLevel, ChangeInput};
use crate::error::Result;
use crate::heat::HeatResult;
use crate::numeric::round_dp;
use crate::risk::{Priority, RiskResult};
use crate::vegetation::VegetationResult;

const HEAT_SPIKE_INDEX: i32 = 85;
const HEAT_SPIKE_CRITICAL_INDEX: i32 = 95;
/// Drop in NDVI since the prior observation that triggers change detection.
const NDVI_DROP_TRIGGER: f64 = -0.1;
/// Interval assumed between stored NDVI observations.
const NDVI_OBSERVATION_INTERVAL_DAYS: f64 = 30.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    HeatSpike,
    VegetationChange,
    RiskAlert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub alert_type: AlertType,
    pub severity: AlertLevel,
    pub title: String,
    pub message: String,
    pub detection_method: String,
    pub confidence_score: f64,
}

/// Heat index ≥ 85 raises a spike; ≥ 95 makes it critical.
pub fn heat_spike_alert(heat: &HeatResult) -> Option<AlertRecord> {
    if heat.heat_index < HEAT_SPIKE_INDEX {
        return None;
    }
    let severity = if heat.heat_index >= HEAT_SPIKE_CRITICAL_INDEX {
        AlertLevel::Critical
    } else {
        AlertLevel::High
    };
    Some(AlertRecord {
        alert_type: AlertType::HeatSpike,
        severity,
        title: "Heat Spike Alert".to_string(),
        message: format!(
            "Heat stress index reached {} - {} risk level",
            heat.heat_index, heat.risk_category
        ),
        detection_method: "ML-UHI-Analysis".to_string(),
        confidence_score: 95.0,
    })
}

/// A drop of more than 0.1 NDVI since `previous_ndvi` runs change detection
/// over a 30-day interval; anything above a low alert level is reported.
pub fn vegetation_change_alert(
    vegetation: &VegetationResult,
    previous_ndvi: Option<f64>,
) -> Result<Option<AlertRecord>> {
    let (Some(change), Some(previous)) = (vegetation.change_from_previous, previous_ndvi) else {
        return Ok(None);
    };
    if change >= NDVI_DROP_TRIGGER {
        return Ok(None);
    }

    let detected = detect_vegetation_change(&ChangeInput::new(
        vegetation.ndvi,
        previous,
        NDVI_OBSERVATION_INTERVAL_DAYS,
    ))?;
    if detected.alert_level == AlertLevel::Low {
        return Ok(None);
    }

    Ok(Some(AlertRecord {
        alert_type: AlertType::VegetationChange,
        severity: detected.alert_level,
        title: "Vegetation Loss Detected".to_string(),
        message: format!(
            "NDVI dropped by {:.1}% - possible deforestation",
            round_dp(detected.change_magnitude * 100.0, 1)
        ),
        detection_method: "ML-NDVI-Analysis".to_string(),
        confidence_score: detected.confidence,
    }))
}

/// Critical-priority wards always raise a risk alert.
pub fn risk_alert(risk: &RiskResult) -> Option<AlertRecord> {
    if risk.priority != Priority::Critical {
        return None;
    }
    let lead = risk
        .recommendations
        .first()
        .map(|r| r.text())
        .unwrap_or("Immediate intervention required.");
    Some(AlertRecord {
        alert_type: AlertType::RiskAlert,
        severity: AlertLevel::Critical,
        title: "Critical Risk Zone".to_string(),
        message: format!("Overall risk score: {}/100. {lead}", risk.overall_risk_score),
        detection_method: "ML-Risk-Assessment".to_string(),
        confidence_score: 90.0,
    })
}

/// All alerts for one ward observation, in heat, vegetation, risk order.
pub fn derive_alerts(
    vegetation: &VegetationResult,
    previous_ndvi: Option<f64>,
    heat: &HeatResult,
    risk: &RiskResult,
) -> Result<Vec<AlertRecord>> {
    let alerts: Vec<_> = [
        heat_spike_alert(heat),
        vegetation_change_alert(vegetation, previous_ndvi)?,
        risk_alert(risk),
    ]
    .into_iter()
    .flatten()
    .collect();

    for alert in &alerts {
        log::info!("{} ({}): {}", alert.alert_type, alert.severity, alert.message);
    }
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::HeatRiskCategory;
    use crate::risk::{Recommendation, RiskFactors};
    use crate::vegetation::VegetationDensity;

    fn heat(index: i32) -> HeatResult {
        HeatResult {
            heat_index: index,
            uhi_intensity: 8.0,
            thermal_comfort_index: 70.0,
            risk_category: HeatRiskCategory::from_heat_index(index),
            mitigation_potential: 6.0,
        }
    }

    fn vegetation(ndvi: f64, change: Option<f64>) -> VegetationResult {
        VegetationResult {
            ndvi,
            evi: 0.1,
            green_cover_percent: 20.0,
            vegetation_density: VegetationDensity::classify(ndvi),
            change_from_previous: change,
        }
    }

    fn risk(score: i32, recommendations: Vec<Recommendation>) -> RiskResult {
        RiskResult {
            overall_risk_score: score,
            heat_risk_score: 80,
            vegetation_risk_score: 69,
            priority: Priority::from_score(score),
            risk_factors: RiskFactors {
                heat: 80.0,
                vegetation: 69.0,
                tree_loss: 50.0,
                population: 100.0,
                air_quality: 50.0,
                vulnerability: 50.0,
            },
            recommendations,
        }
    }

    #[test]
    fn heat_spike_thresholds() {
        assert!(heat_spike_alert(&heat(84)).is_none());

        let high = heat_spike_alert(&heat(85)).unwrap();
        assert_eq!(high.severity, AlertLevel::High);
        assert_eq!(high.message, "Heat stress index reached 85 - extreme risk level");

        let critical = heat_spike_alert(&heat(95)).unwrap();
        assert_eq!(critical.severity, AlertLevel::Critical);
        assert_eq!(critical.confidence_score, 95.0);
    }

    #[test]
    fn sharp_ndvi_drop_raises_change_alert() {
        // 0.5 → 0.1: magnitude 0.4, critical, confidence 99
        let alert = vegetation_change_alert(&vegetation(0.1, Some(-0.4)), Some(0.5))
            .unwrap()
            .unwrap();
        assert_eq!(alert.alert_type, AlertType::VegetationChange);
        assert_eq!(alert.severity, AlertLevel::Critical);
        assert_eq!(alert.message, "NDVI dropped by 40.0% - possible deforestation");
        assert_eq!(alert.confidence_score, 99.0);
    }

    #[test]
    fn drop_percentage_rounds_ties_up() {
        // 0.5 → 0.1875: magnitude 0.3125, i.e. 31.25 %
        let alert = vegetation_change_alert(&vegetation(0.1875, Some(-0.3125)), Some(0.5))
            .unwrap()
            .unwrap();
        assert_eq!(alert.message, "NDVI dropped by 31.3% - possible deforestation");
    }

    #[test]
    fn small_drop_or_first_observation_is_quiet() {
        assert!(vegetation_change_alert(&vegetation(0.45, Some(-0.05)), Some(0.5))
            .unwrap()
            .is_none());
        assert!(vegetation_change_alert(&vegetation(0.45, None), None)
            .unwrap()
            .is_none());
        // exactly −0.1 does not trigger
        assert!(vegetation_change_alert(&vegetation(0.4, Some(-0.1)), Some(0.5))
            .unwrap()
            .is_none());
    }

    #[test]
    fn risk_alert_leads_with_first_recommendation() {
        assert!(risk_alert(&risk(70, vec![])).is_none());

        let alert = risk_alert(&risk(85, vec![Recommendation::UrgentCooling])).unwrap();
        assert_eq!(
            alert.message,
            "Overall risk score: 85/100. Urgent cooling intervention needed"
        );

        let bare = risk_alert(&risk(82, vec![])).unwrap();
        assert_eq!(
            bare.message,
            "Overall risk score: 82/100. Immediate intervention required."
        );
    }

    #[test]
    fn derive_alerts_orders_heat_vegetation_risk() {
        let alerts = derive_alerts(
            &vegetation(0.1, Some(-0.4)),
            Some(0.5),
            &heat(90),
            &risk(85, vec![Recommendation::UrgentCooling]),
        )
        .unwrap();
        let kinds: Vec<_> = alerts.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            kinds,
            [AlertType::HeatSpike, AlertType::VegetationChange, AlertType::RiskAlert]
        );

        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["alertType"], "heat_spike");
        assert_eq!(json["detectionMethod"], "ML-UHI-Analysis");
    }
}
