//! Tunable policy constants.
//!
//! Everything a city planner might want to retune without touching engine
//! logic lives here: green-cover targets, per-land-type planting tables, the
//! correlation baseline, and the carbon and cooling coefficients.
//! `PolicyConfig::default()` is the Delhi policy. A TOML file may override any
//! subset of keys; land-type rows that are not mentioned keep their defaults.
//!
//! ```toml
//! green_cover_target_pct = 35.0
//!
//! [land_types.industrial]
//! trees_per_sq_km = 250.0
//! cost_per_tree = 650.0
//! species = ["Arjun (Terminalia arjuna)"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{finite, non_negative, positive, Result, ScoringError};

/// Land-use class of a ward, keying the planting tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LandType {
    Residential,
    Commercial,
    Industrial,
    MixedUrban,
    GreenZone,
    WaterBody,
}

impl LandType {
    /// Parse a land-type key, substituting `fallback` for anything unknown.
    pub fn parse_or_fallback(key: &str, fallback: LandType) -> LandType {
        key.trim().parse().unwrap_or_else(|_| {
            log::warn!("unknown land type {key:?}, using {fallback}");
            fallback
        })
    }

    /// Strict parse that reports the offending key.
    pub fn parse_strict(key: &str) -> Result<LandType> {
        key.trim()
            .parse()
            .map_err(|_| ScoringError::UnknownLandType(key.to_string()))
    }
}

/// Planting parameters for one land type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandProfile {
    /// Trees planted per km² to close a 100 % coverage gap.
    pub trees_per_sq_km: f64,
    /// Planting plus initial care, in rupees.
    pub cost_per_tree: f64,
    /// Species suited to Delhi conditions, most preferred first.
    pub species: Vec<String>,
}

impl LandProfile {
    fn new(trees_per_sq_km: f64, cost_per_tree: f64, species: &[&str]) -> Self {
        Self {
            trees_per_sq_km,
            cost_per_tree,
            species: species.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// City green-cover target used by risk assessment and the vision stage (%).
    pub green_cover_target_pct: f64,
    /// Green cover at which heat mitigation saturates (%).
    pub mitigation_target_pct: f64,
    /// Heat reduction per percentage point of added cover (°C).
    pub mitigation_deg_per_pct: f64,
    /// Placeholder heat/vegetation correlation; not a fitted value.
    pub correlation_baseline: f64,
    /// Width of the uniform jitter added to the correlation baseline.
    pub correlation_jitter: f64,
    /// Heat-index cooling per 1 % of added green cover.
    pub cooling_per_pct: f64,
    /// Trees per 1 % of cover in an urban ward.
    pub trees_per_pct: f64,
    /// Annual CO₂ uptake of a mature tree (tonnes).
    pub co2_tonnes_per_tree: f64,
    /// Local cooling per planted tree, before dividing by ward area (°C·km²).
    pub heat_reduction_per_tree: f64,
    /// Upper bound on the cooling any one plan may claim (°C).
    pub max_heat_reduction_c: f64,
    /// Existing trees per cover-percent per km², for canopy carbon estimates.
    pub canopy_trees_per_pct_km2: f64,
    /// Row used when a land type has no profile of its own.
    pub fallback_land_type: LandType,
    /// Keyed by the snake_case land-type name.
    pub land_types: BTreeMap<String, LandProfile>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let land_types = [
            (
                LandType::Residential,
                LandProfile::new(
                    500.0,
                    800.0,
                    &[
                        "Neem (Azadirachta indica)",
                        "Peepal (Ficus religiosa)",
                        "Jamun (Syzygium cumini)",
                    ],
                ),
            ),
            (
                LandType::Commercial,
                LandProfile::new(
                    300.0,
                    1200.0,
                    &[
                        "Ashoka (Saraca asoca)",
                        "Gulmohar (Delonix regia)",
                        "Amaltas (Cassia fistula)",
                    ],
                ),
            ),
            (
                LandType::Industrial,
                LandProfile::new(
                    200.0,
                    600.0,
                    &[
                        "Arjun (Terminalia arjuna)",
                        "Sheesham (Dalbergia sissoo)",
                        "Khejri (Prosopis cineraria)",
                    ],
                ),
            ),
            (
                LandType::MixedUrban,
                LandProfile::new(
                    400.0,
                    900.0,
                    &[
                        "Neem",
                        "Peepal",
                        "Banyan (Ficus benghalensis)",
                        "Mango (Mangifera indica)",
                    ],
                ),
            ),
            (
                LandType::GreenZone,
                LandProfile::new(
                    800.0,
                    500.0,
                    &["Sal (Shorea robusta)", "Teak (Tectona grandis)", "Bamboo (Bambusa)"],
                ),
            ),
            (
                LandType::WaterBody,
                LandProfile::new(
                    100.0,
                    1000.0,
                    &["Willow (Salix)", "Eucalyptus", "Poplar (Populus)"],
                ),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            green_cover_target_pct: 33.0,
            mitigation_target_pct: 40.0,
            mitigation_deg_per_pct: 0.3,
            correlation_baseline: -0.67,
            correlation_jitter: 0.1,
            cooling_per_pct: 0.3,
            trees_per_pct: 15.0,
            co2_tonnes_per_tree: 0.021,
            heat_reduction_per_tree: 0.025,
            max_heat_reduction_c: 5.0,
            canopy_trees_per_pct_km2: 50.0,
            fallback_land_type: LandType::MixedUrban,
            land_types,
        }
    }
}

impl PolicyConfig {
    /// Parse a TOML override. Unlisted keys and land-type rows keep their
    /// Delhi defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut policy: PolicyConfig = toml::from_str(text)?;
        for (key, profile) in PolicyConfig::default().land_types {
            policy.land_types.entry(key).or_insert(profile);
        }
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let policy = Self::from_toml_str(&text)?;
        log::info!("loaded policy from {}", path.display());
        Ok(policy)
    }

    /// Reject policies whose coefficients would make the engines emit
    /// negative counts or costs.
    pub fn validate(&self) -> Result<()> {
        positive("green_cover_target_pct", self.green_cover_target_pct)?;
        positive("mitigation_target_pct", self.mitigation_target_pct)?;
        non_negative("mitigation_deg_per_pct", self.mitigation_deg_per_pct)?;
        finite("correlation_baseline", self.correlation_baseline)?;
        non_negative("correlation_jitter", self.correlation_jitter)?;
        positive("cooling_per_pct", self.cooling_per_pct)?;
        non_negative("trees_per_pct", self.trees_per_pct)?;
        non_negative("co2_tonnes_per_tree", self.co2_tonnes_per_tree)?;
        non_negative("heat_reduction_per_tree", self.heat_reduction_per_tree)?;
        non_negative("max_heat_reduction_c", self.max_heat_reduction_c)?;
        non_negative("canopy_trees_per_pct_km2", self.canopy_trees_per_pct_km2)?;
        for (key, profile) in &self.land_types {
            LandType::parse_strict(key)?;
            non_negative("trees_per_sq_km", profile.trees_per_sq_km)?;
            non_negative("cost_per_tree", profile.cost_per_tree)?;
        }
        Ok(())
    }

    /// Look up the planting row for `land`, falling back to
    /// `fallback_land_type` when the row is absent.
    ///
    /// Returns the land type whose row was actually used.
    pub fn profile(&self, land: LandType) -> Result<(LandType, &LandProfile)> {
        if let Some(p) = self.land_types.get(land.as_ref()) {
            return Ok((land, p));
        }
        let fallback = self.fallback_land_type;
        match self.land_types.get(fallback.as_ref()) {
            Some(p) => {
                log::warn!("no planting profile for {land}, using {fallback}");
                Ok((fallback, p))
            }
            None => Err(ScoringError::MissingLandProfile {
                requested: land,
                fallback,
            }),
        }
    }

    /// Trees required per degree of cooling.
    pub fn trees_per_degree(&self) -> f64 {
        self.trees_per_pct / self.cooling_per_pct
    }

    /// Land types with a row in this policy, in declaration order.
    pub fn configured_land_types(&self) -> Vec<LandType> {
        LandType::iter()
            .filter(|l| self.land_types.contains_key(l.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_every_land_type() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.configured_land_types().len(), LandType::iter().count());
        policy.validate().expect("default policy must validate");
    }

    #[test]
    fn land_type_keys_round_trip_through_strum() {
        for land in LandType::iter() {
            let key = land.to_string();
            assert_eq!(LandType::parse_strict(&key).unwrap(), land, "key {key}");
        }
        assert_eq!(LandType::MixedUrban.as_ref(), "mixed_urban");
    }

    #[test]
    fn unknown_land_type_falls_back_leniently_and_fails_strictly() {
        assert_eq!(
            LandType::parse_or_fallback("orchard", LandType::MixedUrban),
            LandType::MixedUrban
        );
        assert!(matches!(
            LandType::parse_strict("orchard"),
            Err(ScoringError::UnknownLandType(k)) if k == "orchard"
        ));
    }

    #[test]
    fn two_green_cover_targets_stay_distinct() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.green_cover_target_pct, 33.0);
        assert_eq!(policy.mitigation_target_pct, 40.0);
    }

    #[test]
    fn trees_per_degree_is_fifty() {
        assert_eq!(PolicyConfig::default().trees_per_degree().round(), 50.0);
    }

    #[test]
    fn toml_override_merges_with_default_rows() {
        let text = r#"
            green_cover_target_pct = 35.0

            [land_types.industrial]
            trees_per_sq_km = 250.0
            cost_per_tree = 650.0
            species = ["Arjun (Terminalia arjuna)"]
        "#;
        let policy = PolicyConfig::from_toml_str(text).expect("valid override");
        assert_eq!(policy.green_cover_target_pct, 35.0);
        assert_eq!(policy.mitigation_target_pct, 40.0, "unlisted key keeps default");

        let (_, industrial) = policy.profile(LandType::Industrial).unwrap();
        assert_eq!(industrial.trees_per_sq_km, 250.0);
        let (_, residential) = policy.profile(LandType::Residential).unwrap();
        assert_eq!(residential.trees_per_sq_km, 500.0, "unlisted row keeps default");
    }

    #[test]
    fn toml_with_unknown_land_key_is_rejected() {
        let text = r#"
            [land_types.orchard]
            trees_per_sq_km = 250.0
            cost_per_tree = 650.0
            species = []
        "#;
        assert!(matches!(
            PolicyConfig::from_toml_str(text),
            Err(ScoringError::UnknownLandType(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            PolicyConfig::from_toml_str("green_cover_target_pct = \"lots\""),
            Err(ScoringError::PolicyParse(_))
        ));
    }

    #[test]
    fn missing_row_uses_fallback_then_errors() {
        let mut policy = PolicyConfig::default();
        policy.land_types.remove("water_body");
        let (used, profile) = policy.profile(LandType::WaterBody).unwrap();
        assert_eq!(used, LandType::MixedUrban);
        assert_eq!(profile.trees_per_sq_km, 400.0);

        policy.land_types.remove("mixed_urban");
        assert!(matches!(
            policy.profile(LandType::WaterBody),
            Err(ScoringError::MissingLandProfile { .. })
        ));
    }
}
