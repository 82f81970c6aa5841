//! Ward-list ranking score.
//!
//! A coarser four-factor weighting used only to order wards on the overview
//! list. It shares the priority tiers with the assessment but not its weights.

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, percent, Result};
use crate::numeric::{clamp_pct, round_score};
use crate::policy::PolicyConfig;

use super::assessment::vegetation_risk_score;
use super::Priority;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingInput {
    pub ward_name: String,
    pub heat_index: f64,
    /// Vegetation deficit already scaled to 0–100.
    pub green_deficit: f64,
    pub tree_loss_rate: f64,
    pub population_density: f64,
}

impl RankingInput {
    /// Build a ranking row from current green cover, deriving the deficit the
    /// same way the assessment's vegetation factor does.
    pub fn from_green_cover(
        ward_name: impl Into<String>,
        heat_index: f64,
        green_cover_percent: f64,
        tree_loss_rate: f64,
        population_density: f64,
        policy: &PolicyConfig,
    ) -> Self {
        Self {
            ward_name: ward_name.into(),
            heat_index,
            green_deficit: vegetation_risk_score(green_cover_percent, policy),
            tree_loss_rate,
            population_density,
        }
    }

    fn validate(&self) -> Result<()> {
        percent("heatIndex", self.heat_index)?;
        non_negative("greenDeficit", self.green_deficit)?;
        non_negative("treeLossRate", self.tree_loss_rate)?;
        non_negative("populationDensity", self.population_density)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedWard {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// 0-based position of the ward in the ranked input.
    pub input_index: usize,
    pub ward_name: String,
    pub ranking_score: i32,
    pub priority: Priority,
}

/// `round(0.35·heat + 0.30·deficit + 0.20·min(100, loss·2) + 0.15·min(100, pop/500))`
pub fn ranking_risk_score(input: &RankingInput) -> Result<i32> {
    input.validate()?;
    let heat = input.heat_index * 0.35;
    let vegetation = clamp_pct(input.green_deficit) * 0.30;
    let tree_loss = (input.tree_loss_rate * 2.0).min(100.0) * 0.20;
    let population = (input.population_density / 500.0).min(100.0) * 0.15;
    Ok(round_score(heat + vegetation + tree_loss + population))
}

/// Order wards by ranking score, highest first. Ties keep input order.
pub fn rank_wards(inputs: &[RankingInput]) -> Result<Vec<RankedWard>> {
    let mut scored = inputs
        .iter()
        .enumerate()
        .map(|(idx, w)| Ok((idx, w, ranking_risk_score(w)?)))
        .collect::<Result<Vec<_>>>()?;
    scored.sort_by(|a, b| b.2.cmp(&a.2));

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (input_index, w, score))| RankedWard {
            rank: i + 1,
            input_index,
            ward_name: w.ward_name.clone(),
            ranking_score: score,
            priority: Priority::from_score(score),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{compute_risk_assessment, RiskInput};

    fn row(name: &str, heat: f64, deficit: f64, loss: f64, pop: f64) -> RankingInput {
        RankingInput {
            ward_name: name.to_string(),
            heat_index: heat,
            green_deficit: deficit,
            tree_loss_rate: loss,
            population_density: pop,
        }
    }

    #[test]
    fn four_factor_weighting() {
        // 28 + 20.7 + 4 + 6 = 58.7
        let score = ranking_risk_score(&row("Rohini", 80.0, 69.0, 10.0, 20_000.0)).unwrap();
        assert_eq!(score, 59);
    }

    /// ✓ The ranking score is not the assessment score for the same ward.
    #[test]
    fn differs_from_assessment_for_worked_example() {
        let policy = PolicyConfig::default();
        let input = RankingInput::from_green_cover("Rohini", 80.0, 10.0, 10.0, 20_000.0, &policy);
        assert_eq!(input.green_deficit, 69.0);
        let ranking = ranking_risk_score(&input).unwrap();

        let assessed =
            compute_risk_assessment(&RiskInput::new(80.0, 10.0, 10.0, 20_000.0), &policy).unwrap();
        assert_eq!(assessed.overall_risk_score, 70);
        assert_ne!(ranking, assessed.overall_risk_score);
    }

    #[test]
    fn factors_saturate() {
        let score = ranking_risk_score(&row("Max", 100.0, 250.0, 500.0, 1.0e9)).unwrap();
        assert_eq!(score, 100);
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let wards = vec![
            row("A", 40.0, 10.0, 0.0, 0.0),
            row("B", 90.0, 80.0, 10.0, 30_000.0),
            row("C", 40.0, 10.0, 0.0, 0.0),
            row("D", 60.0, 30.0, 5.0, 15_000.0),
        ];
        let ranked = rank_wards(&wards).unwrap();
        let names: Vec<_> = ranked.iter().map(|r| r.ward_name.as_str()).collect();
        assert_eq!(names, ["B", "D", "A", "C"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);
        for pair in ranked.windows(2) {
            assert!(
                pair[0].ranking_score >= pair[1].ranking_score,
                "{} before {}",
                pair[0].ward_name,
                pair[1].ward_name
            );
        }
    }

    #[test]
    fn duplicate_names_keep_their_input_position() {
        let wards = vec![
            row("Shahdara", 40.0, 10.0, 0.0, 0.0),
            row("Shahdara", 90.0, 80.0, 10.0, 30_000.0),
        ];
        let ranked = rank_wards(&wards).unwrap();
        let positions: Vec<_> = ranked.iter().map(|r| r.input_index).collect();
        assert_eq!(positions, [1, 0]);
        assert_eq!(serde_json::to_value(&ranked[0]).unwrap()["inputIndex"], 1);
    }

    #[test]
    fn invalid_row_fails_whole_ranking() {
        let wards = vec![row("A", 40.0, 10.0, 0.0, 0.0), row("B", 140.0, 10.0, 0.0, 0.0)];
        assert!(rank_wards(&wards).is_err());
    }

    #[test]
    fn empty_list_ranks_to_empty() {
        assert!(rank_wards(&[]).unwrap().is_empty());
    }
}
