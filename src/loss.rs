//! Scores simulated statistics against observed targets.

use anyhow::bail;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ability::{AbilityVector, BASELINE};
use crate::player::TargetStats;
use crate::stats::{RateStats, Stat};

/// Relative importance of each statistic, and of staying close to the anchor abilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorWeights {
    pub stats: FxHashMap<Stat, f64>,
    pub deviation_penalty: f64,
}
impl ErrorWeights {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (stat, &weight) in &self.stats {
            if !weight.is_finite() || weight < 0.0 {
                bail!("weight of {stat} must be finite and non-negative, got {weight}");
            }
        }
        if !self.deviation_penalty.is_finite() || self.deviation_penalty < 0.0 {
            bail!("deviation penalty must be finite and non-negative");
        }
        Ok(())
    }

    pub fn weight(&self, stat: Stat) -> f64 {
        self.stats.get(&stat).copied().unwrap_or_default()
    }
}

impl Default for ErrorWeights {
    fn default() -> Self {
        Self {
            stats: FxHashMap::from_iter([
                (Stat::BattingAverage, 1.0),
                (Stat::OnBasePercentage, 1.5),
                (Stat::Slugging, 1.2),
                (Stat::HomeRunRate, 1.5),
                (Stat::WalkRate, 1.5),
            ]),
            deviation_penalty: 0.05,
        }
    }
}

/// Weighted sum of squared relative errors over all statistics with a finite target, plus
/// `deviation_penalty` times the normalised squared distance of `candidate` from `anchor`.
/// Where a target is zero, the absolute error is used instead.
pub fn score(
    simulated: &RateStats,
    target: &TargetStats,
    candidate: &AbilityVector,
    anchor: &AbilityVector,
    weights: &ErrorWeights,
    deviation_penalty: f64,
) -> f64 {
    let mut error = 0.0;
    for (stat, target_value) in target.ratios.iter() {
        let weight = weights.weight(stat);
        if weight == 0.0 || !target_value.is_finite() {
            continue;
        }
        let deviation = simulated.ratios[stat] - target_value;
        let deviation = if target_value > 0.0 {
            deviation / target_value
        } else {
            deviation
        };
        error += weight * deviation.powi(2);
    }
    error + deviation_penalty * candidate.normalised_distance(anchor, BASELINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeCounts;
    use crate::stats::{BoxScore, StatsAggregator};
    use assert_float_eq::*;

    fn judge_like() -> TargetStats {
        TargetStats::from_counts(OutcomeCounts::from([62, 87, 28, 111, 6, 402]))
    }

    #[test]
    fn perfect_match_scores_zero() {
        let target = judge_like();
        let simulated = BoxScore.aggregate(&target.counts, target.plate_appearances);
        let abilities = AbilityVector::new(115.0, 72.0, 100.0);
        let weights = ErrorWeights::default();
        let error = score(&simulated, &target, &abilities, &abilities, &weights, weights.deviation_penalty);
        assert_eq!(0.0, error);
    }

    #[test]
    fn weighted_relative_error() {
        let target = judge_like();
        let mut simulated = BoxScore.aggregate(&target.counts, target.plate_appearances);
        simulated.ratios[Stat::Slugging] *= 0.9;
        simulated.ratios[Stat::WalkRate] *= 1.2;
        let abilities = AbilityVector::baseline();
        let error = score(&simulated, &target, &abilities, &abilities, &ErrorWeights::default(), 0.0);
        assert_float_absolute_eq!(1.2 * 0.01 + 1.5 * 0.04, error, 1e-12);
    }

    #[test]
    fn unweighted_and_missing_targets_ignored() {
        let mut target = judge_like();
        target.ratios[Stat::BattingAverage] = f64::NAN;
        let mut simulated = BoxScore.aggregate(&target.counts, target.plate_appearances);
        simulated.ratios[Stat::BattingAverage] = 0.0;
        simulated.ratios[Stat::OnBasePlusSlugging] = 0.0;
        let abilities = AbilityVector::baseline();
        let error = score(&simulated, &target, &abilities, &abilities, &ErrorWeights::default(), 0.0);
        assert_eq!(0.0, error);
    }

    #[test]
    fn zero_target_uses_absolute_error() {
        let target = TargetStats::from_counts(OutcomeCounts::from([0, 100, 20, 50, 5, 325]));
        let mut simulated = BoxScore.aggregate(&target.counts, target.plate_appearances);
        simulated.ratios[Stat::HomeRunRate] = 0.1;
        let abilities = AbilityVector::baseline();
        let error = score(&simulated, &target, &abilities, &abilities, &ErrorWeights::default(), 0.0);
        assert_float_absolute_eq!(1.5 * 0.01, error, 1e-12);
    }

    #[test]
    fn deviation_from_anchor_penalised() {
        let target = judge_like();
        let simulated = BoxScore.aggregate(&target.counts, target.plate_appearances);
        let anchor = AbilityVector::baseline();
        let candidate = AbilityVector::new(105.0, 70.0, 35.0);
        let error = score(&simulated, &target, &candidate, &anchor, &ErrorWeights::default(), 0.05);
        assert_float_absolute_eq!(0.05 * 0.5, error, 1e-12);
    }

    #[test]
    fn negative_weight_invalid() {
        let mut weights = ErrorWeights::default();
        assert!(weights.validate().is_ok());
        weights.stats.insert(Stat::Slugging, -1.0);
        assert!(weights.validate().is_err());

        let weights = ErrorWeights {
            deviation_penalty: f64::INFINITY,
            ..ErrorWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn weights_from_json() {
        let weights: ErrorWeights =
            serde_json::from_str(r#"{"stats": {"BA": 1.0, "HR": 2.5}, "deviation_penalty": 0.1}"#).unwrap();
        assert_eq!(2.5, weights.weight(Stat::HomeRunRate));
        assert_eq!(0.0, weights.weight(Stat::Slugging));
        assert_eq!(0.1, weights.deviation_penalty);
    }
}
