//! Rate statistics derived from outcome counts.

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use ordinalizer::Ordinal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter};

use crate::outcome::{Outcome, OutcomeCounts};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Serialize, Deserialize,
)]
pub enum Stat {
    #[serde(rename = "BA")]
    BattingAverage,
    #[serde(rename = "OBP")]
    OnBasePercentage,
    #[serde(rename = "SLG")]
    Slugging,
    #[serde(rename = "OPS")]
    OnBasePlusSlugging,
    /// Home runs per plate appearance.
    #[serde(rename = "HR")]
    HomeRunRate,
    /// Walks per plate appearance.
    #[serde(rename = "BB")]
    WalkRate,
}
impl Stat {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Stat::BattingAverage => "BA",
            Stat::OnBasePercentage => "OBP",
            Stat::Slugging => "SLG",
            Stat::OnBasePlusSlugging => "OPS",
            Stat::HomeRunRate => "HR",
            Stat::WalkRate => "BB",
        }
    }
}

impl Display for Stat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// One value per [Stat]. Serialised as a map; statistics absent from the map are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FxHashMap<Stat, f64>", into = "FxHashMap<Stat, f64>")]
pub struct StatValues {
    values: [f64; Stat::COUNT],
}
impl StatValues {
    pub fn unset() -> Self {
        Self {
            values: [f64::NAN; Stat::COUNT],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::iter().zip(self.values.iter().copied())
    }
}

impl From<[f64; Stat::COUNT]> for StatValues {
    fn from(values: [f64; Stat::COUNT]) -> Self {
        Self { values }
    }
}

impl From<FxHashMap<Stat, f64>> for StatValues {
    fn from(map: FxHashMap<Stat, f64>) -> Self {
        let mut values = Self::unset();
        for (stat, value) in map {
            values[stat] = value;
        }
        values
    }
}

impl From<StatValues> for FxHashMap<Stat, f64> {
    fn from(values: StatValues) -> Self {
        values.iter().filter(|(_, value)| !value.is_nan()).collect()
    }
}

impl Index<Stat> for StatValues {
    type Output = f64;

    fn index(&self, stat: Stat) -> &Self::Output {
        &self.values[stat.ordinal()]
    }
}

impl IndexMut<Stat> for StatValues {
    fn index_mut(&mut self, stat: Stat) -> &mut Self::Output {
        &mut self.values[stat.ordinal()]
    }
}

/// Rate statistics together with the counts they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct RateStats {
    pub counts: OutcomeCounts,
    pub plate_appearances: u64,
    pub ratios: StatValues,
}

pub trait StatsAggregator {
    fn aggregate(&self, counts: &OutcomeCounts, plate_appearances: u64) -> RateStats;
}

/// Conventional box-score arithmetic. Sacrifices are not modelled, so every plate appearance that
/// is not a walk or a hit-by-pitch is an at-bat.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxScore;

impl StatsAggregator for BoxScore {
    fn aggregate(&self, counts: &OutcomeCounts, plate_appearances: u64) -> RateStats {
        let (home_runs, singles, doubles) = (
            counts[Outcome::HomeRun],
            counts[Outcome::Single],
            counts[Outcome::Double],
        );
        let (walks, hit_by_pitch) = (counts[Outcome::Walk], counts[Outcome::HitByPitch]);
        let at_bats = plate_appearances.saturating_sub(walks + hit_by_pitch);
        let hits = home_runs + singles + doubles;
        let total_bases = singles + 2 * doubles + 4 * home_runs;

        let mut ratios = StatValues::unset();
        ratios[Stat::BattingAverage] = ratio(hits, at_bats);
        ratios[Stat::OnBasePercentage] = ratio(hits + walks + hit_by_pitch, plate_appearances);
        ratios[Stat::Slugging] = ratio(total_bases, at_bats);
        ratios[Stat::OnBasePlusSlugging] =
            ratios[Stat::OnBasePercentage] + ratios[Stat::Slugging];
        ratios[Stat::HomeRunRate] = ratio(home_runs, plate_appearances);
        ratios[Stat::WalkRate] = ratio(walks, plate_appearances);

        RateStats {
            counts: counts.clone(),
            plate_appearances,
            ratios,
        }
    }
}

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn box_score() {
        // HR, 1B, 2B, BB, HBP, OUT
        let counts = OutcomeCounts::from([62, 87, 28, 111, 6, 402]);
        let stats = BoxScore.aggregate(&counts, 696);
        assert_float_absolute_eq!(177.0 / 579.0, stats.ratios[Stat::BattingAverage], 1e-12);
        assert_float_absolute_eq!(294.0 / 696.0, stats.ratios[Stat::OnBasePercentage], 1e-12);
        assert_float_absolute_eq!(391.0 / 579.0, stats.ratios[Stat::Slugging], 1e-12);
        assert_float_absolute_eq!(
            294.0 / 696.0 + 391.0 / 579.0,
            stats.ratios[Stat::OnBasePlusSlugging],
            1e-12
        );
        assert_float_absolute_eq!(62.0 / 696.0, stats.ratios[Stat::HomeRunRate], 1e-12);
        assert_float_absolute_eq!(111.0 / 696.0, stats.ratios[Stat::WalkRate], 1e-12);
        assert_eq!(counts, stats.counts);
    }

    #[test]
    fn box_score_without_at_bats() {
        let counts = OutcomeCounts::from([0, 0, 0, 3, 1, 0]);
        let stats = BoxScore.aggregate(&counts, 4);
        assert_eq!(0.0, stats.ratios[Stat::BattingAverage]);
        assert_eq!(0.0, stats.ratios[Stat::Slugging]);
        assert_eq!(1.0, stats.ratios[Stat::OnBasePercentage]);
    }

    #[test]
    fn box_score_empty_season() {
        let stats = BoxScore.aggregate(&OutcomeCounts::default(), 0);
        assert!(stats.ratios.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn stat_values_from_json() {
        let values: StatValues = serde_json::from_str(r#"{"BA": 0.311, "SLG": 0.686}"#).unwrap();
        assert_eq!(0.311, values[Stat::BattingAverage]);
        assert_eq!(0.686, values[Stat::Slugging]);
        assert!(values[Stat::OnBasePercentage].is_nan());

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(2, json.as_object().unwrap().len());
    }
}
