//! Observed player data: calibration targets and prior abilities.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ability::AbilityVector;
use crate::file;
use crate::outcome::{Outcome, OutcomeCounts};
use crate::stats::{BoxScore, Stat, StatValues, StatsAggregator};

/// Observed season outcomes for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStats {
    pub counts: OutcomeCounts,
    pub ratios: StatValues,
    pub hbp_rate: f64,
    pub plate_appearances: u64,
}
impl TargetStats {
    /// Derives the ratios and the hit-by-pitch rate from the counts alone, taking every counted
    /// outcome as a plate appearance.
    pub fn from_counts(counts: OutcomeCounts) -> Self {
        let plate_appearances = counts.total();
        let ratios = BoxScore.aggregate(&counts, plate_appearances).ratios;
        let hbp_rate = if plate_appearances == 0 {
            0.0
        } else {
            counts[Outcome::HitByPitch] as f64 / plate_appearances as f64
        };
        Self {
            counts,
            ratios,
            hbp_rate,
            plate_appearances,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown player '{0}'")]
pub struct UnknownPlayer(pub String);

/// Source of per-player calibration inputs.
pub trait PlayerData {
    fn target_stats(&self, player: &str) -> Result<TargetStats, UnknownPlayer>;

    fn anchor_abilities(&self, player: &str) -> Result<AbilityVector, UnknownPlayer>;
}

/// A player's entry in a [Roster]. Ratios, when given, are the published figures and take
/// precedence over those derived from the counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub anchor: AbilityVector,
    pub plate_appearances: u64,
    pub counts: OutcomeCounts,
    #[serde(default)]
    pub ratios: Option<StatValues>,
}
impl PlayerRecord {
    fn target_stats(&self) -> TargetStats {
        let derived = BoxScore.aggregate(&self.counts, self.plate_appearances).ratios;
        let ratios = match &self.ratios {
            None => derived,
            Some(published) => {
                let mut merged = derived;
                for (stat, value) in published.iter() {
                    if value.is_finite() {
                        merged[stat] = value;
                    }
                }
                if !published[Stat::OnBasePlusSlugging].is_finite() {
                    merged[Stat::OnBasePlusSlugging] =
                        merged[Stat::OnBasePercentage] + merged[Stat::Slugging];
                }
                merged
            }
        };
        let hbp_rate = if self.plate_appearances == 0 {
            0.0
        } else {
            self.counts[Outcome::HitByPitch] as f64 / self.plate_appearances as f64
        };
        TargetStats {
            counts: self.counts.clone(),
            ratios,
            hbp_rate,
            plate_appearances: self.plate_appearances,
        }
    }
}

/// In-memory player data, keyed by player name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub players: FxHashMap<String, PlayerRecord>,
}
impl Roster {
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        file::read_json(path)
    }

    pub fn insert(&mut self, player: impl Into<String>, record: PlayerRecord) {
        self.players.insert(player.into(), record);
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.players.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    fn record(&self, player: &str) -> Result<&PlayerRecord, UnknownPlayer> {
        self.players
            .get(player)
            .ok_or_else(|| UnknownPlayer(player.to_string()))
    }
}

impl PlayerData for Roster {
    fn target_stats(&self, player: &str) -> Result<TargetStats, UnknownPlayer> {
        Ok(self.record(player)?.target_stats())
    }

    fn anchor_abilities(&self, player: &str) -> Result<AbilityVector, UnknownPlayer> {
        Ok(self.record(player)?.anchor)
    }
}
