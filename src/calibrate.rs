//! Calibration of a single player's abilities.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinyrand::Rand;
use tracing::debug;

use crate::ability::AbilityVector;
use crate::loss::ErrorWeights;
use crate::model::{ModelConfig, OutcomeModel};
use crate::opt::{AttributeSearch, Evaluator, SearchConfig, SearchResult, StopSignal};
use crate::player::{PlayerData, TargetStats, UnknownPlayer};
use crate::season::{MonteCarloSeason, SeasonSimulator};
use crate::stats::{BoxScore, StatsAggregator};

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("{0}")]
    UnknownPlayer(#[from] UnknownPlayer),

    #[error("invalid configuration: {0}")]
    InvalidConfig(anyhow::Error),
}

impl From<anyhow::Error> for CalibrationError {
    fn from(err: anyhow::Error) -> Self {
        CalibrationError::InvalidConfig(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub search: SearchConfig,
    pub weights: ErrorWeights,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.model.validate()?;
        self.search.validate()?;
        self.weights.validate()?;
        Ok(())
    }
}

/// Searches for the abilities that best reproduce a player's observed statistics. The season
/// simulator and the stats aggregator are pluggable; by default, seasons are sampled by Monte Carlo
/// and scored by [BoxScore].
#[derive(Debug, Clone)]
pub struct Calibrator<S = MonteCarloSeason, A = BoxScore> {
    model: OutcomeModel,
    search: SearchConfig,
    weights: ErrorWeights,
    simulator: S,
    aggregator: A,
    stop: StopSignal,
}
impl<S, A> Calibrator<S, A>
where
    S: SeasonSimulator + Sync,
    A: StatsAggregator + Sync,
{
    pub fn with_simulator<T: SeasonSimulator + Sync>(self, simulator: T) -> Calibrator<T, A> {
        Calibrator {
            model: self.model,
            search: self.search,
            weights: self.weights,
            simulator,
            aggregator: self.aggregator,
            stop: self.stop,
        }
    }

    pub fn with_aggregator<T: StatsAggregator + Sync>(self, aggregator: T) -> Calibrator<S, T> {
        Calibrator {
            model: self.model,
            search: self.search,
            weights: self.weights,
            simulator: self.simulator,
            aggregator,
            stop: self.stop,
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn model(&self) -> &OutcomeModel {
        &self.model
    }

    pub fn calibrate(
        &self,
        player_name: &str,
        anchor: &AbilityVector,
        target: &TargetStats,
        rand: &mut impl Rand,
    ) -> SearchResult {
        self.calibrate_with(
            player_name,
            anchor,
            target,
            &self.weights,
            self.weights.deviation_penalty,
            &self.search,
            rand,
        )
    }

    pub fn calibrate_player(
        &self,
        provider: &impl PlayerData,
        player_name: &str,
        rand: &mut impl Rand,
    ) -> Result<SearchResult, CalibrationError> {
        let target = provider.target_stats(player_name)?;
        let anchor = provider.anchor_abilities(player_name)?;
        Ok(self.calibrate(player_name, &anchor, &target, rand))
    }

    fn calibrate_with(
        &self,
        player_name: &str,
        anchor: &AbilityVector,
        target: &TargetStats,
        weights: &ErrorWeights,
        deviation_penalty: f64,
        search: &SearchConfig,
        rand: &mut impl Rand,
    ) -> SearchResult {
        debug!(
            "calibrating {player_name} over {} PA from {anchor}",
            target.plate_appearances
        );
        let evaluator = Evaluator {
            model: &self.model,
            simulator: &self.simulator,
            aggregator: &self.aggregator,
            target,
            anchor: *anchor,
            weights,
            deviation_penalty,
        };
        let result = AttributeSearch::new(search, evaluator, rand)
            .with_stop_signal(self.stop.clone())
            .run();
        debug!(
            "calibration of {player_name} complete: {}, error: {:.6} (initial {:.6}), {} rounds, {} improvements took: {:.3}s",
            result.abilities,
            result.error,
            result.initial_error,
            result.rounds,
            result.improvements.len(),
            result.elapsed.as_millis() as f64 / 1_000.
        );
        result
    }
}

impl TryFrom<Config> for Calibrator {
    type Error = CalibrationError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            model: OutcomeModel::try_from(config.model)?,
            search: config.search,
            weights: config.weights,
            simulator: MonteCarloSeason,
            aggregator: BoxScore,
            stop: StopSignal::default(),
        })
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            model: OutcomeModel::default(),
            search: SearchConfig::default(),
            weights: ErrorWeights::default(),
            simulator: MonteCarloSeason,
            aggregator: BoxScore,
            stop: StopSignal::default(),
        }
    }
}

/// Calibrates `player_name` with the default model, Monte Carlo seasons and the default search,
/// limited to `iteration_budget` rounds. Negative or non-finite weights are rejected up front.
pub fn run_calibration(
    player_name: &str,
    anchor_abilities: &AbilityVector,
    target_stats: &TargetStats,
    error_weights: &ErrorWeights,
    deviation_penalty_weight: f64,
    iteration_budget: u64,
    rand: &mut impl Rand,
) -> Result<SearchResult, CalibrationError> {
    let weights = ErrorWeights {
        stats: error_weights.stats.clone(),
        deviation_penalty: deviation_penalty_weight,
    };
    weights.validate()?;
    let search = SearchConfig {
        rounds: iteration_budget,
        ..SearchConfig::default()
    };
    let calibrator: Calibrator = Calibrator::default();
    Ok(calibrator.calibrate_with(
        player_name,
        anchor_abilities,
        target_stats,
        &weights,
        deviation_penalty_weight,
        &search,
        rand,
    ))
}
