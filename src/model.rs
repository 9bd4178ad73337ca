//! Maps batter abilities to a categorical distribution over plate-appearance outcomes.
//!
//! Each ability-driven rate starts at a league-average base and moves linearly with the deviation
//! of one or more abilities from [BASELINE]. The adjusted rates are clamped to per-category ranges,
//! combined with the player's hit-by-pitch rate, and the residual becomes the probability of an out.

use std::ops::RangeInclusive;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

use crate::ability::{AbilityVector, BASELINE};
use crate::outcome::{Outcome, OutcomeDistribution};
use crate::probs::{clamp, SliceExt};

/// League-average per-PA rates for an average batter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRates {
    pub walk: f64,
    pub strikeout: f64,
    pub home_run: f64,
    pub double: f64,
    pub single: f64,
}

impl Default for BaseRates {
    fn default() -> Self {
        Self {
            walk: 0.085,
            strikeout: 0.230,
            home_run: 0.030,
            double: 0.045,
            single: 0.151,
        }
    }
}

/// Change in a rate per unit of ability above the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFactors {
    pub discipline_walk: f64,
    /// Positive values make disciplined batters strike out less.
    pub discipline_strikeout: f64,
    /// Positive values make contact hitters strike out less.
    pub contact_strikeout: f64,
    pub power_home_run: f64,
    pub contact_single: f64,
    pub contact_double: f64,
    pub power_double: f64,
    /// Fraction of [LinearFactors::power_double] deducted from singles, as power turns singles
    /// into extra-base hits.
    pub single_power_drag: f64,
}

impl Default for LinearFactors {
    fn default() -> Self {
        Self {
            discipline_walk: 0.0011,
            discipline_strikeout: 0.0012,
            contact_strikeout: 0.0012,
            power_home_run: 0.0013,
            contact_single: 0.00030,
            contact_double: 0.00022,
            power_double: 0.00050,
            single_power_drag: 0.25,
        }
    }
}

/// Plausible range of each rate, applied after the linear adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampRanges {
    pub walk: RangeInclusive<f64>,
    pub strikeout: RangeInclusive<f64>,
    pub home_run: RangeInclusive<f64>,
    pub double: RangeInclusive<f64>,
    pub single: RangeInclusive<f64>,
    pub hit_by_pitch: RangeInclusive<f64>,
}

impl Default for ClampRanges {
    fn default() -> Self {
        Self {
            walk: 0.01..=0.25,
            strikeout: 0.05..=0.45,
            home_run: 0.001..=0.15,
            double: 0.005..=0.15,
            single: 0.01..=0.30,
            hit_by_pitch: 0.003..=0.04,
        }
    }
}

impl ClampRanges {
    fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, range) in [
            ("walk", &self.walk),
            ("strikeout", &self.strikeout),
            ("home run", &self.home_run),
            ("double", &self.double),
            ("single", &self.single),
            ("hit-by-pitch", &self.hit_by_pitch),
        ] {
            if !range.start().is_finite() || !range.end().is_finite() {
                bail!("{name} range {range:?} must be finite");
            }
            if range.start() > range.end() {
                bail!("{name} range {range:?} is inverted");
            }
        }
        if *self.hit_by_pitch.start() < 0.0 || *self.hit_by_pitch.end() > 1.0 {
            bail!("hit-by-pitch range {:?} must lie within 0..=1", self.hit_by_pitch);
        }
        Ok(())
    }
}

/// Tunable constants of the outcome model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub baseline: f64,
    pub base_rates: BaseRates,
    pub factors: LinearFactors,
    pub ranges: ClampRanges,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            baseline: BASELINE,
            base_rates: BaseRates::default(),
            factors: LinearFactors::default(),
            ranges: ClampRanges::default(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.baseline.is_finite() {
            bail!("baseline must be finite");
        }
        let base_rates = [
            self.base_rates.walk,
            self.base_rates.strikeout,
            self.base_rates.home_run,
            self.base_rates.double,
            self.base_rates.single,
        ];
        if base_rates.iter().any(|rate| !rate.is_finite()) {
            bail!("base rates must be finite");
        }
        let factors = &self.factors;
        if [
            factors.discipline_walk,
            factors.discipline_strikeout,
            factors.contact_strikeout,
            factors.power_home_run,
            factors.contact_single,
            factors.contact_double,
            factors.power_double,
            factors.single_power_drag,
        ]
        .iter()
        .any(|factor| !factor.is_finite())
        {
            bail!("linear factors must be finite");
        }
        self.ranges.validate()
    }

    /// Linearly adjusted rates, prior to any clamping.
    pub fn adjusted_rates(&self, abilities: &AbilityVector) -> AdjustedRates {
        let delta_power = abilities.power - self.baseline;
        let delta_contact = abilities.contact - self.baseline;
        let delta_discipline = abilities.discipline - self.baseline;
        let (base, factors) = (&self.base_rates, &self.factors);

        AdjustedRates {
            walk: base.walk + delta_discipline * factors.discipline_walk,
            strikeout: base.strikeout
                - delta_discipline * factors.discipline_strikeout
                - delta_contact * factors.contact_strikeout,
            home_run: base.home_run + delta_power * factors.power_home_run,
            double: base.double
                + delta_contact * factors.contact_double
                + delta_power * factors.power_double,
            single: base.single + delta_contact * factors.contact_single
                - delta_power * factors.power_double * factors.single_power_drag,
        }
    }
}

/// Ability-driven rates after the linear adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedRates {
    pub walk: f64,
    pub strikeout: f64,
    pub home_run: f64,
    pub double: f64,
    pub single: f64,
}
impl AdjustedRates {
    pub fn clamp(&self, ranges: &ClampRanges) -> ClampedRates {
        ClampedRates {
            walk: clamp(self.walk, &ranges.walk),
            strikeout: clamp(self.strikeout, &ranges.strikeout),
            home_run: clamp(self.home_run, &ranges.home_run),
            double: clamp(self.double, &ranges.double),
            single: clamp(self.single, &ranges.single),
        }
    }
}

/// Adjusted rates restricted to their plausible ranges. The strikeout rate is carried for
/// diagnostics; outs are not differentiated in the final distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedRates {
    pub walk: f64,
    pub strikeout: f64,
    pub home_run: f64,
    pub double: f64,
    pub single: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeModel {
    config: ModelConfig,
}
impl OutcomeModel {
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn clamped_rates(&self, abilities: &AbilityVector) -> ClampedRates {
        self.config
            .adjusted_rates(abilities)
            .clamp(&self.config.ranges)
    }

    pub fn probabilities(&self, abilities: &AbilityVector, hbp_rate: f64) -> OutcomeDistribution {
        let rates = self.clamped_rates(abilities);
        let mut hit_by_pitch = clamp(hbp_rate, &self.config.ranges.hit_by_pitch);
        let (mut home_run, mut single, mut double, mut walk) =
            (rates.home_run, rates.single, rates.double, rates.walk);

        let positive = home_run + single + double + walk + hit_by_pitch;
        if positive >= 1.0 {
            let ability_driven = home_run + single + double + walk;
            if ability_driven > 0.0 {
                let scaler = (1.0 - hit_by_pitch) / ability_driven;
                home_run *= scaler;
                single *= scaler;
                double *= scaler;
                walk *= scaler;
            } else {
                hit_by_pitch = f64::min(1.0, hit_by_pitch);
                (home_run, single, double, walk) = (0.0, 0.0, 0.0, 0.0);
            }
        }

        let out = f64::max(0.0, 1.0 - (home_run + single + double + walk + hit_by_pitch));

        let mut probs = [0.0; Outcome::COUNT];
        probs[Outcome::HomeRun.ordinal()] = home_run;
        probs[Outcome::Single.ordinal()] = single;
        probs[Outcome::Double.ordinal()] = double;
        probs[Outcome::Walk.ordinal()] = walk;
        probs[Outcome::HitByPitch.ordinal()] = hit_by_pitch;
        probs[Outcome::Out.ordinal()] = out;
        probs.clip_negative();

        let total = probs.sum();
        if total == 0.0 {
            return OutcomeDistribution::certain_out();
        }
        probs.scale(1.0 / total);
        OutcomeDistribution::new(probs)
    }
}

impl TryFrom<ModelConfig> for OutcomeModel {
    type Error = anyhow::Error;

    fn try_from(config: ModelConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// Outcome probabilities under the default model constants.
pub fn outcome_probabilities(abilities: &AbilityVector, hbp_rate: f64) -> OutcomeDistribution {
    OutcomeModel::default().probabilities(abilities, hbp_rate)
}
