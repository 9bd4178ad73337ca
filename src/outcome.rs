//! Plate-appearance outcomes, their probabilities and their tallies.

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use ordinalizer::Ordinal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter};

/// The closed set of outcomes a plate appearance may end in. Strikeouts are not distinguished
/// from other outs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Serialize, Deserialize,
)]
pub enum Outcome {
    #[serde(rename = "HR")]
    HomeRun,
    #[serde(rename = "1B")]
    Single,
    #[serde(rename = "2B")]
    Double,
    #[serde(rename = "BB")]
    Walk,
    #[serde(rename = "HBP")]
    HitByPitch,
    #[serde(rename = "OUT")]
    Out,
}
impl Outcome {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Outcome::HomeRun => "HR",
            Outcome::Single => "1B",
            Outcome::Double => "2B",
            Outcome::Walk => "BB",
            Outcome::HitByPitch => "HBP",
            Outcome::Out => "OUT",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// A normalised categorical distribution over [Outcome]s. Constructed only by the outcome model.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    probs: [f64; Outcome::COUNT],
}
impl OutcomeDistribution {
    pub(crate) fn new(probs: [f64; Outcome::COUNT]) -> Self {
        Self { probs }
    }

    /// All probability mass on [Outcome::Out].
    pub fn certain_out() -> Self {
        let mut probs = [0.0; Outcome::COUNT];
        probs[Outcome::Out.ordinal()] = 1.0;
        Self { probs }
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::iter().zip(self.probs.iter().copied())
    }
}

impl Index<Outcome> for OutcomeDistribution {
    type Output = f64;

    fn index(&self, outcome: Outcome) -> &Self::Output {
        &self.probs[outcome.ordinal()]
    }
}

/// Tally of outcomes over a number of plate appearances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FxHashMap<Outcome, u64>", into = "FxHashMap<Outcome, u64>")]
pub struct OutcomeCounts {
    counts: [u64; Outcome::COUNT],
}
impl OutcomeCounts {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, u64)> + '_ {
        Outcome::iter().zip(self.counts.iter().copied())
    }
}

impl From<[u64; Outcome::COUNT]> for OutcomeCounts {
    fn from(counts: [u64; Outcome::COUNT]) -> Self {
        Self { counts }
    }
}

impl From<FxHashMap<Outcome, u64>> for OutcomeCounts {
    fn from(map: FxHashMap<Outcome, u64>) -> Self {
        let mut counts = Self::default();
        for (outcome, count) in map {
            counts[outcome] = count;
        }
        counts
    }
}

impl From<OutcomeCounts> for FxHashMap<Outcome, u64> {
    fn from(counts: OutcomeCounts) -> Self {
        counts.iter().collect()
    }
}

impl Index<Outcome> for OutcomeCounts {
    type Output = u64;

    fn index(&self, outcome: Outcome) -> &Self::Output {
        &self.counts[outcome.ordinal()]
    }
}

impl IndexMut<Outcome> for OutcomeCounts {
    fn index_mut(&mut self, outcome: Outcome) -> &mut Self::Output {
        &mut self.counts[outcome.ordinal()]
    }
}
