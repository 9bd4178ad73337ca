//! Latent batter abilities.

use std::fmt::Formatter;
use std::ops::{Index, IndexMut, RangeInclusive};

use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

/// League-average value that each ability is centred on.
pub const BASELINE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Display)]
pub enum Attribute {
    Power,
    Contact,
    Discipline,
}

/// Power, contact and plate discipline of a batter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityVector {
    pub power: f64,
    pub contact: f64,
    pub discipline: f64,
}
impl AbilityVector {
    pub fn new(power: f64, contact: f64, discipline: f64) -> Self {
        Self {
            power,
            contact,
            discipline,
        }
    }

    /// An average batter.
    pub fn baseline() -> Self {
        Self::new(BASELINE, BASELINE, BASELINE)
    }

    /// Sum of squared per-attribute differences, each taken as a fraction of `scale`.
    pub fn normalised_distance(&self, other: &AbilityVector, scale: f64) -> f64 {
        ((self.power - other.power) / scale).powi(2)
            + ((self.contact - other.contact) / scale).powi(2)
            + ((self.discipline - other.discipline) / scale).powi(2)
    }

    pub fn clamp(&self, bounds: &RangeInclusive<f64>) -> Self {
        Self::new(
            crate::probs::clamp(self.power, bounds),
            crate::probs::clamp(self.contact, bounds),
            crate::probs::clamp(self.discipline, bounds),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.power.is_finite() && self.contact.is_finite() && self.discipline.is_finite()
    }
}

impl Default for AbilityVector {
    fn default() -> Self {
        Self::baseline()
    }
}

impl Index<Attribute> for AbilityVector {
    type Output = f64;

    fn index(&self, attribute: Attribute) -> &Self::Output {
        match attribute {
            Attribute::Power => &self.power,
            Attribute::Contact => &self.contact,
            Attribute::Discipline => &self.discipline,
        }
    }
}

impl IndexMut<Attribute> for AbilityVector {
    fn index_mut(&mut self, attribute: Attribute) -> &mut Self::Output {
        match attribute {
            Attribute::Power => &mut self.power,
            Attribute::Contact => &mut self.contact,
            Attribute::Discipline => &mut self.discipline,
        }
    }
}

impl std::fmt::Display for AbilityVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "POW={:.2}, HIT={:.2}, EYE={:.2}",
            self.power, self.contact, self.discipline
        )
    }
}
