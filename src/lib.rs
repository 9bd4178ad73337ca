//! Calibrates the latent abilities of a batter (power, contact and plate discipline) against their
//! observed season statistics. A parametric model maps abilities to plate-appearance outcome
//! probabilities; seasons are simulated from those probabilities and scored against the observed
//! rates, and a stochastic search walks ability space toward the lowest error.

#![allow(clippy::too_many_arguments)]

pub mod ability;
pub mod calibrate;
pub mod file;
pub mod loss;
pub mod model;
pub mod opt;
pub mod outcome;
pub mod player;
pub mod print;
pub mod probs;
pub mod season;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
