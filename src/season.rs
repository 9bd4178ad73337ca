//! Season simulation: turns an [OutcomeDistribution] into a tally of plate-appearance outcomes.

use strum::{EnumCount, IntoEnumIterator};
use tinyrand::Rand;

use crate::outcome::{Outcome, OutcomeCounts, OutcomeDistribution};
use crate::probs::random_f64;

pub trait SeasonSimulator {
    /// Draws `trials` independent outcomes. The returned counts always sum to `trials`.
    fn simulate(
        &self,
        distribution: &OutcomeDistribution,
        trials: u64,
        rand: &mut impl Rand,
    ) -> OutcomeCounts;
}

/// Monte Carlo sampling of each plate appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSeason;

impl SeasonSimulator for MonteCarloSeason {
    fn simulate(
        &self,
        distribution: &OutcomeDistribution,
        trials: u64,
        rand: &mut impl Rand,
    ) -> OutcomeCounts {
        let probs = distribution.probs();
        let fallback = last_possible(probs);
        let mut counts = [0; Outcome::COUNT];
        for _ in 0..trials {
            counts[sample_once(probs, fallback, rand)] += 1;
        }
        OutcomeCounts::from(counts)
    }
}

/// Picks an outcome index by walking the cumulative distribution. Any shortfall due to rounding
/// in the cumulative sum goes to `fallback`.
#[inline]
pub fn sample_once(probs: &[f64], fallback: usize, rand: &mut impl Rand) -> usize {
    let random = random_f64(rand);
    let mut cumulative = 0.0;
    for (index, &prob) in probs.iter().enumerate() {
        if prob > 0.0 {
            cumulative += prob;
            if cumulative >= random {
                return index;
            }
        }
    }
    fallback
}

fn last_possible(probs: &[f64]) -> usize {
    probs
        .iter()
        .rposition(|&prob| prob > 0.0)
        .unwrap_or(Outcome::Out.ordinal())
}

/// Noise-free apportionment of the expected outcome counts, using the largest-remainder method so
/// that the counts still sum to the number of trials. Ignores the random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedSeason;

impl SeasonSimulator for ExpectedSeason {
    fn simulate(
        &self,
        distribution: &OutcomeDistribution,
        trials: u64,
        _rand: &mut impl Rand,
    ) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        let mut remainders = Vec::with_capacity(Outcome::COUNT);
        let mut apportioned = 0;
        for (outcome, prob) in distribution.iter() {
            let expected = prob * trials as f64;
            let whole = f64::min(expected.floor(), (trials - apportioned) as f64) as u64;
            counts[outcome] = whole;
            apportioned += whole;
            remainders.push((outcome, expected - whole as f64));
        }

        // stable sort keeps declaration order among equal remainders
        remainders.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        let mut shortfall = trials - apportioned;
        for outcome in remainders.into_iter().map(|(outcome, _)| outcome).chain(Outcome::iter()) {
            if shortfall == 0 {
                break;
            }
            counts[outcome] += 1;
            shortfall -= 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityVector;
    use crate::model::outcome_probabilities;
    use assert_float_eq::*;
    use tinyrand::{Seeded, StdRand, Wyrand};

    #[test]
    fn monte_carlo_counts_sum_to_trials() {
        let distribution = outcome_probabilities(&AbilityVector::new(120.0, 75.0, 95.0), 0.009);
        let mut rand = Wyrand::seed(42);
        for trials in [0, 1, 7, 650, 10_000] {
            let counts = MonteCarloSeason.simulate(&distribution, trials, &mut rand);
            assert_eq!(trials, counts.total());
        }
    }

    #[test]
    fn monte_carlo_reproducible_with_seed() {
        let distribution = outcome_probabilities(&AbilityVector::baseline(), 0.01);
        let first = MonteCarloSeason.simulate(&distribution, 1_000, &mut Wyrand::seed(7));
        let second = MonteCarloSeason.simulate(&distribution, 1_000, &mut Wyrand::seed(7));
        assert_eq!(first, second);
    }

    #[test]
    fn monte_carlo_frequencies_approach_probabilities() {
        let distribution = outcome_probabilities(&AbilityVector::baseline(), 0.01);
        const TRIALS: u64 = 200_000;
        let counts = MonteCarloSeason.simulate(&distribution, TRIALS, &mut StdRand::default());
        for (outcome, prob) in distribution.iter() {
            let frequency = counts[outcome] as f64 / TRIALS as f64;
            assert_float_absolute_eq!(prob, frequency, 0.005);
        }
    }

    #[test]
    fn monte_carlo_certain_out() {
        let counts =
            MonteCarloSeason.simulate(&OutcomeDistribution::certain_out(), 500, &mut StdRand::default());
        assert_eq!(500, counts[Outcome::Out]);
    }

    #[test]
    fn sample_once_skips_impossible_outcomes() {
        let probs = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut rand = StdRand::default();
        for _ in 0..100 {
            assert_eq!(4, sample_once(&probs, last_possible(&probs), &mut rand));
        }
    }

    #[test]
    fn expected_counts_apportioned() {
        let distribution = outcome_probabilities(&AbilityVector::baseline(), 0.01);
        let counts = ExpectedSeason.simulate(&distribution, 1_000, &mut StdRand::default());
        assert_eq!(&[30, 151, 45, 85, 10, 679], counts.counts());
    }

    #[test]
    fn expected_counts_sum_to_trials() {
        let mut rand = StdRand::default();
        for abilities in [
            AbilityVector::new(20.0, 20.0, 20.0),
            AbilityVector::new(123.4, 87.6, 101.1),
            AbilityVector::new(150.0, 150.0, 150.0),
        ] {
            let distribution = outcome_probabilities(&abilities, 0.013);
            for trials in [0, 1, 3, 651, 696, 10_001] {
                let counts = ExpectedSeason.simulate(&distribution, trials, &mut rand);
                assert_eq!(trials, counts.total());
            }
        }
    }
}
