//! Testing helpers.

use assert_float_eq::*;

use crate::outcome::OutcomeDistribution;
use crate::probs::SliceExt;

pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        assert_float_absolute_eq!(expected, actual[index], epsilon);
    }
}

/// Asserts that every probability is in [0, 1] and that the probabilities sum to 1.
pub fn assert_valid_distribution(distribution: &OutcomeDistribution) {
    for &prob in distribution.probs() {
        assert!((0.0..=1.0).contains(&prob), "invalid distribution {distribution:?}");
    }
    assert_float_absolute_eq!(1.0, distribution.probs().sum(), 1e-9);
}
