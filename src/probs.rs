//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn scale(&mut self, factor: f64);
    fn clip_negative(&mut self);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    fn clip_negative(&mut self) {
        for element in self {
            if *element < 0.0 {
                *element = 0.0;
            }
        }
    }
}

/// Restricts `value` to the given inclusive range. Unlike [f64::clamp], does not panic when the
/// range is inverted; the lower bound is applied last.
#[inline(always)]
pub fn clamp(value: f64, range: &std::ops::RangeInclusive<f64>) -> f64 {
    f64::max(*range.start(), f64::min(*range.end(), value))
}

#[inline(always)]
pub fn random_f64(rand: &mut impl tinyrand::Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use tinyrand::StdRand;

    #[test]
    fn sum() {
        let data = [0.0, 0.1, 0.2];
        assert_f64_near!(0.3, data.sum(), 1);
    }

    #[test]
    fn scale() {
        let mut data = [0.05, 0.1, 0.25];
        data.scale(2.0);
        assert_eq!([0.1, 0.2, 0.5], data);
    }

    #[test]
    fn clip_negative() {
        let mut data = [-0.1, 0.0, 0.3, -0.0];
        data.clip_negative();
        assert_eq!([0.0, 0.0, 0.3, 0.0], data);
    }

    #[test]
    fn clamp_within_and_outside() {
        assert_eq!(0.1, clamp(0.1, &(0.01..=0.25)));
        assert_eq!(0.01, clamp(-0.5, &(0.01..=0.25)));
        assert_eq!(0.25, clamp(0.3, &(0.01..=0.25)));
    }

    #[test]
    fn random_f64_in_unit_interval() {
        let mut rand = StdRand::default();
        for _ in 0..1_000 {
            let value = random_f64(&mut rand);
            assert!((0.0..=1.0).contains(&value), "{value}");
        }
    }
}
