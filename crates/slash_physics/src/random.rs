//! Injectable randomness
//!
//! Everything that rolls dice takes `&mut dyn RandomSource`, so tests can pin
//! the outcome with [`SequenceRandom`] or a fixed seed.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use slash_math::{consts::TAU, Vec3};

/// Source of uniform random numbers
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform float in `[min, max)`; returns `min` for an empty range
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f32()
    }

    /// Uniform integer in `[min, max)`; returns `min` for an empty range
    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as f32;
        let offset = (self.next_f32() * span) as i32;
        min + offset.min(max - min - 1)
    }

    /// `true` with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniformly distributed direction
    fn unit_vector(&mut self) -> Vec3 {
        let z = self.range_f32(-1.0, 1.0);
        let theta = self.range_f32(0.0, TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }
}

/// `SmallRng`-backed source
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Deterministic source
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            seed: None,
        }
    }

    /// Seed this source was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random_range(0.0..1.0)
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

/// Cycles through a fixed list of values in `[0, 1)`
///
/// Values outside that range are clamped. An empty list always yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
        assert_eq!(a.seed(), Some(7));
    }

    #[test]
    fn test_seeded_ranges() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..1000 {
            let f = rng.range_f32(-2.0, 2.0);
            assert!((-2.0..2.0).contains(&f));
            let i = rng.range_i32(0, 5);
            assert!((0..5).contains(&i));
        }
        assert_eq!(rng.range_f32(3.0, 3.0), 3.0);
        assert_eq!(rng.range_i32(4, 1), 4);
    }

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRandom::new(vec![0.25, 0.75]);
        assert_eq!(rng.next_f32(), 0.25);
        assert_eq!(rng.next_f32(), 0.75);
        assert_eq!(rng.next_f32(), 0.25);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_default_range_helpers() {
        let mut rng = SequenceRandom::constant(0.5);
        assert_relative_eq!(rng.range_f32(0.0, 10.0), 5.0);
        assert_eq!(rng.range_i32(0, 4), 2);
        assert!(!rng.chance(0.5));
        assert!(rng.chance(0.51));

        let mut top = SequenceRandom::constant(1.0);
        assert_eq!(top.range_i32(0, 4), 3);
    }

    #[test]
    fn test_unit_vector_is_unit() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..100 {
            assert_relative_eq!(rng.unit_vector().length(), 1.0, epsilon = 1e-4);
        }
    }
}
