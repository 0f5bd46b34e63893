//! Launch velocities for parabolic arcs

use slash_math::Vec3;

use crate::random::RandomSource;

/// Computes launch velocities from a spawn point to a target
///
/// The vertical speed is `vy = 2h/t + dy/t`. Under gravity `g` the arc
/// reaches the target exactly at `t` only when `h = g t² / 4`;
/// [`TrajectorySolver::flight_time_for_peak`] and
/// [`TrajectorySolver::peak_for_flight_time`] give the matching pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySolver {
    gravity: f32,
    horizontal_jitter: f32,
}

impl TrajectorySolver {
    pub fn new(gravity: f32, horizontal_jitter: f32) -> Self {
        debug_assert!(gravity > 0.0 && gravity.is_finite());
        Self {
            gravity,
            horizontal_jitter: horizontal_jitter.abs(),
        }
    }

    /// Launch velocity without jitter
    pub fn ballistic_velocity(spawn: Vec3, target: Vec3, flight_time: f32, peak_height: f32) -> Vec3 {
        debug_assert!(flight_time > 0.0, "flight time must be positive");
        let t = flight_time;
        let d = target - spawn;
        Vec3::new(d.x / t, 2.0 * peak_height / t + d.y / t, d.z / t)
    }

    /// Launch velocity with a bounded random nudge on X and Z
    pub fn plan(
        &self,
        spawn: Vec3,
        target: Vec3,
        flight_time: f32,
        peak_height: f32,
        rng: &mut dyn RandomSource,
    ) -> Vec3 {
        let mut v = Self::ballistic_velocity(spawn, target, flight_time, peak_height);
        let j = self.horizontal_jitter;
        v.x += rng.range_f32(-j, j);
        v.z += rng.range_f32(-j, j);
        v
    }

    /// Flight time at which an arc with apex height `h` hits its target
    pub fn flight_time_for_peak(&self, peak_height: f32) -> f32 {
        (4.0 * peak_height.max(0.0) / self.gravity).sqrt()
    }

    /// Apex height for which an arc of `flight_time` hits its target
    pub fn peak_for_flight_time(&self, flight_time: f32) -> f32 {
        self.gravity * flight_time * flight_time / 4.0
    }

    /// Exact position after `t` seconds from `spawn` with `velocity`
    pub fn position_at(&self, spawn: Vec3, velocity: Vec3, t: f32) -> Vec3 {
        spawn + velocity * t - Vec3::Y * (0.5 * self.gravity * t * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use approx::assert_relative_eq;

    #[test]
    fn test_formula() {
        let v = TrajectorySolver::ballistic_velocity(
            Vec3::new(0.0, -0.5, -7.0),
            Vec3::new(1.5, -0.9, 2.5),
            1.0,
            2.0,
        );
        assert_relative_eq!(v.x, 1.5);
        assert_relative_eq!(v.y, 3.6, epsilon = 1e-5);
        assert_relative_eq!(v.z, 9.5);
    }

    #[test]
    fn test_consistent_pair_hits_target() {
        let solver = TrajectorySolver::new(9.8, 0.0);
        let spawn = Vec3::new(-1.0, 0.0, -5.0);
        let target = Vec3::new(1.0, -0.3, 2.0);
        let t = solver.flight_time_for_peak(2.0);
        assert_relative_eq!(solver.peak_for_flight_time(t), 2.0, epsilon = 1e-5);

        let v = TrajectorySolver::ballistic_velocity(spawn, target, t, 2.0);
        let landed = solver.position_at(spawn, v, t);
        assert!(landed.distance(target) < 1e-4);
    }

    #[test]
    fn test_jitter_is_bounded_and_horizontal() {
        let solver = TrajectorySolver::new(9.8, 0.1);
        let spawn = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, 5.0);
        let base = TrajectorySolver::ballistic_velocity(spawn, target, 1.0, 2.0);

        // Extremes of the [0, 1) source
        for value in [0.0, 0.999] {
            let mut rng = SequenceRandom::constant(value);
            let v = solver.plan(spawn, target, 1.0, 2.0, &mut rng);
            assert_eq!(v.y, base.y);
            assert!((v.x - base.x).abs() <= 0.1 + 1e-6);
            assert!((v.z - base.z).abs() <= 0.1 + 1e-6);
        }
    }
}
