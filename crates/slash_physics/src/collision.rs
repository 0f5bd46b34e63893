//! Body vs. blade tests

use slash_math::{sphere_cylinder_overlap, Cylinder, Vec3};

use crate::blade::BladeVolume;
use crate::body::PhysicsBody;
use crate::config::SliceConfig;

/// Bounding-volume test of `body` against a blade cylinder
///
/// Inactive bodies never intersect.
pub fn intersects(body: &PhysicsBody, blade_radius: f32, blade_height: f32, blade_position: Vec3) -> bool {
    debug_assert!(blade_radius >= 0.0 && blade_height >= 0.0);
    if !body.is_active() {
        return false;
    }
    let blade = Cylinder::new(blade_position, blade_radius, blade_height);
    sphere_cylinder_overlap(&body.bounding_sphere(), &blade)
}

/// Decides which bodies the blade cuts
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionDetector {
    max_generation: Option<u32>,
}

impl CollisionDetector {
    pub fn new(max_generation: Option<u32>) -> Self {
        Self { max_generation }
    }

    pub fn from_config(config: &SliceConfig) -> Self {
        Self::new(config.max_generation)
    }

    /// Whether `body` can still be cut at all
    pub fn is_sliceable(&self, body: &PhysicsBody) -> bool {
        match self.max_generation {
            Some(cap) => body.generation < cap,
            None => true,
        }
    }

    /// Whether the blade cuts `body` this tick
    pub fn test(&self, body: &PhysicsBody, blade: &BladeVolume) -> bool {
        blade.is_present()
            && self.is_sliceable(body)
            && intersects(body, blade.radius(), blade.height(), blade.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BladeConfig;
    use slash_mesh::ObjectKind;

    fn body_at(position: Vec3) -> PhysicsBody {
        PhysicsBody::new(ObjectKind::Orange, position, Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_hit_and_miss() {
        assert!(intersects(&body_at(Vec3::ZERO), 0.05, 0.3, Vec3::ZERO));
        // Planar distance 0.6 > 0.55
        assert!(!intersects(&body_at(Vec3::new(0.6, 0.0, 0.0)), 0.05, 0.3, Vec3::ZERO));
    }

    #[test]
    fn test_inactive_never_hits() {
        let mut body = body_at(Vec3::ZERO);
        body.deactivate();
        assert!(!intersects(&body, 0.05, 0.3, Vec3::ZERO));
    }

    #[test]
    fn test_vertical_gap_misses() {
        // Sphere spans [0.5, 1.5], blade spans [-0.15, 0.15]
        assert!(!intersects(&body_at(Vec3::new(0.0, 1.0, 0.0)), 0.05, 0.3, Vec3::ZERO));
    }

    #[test]
    fn test_detector_needs_blade() {
        let detector = CollisionDetector::default();
        let mut blade = BladeVolume::new(&BladeConfig::default());
        let body = body_at(Vec3::ZERO);
        assert!(!detector.test(&body, &blade));
        blade.move_to(Vec3::ZERO);
        assert!(detector.test(&body, &blade));
    }

    #[test]
    fn test_generation_cap() {
        let detector = CollisionDetector::new(Some(2));
        let mut blade = BladeVolume::new(&BladeConfig::default());
        blade.move_to(Vec3::ZERO);

        let mut body = body_at(Vec3::ZERO);
        body.generation = 1;
        assert!(detector.test(&body, &blade));
        body.generation = 2;
        assert!(!detector.test(&body, &blade));

        let unbounded = CollisionDetector::new(None);
        body.generation = 50;
        assert!(unbounded.test(&body, &blade));
    }
}
