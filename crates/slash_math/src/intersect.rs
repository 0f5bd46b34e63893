//! Overlap tests between bounding volumes
//!
//! The blade test is deliberately coarse: a body is a sphere, the blade is an
//! upright cylinder, and the two overlap when both the planar (X/Z) and the
//! vertical conditions hold.

use crate::bounds::{Cylinder, Sphere};
use crate::vector::Vec3;

/// Distance between two points projected onto the X/Z plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).horizontal_length()
}

/// Whether the closed ranges `[a_low, a_high]` and `[b_low, b_high]` overlap
#[inline]
pub fn vertical_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Sphere vs. upright cylinder
///
/// The planar check runs first and short-circuits; it is exact for the
/// cylinder's side but treats the caps as if they were infinitely wide, so
/// grazing hits near the rim count.
pub fn sphere_cylinder_overlap(sphere: &Sphere, cylinder: &Cylinder) -> bool {
    if planar_distance(sphere.center, cylinder.center) > cylinder.radius + sphere.radius {
        return false;
    }
    vertical_overlap(sphere.vertical_extent(), cylinder.vertical_extent())
}
