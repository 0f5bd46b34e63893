//! # slash_math - Vector math for the Slash simulation
//!
//! Small, copyable vector types and the bounding volumes the blade test needs.
//! No SIMD, no matrices: bodies only translate, and rotation is decorative.

pub mod vector;
pub mod bounds;
pub mod intersect;

pub use vector::*;
pub use bounds::*;
pub use intersect::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
}

/// Wrap an angle in degrees into `[0, 360)`
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3};
    pub use crate::bounds::{Cylinder, Sphere};
    pub use crate::intersect::{planar_distance, sphere_cylinder_overlap, vertical_overlap};
    pub use crate::wrap_degrees;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(wrap_degrees(370.0), 10.0, epsilon = 1e-4);
        assert_relative_eq!(wrap_degrees(-90.0), 270.0, epsilon = 1e-4);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }
}
