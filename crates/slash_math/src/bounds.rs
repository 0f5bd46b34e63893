//! Bounding volumes used for the blade test

use crate::vector::Vec3;

/// Bounding sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Lowest and highest Y covered by the sphere
    #[inline]
    pub fn vertical_extent(&self) -> (f32, f32) {
        (self.center.y - self.radius, self.center.y + self.radius)
    }

}

/// Upright (Y-axis aligned) cylinder, centered on `center`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cylinder {
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Cylinder {
    #[inline]
    pub const fn new(center: Vec3, radius: f32, height: f32) -> Self {
        Self { center, radius, height }
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Lowest and highest Y covered by the cylinder
    #[inline]
    pub fn vertical_extent(&self) -> (f32, f32) {
        let half = self.half_height();
        (self.center.y - half, self.center.y + half)
    }

    /// Point on the side surface at `theta` radians around the axis and
    /// `y` above the center
    pub fn surface_point(&self, theta: f32, y: f32) -> Vec3 {
        self.center + Vec3::new(self.radius * theta.cos(), y, self.radius * theta.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_vertical_extent() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.25);
        assert_eq!(sphere.vertical_extent(), (0.75, 1.25));
    }

    #[test]
    fn test_cylinder_surface_point() {
        let cyl = Cylinder::new(Vec3::new(0.0, -0.5, 2.5), 1.5, 2.0);
        let p = cyl.surface_point(0.0, 0.25);
        assert_relative_eq!(p.x, 1.5);
        assert_relative_eq!(p.y, -0.25);
        assert_relative_eq!(p.z, 2.5);
        assert_relative_eq!((p - cyl.center).horizontal_length(), 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_cylinder_vertical_extent() {
        let cyl = Cylinder::new(Vec3::new(0.0, 1.0, 0.0), 0.05, 0.5);
        assert_eq!(cyl.half_height(), 0.25);
        assert_eq!(cyl.vertical_extent(), (0.75, 1.25));
    }
}
