//! Kinematic bodies

use slash_core::Handle;
use slash_math::{wrap_degrees, Sphere, Vec3};
use slash_mesh::{FragmentSide, ObjectKind};

use crate::config::{PhysicsConfig, VelocityLimits};

/// Handle to a body in the world
pub type BodyHandle = Handle<PhysicsBody>;

/// Collision sphere radius at scale 1
pub const BODY_RADIUS: f32 = 0.5;

/// Which half of which cut a fragment is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInfo {
    pub side: FragmentSide,
    /// Unit normal of the plane that produced this fragment
    pub slice_normal: Vec3,
}

/// Why a body stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// Fell below the floor
    BelowFloor,
    /// Crossed the player plane
    PastPlayer,
    /// Has no geometry left
    Inert,
}

/// One flying object or fragment
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub kind: ObjectKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Degrees in `[0, 360)`; decorative only
    pub rotation_angle: f32,
    /// Fixed at creation; decorative only
    pub rotation_axis: Vec3,
    pub scale: f32,
    /// Set for bodies produced by a slice
    pub fragment: Option<FragmentInfo>,
    /// 0 for spawned bodies, parent + 1 for fragments
    pub generation: u32,
    active: bool,
    inert: bool,
    age: f32,
}

impl PhysicsBody {
    /// A whole, freshly launched body
    pub fn new(kind: ObjectKind, position: Vec3, velocity: Vec3, rotation_axis: Vec3) -> Self {
        Self {
            kind,
            position,
            velocity,
            rotation_angle: 0.0,
            rotation_axis: rotation_axis.normalize_or_zero(),
            scale: 1.0,
            fragment: None,
            generation: 0,
            active: true,
            inert: false,
            age: 0.0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_fragment(&self) -> bool {
        self.fragment.is_some()
    }

    pub fn fragment_side(&self) -> Option<FragmentSide> {
        self.fragment.map(|f| f.side)
    }

    pub fn slice_normal(&self) -> Option<Vec3> {
        self.fragment.map(|f| f.slice_normal)
    }

    /// Seconds since creation
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Once false, stays false
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Mark as having no geometry; deactivates on the next tick
    pub fn mark_inert(&mut self) {
        self.inert = true;
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Velocity caps for this body's class
    pub fn limits(&self, physics: &PhysicsConfig) -> VelocityLimits {
        if self.is_fragment() {
            physics.fragment_limits
        } else {
            physics.default_limits
        }
    }

    pub fn clamp_velocity(&mut self, physics: &PhysicsConfig) {
        self.velocity = self.limits(physics).clamp(self.velocity);
    }

    /// Add `impulse` to the velocity and re-apply the caps
    pub fn apply_impulse(&mut self, impulse: Vec3, physics: &PhysicsConfig) {
        self.velocity += impulse;
        self.clamp_velocity(physics);
    }

    /// Bounding sphere used against the blade
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.position, BODY_RADIUS * self.scale)
    }

    /// Advance by `dt` seconds
    ///
    /// Explicit Euler: position first, then gravity, then the caps. Returns
    /// the reason when this tick deactivated the body. No-op when inactive.
    pub fn tick(&mut self, dt: f32, physics: &PhysicsConfig) -> Option<Deactivation> {
        if !self.active {
            return None;
        }
        debug_assert!(dt.is_finite() && dt >= 0.0, "bad timestep {dt}");

        if self.inert {
            self.active = false;
            return Some(Deactivation::Inert);
        }

        self.position += self.velocity * dt;
        self.velocity.y -= physics.gravity * dt;
        self.clamp_velocity(physics);
        self.rotation_angle = wrap_degrees(self.rotation_angle + physics.spin_rate_deg * dt);
        self.age += dt;

        let reason = if self.position.y < physics.floor_y {
            Deactivation::BelowFloor
        } else if self.position.z > physics.player_plane_z {
            Deactivation::PastPlayer
        } else {
            return None;
        };
        self.active = false;
        Some(reason)
    }
}
