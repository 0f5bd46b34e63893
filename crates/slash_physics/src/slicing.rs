//! Splitting bodies into fragments
//!
//! Slicing happens in two steps. [`SlicingEngine::slice`] deactivates the
//! original and produces the two fragment bodies right away. Their meshes are
//! cut later, when the world inserts them, through
//! [`SlicingEngine::fragment_mesh`].

use std::sync::Arc;

use log::{debug, warn};
use slash_math::Vec3;
use slash_mesh::{CutPlane, FragmentSide, MeshBuffer, MeshCache};

use crate::body::{FragmentInfo, PhysicsBody};
use crate::config::{SliceConfig, VelocityLimits};
use crate::random::RandomSource;

/// Axis used when the slice normal collapses
pub const FALLBACK_NORMAL: Vec3 = Vec3::X;

/// Produces fragments from sliced bodies
#[derive(Debug, Clone)]
pub struct SlicingEngine {
    config: SliceConfig,
    limits: VelocityLimits,
}

impl SlicingEngine {
    /// `limits` are the fragment velocity caps
    pub fn new(config: SliceConfig, limits: VelocityLimits) -> Self {
        Self { config, limits }
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Unit normal for a cut through a body moving with `velocity`
    ///
    /// Cross product of the motion direction and a random direction. Falls
    /// back to [`FALLBACK_NORMAL`] when the two are (nearly) parallel or the
    /// body is at rest.
    pub fn slice_normal(&self, velocity: Vec3, rng: &mut dyn RandomSource) -> Vec3 {
        let helper = rng.unit_vector();
        let n = velocity.normalize_or_zero().cross(helper);
        let len = n.length();
        if len < self.config.normal_epsilon || !len.is_finite() {
            warn!("slice normal degenerated (|n| = {len}), using fallback axis");
            return FALLBACK_NORMAL;
        }
        n / len
    }

    /// Cut `body` along a random plane
    ///
    /// Returns `None` when `body` is already inactive.
    pub fn slice(&self, body: &mut PhysicsBody, rng: &mut dyn RandomSource) -> Option<[PhysicsBody; 2]> {
        if !body.is_active() {
            return None;
        }
        let normal = self.slice_normal(body.velocity, rng);
        self.slice_with_normal(body, normal, rng)
    }

    /// Cut `body` along a plane through its position with the given normal
    ///
    /// Deactivates `body` and returns the positive-side fragment first.
    /// A zero `normal` is replaced by [`FALLBACK_NORMAL`].
    pub fn slice_with_normal(
        &self,
        body: &mut PhysicsBody,
        normal: Vec3,
        rng: &mut dyn RandomSource,
    ) -> Option<[PhysicsBody; 2]> {
        if !body.is_active() {
            return None;
        }
        let normal = match normal.normalize_or_zero() {
            n if n == Vec3::ZERO => {
                warn!("zero slice normal supplied, using fallback axis");
                FALLBACK_NORMAL
            }
            n => n,
        };
        body.deactivate();

        let fragments = [
            self.fragment(body, normal, FragmentSide::Positive, rng),
            self.fragment(body, normal, FragmentSide::Negative, rng),
        ];
        debug!(
            "sliced {} (gen {}) at {:?} along {:?}",
            body.kind, body.generation, body.position, normal
        );
        Some(fragments)
    }

    fn fragment(
        &self,
        parent: &PhysicsBody,
        normal: Vec3,
        side: FragmentSide,
        rng: &mut dyn RandomSource,
    ) -> PhysicsBody {
        let push = normal * side.sign();
        let lateral = self.config.lateral_impulse.sample(rng);
        let upward = self.config.upward_impulse.sample(rng);
        let velocity = parent.velocity + push * lateral + Vec3::Y * upward;

        let mut fragment = PhysicsBody::new(
            parent.kind,
            parent.position + push * self.config.separation,
            self.limits.clamp(velocity),
            rng.unit_vector(),
        );
        fragment.rotation_angle = parent.rotation_angle;
        fragment.scale = parent.scale * self.config.fragment_scale;
        fragment.generation = parent.generation + 1;
        fragment.fragment = Some(FragmentInfo { side, slice_normal: normal });
        fragment
    }

    /// Plane that cuts a fragment's mesh, in the mesh's local frame
    pub fn cut_plane(info: &FragmentInfo) -> slash_mesh::Result<CutPlane> {
        CutPlane::through_origin(info.slice_normal, info.side)
    }

    /// Cut the parent's current mesh for `fragment`
    ///
    /// An empty result marks the fragment inert so it drops out next tick.
    /// Whole bodies get their shared mesh unchanged.
    pub fn fragment_mesh(
        &self,
        cache: &mut MeshCache,
        parent_mesh: &Arc<MeshBuffer>,
        fragment: &mut PhysicsBody,
    ) -> slash_mesh::Result<Arc<MeshBuffer>> {
        let Some(info) = fragment.fragment else {
            return Ok(Arc::clone(parent_mesh));
        };
        let mesh = cache.fragment(parent_mesh, &Self::cut_plane(&info)?)?;
        if mesh.is_empty() {
            warn!("{} fragment kept no geometry, marking inert", fragment.kind);
            fragment.mark_inert();
        }
        Ok(mesh)
    }
}
