//! Plane slicing with cut-face capping
//!
//! Vertices are classified against the plane, survivors are copied through an
//! old-to-new index remap, and only triangles whose three corners all survive
//! are kept. Triangles straddling the plane are dropped rather than clipped,
//! which leaves a ragged open rim. That rim is closed with a fan around its
//! centroid, facing into the cut.

use std::collections::BTreeSet;

use log::warn;
use slash_math::Vec3;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshBuffer, MeshBuilder};

/// Vertices this far behind the plane still count as kept
pub const CUT_EPSILON: f32 = 0.001;

/// Which half of a cut solid a fragment keeps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FragmentSide {
    /// Half the plane normal points into
    Positive,
    /// The other half
    Negative,
}

impl FragmentSide {
    pub const BOTH: [FragmentSide; 2] = [Self::Positive, Self::Negative];

    /// `+1.0` or `-1.0`
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// A slicing plane plus the side being kept
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutPlane {
    point: Vec3,
    normal: Vec3,
    side: FragmentSide,
}

impl CutPlane {
    /// Build a plane; `normal` is normalized and must not be zero
    pub fn new(point: Vec3, normal: Vec3, side: FragmentSide) -> Result<Self> {
        let len = normal.length();
        if !(len > f32::EPSILON) || !len.is_finite() {
            return Err(MeshError::DegenerateNormal);
        }
        Ok(Self {
            point,
            normal: normal / len,
            side,
        })
    }

    /// Plane through a mesh's local origin, as used for fragments
    pub fn through_origin(normal: Vec3, side: FragmentSide) -> Result<Self> {
        Self::new(Vec3::ZERO, normal, side)
    }

    #[inline]
    pub fn point(&self) -> Vec3 {
        self.point
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn side(&self) -> FragmentSide {
        self.side
    }

    /// Signed distance to the plane, positive on the kept side
    #[inline]
    pub fn classify(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal) * self.side.sign()
    }

    #[inline]
    pub fn keeps(&self, p: Vec3) -> bool {
        self.classify(p) >= -CUT_EPSILON
    }

    /// Normal of the synthesized cut face
    #[inline]
    pub fn cap_normal(&self) -> Vec3 {
        -self.normal * self.side.sign()
    }
}

/// How a mesh splits against a [`CutPlane`]
#[derive(Clone, Debug, Default)]
pub struct Partition {
    /// Old vertex index to new index, `None` for dropped vertices
    pub remap: Vec<Option<u32>>,
    /// Surviving triangles, already remapped
    pub kept_triangles: Vec<[u32; 3]>,
    /// Distinct surviving vertices (old indices) that share a triangle with
    /// a dropped vertex, in ascending index order
    pub boundary: Vec<u32>,
}

/// Classify vertices and triangles without building any geometry
pub fn partition(mesh: &MeshBuffer, plane: &CutPlane) -> Partition {
    let mut remap = Vec::with_capacity(mesh.vertex_count());
    let mut next = 0u32;
    for i in 0..mesh.vertex_count() {
        if plane.keeps(mesh.position(i)) {
            remap.push(Some(next));
            next += 1;
        } else {
            remap.push(None);
        }
    }

    let mut kept_triangles = Vec::new();
    let mut boundary = BTreeSet::new();
    for tri in mesh.triangles() {
        let mapped = tri.map(|i| remap[i as usize]);
        match mapped {
            [Some(a), Some(b), Some(c)] => kept_triangles.push([a, b, c]),
            [None, None, None] => {}
            _ => {
                for (old, new) in tri.iter().zip(mapped) {
                    if new.is_some() {
                        boundary.insert(*old);
                    }
                }
            }
        }
    }

    Partition {
        remap,
        kept_triangles,
        boundary: boundary.into_iter().collect(),
    }
}

/// Keep the side of `mesh` selected by `plane` and cap the opening
///
/// The output has at most `input triangles + boundary vertices` triangles.
/// A plane that keeps nothing yields an empty mesh with the same layout.
pub fn slice_mesh(mesh: &MeshBuffer, plane: &CutPlane) -> Result<MeshBuffer> {
    let parts = partition(mesh, plane);
    let mut builder = MeshBuilder::new(mesh.layout());

    for (old, new) in parts.remap.iter().enumerate() {
        if new.is_some() {
            let uv = mesh.uv(old).unwrap_or([0.0, 0.0]);
            builder.vertex(mesh.position(old), mesh.normal(old), uv);
        }
    }
    if builder.vertex_count() == 0 {
        warn!("cut plane {:?} keeps no vertices, fragment mesh is empty", plane.normal());
        return Ok(MeshBuffer::empty(mesh.layout()));
    }

    for [a, b, c] in &parts.kept_triangles {
        builder.triangle(*a, *b, *c);
    }

    if parts.boundary.len() >= 3 {
        cap(mesh, plane, &parts, &mut builder);
    }

    Ok(builder.build())
}

/// Fan-triangulate the open rim around its centroid
fn cap(mesh: &MeshBuffer, plane: &CutPlane, parts: &Partition, builder: &mut MeshBuilder) {
    let centroid = parts
        .boundary
        .iter()
        .fold(Vec3::ZERO, |acc, &i| acc + mesh.position(i as usize))
        / parts.boundary.len() as f32;

    // In-plane basis with axis_u x axis_v == normal
    let axis_u = plane.normal().any_orthonormal();
    let axis_v = plane.normal().cross(axis_u);

    let mut rim: Vec<(f32, u32)> = parts
        .boundary
        .iter()
        .filter_map(|&old| {
            let d = mesh.position(old as usize) - centroid;
            let new = parts.remap[old as usize]?;
            Some((d.dot(axis_v).atan2(d.dot(axis_u)), new))
        })
        .collect();
    rim.sort_by(|a, b| a.0.total_cmp(&b.0));

    let center = builder.vertex(centroid, plane.cap_normal(), [0.5, 0.5]);
    let flip = plane.side() == FragmentSide::Positive;
    for k in 0..rim.len() {
        let a = rim[k].1;
        let b = rim[(k + 1) % rim.len()].1;
        // Ascending angle winds around +normal; the cap faces the other way
        // on the positive side
        if flip {
            builder.triangle(center, b, a);
        } else {
            builder.triangle(center, a, b);
        }
    }
}
