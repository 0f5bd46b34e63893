//! Procedural meshes for each [`ObjectKind`]
//!
//! All shapes are centred on the local origin and sized to roughly fit the
//! 0.5-radius collision sphere at scale 1. Surfaces are built with
//! [`MeshBuilder::grid`], so every triangle winds counter-clockwise seen from
//! outside.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use slash_math::Vec3;

use crate::error::Result;
use crate::kind::ObjectKind;
use crate::mesh::{MeshBuffer, MeshBuilder, VertexLayout};
use crate::slice::{slice_mesh, CutPlane, FragmentSide};

/// Finite-difference step for surface normals
const NORMAL_STEP: f32 = 1e-3;

/// Generate the mesh for `kind`
///
/// For a fragment, pass the slice normal and side: the whole shape is cut by
/// a plane through its local origin and capped.
pub fn generate_mesh(kind: ObjectKind, fragment: Option<(Vec3, FragmentSide)>) -> Result<MeshBuffer> {
    let whole = match kind {
        ObjectKind::Banana => banana(),
        ObjectKind::Apple => apple(),
        ObjectKind::Pineapple => pineapple(),
        ObjectKind::Strawberry => strawberry(),
        ObjectKind::Orange => orange(),
        ObjectKind::Bomb => bomb(),
    };
    match fragment {
        None => Ok(whole),
        Some((normal, side)) => slice_mesh(&whole, &CutPlane::through_origin(normal, side)?),
    }
}

/// Surface of revolution around +Y
///
/// `profile(u, v)` returns `(radius, y)`; `v` runs from the top (0) to the
/// bottom (1). Normals come from central differences of the surface, with a
/// vertical fallback at the poles where the surface pinches to a point.
fn lathe<F>(b: &mut MeshBuilder, stacks: u32, slices: u32, profile: F)
where
    F: Fn(f32, f32) -> (f32, f32),
{
    let point = |u: f32, v: f32| {
        let (r, y) = profile(u, v.clamp(0.0, 1.0));
        let theta = u * TAU;
        Vec3::new(r * theta.cos(), y, r * theta.sin())
    };
    b.grid(stacks, slices, |u, v| {
        let p = point(u, v);
        let du = point(u + NORMAL_STEP, v) - point(u - NORMAL_STEP, v);
        let dv = point(u, v + NORMAL_STEP) - point(u, v - NORMAL_STEP);
        let mut n = du.cross(dv).normalize_or_zero();
        if n == Vec3::ZERO {
            n = if v < 0.5 { Vec3::Y } else { Vec3::NEG_Y };
        }
        (p, n)
    });
}

/// Upright tube from `y0` to `y1`, bent by `offset(t)` and tapered by
/// `radius(t)`; open at both ends
fn stalk<O, R>(b: &mut MeshBuilder, segments: u32, sides: u32, y0: f32, y1: f32, offset: O, radius: R)
where
    O: Fn(f32) -> Vec3,
    R: Fn(f32) -> f32,
{
    // v runs downward so du x dv points outward
    b.grid(segments, sides, |u, v| {
        let t = 1.0 - v;
        let angle = u * TAU;
        let ring = Vec3::new(angle.cos(), 0.0, angle.sin());
        let center = Vec3::new(0.0, y0 + (y1 - y0) * t, 0.0) + offset(t);
        let normal = (ring + Vec3::new(0.0, 0.2, 0.0)).normalize();
        (center + ring * radius(t), normal)
    });
}

/// Flat star-shaped fan facing up, used for leafy tops
fn star(b: &mut MeshBuilder, center: Vec3, points: u32, outer: f32, inner: f32) {
    let hub = b.vertex(center, Vec3::Y, [0.5, 0.5]);
    let count = points * 2;
    let rim: Vec<u32> = (0..count)
        .map(|k| {
            let angle = k as f32 / count as f32 * TAU;
            let r = if k % 2 == 0 { outer } else { inner };
            let p = center + Vec3::new(r * angle.cos(), -0.02 * (k % 2) as f32, r * angle.sin());
            b.vertex(p, Vec3::Y, [0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin()])
        })
        .collect();
    for k in 0..rim.len() {
        // Increasing angle winds clockwise seen from +Y
        b.triangle(hub, rim[(k + 1) % rim.len()], rim[k]);
    }
}

fn banana() -> MeshBuffer {
    const SEGMENTS: u32 = 12;
    const SIDES: u32 = 16;
    const LENGTH: f32 = 0.8;
    const RADIUS: f32 = 0.12;
    const ARC: f32 = PI * 0.75;

    let spine = |t: f32| {
        let a = t * ARC;
        Vec3::new(LENGTH * 0.5 * a.sin(), LENGTH * 0.5 * (1.0 - a.cos()), 0.0)
    };
    let middle = spine(0.5);

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);
    b.grid(SEGMENTS, SIDES, |u, v| {
        let a = v * ARC;
        // Frame perpendicular to the curved spine
        let outward = Vec3::new(-a.sin(), a.cos(), 0.0);
        let phi = u * TAU;
        let oval = 0.8 + 0.2 * phi.cos();
        let radius = RADIUS * (v * PI).sin();
        let dir = outward * phi.cos() + Vec3::Z * phi.sin();
        let offset = outward * (radius * oval * phi.cos()) + Vec3::Z * (radius * phi.sin());
        (spine(v) - middle + offset, dir.normalize())
    });
    b.build()
}

fn apple() -> MeshBuffer {
    const RADIUS: f32 = 0.45;
    const STRETCH: f32 = 1.1;

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);
    lathe(&mut b, 24, 36, |_, v| {
        let mut r = RADIUS;
        if v < 0.2 {
            r *= 0.9 + 0.1 * (v / 0.2);
        } else if v > 0.8 {
            r *= 0.98 - 0.08 * (v - 0.8) / 0.2;
        }
        if (0.3..=0.7).contains(&v) {
            r *= 1.0 + 0.08 * ((v - 0.3) / 0.4 * PI).sin();
        }
        let phi = v * PI;
        (r * phi.sin(), r * phi.cos() * STRETCH)
    });
    stalk(
        &mut b,
        8,
        8,
        RADIUS * 0.85,
        RADIUS * 0.85 + 0.18,
        |t| Vec3::new(0.15 * (t * FRAC_PI_2).sin(), 0.0, 0.0),
        |t| 0.025 * (1.0 - 0.3 * t),
    );
    b.build()
}

fn pineapple() -> MeshBuffer {
    const HEIGHT: f32 = 0.8;
    const RADIUS: f32 = 0.3;
    const CROWN: f32 = 0.4;
    const LEAVES: u32 = 16;
    const LEAF_STEPS: u32 = 4;

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);

    // v = 0 is the top, so the taper thresholds are mirrored
    lathe(&mut b, 16, 32, |u, v| {
        let from_bottom = 1.0 - v;
        let factor = if from_bottom < 0.2 {
            0.7 + 0.3 * (from_bottom / 0.2)
        } else if from_bottom > 0.8 {
            0.9 - 0.2 * (from_bottom - 0.8) / 0.2
        } else {
            1.0 + 0.05 * ((from_bottom - 0.2) / 0.6 * PI).sin()
        };
        let bump = 0.03 * (from_bottom * 40.0).sin() * (u * 40.0).sin();
        (RADIUS * factor + bump, HEIGHT * 0.5 - v * HEIGHT)
    });

    let top = HEIGHT * 0.5;
    let hub = b.vertex(Vec3::new(0.0, top, 0.0), Vec3::Y, [0.5, 0.5]);
    for i in 0..LEAVES {
        let angle = TAU * i as f32 / LEAVES as f32;
        let heading = angle + FRAC_PI_4 * 0.5 * ((i % 3) as f32 - 1.0);
        let base = Vec3::new(0.15 * angle.cos(), top, 0.15 * angle.sin());
        let lift = 0.7 + 0.6 * (i % 3) as f32 / 2.0;
        let tip = Vec3::new(
            base.x * 0.5 + 0.1 * heading.cos(),
            top + CROWN * lift,
            base.z * 0.5 + 0.1 * heading.sin(),
        );
        let across = Vec3::new((heading + FRAC_PI_2).cos(), 0.0, (heading + FRAC_PI_2).sin());
        let normal = across.cross(tip - base).normalize_or_zero();
        let normal = if normal.y < 0.0 { -normal } else { normal };

        let first = b.vertex_count();
        for j in 0..=LEAF_STEPS {
            let t = j as f32 / LEAF_STEPS as f32;
            let bend = across * (0.1 * (t * PI).sin());
            let mut p = base.lerp(tip, t) + bend;
            p.y = base.y + (tip.y - base.y) * t * t;
            let half_width = across * (0.06 * (1.0 - 0.8 * t));
            b.vertex(p - half_width, normal, [0.0, t]);
            b.vertex(p + half_width, normal, [1.0, t]);
        }
        for j in 0..LEAF_STEPS {
            let l0 = first + j * 2;
            let (r0, l1, r1) = (l0 + 1, l0 + 2, l0 + 3);
            b.triangle(l0, r0, l1);
            b.triangle(r0, r1, l1);
        }
        b.triangle(hub, first + 1, first);
    }
    b.build()
}

fn strawberry() -> MeshBuffer {
    const RADIUS: f32 = 0.34;
    const TOP: f32 = 0.26;
    const HEIGHT: f32 = 0.62;

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);
    lathe(&mut b, 20, 28, |_, v| {
        // Rounded shoulders, then a long taper to the tip
        let shoulder = (FRAC_PI_2 * (v / 0.15).min(1.0)).sin();
        let taper = (1.0 - v).powf(0.7);
        (RADIUS * shoulder * taper, TOP - v * HEIGHT)
    });
    star(&mut b, Vec3::new(0.0, TOP + 0.01, 0.0), 6, 0.2, 0.08);
    b.build()
}

fn orange() -> MeshBuffer {
    const RADIUS: f32 = 0.42;

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);
    lathe(&mut b, 20, 32, |_, v| {
        let phi = v * PI;
        (RADIUS * phi.sin(), RADIUS * 0.92 * phi.cos())
    });
    b.build()
}

fn bomb() -> MeshBuffer {
    const RADIUS: f32 = 0.4;

    let mut b = MeshBuilder::new(VertexLayout::PositionNormalUv);
    lathe(&mut b, 20, 28, |_, v| {
        let phi = v * PI;
        (RADIUS * phi.sin(), RADIUS * phi.cos())
    });
    stalk(
        &mut b,
        4,
        6,
        RADIUS - 0.02,
        RADIUS + 0.15,
        |t| Vec3::new(0.04 * t * t, 0.0, 0.0),
        |_| 0.03,
    );
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds_valid_mesh() {
        for kind in ObjectKind::ALL {
            let mesh = generate_mesh(kind, None).unwrap();
            assert!(!mesh.is_empty(), "{kind} produced no triangles");
            assert_eq!(mesh.layout(), VertexLayout::PositionNormalUv);
            assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
            for i in 0..mesh.vertex_count() {
                assert!(mesh.position(i).is_finite());
                let n = mesh.normal(i).length();
                assert!((n - 1.0).abs() < 1e-3, "{kind} vertex {i} normal length {n}");
            }
        }
    }

    #[test]
    fn test_shapes_are_roughly_collision_sized() {
        for kind in ObjectKind::ALL {
            let mesh = generate_mesh(kind, None).unwrap();
            let r = (0..mesh.vertex_count()).map(|i| mesh.position(i).length()).fold(0.0, f32::max);
            assert!(r > 0.2 && r < 1.0, "{kind} radius {r}");
        }
    }

    #[test]
    fn test_banana_ring_size() {
        let mesh = generate_mesh(ObjectKind::Banana, None).unwrap();
        assert_eq!(mesh.vertex_count(), 13 * 17);
        assert_eq!(mesh.triangle_count(), 12 * 16 * 2);
    }

    #[test]
    fn test_lathe_normals_point_outward() {
        let mesh = generate_mesh(ObjectKind::Orange, None).unwrap();
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i);
            if p.length() > 0.1 {
                assert!(mesh.normal(i).dot(p) > 0.0);
            }
        }
    }

    #[test]
    fn test_fragment_mesh_is_half() {
        for kind in ObjectKind::ALL {
            let whole = generate_mesh(kind, None).unwrap();
            let half = generate_mesh(kind, Some((Vec3::X, FragmentSide::Positive))).unwrap();
            assert!(half.vertex_count() < whole.vertex_count());
            assert!(!half.is_empty(), "{kind} half is empty");
        }
    }

    #[test]
    fn test_fragment_with_zero_normal_errors() {
        assert!(generate_mesh(ObjectKind::Apple, Some((Vec3::ZERO, FragmentSide::Negative))).is_err());
    }
}
