//! # slash_mesh - Object meshes for Slash
//!
//! Pure geometry, no graphics API:
//!
//! - [`MeshBuffer`]: interleaved position/normal(/uv) floats plus triangle indices
//! - [`ObjectKind`]: the closed set of things that get thrown at the player
//! - [`generate_mesh`]: procedural shape per kind, optionally already cut
//! - [`slice_mesh`]: keep one side of a [`CutPlane`] and cap the hole
//! - [`MeshCache`]: shared whole meshes, one per kind
//!
//! ```ignore
//! use slash_mesh::prelude::*;
//!
//! let apple = generate_mesh(ObjectKind::Apple, None)?;
//! let plane = CutPlane::through_origin(Vec3::X, FragmentSide::Positive)?;
//! let half = slice_mesh(&apple, &plane)?;
//! assert!(half.vertex_count() < apple.vertex_count());
//! ```

pub mod cache;
pub mod error;
pub mod kind;
pub mod mesh;
pub mod shapes;
pub mod slice;

pub mod prelude {
    pub use crate::cache::{MeshCache, MeshCacheStats};
    pub use crate::error::{MeshError, Result};
    pub use crate::kind::ObjectKind;
    pub use crate::mesh::{MeshBuffer, MeshBuilder, VertexLayout};
    pub use crate::shapes::generate_mesh;
    pub use crate::slice::{partition, slice_mesh, CutPlane, FragmentSide, Partition, CUT_EPSILON};
    pub use slash_math::Vec3;
}

pub use prelude::*;
