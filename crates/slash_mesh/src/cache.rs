//! Shared whole-object meshes
//!
//! Whole meshes depend only on the kind, so each is generated once and
//! handed out as an `Arc`. Fragment meshes are unique per cut and are built
//! from whatever mesh the parent currently has.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::kind::ObjectKind;
use crate::mesh::MeshBuffer;
use crate::shapes::generate_mesh;
use crate::slice::{slice_mesh, CutPlane};

/// Cache of whole meshes keyed by kind
#[derive(Debug, Default)]
pub struct MeshCache {
    whole: HashMap<ObjectKind, Arc<MeshBuffer>>,
    hits: u64,
    misses: u64,
    fragments_built: u64,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole mesh for `kind`, generated on first use
    pub fn whole(&mut self, kind: ObjectKind) -> Result<Arc<MeshBuffer>> {
        if let Some(mesh) = self.whole.get(&kind) {
            self.hits += 1;
            return Ok(Arc::clone(mesh));
        }
        self.misses += 1;
        let mesh = Arc::new(generate_mesh(kind, None)?);
        debug!(
            "generated {} mesh: {} vertices, {} triangles",
            kind,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.whole.insert(kind, Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Cut `parent` and return the capped half; never cached
    pub fn fragment(&mut self, parent: &MeshBuffer, plane: &CutPlane) -> Result<Arc<MeshBuffer>> {
        self.fragments_built += 1;
        Ok(Arc::new(slice_mesh(parent, plane)?))
    }

    pub fn stats(&self) -> MeshCacheStats {
        MeshCacheStats {
            mesh_count: self.whole.len(),
            vertex_count: self.whole.values().map(|m| m.vertex_count() as u64).sum(),
            triangle_count: self.whole.values().map(|m| m.triangle_count() as u64).sum(),
            hits: self.hits,
            misses: self.misses,
            fragments_built: self.fragments_built,
        }
    }
}

/// Mesh cache statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshCacheStats {
    /// Number of cached whole meshes
    pub mesh_count: usize,
    /// Total vertex count of cached meshes
    pub vertex_count: u64,
    /// Total triangle count of cached meshes
    pub triangle_count: u64,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to generate
    pub misses: u64,
    /// Fragment meshes built so far
    pub fragments_built: u64,
}
