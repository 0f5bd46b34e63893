//! Interleaved vertex/index buffers

use slash_math::Vec3;

use crate::error::{MeshError, Result};

/// Attribute layout of one interleaved vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// position(3) + normal(3)
    PositionNormal,
    /// position(3) + normal(3) + uv(2)
    PositionNormalUv,
}

impl VertexLayout {
    /// Floats per vertex
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            Self::PositionNormal => 6,
            Self::PositionNormalUv => 8,
        }
    }

    #[inline]
    pub const fn has_uv(self) -> bool {
        matches!(self, Self::PositionNormalUv)
    }
}

/// A triangle mesh as flat interleaved floats and `u32` indices
///
/// Construction validates the buffers, so every index held by a `MeshBuffer`
/// refers to an existing vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    layout: VertexLayout,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    /// Build from raw streams, validating lengths and indices
    pub fn new(layout: VertexLayout, vertices: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        Self::validate(layout, &vertices, &indices)?;
        Ok(Self { layout, vertices, indices })
    }

    /// A mesh with no vertices and no triangles
    pub fn empty(layout: VertexLayout) -> Self {
        Self {
            layout,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn validate(layout: VertexLayout, vertices: &[f32], indices: &[u32]) -> Result<()> {
        let stride = layout.stride();
        if vertices.len() % stride != 0 {
            return Err(MeshError::MisalignedVertexData { len: vertices.len(), stride });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::MisalignedIndexData(indices.len()));
        }
        let vertex_count = vertices.len() / stride;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count });
        }
        Ok(())
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.layout.stride()
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// No drawable triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw floats of vertex `i`
    #[inline]
    pub fn vertex(&self, i: usize) -> &[f32] {
        let stride = self.stride();
        &self.vertices[i * stride..(i + 1) * stride]
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        let v = self.vertex(i);
        Vec3::new(v[0], v[1], v[2])
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        let v = self.vertex(i);
        Vec3::new(v[3], v[4], v[5])
    }

    pub fn uv(&self, i: usize) -> Option<[f32; 2]> {
        if self.layout.has_uv() {
            let v = self.vertex(i);
            Some([v[6], v[7]])
        } else {
            None
        }
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Incremental mesh construction used by the shape generators
///
/// Indices handed out by [`MeshBuilder::vertex`] are always valid, so
/// [`MeshBuilder::build`] cannot fail.
#[derive(Debug)]
pub struct MeshBuilder {
    layout: VertexLayout,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new(layout: VertexLayout) -> Self {
        Self {
            layout,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        (self.vertices.len() / self.layout.stride()) as u32
    }

    /// Append a vertex and return its index; `uv` is dropped when the
    /// layout has no texcoords
    pub fn vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertex_count();
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
        if self.layout.has_uv() {
            self.vertices.extend_from_slice(&uv);
        }
        index
    }

    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!(a.max(b).max(c) < self.vertex_count());
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Emit a `(rows + 1) x (cols + 1)` vertex grid and its quads
    ///
    /// `surface(u, v)` returns position and normal for `u, v` in `[0, 1]`.
    /// Triangles wind counter-clockwise when `du x dv` points along the
    /// outward normal.
    pub fn grid<F>(&mut self, rows: u32, cols: u32, mut surface: F)
    where
        F: FnMut(f32, f32) -> (Vec3, Vec3),
    {
        let base = self.vertex_count();
        for row in 0..=rows {
            let v = row as f32 / rows as f32;
            for col in 0..=cols {
                let u = col as f32 / cols as f32;
                let (position, normal) = surface(u, v);
                self.vertex(position, normal, [u, v]);
            }
        }

        let ring = cols + 1;
        for row in 0..rows {
            for col in 0..cols {
                let a = base + row * ring + col;
                let b = a + 1;
                let c = a + ring;
                let d = c + 1;
                self.triangle(a, b, c);
                self.triangle(b, d, c);
            }
        }
    }

    pub fn build(self) -> MeshBuffer {
        debug_assert!(MeshBuffer::validate(self.layout, &self.vertices, &self.indices).is_ok());
        MeshBuffer {
            layout: self.layout,
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}
