//! Error types for mesh construction and slicing

use thiserror::Error;

/// Mesh errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Vertex stream is not a whole number of vertices
    #[error("Vertex data length {len} is not a multiple of stride {stride}")]
    MisalignedVertexData { len: usize, stride: usize },

    /// Index stream is not a whole number of triangles
    #[error("Index count {0} is not a multiple of 3")]
    MisalignedIndexData(usize),

    /// Triangle references a vertex that does not exist
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Cut plane normal has zero (or non-finite) length
    #[error("Cut plane normal is degenerate")]
    DegenerateNormal,
}

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
