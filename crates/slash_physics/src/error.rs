//! Error types for the simulation

use slash_mesh::MeshError;
use thiserror::Error;

use crate::body::BodyHandle;

/// Simulation errors
///
/// Degenerate numerics are never errors: a collapsed slice normal falls back
/// to a fixed axis and an empty fragment mesh just makes the fragment inert.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Handle does not refer to a live body
    #[error("Body not found: {0}")]
    BodyNotFound(BodyHandle),

    /// Slicing requires an active body
    #[error("Body {0} is inactive and cannot be sliced")]
    BodyInactive(BodyHandle),

    /// Invalid configuration
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(String),

    /// Mesh generation or slicing failed
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
