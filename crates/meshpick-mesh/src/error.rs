//! Mesh construction errors.

use thiserror::Error;

/// Errors raised while building or annotating a [`SurfaceMesh`](crate::SurfaceMesh).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// A face has fewer than three vertices.
    #[error("face {face} has {valence} vertices, at least 3 are required")]
    DegenerateFace { face: usize, valence: usize },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex}, but the mesh has {num_vertices} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        num_vertices: usize,
    },

    /// A face repeats the same vertex on two consecutive corners.
    #[error("face {face} has a zero-length edge at vertex {vertex}")]
    SelfLoop { face: usize, vertex: u32 },

    /// A directed edge is already used by another face.
    #[error("edge {from} -> {to} is used by more than one face")]
    NonManifoldEdge { from: u32, to: u32 },

    /// A property with this name exists with a different element type.
    #[error("property '{0}' already exists with a different type")]
    PropertyTypeMismatch(String),
}

/// A specialized Result type for mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;
