//! Surface mesh for meshpick.
//!
//! This crate provides the mesh collaborator the pickers work against:
//! - [`SurfaceMesh`], a half-edge polygon mesh with [`Face`], [`Vertex`] and
//!   [`Halfedge`] handles
//! - Typed per-face properties
//! - The fan-triangulated [`TriangleDrawable`] and its per-face
//!   [`TriangleRange`] mapping

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod drawable;
pub mod error;
pub mod handle;
pub mod properties;
pub mod surface_mesh;

pub use drawable::{face_of_triangle, TriangleDrawable, TriangleRange, TRIANGLE_RANGE_PROPERTY};
pub use error::{MeshError, MeshResult};
pub use handle::{Face, Halfedge, Vertex};
pub use properties::{PropertyArray, PropertyStore};
pub use surface_mesh::{FaceHalfedges, SurfaceMesh};
