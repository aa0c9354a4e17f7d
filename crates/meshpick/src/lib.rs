//! meshpick: resolve a screen position to a face, vertex or edge of a polygon
//! mesh.
//!
//! Two face picking strategies share one result model:
//!
//! - **GPU**: the mesh's fan-triangulated proxy is rendered offscreen with every
//!   triangle colored by its index, one pixel is read back and decoded, and
//!   the triangle is mapped back to its polygon through the
//!   `"f:triangle_range"` face property.
//! - **CPU**: a ray is cast through the screen point and tested against every
//!   face in parallel; the nearest plane intersection wins.
//!
//! If the GPU pick program cannot be created, the picker falls back to the
//! CPU strategy for the rest of its lifetime. Vertex and edge picks refine the
//! face found by the previous face pick.
//!
//! # Quick Start
//!
//! ```no_run
//! use meshpick::*;
//!
//! let positions = vec![
//!     Vec3::new(-1.0, -1.0, 0.0),
//!     Vec3::new(1.0, -1.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(-1.0, 1.0, 0.0),
//! ];
//! let mesh = SurfaceMesh::from_polygons(positions, &[vec![0, 1, 2, 3]]).unwrap();
//! let camera = Camera::new(800, 600);
//!
//! let mut picker = SurfaceMeshPicker::cpu_only();
//! if let Some(face) = picker.pick_face(&mesh, &camera, Vec2::new(400.0, 300.0)) {
//!     println!("picked {face:?} at {:?}", picker.picked_point());
//! }
//! ```

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod picker;

pub use picker::{FaceHit, SurfaceMeshPicker};

// Re-export core types
pub use meshpick_core::{
    decode_triangle_id, index_to_rgba, rgba_to_index, Mat4, PickError, PickOptions, PickRay,
    PickStrategy, Projection, Result, UVec2, Vec2, Vec3, Vec4, BACKGROUND_COLOR,
};

// Re-export mesh types
pub use meshpick_mesh::{
    face_of_triangle, Face, Halfedge, MeshError, SurfaceMesh, TriangleDrawable, TriangleRange,
    Vertex, TRIANGLE_RANGE_PROPERTY,
};

// Re-export render types
pub use meshpick_render::{
    Camera, IdRasterizer, PickTarget, ProjectionMode, RenderError, RenderResult, RowOrigin,
};
