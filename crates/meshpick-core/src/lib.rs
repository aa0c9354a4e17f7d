//! Core abstractions for meshpick.
//!
//! This crate provides the rendering-independent pieces shared by the pickers:
//! - [`geometry`]: planes, lines, oriented lines and segments
//! - [`Projection`] trait for screen ↔ world conversion
//! - The integer ↔ RGBA pick color codec
//! - [`PickOptions`] configuration and the [`PickError`] type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pick colors are built from masked bytes
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod geometry;
pub mod options;
pub mod pick;
pub mod projection;

pub use error::{PickError, Result};
pub use geometry::{Line3, OrientedLine3, Plane3, Segment2, Segment3};
pub use options::{PickOptions, DEFAULT_DEGENERATE_EDGE_EPSILON, DEFAULT_HIT_RESOLUTION};
pub use pick::{decode_triangle_id, index_to_rgba, rgba_to_index, PickStrategy, BACKGROUND_COLOR};
pub use projection::{PickRay, Projection};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
