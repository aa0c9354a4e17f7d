//! Rendering backend for meshpick.
//!
//! This crate provides:
//! - [`Camera`], the concrete [`Projection`](meshpick_core::Projection) used
//!   by the pickers
//! - The [`IdRasterizer`] seam between the GPU picker and a graphics backend
//! - [`PickTarget`], the wgpu implementation (offscreen `Rgba8Unorm` target,
//!   WGSL triangle ID shader, single pixel readback)

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod camera;
pub mod error;
pub mod pick_target;
pub mod rasterizer;
pub mod shader;

pub use camera::{Camera, ProjectionMode};
pub use error::{RenderError, RenderResult};
pub use pick_target::{PickTarget, PickUniforms};
pub use rasterizer::{IdRasterizer, RowOrigin};
pub use shader::{ShaderBuilder, ShaderProgram};
