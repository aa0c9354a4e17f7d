//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// Pipeline creation failed.
    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),

    /// The pick program has not been prepared.
    #[error("pick program not prepared")]
    ProgramNotReady,

    /// The offscreen target has not been created.
    #[error("pick target not created")]
    TargetNotReady,

    /// A pixel outside the target was requested.
    #[error("pixel ({x}, {row}) outside {width}x{height} target")]
    PixelOutOfBounds {
        /// Column.
        x: u32,
        /// Row in the target's storage order.
        row: u32,
        /// Target width.
        width: u32,
        /// Target height.
        height: u32,
    },

    /// Mapping the staging buffer failed.
    #[error("readback failed: {0}")]
    ReadbackFailed(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
