//! The offscreen ID rasterizer the GPU picker draws into.

use glam::Mat4;
use meshpick_mesh::TriangleDrawable;

use crate::error::RenderResult;

/// Where row 0 of a render target lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Row 0 is the top row (wgpu, Vulkan, Metal, D3D).
    TopLeft,
    /// Row 0 is the bottom row (OpenGL-style framebuffers).
    BottomLeft,
}

impl RowOrigin {
    /// Converts a screen row (0 at the top) into a storage row of a target
    /// `height` pixels tall.
    #[must_use]
    pub fn storage_row(self, screen_row: u32, height: u32) -> u32 {
        match self {
            RowOrigin::TopLeft => screen_row,
            RowOrigin::BottomLeft => height.saturating_sub(1).saturating_sub(screen_row),
        }
    }
}

/// Renders per-triangle ID colors offscreen and reads single pixels back.
///
/// The pick pass is self-contained: implementations must not disturb any
/// render state the host application relies on.
pub trait IdRasterizer: Send {
    /// Compiles the flat-color pick program. Idempotent; only the first
    /// successful call does any work.
    fn prepare_program(&mut self) -> RenderResult<()>;

    /// Creates the color and depth target, or resizes it when the viewport
    /// changed.
    fn ensure_target(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Sets the clear color. It must decode to a negative index.
    fn set_background(&mut self, color: [u8; 4]);

    /// Clears the target to the background color and draws every triangle
    /// of `drawable` with its index encoded as an RGBA color. Blocks until the
    /// GPU has finished.
    fn draw_triangle_ids(&mut self, drawable: &TriangleDrawable, view_proj: Mat4)
        -> RenderResult<()>;

    /// Reads one RGBA pixel. `row` is in the target's own storage order.
    fn read_pixel(&mut self, x: u32, row: u32) -> RenderResult<[u8; 4]>;

    /// Row order of the target.
    fn row_origin(&self) -> RowOrigin;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_storage_row() {
        assert_eq!(RowOrigin::TopLeft.storage_row(0, 10), 0);
        assert_eq!(RowOrigin::TopLeft.storage_row(9, 10), 9);
        assert_eq!(RowOrigin::BottomLeft.storage_row(0, 10), 9);
        assert_eq!(RowOrigin::BottomLeft.storage_row(9, 10), 0);
        assert_eq!(RowOrigin::BottomLeft.storage_row(3, 10), 6);
    }

    proptest! {
        #[test]
        fn prop_bottom_left_flip_is_involution(height in 1u32..4096, seed in any::<u32>()) {
            let row = seed % height;
            let stored = RowOrigin::BottomLeft.storage_row(row, height);
            prop_assert!(stored < height);
            prop_assert_eq!(RowOrigin::BottomLeft.storage_row(stored, height), row);
        }
    }
}
