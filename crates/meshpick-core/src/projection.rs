//! Screen ↔ world conversion.
//!
//! Screen coordinates are in pixels with the origin at the top-left corner of
//! the viewport and y growing downwards, as delivered by window mouse events.
//! Depth follows wgpu's NDC convention: 0 on the near plane, 1 on the far
//! plane.

use glam::{UVec2, Vec2, Vec3, Vec4};

use crate::geometry::{Line3, OrientedLine3};

/// The camera collaborator the pickers need.
///
/// Implementors supply the viewport size and the combined
/// model-view-projection matrix; projection and unprojection are derived from
/// those.
pub trait Projection {
    /// Viewport size in pixels.
    fn viewport_size(&self) -> UVec2;

    /// Combined model-view-projection matrix.
    fn view_projection_matrix(&self) -> glam::Mat4;

    /// Projects a world-space point to screen pixels.
    ///
    /// Points at or behind the eye have no screen position and project to
    /// NaN, so any distance measured against them compares false.
    fn project(&self, world: Vec3) -> Vec2 {
        let size = self.viewport_size().as_vec2();
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return Vec2::NAN;
        }
        let ndc = clip.truncate() / clip.w;
        Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }

    /// Unprojects a screen point at the given depth fraction (0 = near,
    /// 1 = far) back to world space.
    fn unproject(&self, screen: Vec2, depth: f32) -> Vec3 {
        let size = self.viewport_size().as_vec2().max(Vec2::ONE);
        let ndc_x = screen.x / size.x * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / size.y * 2.0;

        let inv_view_proj = self.view_projection_matrix().inverse();
        let p = inv_view_proj * Vec4::new(ndc_x, ndc_y, depth, 1.0);
        p.truncate() / p.w
    }

    /// Returns true if `screen` lies inside the viewport.
    fn contains(&self, screen: Vec2) -> bool {
        let size = self.viewport_size().as_vec2();
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x < size.x && screen.y < size.y
    }
}

/// The picking ray through a screen point, from the near to the far plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Point on the near plane.
    pub near: Vec3,
    /// Point on the far plane.
    pub far: Vec3,
}

impl PickRay {
    /// Builds the ray under `screen` for the given projection.
    pub fn from_screen<P: Projection + ?Sized>(projection: &P, screen: Vec2) -> Self {
        Self {
            near: projection.unproject(screen, 0.0),
            far: projection.unproject(screen, 1.0),
        }
    }

    /// The ray as an oriented line (near → far).
    #[must_use]
    pub fn oriented_line(&self) -> OrientedLine3 {
        OrientedLine3::new(self.near, self.far)
    }

    /// The ray as an infinite line through the same points.
    #[must_use]
    pub fn line(&self) -> Line3 {
        Line3::from_two_points(self.near, self.far)
    }

    /// Returns true if the ray's points are finite and distinct.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.near.is_finite() && self.far.is_finite() && self.near != self.far
    }
}
