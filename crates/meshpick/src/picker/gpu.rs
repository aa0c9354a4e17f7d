//! Color-ID face picking.

use glam::Vec2;
use meshpick_core::{decode_triangle_id, PickError, Projection, Result};
use meshpick_mesh::{
    face_of_triangle, SurfaceMesh, TriangleDrawable, TriangleRange, TRIANGLE_RANGE_PROPERTY,
};
use meshpick_render::RenderError;

use super::{cpu, FaceHit, SurfaceMeshPicker};

fn render_error(err: RenderError) -> PickError {
    PickError::Render(err.to_string())
}

impl SurfaceMeshPicker {
    /// Renders the triangle IDs, reads the pixel under `screen` and maps the
    /// decoded triangle back to its face.
    ///
    /// `ProgramUnavailable` is the only error the caller treats as permanent.
    pub(super) fn try_pick_face_gpu<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Result<Option<FaceHit>> {
        let rasterizer = self
            .rasterizer
            .as_deref_mut()
            .ok_or_else(|| PickError::ProgramUnavailable("no ID rasterizer attached".into()))?;
        rasterizer
            .prepare_program()
            .map_err(|e| PickError::ProgramUnavailable(e.to_string()))?;

        if mesh.is_empty() || !camera.contains(screen) {
            return Ok(None);
        }

        let viewport = camera.viewport_size();
        rasterizer
            .ensure_target(viewport.x, viewport.y)
            .map_err(render_error)?;

        let transient;
        let drawable = if let Some(drawable) = mesh.triangles_drawable() {
            drawable
        } else {
            log::debug!("mesh has no triangle drawable; triangulating for this pick");
            transient = TriangleDrawable::from_mesh(mesh).0;
            &transient
        };
        rasterizer
            .draw_triangle_ids(drawable, camera.view_projection_matrix())
            .map_err(render_error)?;

        let (x, y) = (screen.x as u32, screen.y as u32);
        let row = rasterizer.row_origin().storage_row(y, viewport.y);
        let color = rasterizer.read_pixel(x, row).map_err(render_error)?;

        let Some(triangle) = decode_triangle_id(color) else {
            return Ok(None);
        };

        let ranges = mesh
            .face_property::<TriangleRange>(TRIANGLE_RANGE_PROPERTY)
            .ok_or_else(|| PickError::MissingProperty(TRIANGLE_RANGE_PROPERTY.to_string()))?;

        let Some(face) = face_of_triangle(ranges, triangle) else {
            log::debug!("triangle {triangle} belongs to no face");
            return Ok(None);
        };

        Ok(Some(FaceHit {
            face,
            point: cpu::face_point(mesh, camera, face, screen),
        }))
    }
}
