//! Vertex and edge refinement of a picked face.
//!
//! The candidate is chosen in 3D, nearest to the face pick's hit point, and
//! then accepted only if its projection lies within `hit_resolution` pixels
//! of the click.

use glam::Vec2;
use meshpick_core::{Projection, Result, Segment2, Segment3};
use meshpick_mesh::{Face, Halfedge, SurfaceMesh, Vertex};

use super::SurfaceMeshPicker;

impl SurfaceMeshPicker {
    /// Picks the vertex of `face` under `screen`.
    ///
    /// `face` must be the face returned by the last face pick.
    pub fn pick_vertex<P: Projection + ?Sized>(
        &self,
        mesh: &SurfaceMesh,
        camera: &P,
        face: Face,
        screen: Vec2,
    ) -> Option<Vertex> {
        self.refine_vertex(mesh, camera, face, screen)
            .unwrap_or_else(|err| {
                log::error!("{err}");
                None
            })
    }

    /// Picks the half-edge of `face` under `screen`.
    ///
    /// `face` must be the face returned by the last face pick.
    pub fn pick_edge<P: Projection + ?Sized>(
        &self,
        mesh: &SurfaceMesh,
        camera: &P,
        face: Face,
        screen: Vec2,
    ) -> Option<Halfedge> {
        self.refine_edge(mesh, camera, face, screen)
            .unwrap_or_else(|err| {
                log::error!("{err}");
                None
            })
    }

    /// Picks a face under `screen`, then the vertex of that face.
    pub fn pick_vertex_at<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Option<Vertex> {
        let face = self.pick_face(mesh, camera, screen)?;
        self.pick_vertex(mesh, camera, face, screen)
    }

    /// Picks a face under `screen`, then the half-edge of that face.
    pub fn pick_edge_at<P: Projection + ?Sized>(
        &mut self,
        mesh: &SurfaceMesh,
        camera: &P,
        screen: Vec2,
    ) -> Option<Halfedge> {
        let face = self.pick_face(mesh, camera, screen)?;
        self.pick_edge(mesh, camera, face, screen)
    }

    fn refine_vertex<P: Projection + ?Sized>(
        &self,
        mesh: &SurfaceMesh,
        camera: &P,
        face: Face,
        screen: Vec2,
    ) -> Result<Option<Vertex>> {
        let hit = self.session_hit(mesh, face)?;

        let closest = mesh.face_vertices(face).min_by(|&a, &b| {
            let da = mesh.position(a).distance_squared(hit.point);
            let db = mesh.position(b).distance_squared(hit.point);
            da.total_cmp(&db)
        });
        let Some(vertex) = closest else {
            return Ok(None);
        };

        let distance = camera.project(mesh.position(vertex)).distance(screen);
        Ok((distance < self.options.hit_resolution).then_some(vertex))
    }

    fn refine_edge<P: Projection + ?Sized>(
        &self,
        mesh: &SurfaceMesh,
        camera: &P,
        face: Face,
        screen: Vec2,
    ) -> Result<Option<Halfedge>> {
        let hit = self.session_hit(mesh, face)?;
        let epsilon = self.options.degenerate_edge_epsilon;

        let closest = mesh
            .face_halfedges(face)
            .filter_map(|h| {
                let s = mesh.position(mesh.from_vertex(h));
                let t = mesh.position(mesh.to_vertex(h));
                // Skip edges between duplicated vertices.
                (s.distance_squared(t) > epsilon)
                    .then(|| (h, Segment3::new(s, t).squared_distance(hit.point)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((halfedge, _)) = closest else {
            return Ok(None);
        };

        let s = camera.project(mesh.position(mesh.from_vertex(halfedge)));
        let t = camera.project(mesh.position(mesh.to_vertex(halfedge)));
        let distance = Segment2::new(s, t).squared_distance(screen).sqrt();
        Ok((distance < self.options.hit_resolution).then_some(halfedge))
    }
}
