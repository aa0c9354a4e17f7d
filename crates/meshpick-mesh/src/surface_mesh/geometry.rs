//! Geometry computation methods for surface meshes.
//!
//! Normals are computed on demand rather than cached, so they always follow
//! the current positions.

use glam::Vec3;
use meshpick_core::Plane3;

use super::SurfaceMesh;
use crate::handle::Face;

impl SurfaceMesh {
    /// Computes the unit normal of a face with Newell's method.
    ///
    /// Works for non-planar and non-convex polygons; returns zero for a
    /// degenerate face.
    pub fn compute_face_normal(&self, face: Face) -> Vec3 {
        let mut normal = Vec3::ZERO;
        for h in self.face_halfedges(face) {
            let p = self.position(self.from_vertex(h));
            let q = self.position(self.to_vertex(h));
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
        }
        normal.normalize_or_zero()
    }

    /// Average of the face's vertex positions.
    pub fn face_centroid(&self, face: Face) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;
        for v in self.face_vertices(face) {
            sum += self.position(v);
            count += 1;
        }
        sum / count.max(1) as f32
    }

    /// Supporting plane of a face: through its first boundary vertex, with the
    /// computed face normal.
    pub fn face_plane(&self, face: Face) -> Plane3 {
        let origin = self.position(self.to_vertex(self.halfedge(face)));
        Plane3::new(origin, self.compute_face_normal(face))
    }

    /// Axis-aligned bounding box of all vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}
