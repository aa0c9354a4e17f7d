//! Triangulated draw proxy of a polygon mesh.
//!
//! The GPU picker rasterizes triangles, not polygons. Every face is fan
//! triangulated into `valence - 2` triangles stored back to back, and the
//! `"f:triangle_range"` face property records which block of triangle indices
//! came from which face.

use glam::Vec3;

use crate::handle::Face;
use crate::surface_mesh::SurfaceMesh;

/// Name of the face property holding each face's [`TriangleRange`].
pub const TRIANGLE_RANGE_PROPERTY: &str = "f:triangle_range";

/// Closed interval `[first, last]` of triangle indices produced by one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriangleRange {
    /// First triangle index (inclusive).
    pub first: u32,
    /// Last triangle index (inclusive).
    pub last: u32,
}

impl TriangleRange {
    /// Creates the range `[first, last]`.
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Returns true if `triangle` lies in the range.
    pub const fn contains(&self, triangle: u32) -> bool {
        triangle >= self.first && triangle <= self.last
    }

    /// Number of triangles in the range.
    pub const fn len(&self) -> u32 {
        self.last - self.first + 1
    }
}

/// Flattened triangle list, three vertices per triangle, no index buffer.
///
/// Triangle `i` occupies vertices `3i..3i+3`, so a shader can recover the
/// triangle index as `vertex_index / 3`.
#[derive(Debug, Clone, Default)]
pub struct TriangleDrawable {
    vertices: Vec<[f32; 3]>,
}

impl TriangleDrawable {
    /// Fan triangulates every face of `mesh`.
    ///
    /// For a face with vertices [v0, v1, v2, v3, ...], creates triangles:
    /// [v0, v1, v2], [v0, v2, v3], [v0, v3, v4], ...
    /// Returns the drawable and one triangle range per face.
    pub fn from_mesh(mesh: &SurfaceMesh) -> (Self, Vec<TriangleRange>) {
        let mut vertices = Vec::new();
        let mut ranges = Vec::with_capacity(mesh.n_faces());

        for face in mesh.faces() {
            let corners: Vec<Vec3> = mesh.face_vertices(face).map(|v| mesh.position(v)).collect();
            let first = (vertices.len() / 3) as u32;
            for i in 1..corners.len() - 1 {
                vertices.push(corners[0].to_array());
                vertices.push(corners[i].to_array());
                vertices.push(corners[i + 1].to_array());
            }
            let end = (vertices.len() / 3) as u32;
            ranges.push(TriangleRange::new(first, end - 1));
        }

        (Self { vertices }, ranges)
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw vertex positions, ready for upload to a vertex buffer.
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            Vec3::from_array(self.vertices[base]),
            Vec3::from_array(self.vertices[base + 1]),
            Vec3::from_array(self.vertices[base + 2]),
        ]
    }

    /// Iterates over the corner positions of all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.num_triangles()).map(|i| self.triangle(i))
    }
}

/// Resolves a proxy triangle index to the face it was generated from.
///
/// Meshes are most often pure triangle meshes, so the face with the same
/// index is checked first; otherwise every face's range is scanned.
pub fn face_of_triangle(ranges: &[TriangleRange], triangle: u32) -> Option<Face> {
    if let Some(range) = ranges.get(triangle as usize) {
        if range.contains(triangle) {
            return Some(Face::new(triangle));
        }
    }

    ranges
        .iter()
        .position(|range| range.contains(triangle))
        .map(|i| Face::new(i as u32))
}
