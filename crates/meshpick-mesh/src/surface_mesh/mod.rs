//! Half-edge surface mesh.
//!
//! Faces are arbitrary simple polygons. Half-edges are stored in opposite
//! pairs (`h` and `h ^ 1`), so every edge owns exactly two consecutive
//! half-edge slots and `opposite` needs no lookup.

mod geometry;

use std::collections::HashMap;
use std::fmt::Debug;

use glam::Vec3;

use crate::drawable::{TriangleDrawable, TriangleRange, TRIANGLE_RANGE_PROPERTY};
use crate::error::{MeshError, MeshResult};
use crate::handle::{Face, Halfedge, Vertex};
use crate::properties::PropertyStore;

#[derive(Debug, Clone, Copy)]
struct HalfedgeData {
    /// Vertex this half-edge points to.
    to: Vertex,
    next: Halfedge,
    prev: Halfedge,
    /// Incident face, `None` on the boundary.
    face: Option<Face>,
}

/// A polygonal surface mesh with half-edge connectivity.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    positions: Vec<Vec3>,
    /// One outgoing half-edge per vertex (`None` for isolated vertices).
    vertex_halfedges: Vec<Option<Halfedge>>,
    halfedges: Vec<HalfedgeData>,
    face_halfedges: Vec<Halfedge>,
    face_properties: PropertyStore,
    drawable: Option<TriangleDrawable>,
}

impl SurfaceMesh {
    /// Builds a mesh from vertex positions and polygon faces.
    ///
    /// Each face lists its vertex indices in counter-clockwise order.
    /// Triangles have 3 indices, quads have 4, etc.
    pub fn from_polygons(positions: Vec<Vec3>, faces: &[Vec<u32>]) -> MeshResult<Self> {
        let num_vertices = positions.len();
        let mut mesh = Self {
            vertex_halfedges: vec![None; num_vertices],
            positions,
            halfedges: Vec::new(),
            face_halfedges: Vec::with_capacity(faces.len()),
            face_properties: PropertyStore::new(faces.len()),
            drawable: None,
        };

        // Undirected edge (min, max) -> half-edge pointing min -> max.
        let mut edge_map: HashMap<(u32, u32), Halfedge> = HashMap::new();

        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: fi,
                    valence: face.len(),
                });
            }
            if let Some(&vertex) = face.iter().find(|&&v| v as usize >= num_vertices) {
                return Err(MeshError::VertexOutOfRange {
                    face: fi,
                    vertex,
                    num_vertices,
                });
            }

            let face_handle = Face::new(fi as u32);
            let mut loop_halfedges = Vec::with_capacity(face.len());

            for (i, &from) in face.iter().enumerate() {
                let to = face[(i + 1) % face.len()];
                if from == to {
                    return Err(MeshError::SelfLoop {
                        face: fi,
                        vertex: from,
                    });
                }

                let h = mesh.find_or_create_halfedge(&mut edge_map, from, to);
                if mesh.halfedges[h.idx()].face.is_some() {
                    return Err(MeshError::NonManifoldEdge { from, to });
                }
                mesh.halfedges[h.idx()].face = Some(face_handle);
                if mesh.vertex_halfedges[from as usize].is_none() {
                    mesh.vertex_halfedges[from as usize] = Some(h);
                }
                loop_halfedges.push(h);
            }

            let n = loop_halfedges.len();
            for i in 0..n {
                let h = loop_halfedges[i];
                mesh.halfedges[h.idx()].next = loop_halfedges[(i + 1) % n];
                mesh.halfedges[h.idx()].prev = loop_halfedges[(i + n - 1) % n];
            }
            mesh.face_halfedges.push(loop_halfedges[0]);
        }

        mesh.link_boundary();
        Ok(mesh)
    }

    /// Builds a pure triangle mesh.
    pub fn from_triangles(positions: Vec<Vec3>, triangles: &[[u32; 3]]) -> MeshResult<Self> {
        let faces: Vec<Vec<u32>> = triangles.iter().map(|t| t.to_vec()).collect();
        Self::from_polygons(positions, &faces)
    }

    fn find_or_create_halfedge(
        &mut self,
        edge_map: &mut HashMap<(u32, u32), Halfedge>,
        from: u32,
        to: u32,
    ) -> Halfedge {
        let key = (from.min(to), from.max(to));
        let forward = *edge_map.entry(key).or_insert_with(|| {
            let h = Halfedge::new(self.halfedges.len() as u32);
            let (a, b) = (Vertex::new(key.0), Vertex::new(key.1));
            self.halfedges.push(HalfedgeData {
                to: b,
                next: h,
                prev: h,
                face: None,
            });
            self.halfedges.push(HalfedgeData {
                to: a,
                next: h.opposite(),
                prev: h.opposite(),
                face: None,
            });
            h
        });
        if from < to {
            forward
        } else {
            forward.opposite()
        }
    }

    /// Chains boundary half-edges into loops and makes boundary vertices
    /// point at their outgoing boundary half-edge.
    fn link_boundary(&mut self) {
        let mut outgoing_boundary: HashMap<Vertex, Halfedge> = HashMap::new();
        for h in self.halfedges() {
            if self.is_boundary(h) {
                outgoing_boundary.insert(self.from_vertex(h), h);
            }
        }
        for h in self.halfedges() {
            if !self.is_boundary(h) {
                continue;
            }
            if let Some(&next) = outgoing_boundary.get(&self.to_vertex(h)) {
                self.halfedges[h.idx()].next = next;
                self.halfedges[next.idx()].prev = h;
            }
        }
        for (&v, &h) in &outgoing_boundary {
            self.vertex_halfedges[v.idx()] = Some(h);
        }
    }

    // === Counts and iteration ===

    /// Returns the number of vertices.
    pub fn n_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of faces.
    pub fn n_faces(&self) -> usize {
        self.face_halfedges.len()
    }

    /// Returns the number of half-edges (twice the number of edges).
    pub fn n_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Returns true if the mesh has no faces.
    pub fn is_empty(&self) -> bool {
        self.face_halfedges.is_empty()
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face> + Clone {
        (0..self.n_faces() as u32).map(Face::new)
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Vertex> + Clone {
        (0..self.n_vertices() as u32).map(Vertex::new)
    }

    /// Iterates over all half-edges.
    pub fn halfedges(&self) -> impl ExactSizeIterator<Item = Halfedge> + Clone {
        (0..self.n_halfedges() as u32).map(Halfedge::new)
    }

    /// Returns true if the face handle refers to a face of this mesh.
    pub fn is_valid_face(&self, face: Face) -> bool {
        face.idx() < self.n_faces()
    }

    // === Positions ===

    /// Returns the position of a vertex.
    pub fn position(&self, v: Vertex) -> Vec3 {
        self.positions[v.idx()]
    }

    /// Returns all vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Moves a vertex. The cached triangle drawable becomes stale and is
    /// dropped; call [`update_triangles_drawable`](Self::update_triangles_drawable)
    /// again before GPU picking.
    pub fn set_position(&mut self, v: Vertex, position: Vec3) {
        self.positions[v.idx()] = position;
        self.drawable = None;
    }

    // === Connectivity ===

    /// Returns one half-edge of the face's boundary loop.
    pub fn halfedge(&self, face: Face) -> Halfedge {
        self.face_halfedges[face.idx()]
    }

    /// Returns an outgoing half-edge of the vertex, if it is not isolated.
    pub fn vertex_halfedge(&self, v: Vertex) -> Option<Halfedge> {
        self.vertex_halfedges[v.idx()]
    }

    /// Vertex the half-edge points to.
    pub fn to_vertex(&self, h: Halfedge) -> Vertex {
        self.halfedges[h.idx()].to
    }

    /// Vertex the half-edge starts from.
    pub fn from_vertex(&self, h: Halfedge) -> Vertex {
        self.to_vertex(h.opposite())
    }

    /// Next half-edge along the same face (or boundary) loop.
    pub fn next_halfedge(&self, h: Halfedge) -> Halfedge {
        self.halfedges[h.idx()].next
    }

    /// Previous half-edge along the same face (or boundary) loop.
    pub fn prev_halfedge(&self, h: Halfedge) -> Halfedge {
        self.halfedges[h.idx()].prev
    }

    /// Incident face, `None` for boundary half-edges.
    pub fn face(&self, h: Halfedge) -> Option<Face> {
        self.halfedges[h.idx()].face
    }

    /// Returns true if the half-edge has no incident face.
    pub fn is_boundary(&self, h: Halfedge) -> bool {
        self.halfedges[h.idx()].face.is_none()
    }

    /// Circulates the half-edges bounding a face, starting at
    /// [`halfedge`](Self::halfedge).
    pub fn face_halfedges(&self, face: Face) -> FaceHalfedges<'_> {
        let start = self.halfedge(face);
        FaceHalfedges {
            mesh: self,
            start,
            current: Some(start),
        }
    }

    /// Circulates the vertices of a face (the target of each boundary
    /// half-edge).
    pub fn face_vertices(&self, face: Face) -> impl Iterator<Item = Vertex> + '_ {
        self.face_halfedges(face).map(|h| self.to_vertex(h))
    }

    /// Number of vertices of a face.
    pub fn valence(&self, face: Face) -> usize {
        self.face_halfedges(face).count()
    }

    // === Face properties ===

    /// Adds a per-face property filled with `default`, or returns the
    /// existing one of the same name and type.
    pub fn add_face_property<T>(&mut self, name: &str, default: T) -> MeshResult<&mut [T]>
    where
        T: Clone + Send + Sync + Debug + 'static,
    {
        self.face_properties.add(name, default)
    }

    /// Returns a per-face property, if it exists with this type.
    pub fn face_property<T: 'static>(&self, name: &str) -> Option<&[T]> {
        self.face_properties.get(name)
    }

    /// Returns a per-face property mutably.
    pub fn face_property_mut<T: 'static>(&mut self, name: &str) -> Option<&mut [T]> {
        self.face_properties.get_mut(name)
    }

    /// Removes a per-face property. Returns true if it existed.
    pub fn remove_face_property(&mut self, name: &str) -> bool {
        self.face_properties.remove(name)
    }

    /// Returns true if a per-face property with this name exists.
    pub fn has_face_property(&self, name: &str) -> bool {
        self.face_properties.contains(name)
    }

    // === Triangulated proxy ===

    /// Returns the cached triangle drawable, if it has been built.
    pub fn triangles_drawable(&self) -> Option<&TriangleDrawable> {
        self.drawable.as_ref()
    }

    /// Rebuilds the triangle drawable and the `"f:triangle_range"` face
    /// property that maps each face to its block of triangles.
    pub fn update_triangles_drawable(&mut self) -> MeshResult<&TriangleDrawable> {
        let (drawable, ranges) = TriangleDrawable::from_mesh(self);
        log::debug!(
            "triangulated {} faces into {} triangles",
            self.n_faces(),
            drawable.num_triangles()
        );

        let property = self.add_face_property(TRIANGLE_RANGE_PROPERTY, TriangleRange::default())?;
        property.copy_from_slice(&ranges);

        Ok(self.drawable.insert(drawable))
    }
}

/// Iterator over the boundary half-edges of one face.
pub struct FaceHalfedges<'a> {
    mesh: &'a SurfaceMesh,
    start: Halfedge,
    current: Option<Halfedge>,
}

impl Iterator for FaceHalfedges<'_> {
    type Item = Halfedge;

    fn next(&mut self) -> Option<Halfedge> {
        let h = self.current?;
        let next = self.mesh.next_halfedge(h);
        self.current = (next != self.start).then_some(next);
        Some(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceMesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        SurfaceMesh::from_polygons(positions, &[vec![0, 1, 2, 3]]).expect("valid quad")
    }

    #[test]
    fn test_quad_counts() {
        let mesh = quad();
        assert_eq!(mesh.n_vertices(), 4);
        assert_eq!(mesh.n_faces(), 1);
        assert_eq!(mesh.n_edges(), 4);
        assert_eq!(mesh.n_halfedges(), 8);
        assert_eq!(mesh.valence(Face::new(0)), 4);
    }

    #[test]
    fn test_face_circulation_order() {
        let mesh = quad();
        let f = Face::new(0);
        let froms: Vec<u32> = mesh
            .face_halfedges(f)
            .map(|h| mesh.from_vertex(h).index())
            .collect();
        assert_eq!(froms, vec![0, 1, 2, 3]);
        let tos: Vec<u32> = mesh.face_vertices(f).map(Vertex::index).collect();
        assert_eq!(tos, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_shared_edge_is_linked() {
        // Two triangles sharing edge 1-2.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let mesh = SurfaceMesh::from_triangles(positions, &[[0, 1, 2], [2, 1, 3]]).expect("valid");
        assert_eq!(mesh.n_edges(), 5);

        let shared = mesh
            .face_halfedges(Face::new(0))
            .find(|&h| mesh.from_vertex(h).index() == 1)
            .expect("half-edge 1 -> 2");
        assert_eq!(mesh.face(shared), Some(Face::new(0)));
        assert_eq!(mesh.face(shared.opposite()), Some(Face::new(1)));
    }

    #[test]
    fn test_boundary_loop() {
        let mesh = quad();
        let boundary: Vec<Halfedge> = mesh.halfedges().filter(|&h| mesh.is_boundary(h)).collect();
        assert_eq!(boundary.len(), 4);

        // Walking `next` from a boundary half-edge stays on the boundary and
        // returns to the start after four steps.
        let start = boundary[0];
        let mut h = start;
        for _ in 0..4 {
            h = mesh.next_halfedge(h);
            assert!(mesh.is_boundary(h));
            assert_eq!(mesh.prev_halfedge(mesh.next_halfedge(h)), h);
        }
        assert_eq!(h, start);
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let positions = vec![Vec3::ZERO, Vec3::X];
        let err = SurfaceMesh::from_polygons(positions, &[vec![0, 1]]).unwrap_err();
        assert_eq!(err, MeshError::DegenerateFace { face: 0, valence: 2 });
    }

    #[test]
    fn test_rejects_out_of_range_vertex() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let err = SurfaceMesh::from_triangles(positions, &[[0, 1, 5]]).unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { vertex: 5, .. }));
    }

    #[test]
    fn test_rejects_non_manifold_edge() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        // Both faces use the directed edge 0 -> 1.
        let err = SurfaceMesh::from_triangles(positions, &[[0, 1, 2], [0, 1, 3]]).unwrap_err();
        assert_eq!(err, MeshError::NonManifoldEdge { from: 0, to: 1 });
    }

    #[test]
    fn test_rejects_self_loop() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let err = SurfaceMesh::from_polygons(positions, &[vec![0, 1, 1, 2]]).unwrap_err();
        assert_eq!(err, MeshError::SelfLoop { face: 0, vertex: 1 });
    }

    #[test]
    fn test_update_triangles_drawable_sets_ranges() {
        let mut mesh = quad();
        assert!(mesh.triangles_drawable().is_none());
        assert!(mesh.face_property::<TriangleRange>(TRIANGLE_RANGE_PROPERTY).is_none());

        let num_triangles = mesh.update_triangles_drawable().expect("drawable").num_triangles();
        assert_eq!(num_triangles, 2);

        let ranges = mesh
            .face_property::<TriangleRange>(TRIANGLE_RANGE_PROPERTY)
            .expect("range property");
        assert_eq!(ranges, &[TriangleRange::new(0, 1)]);
    }

    #[test]
    fn test_set_position_drops_drawable() {
        let mut mesh = quad();
        mesh.update_triangles_drawable().expect("drawable");
        mesh.set_position(Vertex::new(2), Vec3::new(2.0, 2.0, 0.0));
        assert!(mesh.triangles_drawable().is_none());
        // The range property survives; only the geometry changed.
        assert!(mesh.has_face_property(TRIANGLE_RANGE_PROPERTY));
    }
}
