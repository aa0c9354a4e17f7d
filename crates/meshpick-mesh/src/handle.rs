//! Index handles for mesh elements.
//!
//! Handles are plain indices into the mesh's arrays. A handle that is
//! "not there" is expressed as `Option<Face>` etc. rather than a sentinel.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw index.
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            pub const fn index(self) -> u32 {
                self.0
            }

            /// Returns the index as `usize` for array access.
            pub const fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl From<$name> for u32 {
            fn from(handle: $name) -> u32 {
                handle.0
            }
        }
    };
}

define_handle!(
    /// A vertex of a [`SurfaceMesh`](crate::SurfaceMesh).
    Vertex
);

define_handle!(
    /// A half-edge of a [`SurfaceMesh`](crate::SurfaceMesh).
    Halfedge
);

define_handle!(
    /// A face of a [`SurfaceMesh`](crate::SurfaceMesh).
    Face
);

impl Halfedge {
    /// The other half of the same edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Index of the undirected edge this half-edge belongs to.
    pub const fn edge_index(self) -> u32 {
        self.0 >> 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_pairs() {
        assert_eq!(Halfedge::new(4).opposite(), Halfedge::new(5));
        assert_eq!(Halfedge::new(5).opposite(), Halfedge::new(4));
        assert_eq!(Halfedge::new(4).edge_index(), Halfedge::new(5).edge_index());
    }

    #[test]
    fn test_index_accessors() {
        let f = Face::new(7);
        assert_eq!(f.index(), 7);
        assert_eq!(f.idx(), 7_usize);
        assert_eq!(u32::from(f), 7);
    }
}
