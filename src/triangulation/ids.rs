//! Stable handles for the three entity arenas and the rings.
//!
//! Every cross-reference between vertices, edges and triangles is one of
//! these ids, never a pointer; slots are not reused, so an id stays valid
//! (or becomes detectably dead) for the lifetime of a run.

/// Stable key of a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) u64);

/// Stable key of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u64);

/// Stable key of a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub(crate) u64);

/// Ring index: 0 is the outer boundary, 1.. are holes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingId(pub(crate) u32);

impl VertexId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl TriangleId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl RingId {
    /// The outer boundary ring.
    pub const OUTER: RingId = RingId(0);

    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_outer(self) -> bool {
        self.0 == 0
    }
}
