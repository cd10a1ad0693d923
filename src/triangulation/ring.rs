//! One polygon ring: its vertex list and the weighted selector over its
//! boundary edges.

use crate::selection::SelectionTree;
use crate::triangulation::ids::{EdgeId, VertexId};

pub(crate) struct Ring {
    /// Target number of vertices for this ring.
    pub(crate) target: usize,
    /// Vertices in insertion order. Only the initial construction order is
    /// meaningful; after insertions the cyclic order follows the vertices'
    /// `to_next` pointers.
    pub(crate) vertices: Vec<VertexId>,
    /// Selector over this ring's polygon edges, weighted by length.
    pub(crate) edges: SelectionTree<EdgeId>,
}

impl Ring {
    pub(crate) fn new(target: usize, weighted: bool) -> Self {
        Self {
            target,
            vertices: Vec::with_capacity(target),
            edges: SelectionTree::new(weighted),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex by index with wrap-around, so `-1`-style accesses from the
    /// initial builder can use `n - 1` and `i % n` uniformly.
    #[inline]
    pub(crate) fn vertex(&self, i: usize) -> VertexId {
        self.vertices[i % self.vertices.len()]
    }
}
