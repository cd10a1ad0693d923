//! Triangle storage: the three vertices and edges plus bookkeeping flags.

use crate::selection::SlotId;
use crate::triangulation::ids::{EdgeId, VertexId};

pub(crate) struct Triangle {
    pub(crate) vertices: [VertexId; 3],
    pub(crate) edges: [EdgeId; 3],
    /// True iff the triangle lies in the polygon interior; the interior of
    /// a hole counts as exterior.
    pub(crate) internal: bool,
    /// Transient flag: the triangle currently sits in an event queue.
    pub(crate) enqueued: bool,
    /// Entry in the internal-triangle selector.
    pub(crate) entry: Option<SlotId>,
}

impl Triangle {
    pub(crate) fn new(vertices: [VertexId; 3], edges: [EdgeId; 3], internal: bool) -> Self {
        Self {
            vertices,
            edges,
            internal,
            enqueued: false,
            entry: None,
        }
    }

    #[inline]
    pub(crate) fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    #[inline]
    pub(crate) fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.contains(&e)
    }
}
