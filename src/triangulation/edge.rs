//! Edge storage: endpoints, owning triangles, kind and selector entry.

use crate::selection::SlotId;
use crate::triangulation::ids::{TriangleId, VertexId};

/// Role of an edge in the constrained triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// Boundary edge of some ring.
    Polygon,
    /// Edge of the bounding rectangle.
    Frame,
    /// Any other edge of the triangulation.
    Triangulation,
}

pub(crate) struct Edge {
    pub(crate) v0: VertexId,
    pub(crate) v1: VertexId,
    pub(crate) t0: Option<TriangleId>,
    pub(crate) t1: Option<TriangleId>,
    pub(crate) kind: EdgeKind,
    /// Entry in the owning ring's edge selector, for polygon edges.
    pub(crate) entry: Option<SlotId>,
    /// Transient mark used while one translation traces through the
    /// triangulation.
    pub(crate) intersected: bool,
}

impl Edge {
    pub(crate) fn new(v0: VertexId, v1: VertexId, kind: EdgeKind) -> Self {
        Self {
            v0,
            v1,
            t0: None,
            t1: None,
            kind,
            entry: None,
            intersected: false,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, v: VertexId) -> bool {
        self.v0 == v || self.v1 == v
    }

    #[inline]
    pub(crate) fn other_vertex(&self, v: VertexId) -> VertexId {
        if self.v0 == v {
            self.v1
        } else {
            self.v0
        }
    }

    #[inline]
    pub(crate) fn triangle_count(&self) -> usize {
        self.t0.is_some() as usize + self.t1.is_some() as usize
    }

    pub(crate) fn remove_triangle(&mut self, t: TriangleId) {
        if self.t0 == Some(t) {
            self.t0 = None;
        } else if self.t1 == Some(t) {
            self.t1 = None;
        }
    }
}
