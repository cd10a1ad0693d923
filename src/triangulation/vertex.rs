//! Vertex storage: position, ring membership and incidence sets.

use crate::geometry::Point;
use crate::triangulation::ids::{EdgeId, RingId, TriangleId};

pub(crate) struct Vertex {
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Ring the vertex belongs to; `None` for the four frame corners.
    pub(crate) ring: Option<RingId>,
    /// Polygon edge to the predecessor on the ring.
    pub(crate) to_prev: Option<EdgeId>,
    /// Polygon edge to the successor on the ring.
    pub(crate) to_next: Option<EdgeId>,
    /// All edges incident to the vertex, in registration order.
    pub(crate) edges: Vec<EdgeId>,
    /// All triangles incident to the vertex, in registration order.
    pub(crate) triangles: Vec<TriangleId>,
    /// True for the four corners of the bounding box.
    pub(crate) frame_corner: bool,
}

impl Vertex {
    pub(crate) fn new(x: f64, y: f64, ring: Option<RingId>, frame_corner: bool) -> Self {
        Self {
            x,
            y,
            ring,
            to_prev: None,
            to_next: None,
            edges: Vec::new(),
            triangles: Vec::new(),
            frame_corner,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub(crate) fn remove_edge(&mut self, e: EdgeId) {
        if let Some(pos) = self.edges.iter().position(|&x| x == e) {
            self.edges.remove(pos);
        }
    }

    pub(crate) fn remove_triangle(&mut self, t: TriangleId) {
        if let Some(pos) = self.triangles.iter().position(|&x| x == t) {
            self.triangles.remove(pos);
        }
    }
}
