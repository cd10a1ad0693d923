//! The constrained triangulation: owner of every vertex, edge and triangle.
//!
//! All three entity kinds live in arenas keyed by stable ids; slots are
//! never reused. Cross-references are ids, so destroying an entity is a
//! matter of deregistering it from its neighbors and killing its slot —
//! there is nothing to dangle.

mod edge;
mod ids;
mod ring;
mod triangle;
mod vertex;

pub use edge::EdgeKind;
pub use ids::{EdgeId, RingId, TriangleId, VertexId};

use crate::fatal::{abort, Fatal};
use crate::geometry::{
    between, intersect, orientation, same_sign, Arithmetic, Intersection, Point, Segment,
};
use crate::rng::RandomSource;
use crate::selection::SelectionTree;
use crate::settings::Verbosity;
use edge::Edge;
use ring::Ring;
use triangle::Triangle;
use vertex::Vertex;

/// The subset of the run configuration the triangulation needs at every
/// geometric decision.
#[derive(Clone, Copy, Debug)]
pub struct TriConfig {
    pub arithmetic: Arithmetic,
    pub weighted_selection: bool,
    pub local_checking: bool,
    pub global_checking: bool,
    pub verbosity: Verbosity,
}

pub struct Triangulation {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    triangles: Vec<Option<Triangle>>,
    /// Polygon vertices in creation order (frame corners excluded).
    order: Vec<VertexId>,
    rings: Vec<Ring>,
    /// Selector over internal triangles, weighted by polygon incidence.
    internal: SelectionTree<TriangleId>,
    frame: Option<[VertexId; 4]>,
    pub config: TriConfig,
}

impl Triangulation {
    pub fn new(config: TriConfig) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            triangles: Vec::new(),
            order: Vec::new(),
            rings: Vec::new(),
            internal: SelectionTree::new(config.weighted_selection),
            frame: None,
            config,
        }
    }

    /*
        Slot access. A dead slot here is a use-after-destroy and therefore a
        programming bug; panicking is the right response.
    */

    fn v(&self, id: VertexId) -> &Vertex {
        self.vertices[id.idx()].as_ref().expect("dead vertex slot")
    }

    fn v_mut(&mut self, id: VertexId) -> &mut Vertex {
        self.vertices[id.idx()].as_mut().expect("dead vertex slot")
    }

    fn e(&self, id: EdgeId) -> &Edge {
        self.edges[id.idx()].as_ref().expect("dead edge slot")
    }

    fn e_mut(&mut self, id: EdgeId) -> &mut Edge {
        self.edges[id.idx()].as_mut().expect("dead edge slot")
    }

    fn t(&self, id: TriangleId) -> &Triangle {
        self.triangles[id.idx()].as_ref().expect("dead triangle slot")
    }

    fn t_mut(&mut self, id: TriangleId) -> &mut Triangle {
        self.triangles[id.idx()].as_mut().expect("dead triangle slot")
    }

    /*
        Construction
    */

    /// Register a new ring with the given target size.
    pub fn create_ring(&mut self, target: usize) -> RingId {
        let id = RingId(self.rings.len() as u32);
        self.rings
            .push(Ring::new(target, self.config.weighted_selection));
        id
    }

    /// Create a polygon vertex and append it to its ring.
    pub fn create_vertex(&mut self, x: f64, y: f64, ring: RingId) -> VertexId {
        if ring.idx() >= self.rings.len() {
            abort(
                Fatal::InvalidRingId,
                &format!("vertex inserted with ring id {} of {}", ring.idx(), self.rings.len()),
            );
        }
        let id = VertexId(self.vertices.len() as u64);
        self.vertices.push(Some(Vertex::new(x, y, Some(ring), false)));
        self.order.push(id);
        self.rings[ring.idx()].vertices.push(id);
        id
    }

    /// Create one corner of the bounding box.
    pub fn create_frame_vertex(&mut self, x: f64, y: f64) -> VertexId {
        let id = VertexId(self.vertices.len() as u64);
        self.vertices.push(Some(Vertex::new(x, y, None, true)));
        id
    }

    /// Record the four frame corners.
    pub fn set_frame(&mut self, corners: [VertexId; 4]) {
        self.frame = Some(corners);
    }

    pub fn frame(&self) -> Option<[VertexId; 4]> {
        self.frame
    }

    /// Create an edge and register it at both endpoints. A polygon edge
    /// additionally becomes `to_next` of `v0` and `to_prev` of `v1` (the
    /// parameter order carries the ring orientation) and enters its ring's
    /// selector.
    pub fn create_edge(&mut self, v0: VertexId, v1: VertexId, kind: EdgeKind) -> EdgeId {
        if v0 == v1 {
            abort(Fatal::CircleEdge, &format!("edge from vertex {:?} to itself", v0));
        }

        let id = EdgeId(self.edges.len() as u64);
        self.edges.push(Some(Edge::new(v0, v1, kind)));
        self.v_mut(v0).edges.push(id);
        self.v_mut(v1).edges.push(id);

        if kind == EdgeKind::Polygon {
            self.v_mut(v0).to_next = Some(id);
            self.v_mut(v1).to_prev = Some(id);

            let ring = self.v(v0).ring.unwrap_or(RingId::OUTER);
            let weight = self.edge_length(id);
            let slot = self.rings[ring.idx()].edges.insert(id, weight);
            self.e_mut(id).entry = Some(slot);
        }

        id
    }

    /// Create a triangle over three existing edges and vertices and
    /// register it everywhere. The edge order must correlate with the
    /// vertex order only in that together they bound the same region.
    pub fn create_triangle(
        &mut self,
        edges: [EdgeId; 3],
        vertices: [VertexId; 3],
        internal: bool,
    ) -> TriangleId {
        let [v0, v1, v2] = vertices;
        if v0 == v1 || v0 == v2 || v1 == v2 {
            abort(Fatal::DuplicateTriangle, "two vertices of a new triangle are identical");
        }

        // A triangle over the same three edges must not exist twice.
        let e0 = self.e(edges[0]);
        for existing in [e0.t0, e0.t1].into_iter().flatten() {
            let t = self.t(existing);
            if t.contains_edge(edges[1]) && t.contains_edge(edges[2]) {
                abort(Fatal::DuplicateTriangle, "the same triangle already exists");
            }
        }

        let id = TriangleId(self.triangles.len() as u64);
        self.triangles.push(Some(Triangle::new(vertices, edges, internal)));

        for e in edges {
            let slot = self.e_mut(e);
            if slot.t0.is_none() {
                slot.t0 = Some(id);
            } else if slot.t1.is_none() {
                slot.t1 = Some(id);
            } else {
                abort(
                    Fatal::TriangleOverflow,
                    &format!("edge {:?} already owns two triangles", e),
                );
            }
        }
        for v in vertices {
            self.v_mut(v).triangles.push(id);
        }

        if internal {
            let weight = self.triangle_weight(id);
            let slot = self.internal.insert(id, weight);
            self.t_mut(id).entry = Some(slot);
        }

        id
    }

    /*
        Destruction
    */

    /// Remove a triangle, deregistering it from its vertices, edges and
    /// the internal selector.
    pub fn destroy_triangle(&mut self, id: TriangleId) {
        let (vertices, edges, entry) = {
            let t = self.t(id);
            (t.vertices, t.edges, t.entry)
        };

        for v in vertices {
            self.v_mut(v).remove_triangle(id);
        }
        for e in edges {
            self.e_mut(e).remove_triangle(id);
        }
        if let Some(slot) = entry {
            self.internal.remove(slot);
        }
        self.triangles[id.idx()] = None;
    }

    /// Remove an edge. Its incident triangles are destroyed first; a
    /// polygon edge also leaves its ring's selector and any stale
    /// `to_prev`/`to_next` pointer naming it.
    pub fn destroy_edge(&mut self, id: EdgeId) {
        let (v0, v1) = {
            let e = self.e(id);
            (e.v0, e.v1)
        };
        for t in [self.e(id).t0, self.e(id).t1].into_iter().flatten() {
            self.destroy_triangle(t);
        }

        let entry = self.e(id).entry;
        if let Some(slot) = entry {
            let ring = self.v(v0).ring.unwrap_or(RingId::OUTER);
            self.rings[ring.idx()].edges.remove(slot);
        }

        for v in [v0, v1] {
            let vert = self.v_mut(v);
            vert.remove_edge(id);
            if vert.to_prev == Some(id) {
                vert.to_prev = None;
            }
            if vert.to_next == Some(id) {
                vert.to_next = None;
            }
        }

        self.edges[id.idx()] = None;
    }

    /*
        Vertex queries
    */

    #[inline]
    pub fn position(&self, v: VertexId) -> Point {
        self.v(v).position()
    }

    pub fn set_position(&mut self, v: VertexId, p: Point) {
        let vert = self.v_mut(v);
        vert.x = p.x;
        vert.y = p.y;
    }

    #[inline]
    pub fn ring_of(&self, v: VertexId) -> Option<RingId> {
        self.v(v).ring
    }

    #[inline]
    pub fn is_frame_corner(&self, v: VertexId) -> bool {
        self.v(v).frame_corner
    }

    pub fn vertex_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.v(v).edges.clone()
    }

    pub fn vertex_triangles(&self, v: VertexId) -> Vec<TriangleId> {
        self.v(v).triangles.clone()
    }

    #[inline]
    pub fn to_prev_edge(&self, v: VertexId) -> Option<EdgeId> {
        self.v(v).to_prev
    }

    #[inline]
    pub fn to_next_edge(&self, v: VertexId) -> Option<EdgeId> {
        self.v(v).to_next
    }

    /// Predecessor of `v` on its ring.
    pub fn prev_vertex(&self, v: VertexId) -> VertexId {
        let e = self.v(v).to_prev.expect("vertex without predecessor edge");
        self.e(e).other_vertex(v)
    }

    /// Successor of `v` on its ring.
    pub fn next_vertex(&self, v: VertexId) -> VertexId {
        let e = self.v(v).to_next.expect("vertex without successor edge");
        self.e(e).other_vertex(v)
    }

    /// The edge between two vertices, if one exists.
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.v(a).edges.iter().copied().find(|&e| self.e(e).other_vertex(a) == b)
    }

    /// The triangle formed by `v` and the two given vertices, if present.
    pub fn triangle_with(&self, v: VertexId, a: VertexId, b: VertexId) -> Option<TriangleId> {
        self.v(v)
            .triangles
            .iter()
            .copied()
            .find(|&t| self.t(t).contains_vertex(a) && self.t(t).contains_vertex(b))
    }

    /// The edges of `v`'s incident triangles that are not incident to `v`,
    /// one per triangle: the boundary of the surrounding polygon.
    pub fn surrounding_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.v(v)
            .triangles
            .iter()
            .map(|&t| self.tri_edge_not_containing(t, v))
            .collect()
    }

    /// Mean length of all edges incident to `v`.
    pub fn medium_edge_length(&self, v: VertexId) -> f64 {
        let edges = &self.v(v).edges;
        let sum: f64 = edges.iter().map(|&e| self.edge_length(e)).sum();
        sum / edges.len() as f64
    }

    /// Length estimate for a move of `v` in direction `alpha`: the mean
    /// length of the two incident edges of the triangle lying in that
    /// direction. Falls back to the negated mean edge length when no
    /// triangle matches (a numerical corner case).
    pub fn directed_edge_length(&self, v: VertexId, alpha: f64) -> f64 {
        for &t in &self.v(v).triangles {
            let range = self.triangle_range(t, v, alpha);
            if range > 0.0 {
                return range;
            }
        }

        if self.config.verbosity == Verbosity::Verbose {
            eprintln!("no triangle found in direction {} around vertex {:?}", alpha, v);
        }
        -self.medium_edge_length(v)
    }

    /// Number of vertices currently on the ring of `v`.
    pub fn ring_size_of(&self, v: VertexId) -> usize {
        let ring = self.v(v).ring.expect("frame corner has no ring");
        self.rings[ring.idx()].len()
    }

    /*
        Edge queries
    */

    #[inline]
    pub fn edge_kind(&self, e: EdgeId) -> EdgeKind {
        self.e(e).kind
    }

    /// Relabel an edge. Used both for permanent promotion during the
    /// initial build and temporarily during simplicity checks; the caller
    /// restores a temporary change itself. Never demote a polygon edge
    /// permanently: its selector entry would go stale.
    pub fn set_edge_kind(&mut self, e: EdgeId, kind: EdgeKind) {
        self.e_mut(e).kind = kind;
    }

    /// Promote a triangulation edge to a polygon edge of `ring`,
    /// orienting `v0 -> v1` and registering it in the ring selector.
    pub fn promote_to_polygon(&mut self, e: EdgeId, v0: VertexId, v1: VertexId, ring: RingId) {
        debug_assert!(self.e(e).contains(v0) && self.e(e).contains(v1));
        self.e_mut(e).kind = EdgeKind::Polygon;
        self.v_mut(v0).to_next = Some(e);
        self.v_mut(v1).to_prev = Some(e);
        if self.e(e).entry.is_none() {
            let weight = self.edge_length(e);
            let slot = self.rings[ring.idx()].edges.insert(e, weight);
            self.e_mut(e).entry = Some(slot);
        }
    }

    #[inline]
    pub fn edge_vertices(&self, e: EdgeId) -> (VertexId, VertexId) {
        let edge = self.e(e);
        (edge.v0, edge.v1)
    }

    #[inline]
    pub fn edge_contains(&self, e: EdgeId, v: VertexId) -> bool {
        self.e(e).contains(v)
    }

    #[inline]
    pub fn other_vertex(&self, e: EdgeId, v: VertexId) -> VertexId {
        self.e(e).other_vertex(v)
    }

    pub fn edge_length(&self, e: EdgeId) -> f64 {
        let edge = self.e(e);
        self.position(edge.v0).distance_to(self.position(edge.v1))
    }

    pub fn edge_segment(&self, e: EdgeId) -> Segment {
        let edge = self.e(e);
        Segment::new(self.position(edge.v0), self.position(edge.v1))
    }

    /// Angle of the edge against the x-axis with `v` shifted to the origin.
    pub fn edge_angle_from(&self, e: EdgeId, v: VertexId) -> f64 {
        let other = self.other_vertex(e, v);
        Segment::new(self.position(v), self.position(other)).angle_from_a()
    }

    #[inline]
    pub fn edge_triangles(&self, e: EdgeId) -> (Option<TriangleId>, Option<TriangleId>) {
        let edge = self.e(e);
        (edge.t0, edge.t1)
    }

    /// The triangle on the other side of `e` than `t`.
    pub fn edge_other_triangle(&self, e: EdgeId, t: TriangleId) -> Option<TriangleId> {
        let edge = self.e(e);
        if edge.t0 == Some(t) {
            edge.t1
        } else {
            edge.t0
        }
    }

    /// The triangle of `e` containing `v`, if any.
    pub fn edge_triangle_containing(&self, e: EdgeId, v: VertexId) -> Option<TriangleId> {
        let edge = self.e(e);
        [edge.t0, edge.t1]
            .into_iter()
            .flatten()
            .find(|&t| self.t(t).contains_vertex(v))
    }

    /// The triangle of `e` not containing `v`. Falls back to `t0` when
    /// both contain it, mirroring the loose contract of the walk callers.
    pub fn edge_triangle_not_containing(&self, e: EdgeId, v: VertexId) -> Option<TriangleId> {
        let edge = self.e(e);
        match edge.t0 {
            Some(t) if !self.t(t).contains_vertex(v) => Some(t),
            _ => edge.t1.filter(|&t| !self.t(t).contains_vertex(v)).or(edge.t0),
        }
    }

    #[inline]
    pub fn set_intersected(&mut self, e: EdgeId, value: bool) {
        self.e_mut(e).intersected = value;
    }

    #[inline]
    pub fn is_intersected(&self, e: EdgeId) -> bool {
        self.e(e).intersected
    }

    /*
        Triangle queries
    */

    #[inline]
    pub fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        self.t(t).vertices
    }

    #[inline]
    pub fn triangle_edges(&self, t: TriangleId) -> [EdgeId; 3] {
        self.t(t).edges
    }

    #[inline]
    pub fn is_internal(&self, t: TriangleId) -> bool {
        self.t(t).internal
    }

    #[inline]
    pub fn tri_contains_vertex(&self, t: TriangleId, v: VertexId) -> bool {
        self.t(t).contains_vertex(v)
    }

    /// The vertex of `t` not on edge `e`.
    pub fn tri_opposite_vertex(&self, t: TriangleId, e: EdgeId) -> VertexId {
        let tri = self.t(t);
        let edge = self.e(e);
        *tri.vertices
            .iter()
            .find(|&&v| !edge.contains(v))
            .expect("edge covers all triangle vertices")
    }

    /// The edge of `t` not containing `v`: one side of the surrounding
    /// polygon of `v`.
    pub fn tri_edge_not_containing(&self, t: TriangleId, v: VertexId) -> EdgeId {
        let tri = self.t(t);
        *tri.edges
            .iter()
            .find(|&&e| !self.e(e).contains(v))
            .expect("all edges contain the vertex")
    }

    /// Any edge of `t` containing `v`.
    pub fn tri_edge_containing(&self, t: TriangleId, v: VertexId) -> EdgeId {
        let tri = self.t(t);
        *tri.edges
            .iter()
            .find(|&&e| self.e(e).contains(v))
            .expect("no edge contains the vertex")
    }

    /// The edge of `t` containing `v` that is not `e`.
    pub fn tri_other_edge_containing(&self, t: TriangleId, v: VertexId, e: EdgeId) -> EdgeId {
        let tri = self.t(t);
        *tri.edges
            .iter()
            .find(|&&x| x != e && self.e(x).contains(v))
            .expect("no other edge contains the vertex")
    }

    /// The edge of `t` with both given endpoints, if present.
    pub fn tri_edge_between(&self, t: TriangleId, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let tri = self.t(t);
        tri.edges
            .iter()
            .copied()
            .find(|&e| self.e(e).contains(a) && self.e(e).contains(b))
    }

    /// The two edges of `t` that are not `e`.
    pub fn tri_other_edges(&self, t: TriangleId, e: EdgeId) -> [EdgeId; 2] {
        let tri = self.t(t);
        let mut out = [e; 2];
        let mut n = 0;
        for &x in &tri.edges {
            if x != e {
                out[n] = x;
                n += 1;
            }
        }
        debug_assert!(n == 2, "edge not part of the triangle");
        out
    }

    /// The first edge of `t` without the intersected mark.
    pub fn tri_not_intersected_edge(&self, t: TriangleId) -> Option<EdgeId> {
        let tri = self.t(t);
        tri.edges.iter().copied().find(|&e| !self.e(e).intersected)
    }

    #[inline]
    pub fn set_enqueued(&mut self, t: TriangleId, value: bool) {
        self.t_mut(t).enqueued = value;
    }

    #[inline]
    pub fn is_enqueued(&self, t: TriangleId) -> bool {
        self.t(t).enqueued
    }

    /// Twice the signed area of the triangle in the configured arithmetic.
    pub fn signed_area(&self, t: TriangleId) -> f64 {
        let [a, b, c] = self.t(t).vertices;
        self.orient(self.position(a), self.position(b), self.position(c))
    }

    /// Twice the signed area of three points in the configured arithmetic.
    #[inline]
    pub fn orient(&self, a: Point, b: Point, c: Point) -> f64 {
        orientation(self.config.arithmetic, a, b, c)
    }

    /// True if `p` lies inside the triangle of the three points.
    #[inline]
    pub fn point_in_triangle(&self, a: Point, b: Point, c: Point, p: Point) -> bool {
        crate::geometry::inside_triangle(self.config.arithmetic, a, b, c, p)
    }

    /// Selector weight of a triangle: (1 + k)^2, where k is the number of
    /// its polygon edges on the outer ring.
    pub fn triangle_weight(&self, t: TriangleId) -> f64 {
        let tri = self.t(t);
        let mut n = 1u32;
        for &e in &tri.edges {
            let edge = self.e(e);
            if edge.kind == EdgeKind::Polygon && self.v(edge.v0).ring == Some(RingId::OUTER) {
                n += 1;
            }
        }
        (n * n) as f64
    }

    /// Time in [0, 1] at which this triangle collapses while `moving`
    /// travels from `old_pos` by `(dx, dy)`. Values outside [0, 1] mean
    /// the triangle survives this translation.
    pub fn collapse_time(
        &self,
        t: TriangleId,
        moving: VertexId,
        old_pos: Point,
        dx: f64,
        dy: f64,
    ) -> f64 {
        let tri = self.t(t);
        debug_assert!(tri.contains_vertex(moving));

        let mut stat = [Point::new(0.0, 0.0); 2];
        let mut n = 0;
        for &v in &tri.vertices {
            if v != moving {
                stat[n] = self.position(v);
                n += 1;
            }
        }
        let [a, b] = stat;

        // Shift a to the origin.
        let bx = b.x - a.x;
        let by = b.y - a.y;
        let cx = old_pos.x - a.x;
        let cy = old_pos.y - a.y;
        let ex = cx + dx;
        let ey = cy + dy;

        let area_old = cx * by - cy * bx;
        let area_new = bx * ey - by * ex;

        1.0 / (area_new / area_old + 1.0)
    }

    /// The longest edge of a (nearly) collapsed triangle, found without
    /// computing lengths: with all three vertices close to one line, the
    /// longest edge is the one whose opposite vertex lies between its
    /// endpoints.
    pub fn longest_edge_collapsed(&self, t: TriangleId) -> EdgeId {
        for &e in &self.t(t).edges {
            let v = self.tri_opposite_vertex(t, e);
            if between(self.edge_segment(e), self.position(v)) {
                return e;
            }
        }

        if self.config.verbosity == Verbosity::Verbose {
            eprintln!(
                "betweenness gave no longest edge, area {:.16}; comparing lengths",
                self.signed_area(t)
            );
        }
        self.longest_edge(t, 0.0001)
    }

    /// The longest edge by length comparison. If the longest is a polygon
    /// edge and another edge is within `epsilon` of its length, the other
    /// one is preferred.
    pub fn longest_edge(&self, t: TriangleId, epsilon: f64) -> EdgeId {
        let edges = self.t(t).edges;
        let mut sorted: Vec<(f64, EdgeId)> =
            edges.iter().map(|&e| (self.edge_length(e), e)).collect();
        sorted.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());

        let (longest_len, longest) = sorted[0];
        let (second_len, second) = sorted[1];
        if self.e(longest).kind == EdgeKind::Polygon && longest_len - epsilon <= second_len {
            second
        } else {
            longest
        }
    }

    /// Whether the triangle lies in direction `alpha` from `v`; if so,
    /// the mean length of its two edges incident to `v`, else -1.
    fn triangle_range(&self, t: TriangleId, v: VertexId, alpha: f64) -> f64 {
        let tri = self.t(t);
        let mut inc = [tri.edges[0]; 2];
        let mut n = 0;
        for &e in &tri.edges {
            if self.e(e).contains(v) {
                inc[n] = e;
                n += 1;
            }
        }
        if n != 2 {
            return -1.0;
        }

        let mut a0 = self.edge_angle_from(inc[0], v);
        let mut a1 = self.edge_angle_from(inc[1], v);
        if a0 < a1 {
            std::mem::swap(&mut a0, &mut a1);
        }

        let range = (self.edge_length(inc[0]) + self.edge_length(inc[1])) / 2.0;

        if a0 - a1 <= std::f64::consts::PI {
            if alpha <= a0 && alpha >= a1 {
                return range;
            }
        } else if alpha >= a0 || alpha <= a1 {
            return range;
        }

        -1.0
    }

    /*
        Rings and selection
    */

    #[inline]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn inner_ring_count(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }

    #[inline]
    pub fn ring_len(&self, ring: RingId) -> usize {
        self.rings[ring.idx()].len()
    }

    #[inline]
    pub fn ring_target(&self, ring: RingId) -> usize {
        self.rings[ring.idx()].target
    }

    /// Vertex `i` (wrapping) of a ring, in initial construction order.
    pub fn ring_vertex(&self, ring: RingId, i: usize) -> VertexId {
        self.rings[ring.idx()].vertex(i)
    }

    /// All polygon vertices in creation order.
    pub fn vertex_order(&self) -> &[VertexId] {
        &self.order
    }

    /// Number of polygon vertices over all rings.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    /// A polygon edge of the ring sampled by length (or uniformly when
    /// weighted selection is off).
    pub fn random_edge(&self, ring: RingId, rng: &mut RandomSource) -> Option<EdgeId> {
        self.rings[ring.idx()].edges.sample(rng)
    }

    /// An internal triangle sampled by its polygon-incidence weight.
    pub fn random_internal_triangle(&self, rng: &mut RandomSource) -> Option<TriangleId> {
        self.internal.sample(rng)
    }

    /// Refresh the selector weight of a polygon edge after its endpoints
    /// moved.
    pub fn update_edge_weight(&mut self, e: EdgeId) {
        if let Some(slot) = self.e(e).entry {
            let ring = self.v(self.e(e).v0).ring.unwrap_or(RingId::OUTER);
            let weight = self.edge_length(e);
            self.rings[ring.idx()].edges.update(slot, weight);
        }
    }

    /// Refresh the selector weight of an internal triangle after its
    /// polygon incidence changed.
    pub fn update_triangle_weight(&mut self, t: TriangleId) {
        if let Some(slot) = self.t(t).entry {
            let weight = self.triangle_weight(t);
            self.internal.update(slot, weight);
        }
    }

    /// Whether the triangle's slot is still alive. Mutation loops iterate
    /// snapshots of incidence lists; a flip inside the loop can have
    /// destroyed a later entry.
    #[inline]
    pub fn triangle_is_live(&self, t: TriangleId) -> bool {
        self.triangles[t.idx()].is_some()
    }

    /// Iterate over all live edges.
    pub fn live_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| EdgeId(i as u64)))
    }

    /// Iterate over all live triangles.
    pub fn live_triangles(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|_| TriangleId(i as u64)))
    }

    /*
        Checks
    */

    /// Verify that `v` still lies strictly inside its surrounding polygon.
    /// A vertex exactly on a surrounding edge aborts with exit code 10 iff
    /// that edge is a polygon edge; on a triangulation edge the zero is
    /// tolerated.
    pub fn check_surrounding_polygon(&self, v: VertexId) -> bool {
        let triangles = &self.v(v).triangles;
        if triangles.is_empty() {
            return true;
        }

        // Collect the surrounding vertices in fan order, first vertex
        // repeated at the end.
        let t0 = triangles[0];
        let mut chain: Vec<VertexId> = Vec::with_capacity(triangles.len() + 1);

        let mut e = self.tri_edge_containing(t0, v);
        chain.push(self.other_vertex(e, v));
        e = self.tri_other_edge_containing(t0, v, e);
        chain.push(self.other_vertex(e, v));

        let mut t = self
            .edge_other_triangle(e, t0)
            .expect("open fan around a polygon vertex");
        while t != t0 {
            e = self.tri_other_edge_containing(t, v, e);
            chain.push(self.other_vertex(e, v));
            t = self
                .edge_other_triangle(e, t)
                .expect("open fan around a polygon vertex");
        }

        let p = self.position(v);
        let mut area0 = self.orient(self.position(chain[0]), self.position(chain[1]), p);

        if area0 == 0.0 {
            self.zero_area_guard(v, chain[0], chain[1]);
        }

        for w in chain.windows(2).skip(1) {
            let area = self.orient(self.position(w[0]), self.position(w[1]), p);

            if area == 0.0 {
                self.zero_area_guard(v, w[0], w[1]);
                continue;
            }

            if !same_sign(area, area0) {
                if area0 == 0.0 {
                    area0 = area;
                    continue;
                }
                return false;
            }
        }

        true
    }

    /// Exit-10 path of the surrounding-polygon check: the vertex lies
    /// exactly on the chord (a, b).
    fn zero_area_guard(&self, v: VertexId, a: VertexId, b: VertexId) {
        if let Some(t) = self.triangle_with(v, a, b) {
            let e = self.longest_edge_collapsed(t);
            if self.e(e).kind == EdgeKind::Polygon {
                abort(
                    Fatal::VertexOnPolygonEdgeInCheck,
                    &format!("vertex {:?} lies exactly on a polygon edge", v),
                );
            }
        }
    }

    /// Per-vertex structural check: two polygon edges, both designated.
    fn check_vertex(&self, id: VertexId) -> bool {
        let v = self.v(id);
        if v.frame_corner {
            return true;
        }

        let polygon_edges = v
            .edges
            .iter()
            .filter(|&&e| self.e(e).kind == EdgeKind::Polygon)
            .count();

        let mut ok = true;
        if polygon_edges != 2 {
            eprintln!("vertex {:?} has {} polygon edges", id, polygon_edges);
            ok = false;
        }
        if v.to_prev.is_none() {
            eprintln!("vertex {:?} has no predecessor edge", id);
            ok = false;
        }
        if v.to_next.is_none() {
            eprintln!("vertex {:?} has no successor edge", id);
            ok = false;
        }
        ok
    }

    /// Global integrity check of invariants 1-5. Returns true without
    /// looking at anything unless global checking is enabled.
    pub fn check(&self) -> bool {
        if !self.config.global_checking {
            return true;
        }
        self.check_now()
    }

    /// Global integrity check of invariants 1-5, unconditionally.
    pub fn check_now(&self) -> bool {
        let mut ok = true;

        for e in self.live_edges() {
            let edge = self.e(e);
            let n = edge.triangle_count();
            match edge.kind {
                EdgeKind::Frame => {
                    if n != 1 {
                        eprintln!("frame edge {:?} owns {} triangles", e, n);
                        ok = false;
                    }
                }
                _ => {
                    if n != 2 {
                        eprintln!("{:?} edge {:?} owns {} triangles", edge.kind, e, n);
                        ok = false;
                    }
                }
            }
            if edge.v0 == edge.v1 {
                eprintln!("edge {:?} has identical endpoints", e);
                ok = false;
            }
        }

        for &v in &self.order {
            ok = self.check_vertex(v) && ok;
            let inside = self.check_surrounding_polygon(v);
            if !inside {
                eprintln!("vertex {:?} is outside of its surrounding polygon", v);
            }
            ok = inside && ok;
        }

        ok
    }

    /// Pairwise simplicity check over all polygon edges of all rings,
    /// skipping pairs that share an endpoint. Aborts with exit code 11 on
    /// the first intersection found.
    pub fn check_simplicity(&self) {
        let polygon_edges: Vec<EdgeId> = self
            .live_edges()
            .filter(|&e| self.e(e).kind == EdgeKind::Polygon)
            .collect();

        for (i, &a) in polygon_edges.iter().enumerate() {
            for &b in &polygon_edges[i + 1..] {
                let (a0, a1) = self.edge_vertices(a);
                let (b0, b1) = self.edge_vertices(b);
                if a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1 {
                    continue;
                }
                let kind = intersect(
                    self.config.arithmetic,
                    self.edge_segment(a),
                    self.edge_segment(b),
                    true,
                );
                if kind != Intersection::None {
                    abort(
                        Fatal::NotSimple,
                        &format!("polygon edges {:?} and {:?} intersect ({:?})", a, b, kind),
                    );
                }
            }
        }
    }

    /// Verify the ring selectors' internal bookkeeping.
    pub fn check_selectors(&self) {
        for ring in &self.rings {
            if !ring.edges.check() {
                abort(Fatal::SelectionTree, "ring edge selector lost an entry");
            }
        }
        if !self.internal.check() {
            abort(Fatal::SelectionTree, "internal triangle selector lost an entry");
        }
    }

    /// Interior angle of the ring at `v`, measured on the interior side,
    /// in [0, 2*pi).
    pub fn inside_angle(&self, v: VertexId) -> f64 {
        use std::f64::consts::PI;

        let to_prev = self.v(v).to_prev.expect("vertex without predecessor edge");
        let to_next = self.v(v).to_next.expect("vertex without successor edge");
        let prev = self.e(to_prev).other_vertex(v);
        let next = self.e(to_next).other_vertex(v);

        let alpha0 = self.edge_angle_from(to_prev, v).abs();
        let alpha1 = self.edge_angle_from(to_next, v).abs();

        let p = self.position(v);
        let prev_down = p.y - self.position(prev).y < 0.0;
        let next_down = self.position(next).y - p.y < 0.0;

        if prev_down {
            if next_down {
                alpha0 + alpha1
            } else if alpha1 > alpha0 {
                2.0 * PI - (alpha1 - alpha0)
            } else {
                alpha0 - alpha1
            }
        } else if next_down {
            if alpha1 > alpha0 {
                alpha1 - alpha0
            } else {
                2.0 * PI - (alpha0 - alpha1)
            }
        } else {
            2.0 * PI - alpha0 - alpha1
        }
    }

    /// Twice the signed area enclosed by a ring, positive for
    /// counterclockwise boundary order.
    pub fn ring_signed_area(&self, ring: RingId) -> f64 {
        let start = self.rings[ring.idx()].vertex(0);
        let mut area = 0.0;
        let mut v = start;
        loop {
            let next = self.next_vertex(v);
            let a = self.position(v);
            let b = self.position(next);
            area += a.x * b.y - b.x * a.y;
            v = next;
            if v == start {
                break;
            }
        }
        area
    }

    /// Direction normal to the ring boundary at `v`, pointing away from
    /// the region the ring encloses: away from the midpoint of the two
    /// ring neighbors at a convex vertex, toward it at a reflex one.
    /// Works for either boundary orientation.
    pub fn normal_direction_outside(&self, v: VertexId) -> f64 {
        use std::f64::consts::PI;

        let ring = self.v(v).ring.expect("frame corner has no ring");
        let prev = self.position(self.prev_vertex(v));
        let next = self.position(self.next_vertex(v));
        let p = self.position(v);
        let mid = Point::new((prev.x + next.x) / 2.0, (prev.y + next.y) / 2.0);

        let convex = same_sign(self.orient(prev, p, next), self.ring_signed_area(ring));

        let outward = (p.y - mid.y).atan2(p.x - mid.x);
        if convex {
            outward
        } else if outward > 0.0 {
            outward - PI
        } else {
            outward + PI
        }
    }
}
