//! Chain polygons around a mutated region, and their triangulation.
//!
//! While a translation rips triangles out of the triangulation it records
//! the boundary of the hole as an alternating chain of vertices and edges.
//! The chain is then filled with fresh triangles by ear clipping. Three
//! clipping rules exist:
//!
//! * star-shaped regions, guarded by a kernel point every clipped ear must
//!   avoid,
//! * edge-visible regions, where the closing edge of the chain is the base
//!   edge and any convex non-base vertex may be clipped,
//! * plain simple regions, where an ear must additionally contain no other
//!   chain vertex.
//!
//! Collinear ears are never clipped.

use crate::fatal::{abort, Fatal};
use crate::geometry::{same_sign, Point};
use crate::triangulation::{EdgeId, EdgeKind, Triangulation, VertexId};

/// How a region polygon may be triangulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RegionKind {
    /// Every boundary point sees the kernel point.
    StarShaped,
    /// Every non-base vertex sees some point of the base (closing) edge.
    EdgeVisible,
    /// No stronger guarantee than simplicity.
    Simple,
}

/// An alternating vertex/edge chain describing one closed region
/// boundary. `edges[i]` connects `vertices[i]` with `vertices[i + 1]`;
/// the closing edge connects the last vertex back to the first.
pub(crate) struct RegionPolygon {
    kind: RegionKind,
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
    kernel: Option<Point>,
    closed: bool,
}

impl RegionPolygon {
    pub(crate) fn new(kind: RegionKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            edges: Vec::new(),
            kernel: None,
            closed: false,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Append the next boundary vertex. Vertices and edges must strictly
    /// alternate, starting with a vertex.
    pub(crate) fn add_vertex(&mut self, v: VertexId) {
        if self.closed {
            abort(Fatal::PolygonBuild, "region polygon extended after close");
        }
        if self.vertices.len() != self.edges.len() {
            abort(Fatal::PolygonBuild, "two region vertices in a row");
        }
        self.vertices.push(v);
    }

    /// Append the next boundary edge.
    pub(crate) fn add_edge(&mut self, e: EdgeId) {
        if self.closed {
            abort(Fatal::PolygonBuild, "region polygon extended after close");
        }
        if self.vertices.len() != self.edges.len() + 1 {
            abort(Fatal::PolygonBuild, "two region edges in a row");
        }
        self.edges.push(e);
    }

    /// Close the chain with its final edge. For edge-visible regions this
    /// edge is the base edge.
    pub(crate) fn close(&mut self, e: EdgeId) {
        if self.vertices.len() < 3 {
            abort(Fatal::PolygonBuild, "region polygon with fewer than three vertices");
        }
        if self.vertices.len() != self.edges.len() + 1 {
            abort(Fatal::PolygonBuild, "region polygon closed after an edge");
        }
        self.edges.push(e);
        self.closed = true;
    }

    /// One point of the kernel of a star-shaped region.
    pub(crate) fn set_kernel(&mut self, k: Point) {
        self.kernel = Some(k);
    }

    /// Fill the region with triangles carrying the given interior flag.
    pub(crate) fn triangulate(self, tri: &mut Triangulation, internal: bool) {
        if !self.closed {
            abort(Fatal::PolygonBuild, "triangulating an unclosed region polygon");
        }

        match self.kind {
            RegionKind::StarShaped => {
                let Some(kernel) = self.kernel else {
                    abort(
                        Fatal::StarWithoutKernel,
                        "star-shaped region without a kernel point",
                    );
                };
                Clipper::new(self).run(tri, internal, EarRule::Star(kernel));
            }
            RegionKind::EdgeVisible => {
                let n = self.vertices.len();
                let base = (n - 1, 0);
                let additional = tri.position(self.vertices[n - 1]);
                let v0 = tri.position(self.vertices[0]);
                let v1 = tri.position(self.vertices[1]);
                let reference = tri.orient(additional, v0, v1);
                Clipper::new(self).run(tri, internal, EarRule::EdgeVisible { base, reference });
            }
            RegionKind::Simple => {
                Clipper::new(self).run(tri, internal, EarRule::Simple);
            }
        }
    }
}

enum EarRule {
    /// Clip iff the kernel is outside the ear and the ear has the
    /// reference orientation (taken from the first chain corner against
    /// the kernel).
    Star(Point),
    /// Clip iff the middle vertex is not an endpoint of the base edge and
    /// the ear has the reference orientation (taken across the base
    /// edge).
    EdgeVisible { base: (usize, usize), reference: f64 },
    /// Clip iff the ear has the chain's orientation and contains no other
    /// chain vertex.
    Simple,
}

/// Circular doubly-linked view of a region chain during clipping.
struct Clipper {
    v: Vec<VertexId>,
    /// Edge from node i to its successor.
    e_next: Vec<EdgeId>,
    next: Vec<usize>,
    prev: Vec<usize>,
    n: usize,
}

impl Clipper {
    fn new(region: RegionPolygon) -> Self {
        let n = region.vertices.len();
        Self {
            v: region.vertices,
            e_next: region.edges,
            next: (0..n).map(|i| (i + 1) % n).collect(),
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            n,
        }
    }

    fn run(mut self, tri: &mut Triangulation, internal: bool, rule: EarRule) {
        let start_n = self.n;
        let mut i0 = 0;
        let mut i1 = self.next[i0];
        let mut i2 = self.next[i1];

        // Reference orientation for the plain-simple rule: the chain's
        // own winding.
        let chain_orientation = if matches!(rule, EarRule::Simple) {
            let mut area = 0.0;
            let mut i = 0;
            loop {
                let a = tri.position(self.v[i]);
                let b = tri.position(self.v[self.next[i]]);
                area += a.x * b.y - b.x * a.y;
                i = self.next[i];
                if i == 0 {
                    break;
                }
            }
            area
        } else {
            0.0
        };

        let mut rounds = 0usize;
        let max_rounds = 4 * start_n * start_n + 16;

        while self.n > 3 {
            rounds += 1;
            if rounds > max_rounds {
                abort(Fatal::PolygonBuild, "region ear clipping does not converge");
            }

            let a = tri.position(self.v[i0]);
            let b = tri.position(self.v[i1]);
            let c = tri.position(self.v[i2]);
            let area = tri.orient(a, b, c);

            let clippable = area != 0.0
                && match &rule {
                    EarRule::Star(kernel) => {
                        let reference =
                            tri.orient(tri.position(self.v[i0]), tri.position(self.v[i1]), *kernel);
                        same_sign(area, reference) && !tri.point_in_triangle(a, b, c, *kernel)
                    }
                    EarRule::EdgeVisible { base, reference } => {
                        i1 != base.0 && i1 != base.1 && same_sign(area, *reference)
                    }
                    EarRule::Simple => {
                        same_sign(area, chain_orientation) && !self.ear_contains_vertex(tri, i0, i1, i2)
                    }
                };

            if clippable {
                let new_edge =
                    tri.create_edge(self.v[i0], self.v[i2], EdgeKind::Triangulation);
                tri.create_triangle(
                    [self.e_next[i0], self.e_next[i1], new_edge],
                    [self.v[i0], self.v[i1], self.v[i2]],
                    internal,
                );

                // Unlink the clipped vertex and bridge with the new edge.
                self.next[i0] = i2;
                self.prev[i2] = i0;
                self.e_next[i0] = new_edge;
                self.n -= 1;

                // Step one back: the clip may have freed the previous
                // vertex to become an ear.
                i1 = i0;
                i0 = self.prev[i0];
            } else {
                i0 = i1;
                i1 = i2;
                i2 = self.next[i2];
            }
        }

        let f0 = i0;
        let f1 = self.next[f0];
        let f2 = self.next[f1];
        tri.create_triangle(
            [self.e_next[f0], self.e_next[f1], self.e_next[f2]],
            [self.v[f0], self.v[f1], self.v[f2]],
            internal,
        );
    }

    /// Whether any remaining chain vertex other than the ear's corners
    /// lies inside the candidate ear.
    fn ear_contains_vertex(&self, tri: &Triangulation, i0: usize, i1: usize, i2: usize) -> bool {
        let a = tri.position(self.v[i0]);
        let b = tri.position(self.v[i1]);
        let c = tri.position(self.v[i2]);

        let mut i = self.next[i2];
        while i != i0 {
            if tri.point_in_triangle(a, b, c, tri.position(self.v[i])) {
                return true;
            }
            i = self.next[i];
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Arithmetic;
    use crate::settings::Verbosity;
    use crate::triangulation::{TriConfig, Triangulation};

    fn empty_tri() -> Triangulation {
        Triangulation::new(TriConfig {
            arithmetic: Arithmetic::Exact,
            weighted_selection: true,
            local_checking: true,
            global_checking: true,
            verbosity: Verbosity::Mute,
        })
    }

    /// A convex pentagon boundary with no interior edges yet.
    fn pentagon(tri: &mut Triangulation) -> (Vec<VertexId>, Vec<EdgeId>) {
        let ring = tri.create_ring(5);
        let positions = [
            (1.0, 0.0),
            (0.31, 0.95),
            (-0.81, 0.59),
            (-0.81, -0.59),
            (0.31, -0.95),
        ];
        let vs: Vec<VertexId> = positions
            .iter()
            .map(|&(x, y)| tri.create_vertex(x, y, ring))
            .collect();
        let es: Vec<EdgeId> = (0..5)
            .map(|i| tri.create_edge(vs[i], vs[(i + 1) % 5], EdgeKind::Triangulation))
            .collect();
        (vs, es)
    }

    fn region_over(
        vs: &[VertexId],
        es: &[EdgeId],
        kind: RegionKind,
    ) -> RegionPolygon {
        let mut region = RegionPolygon::new(kind);
        region.add_vertex(vs[0]);
        for i in 0..vs.len() - 1 {
            region.add_edge(es[i]);
            region.add_vertex(vs[i + 1]);
        }
        region.close(es[es.len() - 1]);
        region
    }

    #[test]
    fn star_clipping_fills_a_convex_region() {
        let mut tri = empty_tri();
        let (vs, es) = pentagon(&mut tri);

        let mut region = region_over(&vs, &es, RegionKind::StarShaped);
        region.set_kernel(Point::new(0.0, 0.0));
        region.triangulate(&mut tri, true);

        assert_eq!(tri.live_triangles().count(), 3);
        for t in tri.live_triangles() {
            assert!(tri.is_internal(t));
            assert_ne!(tri.signed_area(t), 0.0);
        }
        // Interior edges own two triangles, boundary edges one.
        for e in tri.live_edges() {
            let (t0, t1) = tri.edge_triangles(e);
            let n = t0.is_some() as usize + t1.is_some() as usize;
            assert!(n >= 1);
        }
    }

    #[test]
    fn edge_visible_clipping_fills_a_fan_region() {
        let mut tri = empty_tri();
        let ring = tri.create_ring(4);
        // Edge-visible from the base (v3 -> v0): a shallow arc.
        let v0 = tri.create_vertex(0.0, 0.0, ring);
        let v1 = tri.create_vertex(1.0, 0.6, ring);
        let v2 = tri.create_vertex(2.0, 0.6, ring);
        let v3 = tri.create_vertex(3.0, 0.0, ring);

        let e0 = tri.create_edge(v0, v1, EdgeKind::Triangulation);
        let e1 = tri.create_edge(v1, v2, EdgeKind::Triangulation);
        let e2 = tri.create_edge(v2, v3, EdgeKind::Triangulation);
        let base = tri.create_edge(v3, v0, EdgeKind::Triangulation);

        let mut region = RegionPolygon::new(RegionKind::EdgeVisible);
        region.add_vertex(v0);
        region.add_edge(e0);
        region.add_vertex(v1);
        region.add_edge(e1);
        region.add_vertex(v2);
        region.add_edge(e2);
        region.add_vertex(v3);
        region.close(base);
        region.triangulate(&mut tri, false);

        assert_eq!(tri.live_triangles().count(), 2);
        let (t0, t1) = tri.edge_triangles(base);
        assert_eq!(t0.is_some() as usize + t1.is_some() as usize, 1);
    }

    #[test]
    fn simple_clipping_handles_a_reflex_vertex() {
        let mut tri = empty_tri();
        let ring = tri.create_ring(5);
        // A dart: v2 is reflex.
        let v0 = tri.create_vertex(0.0, 0.0, ring);
        let v1 = tri.create_vertex(2.0, 0.0, ring);
        let v2 = tri.create_vertex(1.0, 0.4, ring);
        let v3 = tri.create_vertex(2.0, 2.0, ring);
        let v4 = tri.create_vertex(-0.5, 1.0, ring);
        let vs = [v0, v1, v2, v3, v4];
        let es: Vec<EdgeId> = (0..5)
            .map(|i| tri.create_edge(vs[i], vs[(i + 1) % 5], EdgeKind::Triangulation))
            .collect();

        let region = region_over(&vs, &es, RegionKind::Simple);
        region.triangulate(&mut tri, true);

        assert_eq!(tri.live_triangles().count(), 3);
        for t in tri.live_triangles() {
            assert_ne!(tri.signed_area(t), 0.0);
        }
    }

    #[test]
    fn triangle_region_is_emitted_directly() {
        let mut tri = empty_tri();
        let ring = tri.create_ring(3);
        let v0 = tri.create_vertex(0.0, 0.0, ring);
        let v1 = tri.create_vertex(1.0, 0.0, ring);
        let v2 = tri.create_vertex(0.0, 1.0, ring);
        let e0 = tri.create_edge(v0, v1, EdgeKind::Triangulation);
        let e1 = tri.create_edge(v1, v2, EdgeKind::Triangulation);
        let e2 = tri.create_edge(v2, v0, EdgeKind::Triangulation);

        let mut region = RegionPolygon::new(RegionKind::StarShaped);
        region.add_vertex(v0);
        region.add_edge(e0);
        region.add_vertex(v1);
        region.add_edge(e1);
        region.add_vertex(v2);
        region.close(e2);
        region.set_kernel(Point::new(0.25, 0.25));
        region.triangulate(&mut tri, true);

        assert_eq!(tri.live_triangles().count(), 1);
    }
}
