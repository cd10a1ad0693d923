//! State and pre-checks shared by both translation variants.
//!
//! A translation snapshots the moving vertex, its ring neighbors and the
//! two polygon edges between them. The would-be new polygon edges are
//! plain value segments; they never enter the triangulation.

use crate::geometry::{intersect, same_sign, Intersection, Point, Segment, EPS_INT};
use crate::settings::Verbosity;
use crate::stats::Stats;
use crate::triangulation::{EdgeId, EdgeKind, RingId, Triangulation, VertexId};

/// Every way a translation can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The vertex reached its target position.
    Full,
    /// Event-queue instability stopped the vertex at an intermediate
    /// position of its path.
    Partial,
    /// The translation was rolled back; the triangulation is as before.
    Undone,
    /// A pre-check failed; nothing was mutated.
    Rejected,
}

/// Snapshot of one vertex translation.
pub(crate) struct Frame {
    pub original: VertexId,
    pub prev_v: VertexId,
    pub next_v: VertexId,
    pub prev_old_e: EdgeId,
    pub next_old_e: EdgeId,
    /// Start position of the moving vertex.
    pub old_pos: Point,
    /// Target position of the moving vertex.
    pub new_pos: Point,
    pub dx: f64,
    pub dy: f64,
}

impl Frame {
    pub(crate) fn new(tri: &Triangulation, v: VertexId, dx: f64, dy: f64) -> Self {
        let old_pos = tri.position(v);
        Self {
            original: v,
            prev_v: tri.prev_vertex(v),
            next_v: tri.next_vertex(v),
            prev_old_e: tri.to_prev_edge(v).expect("moving vertex without ring edges"),
            next_old_e: tri.to_next_edge(v).expect("moving vertex without ring edges"),
            old_pos,
            new_pos: old_pos.translated(dx, dy),
            dx,
            dy,
        }
    }

    /// The would-be polygon edge from the predecessor to the target
    /// position.
    pub(crate) fn prev_new(&self, tri: &Triangulation) -> Segment {
        Segment::new(tri.position(self.prev_v), self.new_pos)
    }

    /// The would-be polygon edge from the target position to the
    /// successor.
    pub(crate) fn next_new(&self, tri: &Triangulation) -> Segment {
        Segment::new(self.new_pos, tri.position(self.next_v))
    }

    /// The straight path of the moving vertex.
    pub(crate) fn path(&self) -> Segment {
        Segment::new(self.old_pos, self.new_pos)
    }

    /// Whether the translation would flip the polygon's orientation or
    /// roll it over another ring, which can never produce a simple
    /// polygon. Returns `(reject, split_hint)`; the split hint is only
    /// produced when `allow_split` (the kinetic variant decomposes a
    /// passed-by hole instead of rejecting it).
    pub(crate) fn check_orientation(
        &self,
        tri: &Triangulation,
        allow_split: bool,
    ) -> (bool, bool) {
        let mut split = false;
        let prev_pos = tri.position(self.prev_v);
        let next_pos = tri.position(self.next_v);
        let own_ring = tri.ring_of(self.original);

        // A moving vertex can drag its two edges across a hole. Only
        // inner rings can be passed by; one witness vertex per ring
        // suffices because rings cannot end up half-inside the swept
        // triangles of a still-simple polygon.
        for i in 1..tri.ring_count() {
            let ring = RingId(i as u32);
            if own_ring == Some(ring) {
                continue;
            }
            let witness = tri.position(tri.ring_vertex(ring, 0));

            let inside0 =
                tri.point_in_triangle(self.old_pos, self.new_pos, prev_pos, witness);
            let inside1 =
                tri.point_in_triangle(self.old_pos, self.new_pos, next_pos, witness);

            if allow_split && inside0 && inside1 {
                split = true;
                continue;
            }
            if inside0 || inside1 {
                return (true, split);
            }
        }

        // An orientation change moves the vertex across the whole
        // polygon, which requires the quadrilateral of old and new edges
        // to be simple in the first place.
        let prev_old = tri.edge_segment(self.prev_old_e);
        let next_old = tri.edge_segment(self.next_old_e);
        let quad_simple = intersect(
            tri.config.arithmetic,
            prev_old,
            self.next_new(tri),
            false,
        ) == Intersection::None
            && intersect(
                tri.config.arithmetic,
                next_old,
                self.prev_new(tri),
                false,
            ) == Intersection::None;

        if !quad_simple {
            return (false, split);
        }

        if tri.ring_size_of(self.original) == 3 {
            // A triangle ring flips orientation exactly when the vertex
            // crosses (or grazes) the line through its two neighbors.
            let area_old = tri.orient(prev_pos, next_pos, self.old_pos);
            let area_new = tri.orient(prev_pos, next_pos, self.new_pos);
            if !same_sign(area_old, area_new) || area_new.abs() <= EPS_INT {
                return (true, split);
            }
        } else {
            // Probe two nearby ring vertices; if the orientation flipped,
            // every other vertex sits inside the quadrilateral.
            let w0 = tri.position(tri.prev_vertex(self.prev_v));
            let w1 = tri.position(tri.next_vertex(self.next_v));
            if self.inside_quadrilateral(tri, w0) || self.inside_quadrilateral(tri, w1) {
                return (true, split);
            }
        }

        // The changing ring must not roll over an inner ring either. An
        // inner ring cannot roll over the outer one, so the outer ring
        // needs no witness here.
        for i in 1..tri.ring_count() {
            let ring = RingId(i as u32);
            if own_ring == Some(ring) {
                continue;
            }
            let witness = tri.position(tri.ring_vertex(ring, 0));
            if self.inside_quadrilateral(tri, witness) {
                return (true, split);
            }
        }

        (false, split)
    }

    /// Ray-parity test against the quadrilateral of the two old and two
    /// new edges. Any `Vertex`-type hit of the probe ray makes the answer
    /// untrustworthy and is treated as "inside", rejecting the
    /// translation.
    pub(crate) fn inside_quadrilateral(&self, tri: &Triangulation, p: Point) -> bool {
        let prev_pos = tri.position(self.prev_v);
        let next_pos = tri.position(self.next_v);

        let max_x = self
            .old_pos
            .x
            .max(self.new_pos.x)
            .max(prev_pos.x)
            .max(next_pos.x);
        if p.x > max_x {
            return false;
        }

        let ray = Segment::new(p, Point::new(max_x + 10.0, p.y));
        let sides = [
            tri.edge_segment(self.prev_old_e),
            tri.edge_segment(self.next_old_e),
            self.prev_new(tri),
            self.next_new(tri),
        ];

        let mut count = 0;
        for side in sides {
            match intersect(tri.config.arithmetic, ray, side, false) {
                Intersection::Vertex => return true,
                Intersection::Edge => count += 1,
                Intersection::None => {}
            }
        }

        count % 2 == 1
    }

    /// Whether the polygon stays simple: neither of the would-be new
    /// edges may cross a polygon or frame edge. The two current polygon
    /// edges of the moving vertex are relabeled for the duration — they
    /// are the ones being replaced.
    pub(crate) fn check_simplicity(&self, tri: &mut Triangulation, stats: &mut Stats) -> bool {
        tri.set_edge_kind(self.prev_old_e, EdgeKind::Triangulation);
        tri.set_edge_kind(self.next_old_e, EdgeKind::Triangulation);

        let simple = walk_clears_boundary(tri, stats, self.prev_v, self.prev_new(tri))
            && walk_clears_boundary(tri, stats, self.next_v, self.next_new(tri));

        tri.set_edge_kind(self.prev_old_e, EdgeKind::Polygon);
        tri.set_edge_kind(self.next_old_e, EdgeKind::Polygon);

        simple
    }
}

/// Trace `seg`, starting inside the surrounding polygon of `from`,
/// through the triangulation. True iff the segment comes to rest in some
/// triangle without ever crossing a polygon or frame edge or hitting a
/// vertex.
///
/// A segment that intersects several edges of one triangle (or several
/// surrounding edges) has run into numerical trouble; that also fails
/// the walk.
pub(crate) fn walk_clears_boundary(
    tri: &Triangulation,
    stats: &mut Stats,
    from: VertexId,
    seg: Segment,
) -> bool {
    let mode = tri.config.arithmetic;
    let sur_edges = tri.surrounding_edges(from);
    stats.record_walk_start(sur_edges.len());

    let mut crossed = None;
    let mut count = 0;
    for &e in &sur_edges {
        match intersect(mode, seg, tri.edge_segment(e), false) {
            Intersection::Vertex => return false,
            Intersection::Edge => {
                count += 1;
                crossed = Some(e);
            }
            Intersection::None => {}
        }
    }

    let mut crossed = match (count, crossed) {
        (0, _) => return true,
        (1, Some(e)) => e,
        _ => {
            if tri.config.verbosity == Verbosity::Verbose {
                eprintln!("simplicity walk: multiple surrounding edges crossed, rejecting");
            }
            return false;
        }
    };

    if tri.edge_kind(crossed) != EdgeKind::Triangulation {
        return false;
    }
    let mut current = tri
        .edge_triangle_not_containing(crossed, from)
        .expect("triangulation edge with one triangle");

    let mut passed: u64 = 2;
    loop {
        stats.record_walk_step(passed);

        let [e0, e1] = tri.tri_other_edges(current, crossed);
        let i0 = intersect(mode, seg, tri.edge_segment(e0), false);
        let i1 = intersect(mode, seg, tri.edge_segment(e1), false);

        match (i0, i1) {
            (Intersection::None, Intersection::None) => return true,
            (Intersection::Vertex, _) | (_, Intersection::Vertex) => return false,
            (Intersection::Edge, Intersection::Edge) => {
                if tri.config.verbosity == Verbosity::Verbose {
                    eprintln!("simplicity walk: both far edges crossed, rejecting");
                }
                return false;
            }
            (Intersection::Edge, _) => crossed = e0,
            (_, Intersection::Edge) => crossed = e1,
        }

        if tri.edge_kind(crossed) != EdgeKind::Triangulation {
            return false;
        }
        current = tri
            .edge_other_triangle(crossed, current)
            .expect("triangulation edge with one triangle");
        passed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::settings::Settings;
    use crate::triangulation::RingId;

    fn built() -> Triangulation {
        let settings = Settings {
            start_size: 12,
            ..Settings::default()
        };
        generate_regular_polygon(&settings, false)
    }

    #[test]
    fn small_move_passes_both_prechecks() {
        let mut tri = built();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        let frame = Frame::new(&tri, v, 0.001, 0.001);

        let (reject, split) = frame.check_orientation(&tri, true);
        assert!(!reject);
        assert!(!split);

        let mut stats = Stats::default();
        assert!(frame.check_simplicity(&mut tri, &mut stats));
        assert!(stats.walk_checks >= 2);
    }

    #[test]
    fn triangle_ring_rejects_crossing_its_opposite_edge() {
        let settings = Settings {
            start_size: 3,
            outer_size: 3,
            ..Settings::default()
        };
        let tri = generate_regular_polygon(&settings, false);
        let v = tri.ring_vertex(RingId::OUTER, 0);
        // The vertex sits at (r, 0); its neighbors' line is x = -r/2, and
        // the move crosses it.
        let frame = Frame::new(&tri, v, -0.5, 0.0);
        let (reject, _) = frame.check_orientation(&tri, true);
        assert!(reject);
    }

    #[test]
    fn dragging_an_edge_across_the_polygon_fails_simplicity() {
        let mut tri = built();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        // The new edges would cross the far side of the ring.
        let frame = Frame::new(&tri, v, -0.5, 0.0);
        let mut stats = Stats::default();
        assert!(!frame.check_simplicity(&mut tri, &mut stats));
    }

    #[test]
    fn leaving_the_frame_fails_the_simplicity_walk() {
        let mut tri = built();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        // Far beyond the bounding box.
        let frame = Frame::new(&tri, v, 10.0, 0.0);
        let mut stats = Stats::default();
        assert!(!frame.check_simplicity(&mut tri, &mut stats));
    }

    #[test]
    fn quadrilateral_parity() {
        let tri = built();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        let frame = Frame::new(&tri, v, 0.05, 0.0);

        // The centroid of old position, new position and the neighbors
        // lies inside the quadrilateral.
        let prev = tri.position(frame.prev_v);
        let next = tri.position(frame.next_v);
        let inside = Point::new(
            (frame.old_pos.x + frame.new_pos.x + prev.x + next.x) / 4.0,
            (frame.old_pos.y + frame.new_pos.y + prev.y + next.y) / 4.0,
        );
        assert!(frame.inside_quadrilateral(&tri, inside));

        let outside = Point::new(frame.new_pos.x + 1.0, frame.new_pos.y + 1.0);
        assert!(!frame.inside_quadrilateral(&tri, outside));
    }
}
