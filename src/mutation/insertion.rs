//! Vertex insertion into a polygon edge.
//!
//! The chosen edge is split at its midpoint: the edge and its two owning
//! triangles are removed, the midpoint vertex joins the ring, and the
//! emptied quadrilateral is refilled with two polygon edges, two spokes
//! and four triangles. A follow-up translation then tries to move the new
//! vertex off the straight boundary.

use crate::geometry::Arithmetic;
use crate::mutation::frame::Outcome;
use crate::mutation::{random_move, translate};
use crate::rng::RandomSource;
use crate::settings::{Settings, Verbosity};
use crate::stats::Stats;
use crate::triangulation::{EdgeId, EdgeKind, RingId, Triangulation, VertexId};

pub(crate) struct Insertion {
    ring: RingId,
    e: EdgeId,
    v0: VertexId,
    v1: VertexId,
    new_v: Option<VertexId>,
}

impl Insertion {
    /// Insert into the outgoing polygon edge of the ring vertex at
    /// `index`.
    pub(crate) fn at_index(tri: &Triangulation, ring: RingId, index: usize) -> Self {
        let v0 = tri.ring_vertex(ring, index);
        let e = tri.to_next_edge(v0).expect("ring vertex without successor edge");
        let v1 = tri.next_vertex(v0);
        Self { ring, e, v0, v1, new_v: None }
    }

    /// Insert into an explicitly chosen polygon edge.
    pub(crate) fn at_edge(tri: &Triangulation, ring: RingId, e: EdgeId) -> Self {
        let (v0, v1) = tri.edge_vertices(e);
        Self { ring, e, v0, v1, new_v: None }
    }

    /// Whether the chosen edge can be split without numerical risk: it
    /// must not be shorter than the minimal length, and in double
    /// arithmetic both owning triangles must have a solid area. Wafer
    /// thin triangles at the split point would let the follow-up
    /// translation push the vertex out of its surrounding polygon.
    pub(crate) fn check_stability(&self, tri: &Triangulation, settings: &Settings) -> bool {
        if tri.edge_length(self.e) < settings.min_length {
            return false;
        }

        if tri.config.arithmetic == Arithmetic::Double {
            let (t0, t1) = tri.edge_triangles(self.e);
            for t in [t0, t1].into_iter().flatten() {
                if tri.signed_area(t).abs() < settings.min_det_insertion {
                    return false;
                }
            }
        }

        true
    }

    /// Split the edge at its midpoint.
    pub(crate) fn execute(&mut self, tri: &mut Triangulation, stats: &mut Stats) {
        let p0 = tri.position(self.v0);
        let p1 = tri.position(self.v1);
        let x = p0.x + (p1.x - p0.x) / 2.0;
        let y = p0.y + (p1.y - p0.y) / 2.0;

        let (t0, t1) = tri.edge_triangles(self.e);
        let t0 = t0.expect("polygon edge without triangles");
        let t1 = t1.expect("polygon edge with a single triangle");
        let other0 = tri.tri_opposite_vertex(t0, self.e);
        let other1 = tri.tri_opposite_vertex(t1, self.e);
        let internal0 = tri.is_internal(t0);
        let internal1 = tri.is_internal(t1);

        let m = tri.create_vertex(x, y, self.ring);
        self.new_v = Some(m);

        tri.destroy_edge(self.e);

        let v0_other0 = tri.edge_between(self.v0, other0).expect("quadrilateral lost a side");
        let v0_other1 = tri.edge_between(self.v0, other1).expect("quadrilateral lost a side");
        let v1_other0 = tri.edge_between(self.v1, other0).expect("quadrilateral lost a side");
        let v1_other1 = tri.edge_between(self.v1, other1).expect("quadrilateral lost a side");

        let from_v0 = tri.create_edge(self.v0, m, EdgeKind::Polygon);
        let to_v1 = tri.create_edge(m, self.v1, EdgeKind::Polygon);
        let spoke0 = tri.create_edge(m, other0, EdgeKind::Triangulation);
        let spoke1 = tri.create_edge(m, other1, EdgeKind::Triangulation);

        tri.create_triangle([from_v0, v0_other0, spoke0], [self.v0, m, other0], internal0);
        tri.create_triangle([from_v0, v0_other1, spoke1], [self.v0, m, other1], internal1);
        tri.create_triangle([to_v1, v1_other0, spoke0], [self.v1, m, other0], internal0);
        tri.create_triangle([to_v1, v1_other1, spoke1], [self.v1, m, other1], internal1);

        stats.insertions += 1;
    }

    /// Try to move the fresh vertex off its edge: random directions with
    /// distances scaled by the local triangle size, until a translation
    /// moves the vertex at least partially or the attempts run out.
    /// Giving up is fine; the polygon is valid either way.
    pub(crate) fn translate(
        &self,
        tri: &mut Triangulation,
        stats: &mut Stats,
        rng: &mut RandomSource,
        settings: &Settings,
    ) {
        let v = self.new_v.expect("translate before execute");

        for _ in 0..settings.insertion_tries {
            let (dx, dy) = random_move(tri, rng, v);

            let outcome = translate(tri, stats, v, dx, dy, settings.translation_mode);
            if matches!(outcome, Outcome::Full | Outcome::Partial) {
                return;
            }
        }

        if tri.config.verbosity == Verbosity::Verbose {
            eprintln!("no suitable translation found for an inserted vertex");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::settings::Settings;

    fn built() -> (Triangulation, Settings) {
        let settings = Settings {
            start_size: 10,
            outer_size: 40,
            ..Settings::default()
        };
        (generate_regular_polygon(&settings, false), settings)
    }

    #[test]
    fn execute_grows_the_ring_by_one() {
        let (mut tri, settings) = built();
        let mut stats = Stats::default();
        let v0 = tri.ring_vertex(RingId::OUTER, 0);
        let e = tri.to_next_edge(v0).unwrap();

        let mut ins = Insertion::at_edge(&tri, RingId::OUTER, e);
        assert!(ins.check_stability(&tri, &settings));
        ins.execute(&mut tri, &mut stats);

        assert_eq!(tri.ring_len(RingId::OUTER), 11);
        assert_eq!(stats.insertions, 1);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn midpoint_lies_on_the_old_edge() {
        let (mut tri, _) = built();
        let mut stats = Stats::default();
        let v0 = tri.ring_vertex(RingId::OUTER, 2);
        let v1 = tri.next_vertex(v0);
        let p0 = tri.position(v0);
        let p1 = tri.position(v1);

        let mut ins = Insertion::at_index(&tri, RingId::OUTER, 2);
        ins.execute(&mut tri, &mut stats);

        let m = tri.next_vertex(v0);
        assert_ne!(m, v1);
        let pm = tri.position(m);
        assert!((pm.x - (p0.x + p1.x) / 2.0).abs() < 1e-15);
        assert!((pm.y - (p0.y + p1.y) / 2.0).abs() < 1e-15);

        // Ring pointers reroute through the midpoint.
        assert_eq!(tri.next_vertex(m), v1);
        assert_eq!(tri.prev_vertex(v1), m);
    }

    #[test]
    fn short_edges_are_refused() {
        let (tri, mut settings) = built();
        settings.min_length = 10.0;
        let ins = Insertion::at_index(&tri, RingId::OUTER, 0);
        assert!(!ins.check_stability(&tri, &settings));
    }

    #[test]
    fn insert_then_translate_keeps_the_polygon_simple() {
        let (mut tri, settings) = built();
        let mut stats = Stats::default();
        let mut rng = crate::rng::RandomSource::seeded(11);

        for i in 0..8 {
            let e = tri.random_edge(RingId::OUTER, &mut rng).unwrap();
            let mut ins = Insertion::at_edge(&tri, RingId::OUTER, e);
            if !ins.check_stability(&tri, &settings) {
                continue;
            }
            ins.execute(&mut tri, &mut stats);
            ins.translate(&mut tri, &mut stats, &mut rng, &settings);

            assert!(tri.check_now(), "triangulation broken after insertion {}", i);
        }

        tri.check_simplicity();
    }
}
