//! Kinetic vertex translation.
//!
//! The moving vertex slides linearly from its start to its target position
//! over logical time t in [0, 1]. Whenever an incident triangle's signed
//! area would cross zero, the triangle collapses; each collapse is handled
//! by flipping the triangle's longest edge, and the two triangles created
//! by the flip are tested for their own future collapses. A translation
//! whose straight path crosses a polygon edge, or that drags its edges
//! across a hole, cannot run in one piece and is decomposed into two
//! sequential translations.
//!
//! All reinsertion decisions after a flip use static vertex positions,
//! never the interpolated position of the moving vertex: the accumulated
//! rounding in that position is exactly what must not be amplified.

use crate::fatal::{abort, Fatal};
use crate::geometry::{intersection_point, same_sign, Intersection, Point};
use crate::mutation::events::EventQueue;
use crate::mutation::frame::{walk_clears_boundary, Frame, Outcome};
use crate::settings::Verbosity;
use crate::stats::Stats;
use crate::triangulation::{EdgeKind, TriangleId, Triangulation, VertexId};

/// Position of a translation in a split pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Whole,
    SplitPart1,
    SplitPart2,
}

/// One applied flip, recorded for rollback: the diagonal that was removed
/// and the one that replaced it.
struct FlipRecord {
    old_d0: VertexId,
    old_d1: VertexId,
    new_d0: VertexId,
    new_d1: VertexId,
}

pub(crate) struct KineticTranslation {
    frame: Frame,
    phase: Phase,
    split: bool,
    queue: EventQueue,
    flip_stack: Vec<FlipRecord>,
    current_time: f64,
}

/// Run a full kinetic translation attempt: pre-checks, execution, repair
/// and the surrounding-polygon gate.
pub(crate) fn translate_kinetic(
    tri: &mut Triangulation,
    stats: &mut Stats,
    v: VertexId,
    dx: f64,
    dy: f64,
) -> Outcome {
    let mut tr = KineticTranslation::new(tri, stats, v, dx, dy, Phase::Whole);

    let (reject, split_hint) = tr.frame.check_orientation(tri, true);
    let outcome = if reject || !tr.frame.check_simplicity(tri, stats) {
        Outcome::Rejected
    } else {
        tr.split = split_hint;
        tr.execute(tri, stats)
    };

    match outcome {
        Outcome::Full => {}
        Outcome::Partial => stats.partials += 1,
        Outcome::Undone => stats.undone += 1,
        Outcome::Rejected => stats.rejected += 1,
    }

    tr.finish(tri, stats);
    outcome
}

impl KineticTranslation {
    fn new(
        tri: &Triangulation,
        stats: &mut Stats,
        v: VertexId,
        dx: f64,
        dy: f64,
        phase: Phase,
    ) -> Self {
        stats.translation_tries += 1;
        Self {
            frame: Frame::new(tri, v, dx, dy),
            phase,
            split: false,
            queue: EventQueue::new(),
            flip_stack: Vec::new(),
            current_time: 0.0,
        }
    }

    /// Decide whether the translation must be split: it must if the
    /// straight path of the moving vertex crosses any polygon edge.
    fn check_split(&mut self, tri: &Triangulation, stats: &mut Stats) {
        if self.split {
            return;
        }
        self.split = !walk_clears_boundary(tri, stats, self.frame.original, self.frame.path());
    }

    fn execute(&mut self, tri: &mut Triangulation, stats: &mut Stats) -> Outcome {
        if self.phase == Phase::Whole {
            self.check_split(tri, stats);
        }

        if self.split {
            let prev = tri.position(self.frame.prev_v);
            let next = tri.position(self.frame.next_v);
            let area_old = tri.orient(prev, next, self.frame.old_pos);
            let area_new = tri.orient(prev, next, self.frame.new_pos);

            return if same_sign(area_old, area_new) {
                self.execute_split_retain_side(tri, stats)
            } else {
                self.execute_split_change_side(tri, stats)
            };
        }

        if !self.generate_initial_queue(tri) {
            self.queue.clear(tri);
            return Outcome::Rejected;
        }

        while let Some((time, triangle)) = self.queue.pop() {
            self.current_time = time;

            if !self.flip(tri, triangle, false) {
                // Clear before undoing: the rollback destroys triangles
                // that may still sit in the queue.
                self.queue.clear(tri);
                let undone = self.undo(tri);
                return if undone { Outcome::Undone } else { Outcome::Partial };
            }
        }

        tri.set_position(self.frame.original, self.frame.new_pos);
        Outcome::Full
    }

    /// Build the initial event queue: one event per incident triangle
    /// whose opposite edge lies between the start and the target position
    /// of the moving vertex.
    ///
    /// An incident triangle that is degenerate already at the start gets a
    /// security flip instead, and the translation is rejected so the
    /// caller retries from clean state. If the degenerate triangle's
    /// longest edge is a polygon edge, the vertex sits exactly on the
    /// boundary, which is fatal.
    fn generate_initial_queue(&mut self, tri: &mut Triangulation) -> bool {
        for t in tri.vertex_triangles(self.frame.original) {
            let opposite = tri.tri_edge_not_containing(t, self.frame.original);
            let (v0, v1) = tri.edge_vertices(opposite);
            let p0 = tri.position(v0);
            let p1 = tri.position(v1);

            let area_old = tri.orient(p0, p1, self.frame.old_pos);
            if area_old == 0.0 {
                let longest = tri.longest_edge_collapsed(t);
                if tri.edge_kind(longest) == EdgeKind::Polygon {
                    abort(
                        Fatal::VertexOnPolygonEdgeAtStart,
                        &format!(
                            "vertex {:?} lies exactly on a polygon edge before its translation",
                            self.frame.original
                        ),
                    );
                }
                if tri.config.verbosity == Verbosity::Verbose {
                    eprintln!("degenerate incident triangle at translation start, security flip");
                }
                self.flip(tri, t, true);
                return false;
            }

            let area_new = tri.orient(p0, p1, self.frame.new_pos);
            // An exact zero can carry either sign; the triangle collapses
            // in that case too.
            if area_new != 0.0 && same_sign(area_old, area_new) {
                continue;
            }

            let mut time = tri.collapse_time(
                t,
                self.frame.original,
                self.frame.old_pos,
                self.frame.dx,
                self.frame.dy,
            );
            if !(0.0..=1.0).contains(&time) {
                if tri.config.verbosity == Verbosity::Verbose {
                    eprintln!("collapse time {:.20} clamped", time);
                }
                time = time.clamp(0.0, 1.0);
            }

            tri.set_enqueued(t, true);
            self.queue.insert_without_check(time, t);
        }

        self.queue.make_stable()
    }

    /// Execute one collapse by flipping the longest edge of `t0`.
    ///
    /// With `single_flip` the flip is a standalone repair; nothing is
    /// scheduled and the moving vertex keeps its position. Otherwise the
    /// vertex is first advanced to the event time, and afterwards the two
    /// new triangles are tested for future collapses.
    fn flip(&mut self, tri: &mut Triangulation, t0: TriangleId, single_flip: bool) -> bool {
        let original = self.frame.original;
        let old_pos = self.frame.old_pos;
        let (dx, dy) = (self.frame.dx, self.frame.dy);

        if !single_flip {
            tri.set_position(
                original,
                Point::new(
                    old_pos.x + dx * self.current_time,
                    old_pos.y + dy * self.current_time,
                ),
            );
        }

        let e = tri.longest_edge_collapsed(t0);
        if tri.edge_kind(e) == EdgeKind::Polygon {
            abort(
                Fatal::PolygonEdgeFlip,
                &format!(
                    "flip wants to remove a polygon edge (vertex {:?}, d = ({}, {}))",
                    original, dx, dy
                ),
            );
        }

        let opposite_flip = !tri.edge_contains(e, original);

        let t1 = tri
            .edge_other_triangle(e, t0)
            .expect("interior edge with a single triangle");
        if tri.is_enqueued(t1) {
            self.queue.remove(t1);
            tri.set_enqueued(t1, false);
        }

        let (vj0, vj1) = tri.edge_vertices(e);
        let vn0 = tri.tri_opposite_vertex(t0, e);
        let vn1 = tri.tri_opposite_vertex(t1, e);

        // The flipped edge is never a polygon edge, so both triangles lie
        // on the same side of the boundary.
        let internal = tri.is_internal(t0);

        tri.destroy_edge(e);

        let diagonal = tri.create_edge(vn0, vn1, EdgeKind::Triangulation);

        let e1 = tri.edge_between(vj0, vn0).expect("flip quadrilateral lost a side");
        let e2 = tri.edge_between(vj0, vn1).expect("flip quadrilateral lost a side");
        let new_t0 = tri.create_triangle([diagonal, e1, e2], [vn0, vn1, vj0], internal);

        let e1 = tri.edge_between(vj1, vn0).expect("flip quadrilateral lost a side");
        let e2 = tri.edge_between(vj1, vn1).expect("flip quadrilateral lost a side");
        let new_t1 = tri.create_triangle([diagonal, e1, e2], [vn0, vn1, vj1], internal);

        if single_flip {
            return true;
        }

        if tri.config.local_checking {
            self.flip_stack.push(FlipRecord {
                old_d0: vj0,
                old_d1: vj1,
                new_d0: vn0,
                new_d1: vn1,
            });
        }

        let inserted = if opposite_flip {
            let common = if vn0 == original { vn1 } else { vn0 };
            self.insert_after_opposite_flip(tri, new_t0, new_t1, vj0, vj1, common)
        } else {
            let opposite = if vj0 == original { vj1 } else { vj0 };
            let with_moving = if tri.tri_contains_vertex(new_t0, original) {
                new_t0
            } else {
                new_t1
            };
            self.insert_after_non_opposite_flip(tri, with_moving, vn0, vn1, opposite)
        };

        if inserted {
            self.queue.make_stable()
        } else {
            true
        }
    }

    /// After a flip of the edge opposite the moving vertex, decide which
    /// of the two new triangles will collapse later in this translation.
    ///
    /// `common` is the non-moving vertex shared by both new triangles. If
    /// it lies inside the corridor swept by the two lines parallel to the
    /// motion through `left_v` and `right_v`, both triangles collapse in
    /// the future; otherwise exactly one does. Either way a triangle is
    /// only enqueued if it collapses before the translation ends, i.e. if
    /// start and target position lie on opposite sides of its static
    /// edge.
    fn insert_after_opposite_flip(
        &mut self,
        tri: &mut Triangulation,
        left_t: TriangleId,
        right_t: TriangleId,
        left_v: VertexId,
        right_v: VertexId,
        common: VertexId,
    ) -> bool {
        let original = self.frame.original;
        let old_pos = self.frame.old_pos;
        let new_pos = self.frame.new_pos;
        let (dx, dy) = (self.frame.dx, self.frame.dy);

        let lv = tri.position(left_v);
        let rv = tri.position(right_v);
        let cm = tri.position(common);

        let mut inserted = false;

        let corridor_left = tri.orient(lv, lv.translated(dx, dy), cm);
        let corridor_right = tri.orient(rv, rv.translated(dx, dy), cm);

        if !same_sign(corridor_left, corridor_right) {
            // Common vertex inside the corridor: both new triangles
            // collapse in the future.
            let a0 = tri.orient(lv, cm, old_pos);
            let a1 = tri.orient(lv, cm, new_pos);
            if a1 == 0.0 || !same_sign(a0, a1) {
                let time = tri.collapse_time(left_t, original, old_pos, dx, dy);
                self.queue.insert_without_check(time, left_t);
                tri.set_enqueued(left_t, true);
                inserted = true;
            }

            let a0 = tri.orient(rv, cm, old_pos);
            let a1 = tri.orient(rv, cm, new_pos);
            if a1 == 0.0 || !same_sign(a0, a1) {
                let time = tri.collapse_time(right_t, original, old_pos, dx, dy);
                self.queue.insert_without_check(time, right_t);
                tri.set_enqueued(right_t, true);
                inserted = true;
            }
        } else {
            // Common vertex outside the corridor: the collapsing triangle
            // is the one on the far side of the line through `left_v`
            // parallel to the motion, seen from the start position.
            let side_common = tri.orient(lv, lv.translated(dx, dy), cm);
            let side_moving = tri.orient(lv, lv.translated(dx, dy), old_pos);

            if same_sign(side_common, side_moving) {
                let a0 = tri.orient(lv, cm, old_pos);
                let a1 = tri.orient(lv, cm, new_pos);
                if a1 == 0.0 || !same_sign(a0, a1) {
                    let time = tri.collapse_time(left_t, original, old_pos, dx, dy);
                    self.queue.insert_without_check(time, left_t);
                    tri.set_enqueued(left_t, true);
                    inserted = true;
                }
            } else {
                let a0 = tri.orient(rv, cm, old_pos);
                let a1 = tri.orient(rv, cm, new_pos);
                if a1 == 0.0 || !same_sign(a0, a1) {
                    let time = tri.collapse_time(right_t, original, old_pos, dx, dy);
                    self.queue.insert_without_check(time, right_t);
                    tri.set_enqueued(right_t, true);
                    inserted = true;
                }
            }
        }

        inserted
    }

    /// After a flip of an edge containing the moving vertex, only the new
    /// triangle still containing it can collapse again. It will collapse
    /// in the future iff the new diagonal does not separate the far
    /// vertex of the static triangle from the target position, and before
    /// the end iff the diagonal separates start from target.
    fn insert_after_non_opposite_flip(
        &mut self,
        tri: &mut Triangulation,
        t: TriangleId,
        shared0: VertexId,
        shared1: VertexId,
        opposite: VertexId,
    ) -> bool {
        let original = self.frame.original;
        let old_pos = self.frame.old_pos;
        let new_pos = self.frame.new_pos;
        let (dx, dy) = (self.frame.dx, self.frame.dy);

        let s0 = tri.position(shared0);
        let s1 = tri.position(shared1);

        let area_opposite = tri.orient(s0, s1, tri.position(opposite));
        let area_new = tri.orient(s0, s1, new_pos);

        if same_sign(area_opposite, area_new) {
            let area_old = tri.orient(s0, s1, old_pos);
            if area_new == 0.0 || !same_sign(area_old, area_new) {
                let time = tri.collapse_time(t, original, old_pos, dx, dy);
                self.queue.insert_without_check(time, t);
                tri.set_enqueued(t, true);
                return true;
            }
        }

        false
    }

    /// Split a translation that keeps the moving vertex on its side of
    /// the neighbor chord: move first to the point where one old edge
    /// crosses the opposite new edge, then onward to the target.
    fn execute_split_retain_side(&mut self, tri: &mut Triangulation, stats: &mut Stats) -> Outcome {
        stats.splits += 1;
        let mode = tri.config.arithmetic;
        let frame = &self.frame;

        let prev_old = tri.edge_segment(frame.prev_old_e);
        let next_old = tri.edge_segment(frame.next_old_e);
        let prev_new = frame.prev_new(tri);
        let next_new = frame.next_new(tri);

        // Exactly one of the two opposite pairs crosses.
        let ip = if crate::geometry::intersect(mode, prev_old, next_new, false)
            != Intersection::None
        {
            intersection_point(prev_old, next_new)
        } else if crate::geometry::intersect(mode, next_old, prev_new, false)
            != Intersection::None
        {
            intersection_point(next_old, prev_new)
        } else {
            None
        };
        let Some(ip) = ip else {
            return Outcome::Rejected;
        };

        let original = frame.original;
        let target = frame.new_pos;

        let mut part1 = KineticTranslation::new(
            tri,
            stats,
            original,
            ip.x - frame.old_pos.x,
            ip.y - frame.old_pos.y,
            Phase::SplitPart1,
        );
        let ex = part1.execute(tri, stats);
        part1.finish(tri, stats);
        if ex != Outcome::Full {
            return ex;
        }

        let at = tri.position(original);
        let mut part2 = KineticTranslation::new(
            tri,
            stats,
            original,
            target.x - at.x,
            target.y - at.y,
            Phase::SplitPart2,
        );
        let ex = part2.execute(tri, stats);
        part2.finish(tri, stats);
        if ex == Outcome::Full {
            ex
        } else {
            Outcome::Partial
        }
    }

    /// Split a translation that carries the moving vertex across the
    /// chord between its neighbors: move first onto the chord's midpoint,
    /// flip the chord triangle if it refuses to vanish numerically, then
    /// move onward.
    fn execute_split_change_side(&mut self, tri: &mut Triangulation, stats: &mut Stats) -> Outcome {
        stats.splits += 1;
        let original = self.frame.original;
        let prev_v = self.frame.prev_v;
        let next_v = self.frame.next_v;
        let old_pos = self.frame.old_pos;
        let target = self.frame.new_pos;

        let prev = tri.position(prev_v);
        let next = tri.position(next_v);
        let middle = Point::new((prev.x + next.x) / 2.0, (prev.y + next.y) / 2.0);

        let mut part1 = KineticTranslation::new(
            tri,
            stats,
            original,
            middle.x - old_pos.x,
            middle.y - old_pos.y,
            Phase::SplitPart1,
        );
        let ex = part1.execute(tri, stats);
        part1.finish(tri, stats);
        if ex != Outcome::Full {
            return ex;
        }

        // Numerically the triangle spanning the chord may survive the
        // vertex arriving on the chord; it must be gone before part two.
        if let Some(chord) = tri.edge_between(prev_v, next_v) {
            if let Some(t) = tri.edge_triangle_containing(chord, original) {
                self.flip(tri, t, true);
            }
        }

        let at = tri.position(original);
        let mut part2 = KineticTranslation::new(
            tri,
            stats,
            original,
            target.x - at.x,
            target.y - at.y,
            Phase::SplitPart2,
        );
        let ex = part2.execute(tri, stats);
        part2.finish(tri, stats);
        if ex == Outcome::Full {
            ex
        } else {
            Outcome::Partial
        }
    }

    /// Roll back an aborted execution if the moving vertex has left its
    /// surrounding polygon: replay the flip stack in reverse, restoring
    /// each removed diagonal, and put the vertex back onto its start
    /// position.
    fn undo(&mut self, tri: &mut Triangulation) -> bool {
        if !tri.config.local_checking {
            return false;
        }
        if tri.check_surrounding_polygon(self.frame.original) {
            return false;
        }

        if tri.config.verbosity == Verbosity::Verbose {
            eprintln!("surrounding polygon broken after abort, undoing translation");
        }

        while let Some(f) = self.flip_stack.pop() {
            let e = tri
                .edge_between(f.new_d0, f.new_d1)
                .expect("undo lost the flipped diagonal");
            let (t0, _) = tri.edge_triangles(e);
            let internal = tri.is_internal(t0.expect("diagonal without triangles"));

            tri.destroy_edge(e);

            let diagonal = tri.create_edge(f.old_d0, f.old_d1, EdgeKind::Triangulation);

            let ea = tri.edge_between(f.old_d0, f.new_d0).expect("undo lost a side");
            let eb = tri.edge_between(f.old_d1, f.new_d0).expect("undo lost a side");
            tri.create_triangle([diagonal, ea, eb], [f.old_d0, f.old_d1, f.new_d0], internal);

            let ea = tri.edge_between(f.old_d0, f.new_d1).expect("undo lost a side");
            let eb = tri.edge_between(f.old_d1, f.new_d1).expect("undo lost a side");
            tri.create_triangle([diagonal, ea, eb], [f.old_d0, f.old_d1, f.new_d1], internal);
        }

        tri.set_position(self.frame.original, self.frame.old_pos);
        true
    }

    /// Repair pass at the end of a translation: any incident triangle
    /// left with exactly zero area is flipped away, or, when its longest
    /// edge is a polygon edge, the vertex is backed off by a tenth of the
    /// translation. Split translations produce such triangles on purpose
    /// by parking the vertex on an edge between their two parts.
    fn repair_end(&mut self, tri: &mut Triangulation, stats: &mut Stats) {
        let original = self.frame.original;
        let (dx, dy) = (self.frame.dx, self.frame.dy);

        for t in tri.vertex_triangles(original) {
            if !tri.triangle_is_live(t) {
                continue;
            }
            if tri.signed_area(t) != 0.0 {
                continue;
            }

            if self.phase == Phase::Whole && tri.config.verbosity == Verbosity::Verbose {
                eprintln!("triangle area exactly 0 after translation, repairing");
            }

            let longest = tri.longest_edge_collapsed(t);
            if tri.edge_kind(longest) != EdgeKind::Polygon {
                self.flip(tri, t, true);
            } else {
                let mut back_off = KineticTranslation::new(
                    tri,
                    stats,
                    original,
                    -dx * 0.1,
                    -dy * 0.1,
                    Phase::Whole,
                );
                let ex = back_off.execute(tri, stats);
                back_off.finish(tri, stats);

                if ex == Outcome::Rejected {
                    abort(
                        Fatal::VertexOnPolygonEdgeAtEnd,
                        &format!(
                            "vertex {:?} rests on a polygon edge and cannot be backed off",
                            original
                        ),
                    );
                }
            }
        }
    }

    /// Bookkeeping run on every exit path: refresh selector weights
    /// around the moved vertex, drop the undo records, repair degenerate
    /// triangles, and verify the surrounding polygon.
    fn finish(&mut self, tri: &mut Triangulation, stats: &mut Stats) {
        if tri.config.weighted_selection {
            tri.update_edge_weight(self.frame.prev_old_e);
            tri.update_edge_weight(self.frame.next_old_e);
        }
        for t in tri.vertex_triangles(self.frame.original) {
            tri.update_triangle_weight(t);
        }

        self.flip_stack.clear();

        self.repair_end(tri, stats);

        if !tri.check_surrounding_polygon(self.frame.original) {
            eprintln!("start position: {:?}", self.frame.old_pos);
            eprintln!("current position: {:?}", tri.position(self.frame.original));
            eprintln!("target position: {:?}", self.frame.new_pos);
            eprintln!(
                "translation vector: dx = {:.20} dy = {:.20}",
                self.frame.dx, self.frame.dy
            );
            let _ = crate::io::write_triangulation_graphml(tri, "failure.graphml".as_ref());
            abort(
                Fatal::SurroundingPolygonAtEnd,
                &format!(
                    "vertex {:?} left its surrounding polygon undetected",
                    self.frame.original
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::rng::RandomSource;
    use crate::settings::Settings;
    use crate::triangulation::RingId;

    fn built(n: usize) -> Triangulation {
        let settings = Settings {
            start_size: n,
            outer_size: n.max(100),
            ..Settings::default()
        };
        generate_regular_polygon(&settings, false)
    }

    #[test]
    fn tiny_move_completes_fully() {
        let mut tri = built(12);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        let before = tri.position(v);

        let outcome = translate_kinetic(&mut tri, &mut stats, v, 1e-4, 1e-4);

        assert_eq!(outcome, Outcome::Full);
        let after = tri.position(v);
        assert!((after.x - before.x - 1e-4).abs() < 1e-15);
        assert!((after.y - before.y - 1e-4).abs() < 1e-15);
        assert!(tri.check_now());
    }

    #[test]
    fn full_translation_preserves_ring_sizes() {
        let mut tri = built(12);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 3);

        let outcome = translate_kinetic(&mut tri, &mut stats, v, 0.01, -0.005);

        assert_ne!(outcome, Outcome::Partial);
        assert_eq!(tri.ring_len(RingId::OUTER), 12);
        assert!(tri.check_now());
    }

    #[test]
    fn rejected_translation_leaves_positions_alone() {
        let mut tri = built(3);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        let before = tri.position(v);

        // Crossing the opposite edge of a triangle ring is always
        // rejected by the orientation pre-check.
        let outcome = translate_kinetic(&mut tri, &mut stats, v, -0.5, 0.0);

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(stats.rejected, 1);
        let after = tri.position(v);
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert!(tri.check_now());
    }

    #[test]
    fn moves_that_force_flips_keep_the_triangulation_sound() {
        let mut tri = built(16);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(7);

        let mut performed = 0;
        for i in 0..200 {
            let n = tri.vertex_count();
            let v = tri.vertex_order()[rng.index(n).min(n - 1)];
            let alpha = rng.uniform(-std::f64::consts::PI, std::f64::consts::PI);
            let stddev = tri.directed_edge_length(v, alpha);
            let r = rng.normal(stddev / 2.0, stddev / 6.0);
            let (dx, dy) = (r * alpha.cos(), r * alpha.sin());

            if translate_kinetic(&mut tri, &mut stats, v, dx, dy) != Outcome::Rejected {
                performed += 1;
            }

            if i % 50 == 0 {
                assert!(tri.check_now(), "triangulation broken after {} tries", i);
            }
        }

        assert!(performed > 0, "no translation went through at all");
        assert!(tri.check_now());
        tri.check_simplicity();
        assert_eq!(tri.ring_len(RingId::OUTER), 16);
    }

    #[test]
    fn translation_counters_add_up() {
        let mut tri = built(8);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 0);

        translate_kinetic(&mut tri, &mut stats, v, 1e-4, 0.0);
        assert!(stats.translation_tries >= 1);
    }
}
