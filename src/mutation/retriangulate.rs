//! Retriangulating vertex translation.
//!
//! Instead of scheduling collapse events, this variant removes every
//! triangulation edge inside the region the moving vertex drags its two
//! polygon edges across, moves the vertex in one jump, and refills the
//! region from its boundary chains.
//!
//! A side-changing move (the vertex crosses the chord between its ring
//! neighbors) splits the region into a star-shaped polygon behind the
//! vertex, closed by the chord and clipped around the start position, and
//! up to two edge-visible polygons in front, found by tracing the would-be
//! new polygon edges through the triangulation. A move that keeps its side
//! and stays within the vertex's surrounding polygon rebuilds that polygon
//! directly. Everything else is refused before any mutation, so this
//! variant is all-or-nothing: there is no partial outcome.

use crate::geometry::{intersect, same_sign, Intersection, Point, Segment};
use crate::mutation::frame::{Frame, Outcome};
use crate::mutation::region::{RegionKind, RegionPolygon};
use crate::stats::Stats;
use crate::triangulation::{EdgeId, EdgeKind, TriangleId, Triangulation, VertexId};

/// Run a full retriangulating translation attempt.
pub(crate) fn translate_retriangulation(
    tri: &mut Triangulation,
    stats: &mut Stats,
    v: VertexId,
    dx: f64,
    dy: f64,
) -> Outcome {
    stats.translation_tries += 1;
    let tr = RetriangulationTranslation {
        frame: Frame::new(tri, v, dx, dy),
    };

    let (reject, _) = tr.frame.check_orientation(tri, false);
    let outcome = if reject || !tr.frame.check_simplicity(tri, stats) {
        Outcome::Rejected
    } else {
        tr.execute(tri)
    };

    match outcome {
        Outcome::Full => {}
        Outcome::Undone => stats.undone += 1,
        Outcome::Rejected | Outcome::Partial => stats.rejected += 1,
    }

    tr.finish(tri);
    outcome
}

/// One fan side of the moving vertex: the triangles between its two
/// polygon edges in one direction, their outer boundary, the intermediate
/// chain vertices and the spokes to the moving vertex.
struct FanSide {
    triangles: Vec<TriangleId>,
    outer: Vec<EdgeId>,
    verts: Vec<VertexId>,
    spokes: Vec<EdgeId>,
    internal: bool,
}

struct RetriangulationTranslation {
    frame: Frame,
}

impl RetriangulationTranslation {
    fn execute(&self, tri: &mut Triangulation) -> Outcome {
        let f = &self.frame;
        let prev = tri.position(f.prev_v);
        let next = tri.position(f.next_v);
        let area_old = tri.orient(prev, next, f.old_pos);
        let area_new = tri.orient(prev, next, f.new_pos);

        if !same_sign(area_old, area_new) {
            self.execute_side_change(tri)
        } else {
            self.execute_retained(tri)
        }
    }

    /*
        Side change
    */

    fn execute_side_change(&self, tri: &mut Triangulation) -> Outcome {
        // The decomposition assumes the translation quadrilateral is
        // simple; with a non-simple one the traces could run into the
        // boundary. Refuse before touching anything.
        let f = &self.frame;
        let quad_simple = {
            let mode = tri.config.arithmetic;
            let prev_old = tri.edge_segment(f.prev_old_e);
            let next_old = tri.edge_segment(f.next_old_e);
            intersect(mode, prev_old, f.next_new(tri), false) == Intersection::None
                && intersect(mode, next_old, f.prev_new(tri), false) == Intersection::None
        };
        if !quad_simple {
            return Outcome::Rejected;
        }

        let p0 = self.build_opposite(tri);
        let direction = self.build_direction(tri);

        tri.set_position(self.frame.original, self.frame.new_pos);

        if let Some((region, internal)) = p0 {
            region.triangulate(tri, internal);
        }
        if let Some((region, internal)) = direction.p1 {
            region.triangulate(tri, internal);
        }
        if let Some((region, internal)) = direction.p2 {
            region.triangulate(tri, internal);
        }

        Outcome::Full
    }

    /// Collect and clear the fan on the side opposite the motion into a
    /// star-shaped region polygon (kernel: the start position), closed by
    /// the chord between the two ring neighbors.
    ///
    /// If the chord is missing it is created together with the pocket
    /// triangle between chord and moving vertex; the pocket follows the
    /// vertex across the chord and therefore belongs to the motion-side
    /// region. A fan side consisting of a single triangle leaves nothing
    /// to retriangulate; only its pocket is rebuilt.
    fn build_opposite(&self, tri: &mut Triangulation) -> Option<(RegionPolygon, bool)> {
        let f = &self.frame;
        let prev_pos = tri.position(f.prev_v);
        let area_new = tri.orient(prev_pos, f.old_pos, tri.position(f.next_v));

        // Of the two triangles on the edge to the predecessor, take the
        // one on the side away from the successor.
        let (cand0, cand1) = tri.edge_triangles(f.prev_old_e);
        let mut t = cand0.expect("polygon edge without triangles");
        let witness = tri.tri_opposite_vertex(t, f.prev_old_e);
        let area_old = tri.orient(prev_pos, f.old_pos, tri.position(witness));
        if same_sign(area_old, area_new) || witness == f.next_v {
            t = cand1.expect("polygon edge with a single triangle");
        }

        let internal = tri.is_internal(t);

        let mut p0 = RegionPolygon::new(RegionKind::StarShaped);
        p0.add_vertex(f.prev_v);

        let mut spokes: Vec<EdgeId> = Vec::new();
        let mut e = f.prev_old_e;
        loop {
            p0.add_edge(tri.tri_edge_not_containing(t, f.original));
            e = tri.tri_other_edge_containing(t, f.original, e);
            p0.add_vertex(tri.other_vertex(e, f.original));

            let crossed_far_edge = e == f.next_old_e;
            let next_t = tri.edge_other_triangle(e, t);
            tri.destroy_triangle(t);
            if crossed_far_edge {
                break;
            }
            spokes.push(e);
            t = next_t.expect("fan interrupted before the far polygon edge");
        }
        for s in spokes {
            tri.destroy_edge(s);
        }

        // After the walk, the only triangle left on the edge to the
        // predecessor is the one on the motion side. The pocket between
        // the chord and the moving vertex follows the vertex across the
        // chord, so it carries the motion side's flag.
        let motion_flag = {
            let (a, b) = tri.edge_triangles(f.prev_old_e);
            let t = a.or(b).expect("polygon edge lost both triangles");
            tri.is_internal(t)
        };

        let chord = match tri.edge_between(f.prev_v, f.next_v) {
            Some(chord) => {
                if p0.len() < 3 {
                    // The opposite fan was the pocket triangle itself.
                    tri.create_triangle(
                        [chord, f.prev_old_e, f.next_old_e],
                        [f.prev_v, f.next_v, f.original],
                        motion_flag,
                    );
                    return None;
                }
                chord
            }
            None => {
                let chord = tri.create_edge(f.prev_v, f.next_v, EdgeKind::Triangulation);
                tri.create_triangle(
                    [chord, f.prev_old_e, f.next_old_e],
                    [f.prev_v, f.next_v, f.original],
                    motion_flag,
                );
                chord
            }
        };

        p0.close(chord);
        p0.set_kernel(f.old_pos);
        Some((p0, internal))
    }

    /// Trace the two would-be polygon edges from the neighbors toward the
    /// target position, clearing every crossed edge and collecting the
    /// boundary chains of the up to two edge-visible polygons beside the
    /// motion. Creates the edges and triangles linking the moved vertex
    /// into the triangle its path ends in.
    fn build_direction(&self, tri: &mut Triangulation) -> DirectionBuild {
        let f = &self.frame;
        let mode = tri.config.arithmetic;
        let prev_new = f.prev_new(tri);
        let next_new = f.next_new(tri);

        let mut removals: Vec<EdgeId> = Vec::new();
        let mut motion_internal: Option<bool> = None;

        let mut p1 = RegionPolygon::new(RegionKind::EdgeVisible);
        p1.add_vertex(f.prev_v);
        let mut p2 = RegionPolygon::new(RegionKind::EdgeVisible);
        p2.add_vertex(f.next_v);

        /*
            Trace toward the target from the predecessor.
        */

        let mut last_e: Option<EdgeId> = None;
        let mut last_t: Option<TriangleId> = None;

        for se in tri.surrounding_edges(f.prev_v) {
            if intersect(mode, prev_new, tri.edge_segment(se), false) != Intersection::None {
                tri.set_intersected(se, true);
                removals.push(se);
                last_e = Some(se);
                break;
            }
        }

        let leaves_sp1 = last_e.is_some();
        if let Some(first) = last_e {
            let area_other =
                tri.orient(tri.position(f.prev_v), f.new_pos, tri.position(f.next_v));

            let (ev0, ev1) = tri.edge_vertices(first);
            let mut side_v = ev0;
            let area_test =
                tri.orient(tri.position(f.prev_v), f.new_pos, tri.position(side_v));
            if same_sign(area_other, area_test) {
                side_v = ev1;
            }

            let start_t = tri
                .edge_triangle_containing(first, f.prev_v)
                .expect("crossed edge without a triangle at its start vertex");
            p1.add_edge(
                tri.tri_edge_between(start_t, f.prev_v, side_v)
                    .expect("start triangle without its side edge"),
            );
            motion_internal.get_or_insert(tri.is_internal(start_t));

            let (e, t) = trace_region(
                tri,
                prev_new,
                f.new_pos,
                area_other,
                f.prev_v,
                first,
                start_t,
                &mut p1,
                &mut removals,
            );
            last_e = Some(e);
            last_t = Some(t);
        }
        let p1_last_e = last_e;

        /*
            Trace toward the target from the successor.
        */

        let mut found: Option<EdgeId> = None;
        for se in tri.surrounding_edges(f.next_v) {
            if intersect(mode, next_new, tri.edge_segment(se), false) != Intersection::None {
                if !tri.is_intersected(se) {
                    tri.set_intersected(se, true);
                    removals.push(se);
                }
                found = Some(se);
                break;
            }
        }

        let leaves_sp2 = found.is_some();
        if let Some(first) = found {
            let area_other =
                tri.orient(tri.position(f.next_v), f.new_pos, tri.position(f.prev_v));

            let (ev0, ev1) = tri.edge_vertices(first);
            let mut side_v = ev0;
            let area_test =
                tri.orient(tri.position(f.next_v), f.new_pos, tri.position(side_v));
            if same_sign(area_other, area_test) {
                side_v = ev1;
            }

            let start_t = tri
                .edge_triangle_containing(first, f.next_v)
                .expect("crossed edge without a triangle at its start vertex");
            p2.add_edge(
                tri.tri_edge_between(start_t, f.next_v, side_v)
                    .expect("start triangle without its side edge"),
            );
            motion_internal.get_or_insert(tri.is_internal(start_t));

            let (e, t) = trace_region(
                tri,
                next_new,
                f.new_pos,
                area_other,
                f.next_v,
                first,
                start_t,
                &mut p2,
                &mut removals,
            );
            last_e = Some(e);
            last_t = Some(t);
        } else {
            last_e = p1_last_e;
        }

        /*
            Neither edge leaves its surrounding polygon: one new edge
            through the triangle across the chord repairs everything.
        */

        if !leaves_sp1 && !leaves_sp2 {
            let chord = tri
                .edge_between(f.prev_v, f.next_v)
                .expect("target inside both surrounding polygons without a chord");
            let far_t = tri
                .edge_triangle_not_containing(chord, f.original)
                .expect("chord without a far triangle");
            let far_v = tri.tri_opposite_vertex(far_t, chord);
            let internal = tri.is_internal(far_t);

            tri.destroy_triangle(far_t);

            let link = tri.create_edge(f.original, far_v, EdgeKind::Triangulation);
            let side_prev = tri
                .edge_between(f.prev_v, far_v)
                .expect("far triangle lost its sides");
            let side_next = tri
                .edge_between(f.next_v, far_v)
                .expect("far triangle lost its sides");
            tri.create_triangle(
                [f.prev_old_e, link, side_prev],
                [f.prev_v, f.original, far_v],
                internal,
            );
            tri.create_triangle(
                [f.next_old_e, link, side_next],
                [f.next_v, f.original, far_v],
                internal,
            );

            return DirectionBuild { p1: None, p2: None };
        }

        // Geometry of the triangle the motion ends in.
        let final_e = last_e.expect("motion ended without a crossed edge");
        let final_t = last_t.expect("motion ended without a final triangle");
        let (v1, v2) = tri.edge_vertices(final_e);
        let v3 = tri.tri_opposite_vertex(final_t, final_e);
        let internal = motion_internal.expect("motion region flag was never seen");

        for e in removals {
            tri.destroy_edge(e);
        }

        let ends_on_fan = v1 == f.original || v2 == f.original || v3 == f.original;

        let mut keep_p1 = leaves_sp1;
        let mut keep_p2 = leaves_sp2;

        if ends_on_fan {
            if !leaves_sp1 {
                // The final triangle touches the predecessor: v3 is it.
                keep_p1 = false;
                let other = if v1 == f.original { v2 } else { v1 };
                let link = tri.create_edge(f.original, other, EdgeKind::Triangulation);
                let side = tri
                    .edge_between(v3, other)
                    .expect("final triangle lost its sides");
                tri.create_triangle(
                    [f.prev_old_e, link, side],
                    [f.prev_v, f.original, other],
                    internal,
                );

                p2.add_vertex(other);
                p2.add_edge(link);
                p2.add_vertex(f.original);
                p2.close(f.next_old_e);
            } else if !leaves_sp2 {
                keep_p2 = false;
                let other = if v1 == f.original { v2 } else { v1 };
                let link = tri.create_edge(f.original, other, EdgeKind::Triangulation);
                let side = tri
                    .edge_between(v3, other)
                    .expect("final triangle lost its sides");
                tri.create_triangle(
                    [f.next_old_e, link, side],
                    [f.next_v, f.original, other],
                    internal,
                );

                p1.add_vertex(other);
                p1.add_edge(link);
                p1.add_vertex(f.original);
                p1.close(f.prev_old_e);
            } else {
                // v3 closes the predecessor chain, the remaining endpoint
                // of the final edge closes the successor chain.
                let link1 = tri.create_edge(f.original, v3, EdgeKind::Triangulation);
                p1.add_vertex(v3);
                p1.add_edge(link1);
                p1.add_vertex(f.original);
                p1.close(f.prev_old_e);

                let other = if v1 == f.original { v2 } else { v1 };
                let link2 = tri.create_edge(f.original, other, EdgeKind::Triangulation);
                let side = tri
                    .edge_between(v3, other)
                    .expect("final triangle lost its sides");
                tri.create_triangle(
                    [link1, link2, side],
                    [f.original, other, v3],
                    internal,
                );

                p2.add_vertex(other);
                p2.add_edge(link2);
                p2.add_vertex(f.original);
                p2.close(f.next_old_e);
            }
        } else if !leaves_sp1 {
            keep_p1 = false;

            let link1 = tri.create_edge(f.original, v3, EdgeKind::Triangulation);
            let side = tri
                .edge_between(f.prev_v, v3)
                .expect("final triangle is not adjacent to the predecessor");
            tri.create_triangle(
                [f.prev_old_e, link1, side],
                [f.original, f.prev_v, v3],
                internal,
            );

            let closer = if v1 == f.prev_v { v2 } else { v1 };
            let link2 = tri.create_edge(f.original, closer, EdgeKind::Triangulation);
            let far_side = tri
                .edge_between(v3, closer)
                .expect("final triangle lost its sides");
            tri.create_triangle(
                [link1, link2, far_side],
                [f.original, closer, v3],
                internal,
            );

            p2.add_vertex(closer);
            p2.add_edge(link2);
            p2.add_vertex(f.original);
            p2.close(f.next_old_e);
        } else if !leaves_sp2 {
            keep_p2 = false;

            let link1 = tri.create_edge(f.original, v3, EdgeKind::Triangulation);
            let side = tri
                .edge_between(f.next_v, v3)
                .expect("final triangle is not adjacent to the successor");
            tri.create_triangle(
                [f.next_old_e, link1, side],
                [f.original, f.next_v, v3],
                internal,
            );

            let closer = if v1 == f.next_v { v2 } else { v1 };
            let link2 = tri.create_edge(f.original, closer, EdgeKind::Triangulation);
            let far_side = tri
                .edge_between(v3, closer)
                .expect("final triangle lost its sides");
            tri.create_triangle(
                [link1, link2, far_side],
                [f.original, closer, v3],
                internal,
            );

            p1.add_vertex(closer);
            p1.add_edge(link2);
            p1.add_vertex(f.original);
            p1.close(f.prev_old_e);
        } else {
            // Both traces left their surrounding polygons; the final
            // triangle is linked with three new edges and the two chains
            // close at whichever endpoint lies on their side.
            let link1 = tri.create_edge(v1, f.original, EdgeKind::Triangulation);
            let link2 = tri.create_edge(v2, f.original, EdgeKind::Triangulation);
            let link3 = tri.create_edge(v3, f.original, EdgeKind::Triangulation);

            let side1 = tri
                .edge_between(v1, v3)
                .expect("final triangle lost its sides");
            let side2 = tri
                .edge_between(v2, v3)
                .expect("final triangle lost its sides");
            tri.create_triangle([link1, link3, side1], [v1, f.original, v3], internal);
            tri.create_triangle([link2, link3, side2], [f.original, v2, v3], internal);

            let area_other =
                tri.orient(tri.position(f.next_v), f.new_pos, tri.position(f.prev_v));
            let area_test =
                tri.orient(tri.position(f.next_v), f.new_pos, tri.position(v1));

            let (close1, link_c1, close2, link_c2) = if same_sign(area_other, area_test) {
                (v1, link1, v2, link2)
            } else {
                (v2, link2, v1, link1)
            };

            p1.add_vertex(close1);
            p1.add_edge(link_c1);
            p1.add_vertex(f.original);
            p1.close(f.prev_old_e);

            p2.add_vertex(close2);
            p2.add_edge(link_c2);
            p2.add_vertex(f.original);
            p2.close(f.next_old_e);
        }

        DirectionBuild {
            p1: keep_p1.then_some((p1, internal)),
            p2: keep_p2.then_some((p2, internal)),
        }
    }

    /*
        Retained side
    */

    fn execute_retained(&self, tri: &mut Triangulation) -> Outcome {
        let f = &self.frame;
        let mode = tri.config.arithmetic;

        let quad_simple = {
            let prev_old = tri.edge_segment(f.prev_old_e);
            let next_old = tri.edge_segment(f.next_old_e);
            intersect(mode, prev_old, f.next_new(tri), false) == Intersection::None
                && intersect(mode, next_old, f.prev_new(tri), false) == Intersection::None
        };
        // The no-mutation refusal: a non-simple quadrilateral is the
        // far-reaching lateral case, everything else a plain rejection.
        let refuse = || {
            if quad_simple {
                Outcome::Rejected
            } else {
                Outcome::Undone
            }
        };

        // The move may cross nothing but spokes of the moving vertex;
        // otherwise its target is outside the surrounding polygon.
        let Some(s1) = trace_spokes(tri, f.prev_v, f.prev_new(tri), f.original) else {
            return refuse();
        };
        let Some(s2) = trace_spokes(tri, f.next_v, f.next_new(tri), f.original) else {
            return refuse();
        };

        // If no incident triangle changes orientation, the fan survives
        // the move as it is.
        let mut any_flip = false;
        for t in tri.vertex_triangles(f.original) {
            let opposite = tri.tri_edge_not_containing(t, f.original);
            let (a, b) = tri.edge_vertices(opposite);
            let pa = tri.position(a);
            let pb = tri.position(b);
            let area_old = tri.orient(pa, pb, f.old_pos);
            let area_new = tri.orient(pa, pb, f.new_pos);
            if area_old == 0.0 {
                return refuse();
            }
            if area_new == 0.0 || !same_sign(area_old, area_new) {
                any_flip = true;
            }
        }

        if !any_flip && s1.is_empty() && s2.is_empty() {
            tri.set_position(f.original, f.new_pos);
            return Outcome::Full;
        }

        // Rebuild the whole surrounding polygon, one side at a time.
        let (cand0, cand1) = tri.edge_triangles(f.prev_old_e);
        let side_a = walk_fan(
            tri,
            f.original,
            f.prev_old_e,
            cand0.expect("polygon edge without triangles"),
            f.next_old_e,
        );
        let side_b = walk_fan(
            tri,
            f.original,
            f.prev_old_e,
            cand1.expect("polygon edge with a single triangle"),
            f.next_old_e,
        );

        let chain_a = self.side_chain(tri, &side_a);
        let chain_b = self.side_chain(tri, &side_b);

        for side in [&side_a, &side_b] {
            for &s in &side.spokes {
                tri.destroy_edge(s);
            }
        }
        for side in [&side_a, &side_b] {
            for &t in &side.triangles {
                if tri.triangle_is_live(t) {
                    tri.destroy_triangle(t);
                }
            }
        }

        tri.set_position(f.original, f.new_pos);

        chain_a.triangulate(tri, side_a.internal);
        chain_b.triangulate(tri, side_b.internal);

        Outcome::Full
    }

    /// The closed boundary of one fan side, with the moving vertex and
    /// its two polygon edges included.
    fn side_chain(&self, tri: &Triangulation, side: &FanSide) -> RegionPolygon {
        let f = &self.frame;
        let mut p = RegionPolygon::new(RegionKind::Simple);
        p.add_vertex(f.original);
        p.add_edge(f.prev_old_e);
        p.add_vertex(f.prev_v);
        for (e, v) in side.outer.iter().zip(side.verts.iter()) {
            p.add_edge(*e);
            p.add_vertex(*v);
        }
        p.add_edge(*side.outer.last().expect("fan side without outer edges"));
        p.add_vertex(f.next_v);
        p.close(f.next_old_e);
        p
    }

    /// End-of-translation bookkeeping on every exit path: selector
    /// weights around the vertex, then the surrounding-polygon gate.
    fn finish(&self, tri: &mut Triangulation) {
        if tri.config.weighted_selection {
            tri.update_edge_weight(self.frame.prev_old_e);
            tri.update_edge_weight(self.frame.next_old_e);
        }
        for t in tri.vertex_triangles(self.frame.original) {
            tri.update_triangle_weight(t);
        }

        if !tri.check_surrounding_polygon(self.frame.original) {
            eprintln!("start position: {:?}", self.frame.old_pos);
            eprintln!("current position: {:?}", tri.position(self.frame.original));
            eprintln!("target position: {:?}", self.frame.new_pos);
            let _ = crate::io::write_triangulation_graphml(tri, "failure.graphml".as_ref());
            crate::fatal::abort(
                crate::fatal::Fatal::SurroundingPolygonAtEnd,
                &format!(
                    "vertex {:?} left its surrounding polygon after retriangulation",
                    self.frame.original
                ),
            );
        }
    }
}

struct DirectionBuild {
    p1: Option<(RegionPolygon, bool)>,
    p2: Option<(RegionPolygon, bool)>,
}

/// Continue a direction trace through the triangulation: step across
/// every crossed edge, mark it for removal, and collect the third vertex
/// and far boundary edge of every passed triangle that lies on this
/// chain's side of the line from the start vertex to the target
/// position. Returns the last crossed edge and the triangle the segment
/// ends in.
fn trace_region(
    tri: &mut Triangulation,
    seg: Segment,
    target: Point,
    area_other: f64,
    start: VertexId,
    first: EdgeId,
    start_t: TriangleId,
    region: &mut RegionPolygon,
    removals: &mut Vec<EdgeId>,
) -> (EdgeId, TriangleId) {
    let mode = tri.config.arithmetic;
    let mut e = first;
    let mut t = tri
        .edge_other_triangle(e, start_t)
        .expect("trace stepped through a boundary edge");

    loop {
        let [o0, o1] = tri.tri_other_edges(t, e);
        let crossed = if intersect(mode, seg, tri.edge_segment(o0), false) != Intersection::None {
            Some(o0)
        } else if intersect(mode, seg, tri.edge_segment(o1), false) != Intersection::None {
            Some(o1)
        } else {
            None
        };

        let Some(next_e) = crossed else {
            return (e, t);
        };
        e = next_e;

        if !tri.is_intersected(e) {
            tri.set_intersected(e, true);
            removals.push(e);
        }

        let third = tri.tri_opposite_vertex(t, e);
        let area_test = tri.orient(tri.position(start), target, tri.position(third));
        if !same_sign(area_test, area_other) {
            region.add_vertex(third);
            region.add_edge(
                tri.tri_not_intersected_edge(t)
                    .expect("passed triangle has all edges marked"),
            );
        }

        t = tri
            .edge_other_triangle(e, t)
            .expect("trace stepped through a boundary edge");
    }
}

/// Walk the fan of `v` from `start_edge` into `first_t` until
/// `end_edge`, collecting the fan's triangles, its outer boundary, the
/// intermediate chain vertices and the interior spokes.
fn walk_fan(
    tri: &Triangulation,
    v: VertexId,
    start_edge: EdgeId,
    first_t: TriangleId,
    end_edge: EdgeId,
) -> FanSide {
    let mut side = FanSide {
        triangles: Vec::new(),
        outer: Vec::new(),
        verts: Vec::new(),
        spokes: Vec::new(),
        internal: tri.is_internal(first_t),
    };

    let mut e = start_edge;
    let mut t = first_t;
    loop {
        side.triangles.push(t);
        side.outer.push(tri.tri_edge_not_containing(t, v));
        e = tri.tri_other_edge_containing(t, v, e);
        if e == end_edge {
            break;
        }
        side.spokes.push(e);
        side.verts.push(tri.other_vertex(e, v));
        t = tri
            .edge_other_triangle(e, t)
            .expect("fan interrupted before the far polygon edge");
    }

    side
}

/// Non-destructive variant of the direction trace used by retained-side
/// moves: collect the crossed edges, requiring every one of them to be a
/// triangulation spoke of `hub`. Returns `None` on any vertex hit,
/// ambiguous crossing or non-spoke crossing.
fn trace_spokes(
    tri: &Triangulation,
    from: VertexId,
    seg: Segment,
    hub: VertexId,
) -> Option<Vec<EdgeId>> {
    let mode = tri.config.arithmetic;
    let mut crossed: Vec<EdgeId> = Vec::new();

    let mut hit = None;
    let mut count = 0;
    for se in tri.surrounding_edges(from) {
        match intersect(mode, seg, tri.edge_segment(se), false) {
            Intersection::Vertex => return None,
            Intersection::Edge => {
                count += 1;
                hit = Some(se);
            }
            Intersection::None => {}
        }
    }

    let mut e = match (count, hit) {
        (0, _) => return Some(crossed),
        (1, Some(e)) => e,
        _ => return None,
    };

    let mut t = tri.edge_triangle_not_containing(e, from)?;
    loop {
        if tri.edge_kind(e) != EdgeKind::Triangulation || !tri.edge_contains(e, hub) {
            return None;
        }
        crossed.push(e);

        let [o0, o1] = tri.tri_other_edges(t, e);
        let i0 = intersect(mode, seg, tri.edge_segment(o0), false);
        let i1 = intersect(mode, seg, tri.edge_segment(o1), false);

        match (i0, i1) {
            (Intersection::None, Intersection::None) => return Some(crossed),
            (Intersection::Vertex, _) | (_, Intersection::Vertex) => return None,
            (Intersection::Edge, Intersection::Edge) => return None,
            (Intersection::Edge, _) => e = o0,
            (_, Intersection::Edge) => e = o1,
        }

        t = tri.edge_other_triangle(e, t)?;
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
    fn in_fan_move_without_flips_is_a_plain_move() {
        let mut tri = built(12);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 0);
        let before = tri.live_triangles().count();

        let outcome = translate_retriangulation(&mut tri, &mut stats, v, 1e-4, 1e-4);

        assert_eq!(outcome, Outcome::Full);
        assert_eq!(tri.live_triangles().count(), before);
        assert!(tri.check_now());
    }

    #[test]
    fn retained_move_with_flips_rebuilds_the_fan() {
        let mut tri = built(12);
        let mut stats = Stats::default();
        let v = tri.ring_vertex(RingId::OUTER, 0);

        // Move the vertex inward far enough that some incident triangle
        // flips while it stays inside the surrounding polygon.
        let outcome = translate_retriangulation(&mut tri, &mut stats, v, -0.04, 0.0);

        if outcome == Outcome::Full {
            assert!(tri.check_now());
            tri.check_simplicity();
        }
        assert_eq!(tri.ring_len(RingId::OUTER), 12);
    }

    #[test]
    fn no_partial_outcome_exists() {
        let mut tri = built(10);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(31);

        for _ in 0..150 {
            let n = tri.vertex_count();
            let v = tri.vertex_order()[rng.index(n)];
            let alpha = rng.uniform(-std::f64::consts::PI, std::f64::consts::PI);
            let stddev = tri.directed_edge_length(v, alpha);
            let r = rng.normal(stddev / 2.0, stddev / 6.0);

            let outcome =
                translate_retriangulation(&mut tri, &mut stats, v, r * alpha.cos(), r * alpha.sin());
            assert_ne!(outcome, Outcome::Partial);
        }

        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn triangulation_survives_many_retriangulating_moves() {
        let mut tri = built(14);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(99);

        let mut full = 0;
        for i in 0..300 {
            let n = tri.vertex_count();
            let v = tri.vertex_order()[rng.index(n)];
            let alpha = rng.uniform(-std::f64::consts::PI, std::f64::consts::PI);
            let stddev = tri.directed_edge_length(v, alpha);
            let r = rng.normal(stddev / 2.0, stddev / 6.0);

            if translate_retriangulation(&mut tri, &mut stats, v, r * alpha.cos(), r * alpha.sin())
                == Outcome::Full
            {
                full += 1;
            }

            if i % 60 == 0 {
                assert!(tri.check_now(), "triangulation broken after {} tries", i);
            }
        }

        assert!(full > 0, "no retriangulating move went through at all");
        assert!(tri.check_now());
        tri.check_simplicity();
    }
}
