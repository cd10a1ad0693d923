//! Construction of the initial triangulated polygon.
//!
//! The start polygon is a regular n-gon on a circle around the origin. Its
//! interior is triangulated in a zig-zag fashion (or around one initial
//! triangular hole), and the gap between the polygon and the axis-aligned
//! bounding square is triangulated quadrant by quadrant.

use std::f64::consts::PI;

use crate::settings::Settings;
use crate::triangulation::{EdgeId, EdgeKind, RingId, Triangulation, VertexId};

/// Build the initial triangulation: regular polygon, interior
/// triangulation (optionally around one initial hole), bounding frame.
pub fn generate_regular_polygon(settings: &Settings, with_initial_hole: bool) -> Triangulation {
    let mut tri = Triangulation::new(settings.tri_config());
    let outer = tri.create_ring(settings.outer_size);

    let n = settings.start_size;
    let alpha = 2.0 * PI / n as f64;
    for i in 0..n {
        let angle = i as f64 * alpha;
        tri.create_vertex(
            settings.radius_polygon * angle.cos(),
            settings.radius_polygon * angle.sin(),
            outer,
        );
    }

    if with_initial_hole {
        build_initial_hole(&mut tri, settings);
    } else {
        triangulate_zigzag(&mut tri, n);
    }

    box_polygon(&mut tri, settings.box_size, n);

    tri
}

/// Add the polygon edges of the outer ring and triangulate its interior
/// zig-zag style: the chain alternates between the low and the high end of
/// the vertex circle, so every triangle spans two boundary edges' worth of
/// progress.
fn triangulate_zigzag(tri: &mut Triangulation, n: usize) {
    let outer = RingId::OUTER;

    let mut v0 = tri.ring_vertex(outer, 0);
    let mut v1 = tri.ring_vertex(outer, n - 1);
    let mut v2;
    let mut e0 = tri.create_edge(v1, v0, EdgeKind::Polygon);
    let mut e1 = e0;
    let mut e2;

    // The interior of an n-gon holds n - 2 triangles.
    for i in 0..n - 2 {
        if i % 2 == 0 {
            v2 = v1;
            v1 = tri.ring_vertex(outer, i / 2 + 1);

            e2 = e0;
            e0 = tri.create_edge(v0, v1, EdgeKind::Polygon);
            e1 = tri.create_edge(v1, v2, EdgeKind::Triangulation);

            tri.create_triangle([e0, e1, e2], [v0, v1, v2], true);
        } else {
            v0 = v1;
            v1 = tri.ring_vertex(outer, n - i / 2 - 2);
            v2 = tri.ring_vertex(outer, n - i / 2 - 1);

            e2 = e1;
            e0 = tri.create_edge(v0, v1, EdgeKind::Triangulation);
            e1 = tri.create_edge(v1, v2, EdgeKind::Polygon);

            tri.create_triangle([e0, e1, e2], [v0, v1, v2], true);
        }
    }

    // The chain's last interior edge is in truth the missing boundary
    // edge; which one that is depends on the parity of n.
    if n % 2 == 0 {
        let (a, b) = tri.edge_vertices(e0);
        // e0 was created as (v0, v1) in ring direction.
        tri.promote_to_polygon(e0, a, b, outer);
    } else {
        let (a, b) = tri.edge_vertices(e1);
        tri.promote_to_polygon(e1, a, b, outer);
    }
}

/// Add the outer polygon edges and triangulate the interior around one
/// triangular hole in the middle: each third of the boundary is fanned
/// onto one hole vertex.
fn build_initial_hole(tri: &mut Triangulation, settings: &Settings) {
    let outer = RingId::OUTER;
    let n = settings.start_size;
    let hole_target = settings.hole_sizes.first().copied().unwrap_or(3);
    let inner = tri.create_ring(hole_target);

    let alpha = 2.0 * PI / 3.0;
    let r = settings.radius_hole;
    let hv0 = tri.create_vertex(r, 0.0, inner);
    let hv1 = tri.create_vertex(r * alpha.cos(), r * alpha.sin(), inner);
    let hv2 = tri.create_vertex(r * (2.0 * alpha).cos(), r * (2.0 * alpha).sin(), inner);

    // First third: fan onto hv0.
    let mut v0 = tri.ring_vertex(outer, 0);
    let mut v1 = tri.ring_vertex(outer, 1);

    let mut e0 = tri.create_edge(v0, v1, EdgeKind::Polygon);
    let mut e1 = tri.create_edge(v0, hv0, EdgeKind::Triangulation);
    let mut e2 = tri.create_edge(v1, hv0, EdgeKind::Triangulation);
    let start = e1;
    tri.create_triangle([e0, e1, e2], [v0, v1, hv0], true);

    let mut i = 2;
    while i <= n / 3 {
        v0 = v1;
        v1 = tri.ring_vertex(outer, i);

        e0 = tri.create_edge(v0, v1, EdgeKind::Polygon);
        e1 = e2;
        e2 = tri.create_edge(v1, hv0, EdgeKind::Triangulation);

        tri.create_triangle([e0, e1, e2], [v0, v1, hv0], true);
        i += 1;
    }

    // Connect the first third with the second. The hole ring runs
    // clockwise, opposite to the outer ring.
    e0 = tri.create_edge(hv1, hv0, EdgeKind::Polygon);
    e1 = e2;
    e2 = tri.create_edge(v1, hv1, EdgeKind::Triangulation);
    tri.create_triangle([e0, e1, e2], [v1, hv0, hv1], true);
    let hole_e0 = e0;

    // Second third: fan onto hv1.
    while i <= 2 * n / 3 {
        v0 = v1;
        v1 = tri.ring_vertex(outer, i);

        e0 = tri.create_edge(v0, v1, EdgeKind::Polygon);
        e1 = e2;
        e2 = tri.create_edge(v1, hv1, EdgeKind::Triangulation);

        tri.create_triangle([e0, e1, e2], [v0, v1, hv1], true);
        i += 1;
    }

    // Connect the second third with the third.
    e0 = tri.create_edge(hv2, hv1, EdgeKind::Polygon);
    e1 = e2;
    e2 = tri.create_edge(v1, hv2, EdgeKind::Triangulation);
    tri.create_triangle([e0, e1, e2], [v1, hv1, hv2], true);
    let hole_e1 = e0;

    // Last third: fan onto hv2.
    while i <= n - 1 {
        v0 = v1;
        v1 = tri.ring_vertex(outer, i);

        e0 = tri.create_edge(v0, v1, EdgeKind::Polygon);
        e1 = e2;
        e2 = tri.create_edge(v1, hv2, EdgeKind::Triangulation);

        tri.create_triangle([e0, e1, e2], [v0, v1, hv2], true);
        i += 1;
    }

    // Close the hole ring and the outer ring.
    e0 = tri.create_edge(hv0, hv2, EdgeKind::Polygon);
    e1 = e2;
    e2 = tri.create_edge(v1, hv0, EdgeKind::Triangulation);
    tri.create_triangle([e0, e1, e2], [v1, hv2, hv0], true);
    let hole_e2 = e0;

    // The hole interior counts as exterior.
    tri.create_triangle([hole_e0, hole_e1, hole_e2], [hv0, hv1, hv2], false);

    let first = tri.ring_vertex(outer, 0);
    e0 = tri.create_edge(v1, first, EdgeKind::Polygon);
    tri.create_triangle([e0, e2, start], [v1, first, hv0], true);
}

/// Surround the polygon with an axis-aligned square of frame edges and
/// triangulate the gap, one frame corner per quadrant of the vertex
/// circle.
fn box_polygon(tri: &mut Triangulation, box_size: f64, n: usize) {
    let outer = RingId::OUTER;
    let half = box_size / 2.0;

    /*
        Corner layout:

        1 - 0
        |   |
        2 - 3
    */
    let rv0 = tri.create_frame_vertex(half, half);
    let rv1 = tri.create_frame_vertex(-half, half);
    let rv2 = tri.create_frame_vertex(-half, -half);
    let rv3 = tri.create_frame_vertex(half, -half);
    tri.set_frame([rv0, rv1, rv2, rv3]);

    let re0 = tri.create_edge(rv0, rv1, EdgeKind::Frame);
    let re1 = tri.create_edge(rv1, rv2, EdgeKind::Frame);
    let re2 = tri.create_edge(rv2, rv3, EdgeKind::Frame);
    let re3 = tri.create_edge(rv3, rv0, EdgeKind::Frame);

    let limit0 = (n + 1) / 4;
    let limit1 = n / 2;
    let limit2 = 3 * n / 4;

    let connect = |tri: &mut Triangulation, v0: VertexId, v1: VertexId, corner: VertexId, prev: EdgeId| {
        let next = tri.create_edge(v1, corner, EdgeKind::Triangulation);
        let boundary = tri.edge_between(v0, v1).expect("missing boundary edge");
        tri.create_triangle([prev, boundary, next], [v0, v1, corner], false);
        next
    };

    // First quadrant.
    let mut v0 = tri.ring_vertex(outer, 0);
    let start = tri.create_edge(v0, rv0, EdgeKind::Triangulation);
    let mut prev = start;
    let mut i = 1;
    while i <= limit0 {
        let v1 = tri.ring_vertex(outer, i);
        prev = connect(tri, v0, v1, rv0, prev);
        v0 = v1;
        i += 1;
    }

    // Second quadrant, closing the gap at the corner.
    let mut next = tri.create_edge(v0, rv1, EdgeKind::Triangulation);
    tri.create_triangle([prev, next, re0], [v0, rv0, rv1], false);
    prev = next;
    while i <= limit1 {
        let v1 = tri.ring_vertex(outer, i);
        prev = connect(tri, v0, v1, rv1, prev);
        v0 = v1;
        i += 1;
    }

    // Third quadrant.
    next = tri.create_edge(v0, rv2, EdgeKind::Triangulation);
    tri.create_triangle([prev, next, re1], [v0, rv1, rv2], false);
    prev = next;
    while i <= limit2 {
        let v1 = tri.ring_vertex(outer, i);
        prev = connect(tri, v0, v1, rv2, prev);
        v0 = v1;
        i += 1;
    }

    // Fourth quadrant.
    next = tri.create_edge(v0, rv3, EdgeKind::Triangulation);
    tri.create_triangle([prev, next, re2], [v0, rv2, rv3], false);
    prev = next;
    while i < n {
        let v1 = tri.ring_vertex(outer, i);
        prev = connect(tri, v0, v1, rv3, prev);
        v0 = v1;
        i += 1;
    }

    // Close the ring between the fourth and the first quadrant.
    let v1 = tri.ring_vertex(outer, 0);
    next = tri.create_edge(v1, rv3, EdgeKind::Triangulation);
    let boundary = tri.edge_between(v0, v1).expect("missing closing boundary edge");
    tri.create_triangle([prev, boundary, next], [v0, v1, rv3], false);
    tri.create_triangle([next, start, re3], [v1, rv0, rv3], false);
}

#[cfg(test)]
mod tests {
    use super::generate_regular_polygon;
    use crate::settings::Settings;
    use crate::triangulation::{EdgeKind, RingId};

    fn settings(start_size: usize) -> Settings {
        Settings {
            start_size,
            outer_size: start_size.max(100),
            global_checking: true,
            ..Settings::default()
        }
    }

    #[test]
    fn even_polygon_is_structurally_sound() {
        let tri = generate_regular_polygon(&settings(20), false);
        assert_eq!(tri.ring_len(RingId::OUTER), 20);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn odd_polygon_is_structurally_sound() {
        let tri = generate_regular_polygon(&settings(13), false);
        assert_eq!(tri.ring_len(RingId::OUTER), 13);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn smallest_polygon_builds() {
        let mut s = settings(3);
        s.outer_size = 3;
        let tri = generate_regular_polygon(&s, false);
        assert_eq!(tri.ring_len(RingId::OUTER), 3);
        assert!(tri.check_now());
    }

    #[test]
    fn ring_cycles_in_both_directions() {
        let tri = generate_regular_polygon(&settings(8), false);
        let start = tri.ring_vertex(RingId::OUTER, 0);
        let mut v = start;
        for _ in 0..8 {
            v = tri.next_vertex(v);
        }
        assert_eq!(v, start);
        for _ in 0..8 {
            v = tri.prev_vertex(v);
        }
        assert_eq!(v, start);
    }

    #[test]
    fn triangle_counts_match_the_construction() {
        let n = 16;
        let tri = generate_regular_polygon(&settings(n), false);
        // n - 2 interior triangles and n + 4 frame-gap triangles.
        assert_eq!(tri.live_triangles().count(), (n - 2) + n + 4);
        let internal = tri.live_triangles().filter(|&t| tri.is_internal(t)).count();
        assert_eq!(internal, n - 2);
    }

    #[test]
    fn initial_hole_builds_and_checks() {
        let mut s = settings(12);
        s.hole_sizes = vec![3];
        let tri = generate_regular_polygon(&s, true);
        assert_eq!(tri.ring_count(), 2);
        assert_eq!(tri.ring_len(RingId(1)), 3);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn frame_edges_carry_exactly_one_triangle() {
        let tri = generate_regular_polygon(&settings(10), false);
        for e in tri.live_edges() {
            if tri.edge_kind(e) == EdgeKind::Frame {
                let (t0, t1) = tri.edge_triangles(e);
                assert!(t0.is_some() ^ t1.is_some());
            }
        }
    }
}
