//! Hole creation and the two hole-shaping moves.

use crate::mutation::translate;
use crate::rng::RandomSource;
use crate::settings::Settings;
use crate::stats::Stats;
use crate::triangulation::{EdgeKind, RingId, Triangulation};

/// Punch a triangular hole into the polygon interior: sample an internal
/// triangle by weight, remove it, place a shrunken copy of it as a new
/// ring halfway between its centroid and its corners, and retriangulate
/// the border strip between old triangle and new hole.
pub(crate) fn insert_hole(
    tri: &mut Triangulation,
    rng: &mut RandomSource,
    settings: &Settings,
) -> Option<RingId> {
    let t = tri.random_internal_triangle(rng)?;
    let [v0, v1, v2] = tri.triangle_vertices(t);

    // Fetch the boundary edges by endpoints; the triangle's own edge
    // order does not guarantee which side is which.
    let e0 = tri.edge_between(v0, v1).expect("triangle lost a side");
    let e1 = tri.edge_between(v1, v2).expect("triangle lost a side");
    let e2 = tri.edge_between(v2, v0).expect("triangle lost a side");

    tri.destroy_triangle(t);

    let ring_index = tri.ring_count();
    let target = settings
        .hole_sizes
        .get(ring_index.saturating_sub(1))
        .copied()
        .unwrap_or(3)
        .max(3);
    let ring = tri.create_ring(target);

    let p0 = tri.position(v0);
    let p1 = tri.position(v1);
    let p2 = tri.position(v2);
    let mx = (p0.x + p1.x + p2.x) / 3.0;
    let my = (p0.y + p1.y + p2.y) / 3.0;

    let h0 = tri.create_vertex((p0.x + mx) / 2.0, (p0.y + my) / 2.0, ring);
    let h1 = tri.create_vertex((p1.x + mx) / 2.0, (p1.y + my) / 2.0, ring);
    let h2 = tri.create_vertex((p2.x + mx) / 2.0, (p2.y + my) / 2.0, ring);

    // Hole rings run clockwise, opposite to the outer ring; the sampled
    // triangle's vertex order carries no orientation guarantee.
    let (hole_e0, hole_e1, hole_e2) = if tri.orient(p0, p1, p2) > 0.0 {
        let e0 = tri.create_edge(h1, h0, EdgeKind::Polygon);
        let e1 = tri.create_edge(h2, h1, EdgeKind::Polygon);
        let e2 = tri.create_edge(h0, h2, EdgeKind::Polygon);
        (e0, e1, e2)
    } else {
        let e0 = tri.create_edge(h0, h1, EdgeKind::Polygon);
        let e1 = tri.create_edge(h1, h2, EdgeKind::Polygon);
        let e2 = tri.create_edge(h2, h0, EdgeKind::Polygon);
        (e0, e1, e2)
    };

    // The hole's inside counts as exterior.
    tri.create_triangle([hole_e0, hole_e1, hole_e2], [h0, h1, h2], false);

    // The strip between the old triangle and the hole, two triangles per
    // side.
    let con0 = tri.create_edge(v0, h0, EdgeKind::Triangulation);
    let con1 = tri.create_edge(v1, h1, EdgeKind::Triangulation);
    let con2 = tri.create_edge(v2, h2, EdgeKind::Triangulation);

    let d = tri.create_edge(v0, h1, EdgeKind::Triangulation);
    tri.create_triangle([con0, hole_e0, d], [v0, h0, h1], true);
    tri.create_triangle([d, e0, con1], [v0, v1, h1], true);

    let d = tri.create_edge(v1, h2, EdgeKind::Triangulation);
    tri.create_triangle([con1, hole_e1, d], [v1, h1, h2], true);
    tri.create_triangle([d, e1, con2], [v1, v2, h2], true);

    let d = tri.create_edge(v2, h0, EdgeKind::Triangulation);
    tri.create_triangle([con2, hole_e2, d], [v2, h2, h0], true);
    tri.create_triangle([d, e2, con0], [v2, v0, h0], true);

    Some(ring)
}

/// One inflation pass over a hole: every attempt picks a random hole
/// vertex and pushes it along the outward normal of its ring, with a
/// little angular jitter, growing the hole into the polygon interior.
pub(crate) fn inflate_hole(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
    ring: RingId,
) {
    let attempts = tri.ring_len(ring);
    for _ in 0..attempts {
        let v = tri.ring_vertex(ring, rng.index(tri.ring_len(ring)));

        let alpha = tri.normal_direction_outside(v) + rng.uniform(-0.3, 0.3);
        let stddev = tri.directed_edge_length(v, alpha);
        let r = rng.normal(stddev / 2.0, stddev / 6.0);

        translate(
            tri,
            stats,
            v,
            r * alpha.cos(),
            r * alpha.sin(),
            settings.translation_mode,
        );
    }
}

/// One shrink pass around a hole: every attempt picks a random hole
/// vertex, selects (via `offset`) one of its triangulation neighbors on a
/// different ring, and pulls that neighbor toward the hole vertex,
/// tightening the surrounding boundary.
pub(crate) fn shrink_around_hole(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
    ring: RingId,
    offset: usize,
) {
    let attempts = tri.ring_len(ring);
    for _ in 0..attempts {
        let v = tri.ring_vertex(ring, rng.index(tri.ring_len(ring)));

        let candidates: Vec<_> = tri
            .vertex_edges(v)
            .into_iter()
            .map(|e| tri.other_vertex(e, v))
            .filter(|&w| !tri.is_frame_corner(w) && tri.ring_of(w) != Some(ring))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let w = candidates[offset % candidates.len()];

        let target = tri.position(v);
        let from = tri.position(w);
        let factor = rng.normal(0.5, 1.0 / 6.0).clamp(0.05, 0.9);

        translate(
            tri,
            stats,
            w,
            (target.x - from.x) * factor,
            (target.y - from.y) * factor,
            settings.translation_mode,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::settings::Settings;

    fn built() -> (Triangulation, Settings) {
        let settings = Settings {
            start_size: 20,
            outer_size: 60,
            hole_sizes: vec![6],
            ..Settings::default()
        };
        (generate_regular_polygon(&settings, false), settings)
    }

    #[test]
    fn hole_insertion_creates_a_valid_ring() {
        let (mut tri, settings) = built();
        let mut rng = RandomSource::seeded(5);

        let ring = insert_hole(&mut tri, &mut rng, &settings).unwrap();

        assert_eq!(tri.ring_count(), 2);
        assert_eq!(tri.ring_len(ring), 3);
        assert!(tri.check_now());
        tri.check_simplicity();

        // The hole interior is exterior to the polygon.
        let mut external = 0;
        for t in tri.live_triangles() {
            let [a, b, c] = tri.triangle_vertices(t);
            if [a, b, c].iter().all(|&v| tri.ring_of(v) == Some(ring)) {
                assert!(!tri.is_internal(t));
                external += 1;
            }
        }
        assert_eq!(external, 1);
    }

    #[test]
    fn hole_ring_cycles() {
        let (mut tri, settings) = built();
        let mut rng = RandomSource::seeded(6);
        let ring = insert_hole(&mut tri, &mut rng, &settings).unwrap();

        let start = tri.ring_vertex(ring, 0);
        let mut v = start;
        for _ in 0..3 {
            v = tri.next_vertex(v);
            assert_eq!(tri.ring_of(v), Some(ring));
        }
        assert_eq!(v, start);
    }

    #[test]
    fn inflate_and_shrink_keep_the_triangulation_sound() {
        let (mut tri, settings) = built();
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(7);

        let ring = insert_hole(&mut tri, &mut rng, &settings).unwrap();

        for pass in 0..3 {
            inflate_hole(&mut tri, &mut stats, &mut rng, &settings, ring);
            shrink_around_hole(&mut tri, &mut stats, &mut rng, &settings, ring, pass);
        }

        assert!(tri.check_now());
        tri.check_simplicity();
        assert_eq!(tri.ring_len(ring), 3);
    }
}
