//! Orchestration of grow and translate phases toward the target size.

use crate::fatal::{abort, Fatal};
use crate::mutation::{
    inflate_hole, insert_hole, random_move, shrink_around_hole, translate, Insertion, Outcome,
};
use crate::rng::RandomSource;
use crate::settings::{Settings, Verbosity};
use crate::stats::Stats;
use crate::triangulation::{RingId, Triangulation};

/// Try `iterations` random vertex moves over the whole triangulation.
/// Returns how many moved the vertex at least partially.
pub fn transform_polygon_by_moves(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
    iterations: usize,
) -> usize {
    let report_every = (iterations / 100).max(1);
    let mut performed = 0;

    for i in 0..iterations {
        let v = tri.vertex_order()[rng.index(tri.vertex_count())];
        let (dx, dy) = random_move(tri, rng, v);

        let outcome = translate(tri, stats, v, dx, dy, settings.translation_mode);
        if outcome != Outcome::Rejected {
            performed += 1;
            stats.translations_performed += 1;
        }

        if i % report_every == 0 && settings.verbosity >= Verbosity::Verbose {
            eprintln!(
                "{:.0}% of {} translations tried",
                i as f64 / iterations as f64 * 100.0,
                iterations
            );
        }
    }

    performed
}

/// Grow one ring by `n` insertions. Edges failing the stability check are
/// re-drawn; only actual insertions count.
pub fn grow_polygon_by(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
    ring: RingId,
    n: usize,
) {
    let report_every = (n / 100).max(1);
    let mut unstable_streak = 0usize;

    let mut i = 0;
    while i < n {
        let Some(e) = tri.random_edge(ring, rng) else {
            abort(Fatal::SelectionTree, "ring has no selectable edges");
        };
        let mut insertion = Insertion::at_edge(tri, ring, e);

        if !insertion.check_stability(tri, settings) {
            unstable_streak += 1;
            if unstable_streak > 10_000 {
                eprintln!("{} draws without a stable edge to insert into", unstable_streak);
            }
            continue;
        }
        unstable_streak = 0;

        insertion.execute(tri, stats);
        insertion.translate(tri, stats, rng, settings);

        i += 1;
        if i % report_every == 0 && settings.verbosity >= Verbosity::Verbose {
            eprintln!("{:.0}% of {} insertions done", i as f64 / n as f64 * 100.0, n);
        }
    }
}

fn checked(tri: &Triangulation, stage: &str) {
    if !tri.check() {
        abort(
            Fatal::IntegrityCheck,
            &format!("triangulation integrity lost {}", stage),
        );
    }
}

/// Shake the initial polygon, grow it to the target size in one sweep,
/// then shake again.
pub fn strategy_no_holes_0(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
) {
    let performed =
        transform_polygon_by_moves(tri, stats, rng, settings, settings.initial_translation_count());
    if settings.verbosity >= Verbosity::Verbose {
        eprintln!(
            "initial polygon transformed with {} of {} moves",
            performed,
            settings.initial_translation_count()
        );
    }
    checked(tri, "after transforming the initial polygon");

    grow_polygon_by(
        tri,
        stats,
        rng,
        settings,
        RingId::OUTER,
        settings.outer_size - settings.start_size,
    );
    checked(tri, "after growing the polygon");

    transform_polygon_by_moves(
        tri,
        stats,
        rng,
        settings,
        settings.additional_translation_count(),
    );
    checked(tri, "at the end");
}

/// Repeatedly double every ring until all targets are reached. The round
/// limit guards against an endless loop should insertions stop finding
/// stable edges.
fn doubling_rounds(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
) {
    let mut progressed = 1;
    let mut rounds = 0;
    while progressed != 0 && rounds < 20 {
        progressed = 0;

        for i in 1..tri.ring_count() {
            let ring = RingId(i as u32);
            let len = tri.ring_len(ring);
            let grow = if tri.ring_target(ring) >= 2 * len {
                len
            } else {
                tri.ring_target(ring).saturating_sub(len)
            };
            grow_polygon_by(tri, stats, rng, settings, ring, grow);
            progressed += grow;
        }

        let len = tri.ring_len(RingId::OUTER);
        let grow = if settings.outer_size >= 2 * len {
            len
        } else {
            settings.outer_size.saturating_sub(len)
        };
        grow_polygon_by(tri, stats, rng, settings, RingId::OUTER, grow);
        progressed += grow;

        rounds += 1;
    }
}

/// For polygons whose holes were already built into the initial
/// triangulation: shake, then double all rings up to their targets.
pub fn strategy_with_holes_0(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
) {
    transform_polygon_by_moves(tri, stats, rng, settings, settings.initial_translation_count());
    checked(tri, "after transforming the initial polygon");

    doubling_rounds(tri, stats, rng, settings);
    checked(tri, "after growing all rings");

    transform_polygon_by_moves(
        tri,
        stats,
        rng,
        settings,
        settings.additional_translation_count(),
    );
    checked(tri, "at the end");
}

/// For polygons that start without holes: grow the outer ring enough to
/// make room, punch in the holes, give each a little size and shape, then
/// finish with the doubling rounds.
pub fn strategy_with_holes_1(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
) {
    let nr_holes = settings.hole_sizes.len();

    transform_polygon_by_moves(tri, stats, rng, settings, settings.initial_translation_count());
    checked(tri, "after transforming the initial polygon");

    let room = 10 * nr_holes;
    let len = tri.ring_len(RingId::OUTER);
    if len < room {
        grow_polygon_by(
            tri,
            stats,
            rng,
            settings,
            RingId::OUTER,
            (room - len).min(settings.outer_size - len),
        );
    }
    checked(tri, "after making room for the holes");

    let mut rings = Vec::with_capacity(nr_holes);
    for _ in 0..nr_holes {
        let Some(ring) = insert_hole(tri, rng, settings) else {
            abort(Fatal::SelectionTree, "no internal triangle to punch a hole into");
        };
        rings.push(ring);
    }
    checked(tri, "after inserting the holes");

    for &ring in &rings {
        let grow = tri.ring_target(ring).min(20).saturating_sub(tri.ring_len(ring));
        grow_polygon_by(tri, stats, rng, settings, ring, grow);
    }
    checked(tri, "after growing the fresh holes");

    transform_polygon_by_moves(tri, stats, rng, settings, tri.vertex_count());

    for _ in 0..10 {
        for &ring in &rings {
            inflate_hole(tri, stats, rng, settings, ring);
        }
    }
    for pass in 0..10 {
        for &ring in &rings {
            shrink_around_hole(tri, stats, rng, settings, ring, pass);
        }
    }
    checked(tri, "after shaping the holes");

    transform_polygon_by_moves(tri, stats, rng, settings, tri.vertex_count());

    doubling_rounds(tri, stats, rng, settings);
    checked(tri, "after growing all rings");

    transform_polygon_by_moves(
        tri,
        stats,
        rng,
        settings,
        settings.additional_translation_count(),
    );
    checked(tri, "at the end");
}

/// Pick the strategy for the configured hole count.
pub fn run_strategy(
    tri: &mut Triangulation,
    stats: &mut Stats,
    rng: &mut RandomSource,
    settings: &Settings,
) {
    match settings.hole_sizes.len() {
        0 => strategy_no_holes_0(tri, stats, rng, settings),
        1 => strategy_with_holes_0(tri, stats, rng, settings),
        _ => strategy_with_holes_1(tri, stats, rng, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::settings::Settings;

    #[test]
    fn transform_performs_some_moves() {
        let settings = Settings {
            start_size: 12,
            outer_size: 12,
            ..Settings::default()
        };
        let mut tri = generate_regular_polygon(&settings, false);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(1);

        let performed = transform_polygon_by_moves(&mut tri, &mut stats, &mut rng, &settings, 100);

        assert!(performed > 0);
        assert_eq!(stats.translations_performed, performed as u64);
        assert!(tri.check_now());
    }

    #[test]
    fn grow_reaches_the_requested_count() {
        let settings = Settings {
            start_size: 10,
            outer_size: 30,
            ..Settings::default()
        };
        let mut tri = generate_regular_polygon(&settings, false);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(2);

        grow_polygon_by(&mut tri, &mut stats, &mut rng, &settings, RingId::OUTER, 20);

        assert_eq!(tri.ring_len(RingId::OUTER), 30);
        assert_eq!(stats.insertions, 20);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn no_holes_strategy_hits_the_target_size() {
        let settings = Settings {
            start_size: 10,
            outer_size: 40,
            initial_translation_factor: 5,
            additional_trans: 1,
            global_checking: true,
            ..Settings::default()
        };
        let mut tri = generate_regular_polygon(&settings, false);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(3);

        strategy_no_holes_0(&mut tri, &mut stats, &mut rng, &settings);

        assert_eq!(tri.ring_len(RingId::OUTER), 40);
        assert!(tri.check_now());
        tri.check_simplicity();
    }

    #[test]
    fn start_size_equal_to_target_needs_no_insertion() {
        let settings = Settings {
            start_size: 20,
            outer_size: 20,
            initial_translation_factor: 5,
            additional_trans: 1,
            ..Settings::default()
        };
        let mut tri = generate_regular_polygon(&settings, false);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(1);

        strategy_no_holes_0(&mut tri, &mut stats, &mut rng, &settings);

        assert_eq!(stats.insertions, 0);
        assert_eq!(tri.ring_len(RingId::OUTER), 20);
    }

    #[test]
    fn hole_strategy_reaches_all_targets() {
        let settings = Settings {
            start_size: 20,
            outer_size: 50,
            hole_sizes: vec![4, 5],
            initial_translation_factor: 2,
            additional_trans: 1,
            ..Settings::default()
        };
        let mut tri = generate_regular_polygon(&settings, false);
        let mut stats = Stats::default();
        let mut rng = RandomSource::seeded(42);

        strategy_with_holes_1(&mut tri, &mut stats, &mut rng, &settings);

        assert_eq!(tri.ring_count(), 3);
        assert_eq!(tri.ring_len(RingId::OUTER), 50);
        assert_eq!(tri.ring_len(RingId(1)), 4);
        assert_eq!(tri.ring_len(RingId(2)), 5);
        assert!(tri.check_now());
        tri.check_simplicity();
    }
}
