//! End-to-end generation through the public API.

use std::path::PathBuf;

use polygen::{
    generate, generate_regular_polygon, shape_metrics, run_strategy, Arithmetic, OutputFormat,
    RandomSource, RingId, Settings, Stats, TranslationMode, Verbosity,
};

fn out(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("polygen-integration");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn quiet(settings: Settings) -> Settings {
    Settings {
        verbosity: Verbosity::Mute,
        initial_translation_factor: 5,
        ..settings
    }
}

#[test]
fn hundred_vertices_no_holes() {
    let settings = quiet(Settings {
        outer_size: 100,
        start_size: 20,
        seed: Some(1),
        output_path: out("hundred.dat"),
        global_checking: true,
        ..Settings::default()
    });

    let mut tri = generate_regular_polygon(&settings, false);
    let mut rng = RandomSource::seeded(1);
    let mut stats = Stats::default();
    run_strategy(&mut tri, &mut stats, &mut rng, &settings);

    assert_eq!(tri.ring_len(RingId::OUTER), 100);
    assert!(tri.check_now());
    tri.check_simplicity();
}

#[test]
fn holes_with_exact_arithmetic() {
    let settings = quiet(Settings {
        outer_size: 80,
        start_size: 20,
        hole_sizes: vec![6, 8],
        seed: Some(42),
        arithmetic: Arithmetic::Exact,
        output_path: out("holes.dat"),
        global_checking: true,
        ..Settings::default()
    });

    let mut tri = generate_regular_polygon(&settings, false);
    let mut rng = RandomSource::seeded(42);
    let mut stats = Stats::default();
    run_strategy(&mut tri, &mut stats, &mut rng, &settings);

    assert_eq!(tri.ring_count(), 3);
    assert_eq!(tri.ring_len(RingId::OUTER), 80);
    assert!(tri.check_now());
    tri.check_simplicity();

    // Every hole vertex lies strictly inside the outer ring's bounding
    // region; a cheap necessary condition is that no hole vertex strays
    // outside the coordinate range of the outer boundary.
    let outer: Vec<_> = {
        let start = tri.ring_vertex(RingId::OUTER, 0);
        let mut v = start;
        let mut out = Vec::new();
        loop {
            out.push(tri.position(v));
            v = tri.next_vertex(v);
            if v == start {
                break;
            }
        }
        out
    };
    let min_x = outer.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = outer.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = outer.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = outer.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    for &v in tri.vertex_order() {
        let p = tri.position(v);
        assert!(p.x >= min_x && p.x <= max_x);
        assert!(p.y >= min_y && p.y <= max_y);
    }
}

#[test]
fn single_hole_strategy_with_stats() {
    let stats_path = out("single-hole-stats.xml");
    let settings = quiet(Settings {
        outer_size: 50,
        start_size: 20,
        hole_sizes: vec![3],
        seed: Some(100),
        weighted_selection: false,
        output_path: out("single-hole.dat"),
        stats_path: Some(stats_path.clone()),
        enable_stats: true,
        ..Settings::default()
    });

    generate(&settings).unwrap();

    let xml = std::fs::read_to_string(&stats_path).unwrap();
    assert!(xml.contains("<statistics>"));
    assert!(xml.contains("holes=\"1\""));

    // The twist number of a closed boundary is even.
    let twist: u64 = xml
        .split("twistnumber=\"")
        .nth(1)
        .and_then(|s| s.split('"').next())
        .and_then(|s| s.parse().ok())
        .unwrap();
    assert_eq!(twist % 2, 0);
}

#[test]
fn retriangulation_mode_generates_too() {
    let settings = quiet(Settings {
        outer_size: 40,
        start_size: 16,
        seed: Some(9),
        translation_mode: TranslationMode::Retriangulation,
        output_path: out("retri.dat"),
        global_checking: true,
        ..Settings::default()
    });

    let mut tri = generate_regular_polygon(&settings, false);
    let mut rng = RandomSource::seeded(9);
    let mut stats = Stats::default();
    run_strategy(&mut tri, &mut stats, &mut rng, &settings);

    assert_eq!(tri.ring_len(RingId::OUTER), 40);
    assert!(tri.check_now());
    tri.check_simplicity();
    assert_eq!(stats.partials, 0);
}

#[test]
fn line_output_of_a_triangle() {
    let path = out("triangle.line");
    let settings = quiet(Settings {
        outer_size: 3,
        start_size: 3,
        seed: Some(7),
        output_format: OutputFormat::Line,
        output_path: path.clone(),
        ..Settings::default()
    });

    generate(&settings).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("4"));
    assert_eq!(lines.count(), 5);
}

/// Ray-cast parity test of a point against one ring.
fn inside_ring(tri: &polygen::Triangulation, ring_start: polygen::VertexId, x: f64, y: f64) -> bool {
    let mut crossings = 0;
    let mut v = ring_start;
    loop {
        let next = tri.next_vertex(v);
        let a = tri.position(v);
        let b = tri.position(next);
        if (a.y > y) != (b.y > y) {
            let t = (y - a.y) / (b.y - a.y);
            if a.x + t * (b.x - a.x) > x {
                crossings += 1;
            }
        }
        v = next;
        if v == ring_start {
            break;
        }
    }
    crossings % 2 == 1
}

#[test]
fn internal_flags_match_centroid_containment() {
    let settings = quiet(Settings {
        outer_size: 45,
        start_size: 20,
        hole_sizes: vec![5],
        seed: Some(17),
        output_path: out("flags.dat"),
        ..Settings::default()
    });

    let mut tri = generate_regular_polygon(&settings, true);
    let mut rng = RandomSource::seeded(17);
    let mut stats = Stats::default();
    run_strategy(&mut tri, &mut stats, &mut rng, &settings);

    let outer_start = tri.ring_vertex(RingId::OUTER, 0);
    // Any hole vertex reaches its whole ring by following successors.
    let hole_start = tri
        .vertex_order()
        .iter()
        .copied()
        .find(|&v| tri.ring_of(v) != Some(RingId::OUTER))
        .unwrap();

    for t in tri.live_triangles() {
        let [a, b, c] = tri.triangle_vertices(t);
        let (pa, pb, pc) = (tri.position(a), tri.position(b), tri.position(c));
        let cx = (pa.x + pb.x + pc.x) / 3.0;
        let cy = (pa.y + pb.y + pc.y) / 3.0;

        let inside = inside_ring(&tri, outer_start, cx, cy)
            && !inside_ring(&tri, hole_start, cx, cy);
        assert_eq!(
            tri.is_internal(t),
            inside,
            "internal flag disagrees with centroid containment"
        );
    }
}

#[test]
fn shape_metrics_of_a_generated_polygon() {
    let settings = quiet(Settings {
        outer_size: 60,
        start_size: 20,
        seed: Some(5),
        output_path: out("metrics.dat"),
        ..Settings::default()
    });

    let mut tri = generate_regular_polygon(&settings, false);
    let mut rng = RandomSource::seeded(5);
    let mut stats = Stats::default();
    run_strategy(&mut tri, &mut stats, &mut rng, &settings);

    let shape = shape_metrics(&tri, &settings);
    assert_eq!(shape.twist_number % 2, 0);
    assert!(shape.radial_deviation >= 0.0);
    assert!(shape.twist_max >= shape.twist_min);
}
