//! The generator pipeline: build, mutate, write.

use anyhow::Result;

use crate::builder::generate_regular_polygon;
use crate::io;
use crate::rng::RandomSource;
use crate::settings::{Settings, Verbosity};
use crate::stats::{shape_metrics, Stats};
use crate::strategy::run_strategy;

/// Generate one polygon according to `settings` and write the requested
/// outputs.
pub fn generate(settings: &Settings) -> Result<()> {
    settings.validate()?;

    let mut rng = match settings.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    let mut stats = Stats::default();

    // A single initial hole is built right into the start polygon; more
    // holes are punched in dynamically by the strategy.
    let with_initial_hole = settings.hole_sizes.len() == 1;
    let mut tri = generate_regular_polygon(settings, with_initial_hole);
    tri.check();

    if settings.verbosity >= Verbosity::Verbose {
        eprintln!(
            "initial polygon with {} vertices in regular shape",
            settings.start_size
        );
    }

    run_strategy(&mut tri, &mut stats, &mut rng, settings);

    io::write_polygon(&tri, settings)?;

    if let Some(path) = &settings.triangulation_path {
        io::write_triangulation_graphml(&tri, path)?;
    }

    if settings.enable_stats {
        let shape = shape_metrics(&tri, settings);

        if settings.verbosity > Verbosity::Mute {
            eprintln!(
                "translations: {} tried, {} performed, {} splits, {} partial, {} undone",
                stats.translation_tries,
                stats.translations_performed,
                stats.splits,
                stats.partials,
                stats.undone,
            );
            eprintln!("insertions: {}", stats.insertions);
            eprintln!(
                "shape: twist number {}, twist amplitude {:.3}, radial deviation {:.3}",
                shape.twist_number,
                shape.amplitude(),
                shape.radial_deviation,
            );
        }

        if let Some(path) = &settings.stats_path {
            io::write_stats_xml(&tri, settings, &stats, &shape, path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{OutputFormat, Settings};

    fn out_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("polygen-e2e");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn seeded_run_produces_the_polygon() {
        let path = out_dir().join("no-holes.dat");
        let settings = Settings {
            outer_size: 40,
            start_size: 20,
            seed: Some(1),
            initial_translation_factor: 3,
            output_path: path.clone(),
            verbosity: crate::settings::Verbosity::Mute,
            ..Settings::default()
        };

        generate(&settings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        // Header, 40 vertices, closing repeat.
        assert_eq!(text.lines().count(), 42);
    }

    #[test]
    fn reruns_with_the_same_seed_are_byte_identical() {
        let path_a = out_dir().join("rerun-a.dat");
        let path_b = out_dir().join("rerun-b.dat");
        let base = Settings {
            outer_size: 30,
            start_size: 12,
            seed: Some(42),
            initial_translation_factor: 3,
            verbosity: crate::settings::Verbosity::Mute,
            ..Settings::default()
        };

        let a = Settings { output_path: path_a.clone(), ..base.clone() };
        let b = Settings { output_path: path_b.clone(), ..base };
        generate(&a).unwrap();
        generate(&b).unwrap();

        assert_eq!(
            std::fs::read(&path_a).unwrap(),
            std::fs::read(&path_b).unwrap()
        );
    }

    #[test]
    fn triangle_output_with_three_vertices() {
        let path = out_dir().join("triangle.line");
        let settings = Settings {
            outer_size: 3,
            start_size: 3,
            seed: Some(7),
            initial_translation_factor: 3,
            output_format: OutputFormat::Line,
            output_path: path.clone(),
            verbosity: crate::settings::Verbosity::Mute,
            ..Settings::default()
        };

        generate(&settings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("4"));
    }

    #[test]
    fn hole_run_produces_all_rings() {
        let path = out_dir().join("holes.dat");
        let settings = Settings {
            outer_size: 60,
            start_size: 20,
            hole_sizes: vec![4, 6],
            seed: Some(123),
            initial_translation_factor: 2,
            output_path: path.clone(),
            global_checking: true,
            verbosity: crate::settings::Verbosity::Mute,
            ..Settings::default()
        };

        generate(&settings).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"outer polygon\""));
        assert!(text.contains("\"inner polygon 0\""));
        assert!(text.contains("\"inner polygon 1\""));
    }
}
