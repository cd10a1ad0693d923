//! Runtime configuration assembled from the command line.

use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::geometry::Arithmetic;
use crate::triangulation::TriConfig;

/// How chatty the run is on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Mute,
    Normal,
    Verbose,
}

/// Polygon output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Dat,
    Line,
    Graphml,
}

/// Which translation variant the mutation drivers construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslationMode {
    Kinetic,
    Retriangulation,
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Target size of the outer ring.
    pub outer_size: usize,
    /// Target sizes of the holes, one entry per hole.
    pub hole_sizes: Vec<usize>,
    /// Size of the initial regular polygon.
    pub start_size: usize,
    /// Fixed RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub arithmetic: Arithmetic,

    pub output_format: OutputFormat,
    pub output_path: PathBuf,
    /// Write the full triangulation as graphml to this path.
    pub triangulation_path: Option<PathBuf>,
    /// Write the statistics XML to this path.
    pub stats_path: Option<PathBuf>,
    pub enable_stats: bool,

    pub local_checking: bool,
    pub global_checking: bool,
    pub weighted_selection: bool,
    pub translation_mode: TranslationMode,
    pub verbosity: Verbosity,

    /// Radius of the circle the initial polygon is placed on.
    pub radius_polygon: f64,
    /// Radius of the first initial hole.
    pub radius_hole: f64,
    /// Side length of the bounding box.
    pub box_size: f64,
    /// Translations per initial vertex before growing starts.
    pub initial_translation_factor: usize,
    /// Extra translation rounds after the target size is reached.
    pub additional_trans: usize,
    /// Attempts to move a freshly inserted vertex off its edge.
    pub insertion_tries: usize,
    /// Minimal edge length an insertion accepts.
    pub min_length: f64,
    /// Minimal |area| of the incident triangles an insertion accepts in
    /// double arithmetic.
    pub min_det_insertion: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            outer_size: 100,
            hole_sizes: Vec::new(),
            start_size: 20,
            seed: None,
            arithmetic: Arithmetic::Double,
            output_format: OutputFormat::Dat,
            output_path: PathBuf::from("polygon.dat"),
            triangulation_path: None,
            stats_path: None,
            enable_stats: false,
            local_checking: true,
            global_checking: false,
            weighted_selection: true,
            translation_mode: TranslationMode::Kinetic,
            verbosity: Verbosity::Normal,
            radius_polygon: 0.1,
            radius_hole: 0.05,
            box_size: 3.0,
            initial_translation_factor: 1000,
            additional_trans: 1,
            insertion_tries: 100,
            min_length: 1e-7,
            min_det_insertion: 1e-12,
        }
    }
}

impl Settings {
    /// Number of translations applied to the initial polygon.
    pub fn initial_translation_count(&self) -> usize {
        self.initial_translation_factor * self.start_size
    }

    /// Number of translations applied after growing finished.
    pub fn additional_translation_count(&self) -> usize {
        self.additional_trans * self.outer_size
    }

    /// The subset of the configuration the triangulation carries.
    pub fn tri_config(&self) -> TriConfig {
        TriConfig {
            arithmetic: self.arithmetic,
            weighted_selection: self.weighted_selection,
            local_checking: self.local_checking,
            global_checking: self.global_checking,
            verbosity: self.verbosity,
        }
    }

    /// Cross-field validation; violations are configuration errors.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.outer_size >= 3, "the polygon needs at least 3 vertices");
        ensure!(self.start_size >= 3, "the initial polygon needs at least 3 vertices");
        ensure!(
            self.start_size <= self.outer_size,
            "start size {} exceeds the target size {}",
            self.start_size,
            self.outer_size
        );
        for (i, &size) in self.hole_sizes.iter().enumerate() {
            ensure!(size >= 3, "hole {} needs at least 3 vertices, got {}", i, size);
        }
        ensure!(self.radius_polygon > 0.0, "polygon radius must be positive");
        ensure!(
            self.box_size > 2.0 * self.radius_polygon,
            "bounding box must enclose the initial polygon"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn tiny_hole_is_rejected() {
        let settings = Settings {
            hole_sizes: vec![2],
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn start_size_must_not_exceed_target() {
        let settings = Settings {
            outer_size: 10,
            start_size: 20,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn translation_counts_scale_with_sizes() {
        let settings = Settings {
            start_size: 10,
            initial_translation_factor: 3,
            ..Settings::default()
        };
        assert_eq!(settings.initial_translation_count(), 30);
    }
}
