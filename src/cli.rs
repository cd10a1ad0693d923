//! Command-line schema and its mapping onto the runtime settings.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};

use crate::geometry::Arithmetic;
use crate::settings::{OutputFormat, Settings, TranslationMode, Verbosity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Dat,
    Line,
    Graphml,
}

/// Random simple polygon generator.
#[derive(Parser, Debug)]
#[command(name = "polygen", version, about)]
pub struct Cli {
    /// Target number of vertices of the outer polygon
    pub vertex_count: usize,

    /// Output file for the polygon
    pub output: PathBuf,

    /// Number of holes
    #[arg(long, default_value_t = 0)]
    pub nrofholes: usize,

    /// Target sizes per hole, comma separated; a single value applies to
    /// every hole
    #[arg(long, value_delimiter = ',')]
    pub holesizes: Vec<usize>,

    /// Size of the initial polygon
    #[arg(long, default_value_t = 20)]
    pub startsize: usize,

    /// Fixed seed for the random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use exact arithmetic for orientation tests
    #[arg(long)]
    pub arithmetic: bool,

    /// Output format for the polygon file
    #[arg(long, value_enum, default_value_t = FormatArg::Dat)]
    pub outputformat: FormatArg,

    /// Write statistics XML to this file
    #[arg(long)]
    pub statsfile: Option<PathBuf>,

    /// Compute and print statistics
    #[arg(long)]
    pub enablestats: bool,

    /// Write the full triangulation as graphml to this file
    #[arg(long)]
    pub printtriang: Option<PathBuf>,

    /// Skip the local surrounding-polygon checks after aborted
    /// translations
    #[arg(long)]
    pub disablelocalchecks: bool,

    /// Run the global integrity check between the stages
    #[arg(long)]
    pub enableglobalchecks: bool,

    /// Select edges and triangles uniformly instead of by weight
    #[arg(long)]
    pub disableweightedselection: bool,

    /// Move vertices by retriangulation instead of kinetically
    #[arg(long)]
    pub retriangulate: bool,

    /// Report progress while running
    #[arg(long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    pub mute: bool,
}

impl Cli {
    /// Turn the arguments into validated settings.
    pub fn into_settings(self) -> Result<Settings> {
        ensure!(
            !(self.verbose && self.mute),
            "verbose and mute exclude each other"
        );

        let hole_sizes = match (self.nrofholes, self.holesizes.len()) {
            (0, 0) => Vec::new(),
            (0, _) => self.holesizes,
            (n, 0) => vec![10; n],
            (n, 1) => vec![self.holesizes[0]; n],
            (n, m) => {
                ensure!(
                    n == m,
                    "{} hole sizes given for {} holes",
                    m,
                    n
                );
                self.holesizes
            }
        };

        let settings = Settings {
            outer_size: self.vertex_count,
            hole_sizes,
            start_size: self.startsize.min(self.vertex_count),
            seed: self.seed,
            arithmetic: if self.arithmetic {
                Arithmetic::Exact
            } else {
                Arithmetic::Double
            },
            output_format: match self.outputformat {
                FormatArg::Dat => OutputFormat::Dat,
                FormatArg::Line => OutputFormat::Line,
                FormatArg::Graphml => OutputFormat::Graphml,
            },
            output_path: self.output,
            triangulation_path: self.printtriang,
            stats_path: self.statsfile.clone(),
            enable_stats: self.enablestats || self.statsfile.is_some(),
            local_checking: !self.disablelocalchecks,
            global_checking: self.enableglobalchecks,
            weighted_selection: !self.disableweightedselection,
            translation_mode: if self.retriangulate {
                TranslationMode::Retriangulation
            } else {
                TranslationMode::Kinetic
            },
            verbosity: if self.mute {
                Verbosity::Mute
            } else if self.verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
            ..Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("polygen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positionals_and_defaults() {
        let settings = parse(&["100", "out.dat"]).into_settings().unwrap();
        assert_eq!(settings.outer_size, 100);
        assert_eq!(settings.start_size, 20);
        assert!(settings.hole_sizes.is_empty());
        assert_eq!(settings.output_format, OutputFormat::Dat);
        assert!(settings.local_checking);
        assert!(settings.weighted_selection);
    }

    #[test]
    fn hole_size_broadcast() {
        let settings = parse(&["200", "o", "--nrofholes", "3", "--holesizes", "12"])
            .into_settings()
            .unwrap();
        assert_eq!(settings.hole_sizes, vec![12, 12, 12]);
    }

    #[test]
    fn hole_size_list() {
        let settings = parse(&["500", "o", "--nrofholes", "2", "--holesizes", "30,50"])
            .into_settings()
            .unwrap();
        assert_eq!(settings.hole_sizes, vec![30, 50]);
    }

    #[test]
    fn mismatched_hole_sizes_fail() {
        let result = parse(&["500", "o", "--nrofholes", "3", "--holesizes", "30,50"])
            .into_settings();
        assert!(result.is_err());
    }

    #[test]
    fn default_hole_size_is_ten() {
        let settings = parse(&["200", "o", "--nrofholes", "2"]).into_settings().unwrap();
        assert_eq!(settings.hole_sizes, vec![10, 10]);
    }

    #[test]
    fn flags_map_onto_settings() {
        let settings = parse(&[
            "100",
            "o",
            "--arithmetic",
            "--outputformat",
            "line",
            "--seed",
            "7",
            "--disablelocalchecks",
            "--enableglobalchecks",
            "--disableweightedselection",
        ])
        .into_settings()
        .unwrap();

        assert_eq!(settings.arithmetic, Arithmetic::Exact);
        assert_eq!(settings.output_format, OutputFormat::Line);
        assert_eq!(settings.seed, Some(7));
        assert!(!settings.local_checking);
        assert!(settings.global_checking);
        assert!(!settings.weighted_selection);
    }

    #[test]
    fn start_size_is_capped_by_the_target() {
        let settings = parse(&["3", "o", "--startsize", "20"]).into_settings().unwrap();
        assert_eq!(settings.start_size, 3);
        assert_eq!(settings.outer_size, 3);
    }
}
