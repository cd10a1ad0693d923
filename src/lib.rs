#![doc = "Random simple polygon generation on a constrained triangulation"]

//! A polygon is grown from a small regular start shape by alternating two
//! mutations on a shared constrained triangulation: translating single
//! vertices (kinetically, through a sequence of edge flips, or by
//! retriangulating the affected region) and inserting vertices into
//! boundary edges. Simplicity of all rings is preserved at every step.

mod builder;
mod cli;
mod commands;
mod fatal;
mod geometry;
mod io;
mod mutation;
mod rng;
mod selection;
mod settings;
mod stats;
mod strategy;
mod triangulation;

#[doc(inline)]
pub use cli::Cli;

#[doc(inline)]
pub use commands::generate;

#[doc(inline)]
pub use settings::{OutputFormat, Settings, TranslationMode, Verbosity};

#[doc(inline)]
pub use geometry::{Arithmetic, Intersection, Point, Segment};

#[doc(inline)]
pub use builder::generate_regular_polygon;

#[doc(inline)]
pub use triangulation::{EdgeId, EdgeKind, RingId, TriangleId, Triangulation, VertexId};

#[doc(inline)]
pub use mutation::{translate, Outcome};

#[doc(inline)]
pub use selection::SelectionTree;

#[doc(inline)]
pub use stats::{shape_metrics, ShapeMetrics, Stats};

#[doc(inline)]
pub use strategy::{grow_polygon_by, run_strategy, transform_polygon_by_moves};

#[doc(inline)]
pub use rng::RandomSource;

#[doc(inline)]
pub use fatal::Fatal;
