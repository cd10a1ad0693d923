//! Polygon mutations: vertex translations, edge insertions and holes.

mod events;
mod frame;
mod holes;
mod insertion;
mod kinetic;
mod region;
mod retriangulate;

pub use frame::Outcome;

pub(crate) use holes::{inflate_hole, insert_hole, shrink_around_hole};
pub(crate) use insertion::Insertion;

use crate::rng::RandomSource;
use crate::settings::TranslationMode;
use crate::stats::Stats;
use crate::triangulation::{Triangulation, VertexId};

/// Translate one vertex by `(dx, dy)` with the configured variant,
/// running all pre-checks and post-translation bookkeeping.
pub fn translate(
    tri: &mut Triangulation,
    stats: &mut Stats,
    v: VertexId,
    dx: f64,
    dy: f64,
    mode: TranslationMode,
) -> Outcome {
    match mode {
        TranslationMode::Kinetic => kinetic::translate_kinetic(tri, stats, v, dx, dy),
        TranslationMode::Retriangulation => {
            retriangulate::translate_retriangulation(tri, stats, v, dx, dy)
        }
    }
}

/// Sample a direction and a locally scaled distance for a random move of
/// `v`, the way every mutation driver does it.
pub(crate) fn random_move(
    tri: &Triangulation,
    rng: &mut RandomSource,
    v: VertexId,
) -> (f64, f64) {
    let alpha = rng.uniform(-std::f64::consts::PI, std::f64::consts::PI);
    let stddev = tri.directed_edge_length(v, alpha);
    let r = rng.normal(stddev / 2.0, stddev / 6.0);
    (r * alpha.cos(), r * alpha.sin())
}
