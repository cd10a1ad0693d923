//! Run counters and shape metrics of the finished polygon.

use std::f64::consts::PI;

use crate::settings::Settings;
use crate::triangulation::{RingId, Triangulation};

/// Counters collected while the generator runs.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Translations constructed, whether or not they ran.
    pub translation_tries: u64,
    /// Translations that moved the vertex at least partially.
    pub translations_performed: u64,
    /// Translations decomposed into two parts.
    pub splits: u64,
    /// Translations that ended at an intermediate position.
    pub partials: u64,
    /// Translations rolled back by the undo stack.
    pub undone: u64,
    /// Translations refused before any mutation.
    pub rejected: u64,
    /// Vertices inserted into polygon edges.
    pub insertions: u64,
    /// Simplicity walks started.
    pub walk_checks: u64,
    /// Triangles stepped through over all walks.
    pub walk_triangles: u64,
    /// Longest single walk, in triangles.
    pub walk_max_triangles: u64,
    /// Surrounding-polygon sizes accumulated over all walks.
    pub walk_sp_edges: u64,
    /// Largest surrounding polygon seen by a walk.
    pub walk_max_sp_edges: u64,
}

impl Stats {
    pub fn record_walk_start(&mut self, sp_size: usize) {
        self.walk_checks += 1;
        self.walk_triangles += 1;
        self.walk_sp_edges += sp_size as u64;
        self.walk_max_sp_edges = self.walk_max_sp_edges.max(sp_size as u64);
    }

    pub fn record_walk_step(&mut self, passed: u64) {
        self.walk_triangles += 1;
        self.walk_max_triangles = self.walk_max_triangles.max(passed);
    }
}

/// Shape metrics of the outer ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeMetrics {
    /// Number of left/right direction changes around the ring. Closed
    /// rings always produce an even count.
    pub twist_number: u64,
    /// Minimal running deviation of the interior angle from its average.
    pub twist_min: f64,
    /// Maximal running deviation of the interior angle from its average.
    pub twist_max: f64,
    /// Root mean square distance of the boundary from the initial circle.
    pub radial_deviation: f64,
}

impl ShapeMetrics {
    pub fn amplitude(&self) -> f64 {
        self.twist_min.abs() + self.twist_max.abs()
    }
}

/// Walk the outer ring and compute all shape metrics in one pass each.
pub fn shape_metrics(tri: &Triangulation, settings: &Settings) -> ShapeMetrics {
    ShapeMetrics {
        twist_number: sinuosity(tri),
        ..max_twist(tri, radial_deviation(tri, settings.radius_polygon))
    }
}

/// Running min/max of the cumulated deviation of the interior angle from
/// the average interior angle of a ring of this size.
fn max_twist(tri: &Triangulation, radial_deviation: f64) -> ShapeMetrics {
    let n = tri.ring_len(RingId::OUTER);
    let average = 180.0 * (1.0 - 2.0 / n as f64);

    let start = tri.ring_vertex(RingId::OUTER, 0);
    let mut angle = tri.inside_angle(start) / PI * 180.0 - average;
    let mut sum = angle;
    let mut min = angle;
    let mut max = angle;

    let mut v = tri.next_vertex(start);
    while v != start {
        angle = tri.inside_angle(v) / PI * 180.0 - average;
        sum += angle;
        min = min.min(sum);
        max = max.max(sum);
        v = tri.next_vertex(v);
    }

    ShapeMetrics {
        twist_number: 0,
        twist_min: min,
        twist_max: max,
        radial_deviation,
    }
}

/// Count how often the boundary switches between curving left and curving
/// right. Interior angles above pi curve right, all others left.
fn sinuosity(tri: &Triangulation) -> u64 {
    let start = tri.ring_vertex(RingId::OUTER, 0);
    let mut to_right = tri.inside_angle(start) > PI;
    let mut n = 0;

    let mut v = start;
    loop {
        v = tri.next_vertex(v);
        let right = tri.inside_angle(v) > PI;
        if right != to_right {
            n += 1;
        }
        to_right = right;
        if v == start {
            break;
        }
    }

    n
}

/// Root mean square distance of the outer boundary vertices from the
/// circle the initial polygon was placed on.
fn radial_deviation(tri: &Triangulation, radius: f64) -> f64 {
    let start = tri.ring_vertex(RingId::OUTER, 0);
    let mut sum = 0.0;
    let mut count = 0usize;

    let mut v = start;
    loop {
        let dist = tri.position(v).distance_to_origin();
        sum += (dist - radius).powi(2);
        count += 1;
        v = tri.next_vertex(v);
        if v == start {
            break;
        }
    }

    (sum / (count.max(2) - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::generate_regular_polygon;
    use crate::settings::Settings;

    fn built() -> (Triangulation, Settings) {
        let settings = Settings {
            start_size: 12,
            ..Settings::default()
        };
        (generate_regular_polygon(&settings, false), settings)
    }

    #[test]
    fn regular_polygon_has_no_twists() {
        let (tri, settings) = built();
        let m = shape_metrics(&tri, &settings);
        // Every vertex of a regular polygon curves the same way.
        assert_eq!(m.twist_number, 0);
        assert!(m.radial_deviation < 1e-9);
    }

    #[test]
    fn twist_number_is_even() {
        let (tri, settings) = built();
        let m = shape_metrics(&tri, &settings);
        assert_eq!(m.twist_number % 2, 0);
    }

    #[test]
    fn walk_counters_accumulate() {
        let mut stats = Stats::default();
        stats.record_walk_start(5);
        stats.record_walk_step(2);
        stats.record_walk_step(3);
        assert_eq!(stats.walk_checks, 1);
        assert_eq!(stats.walk_triangles, 3);
        assert_eq!(stats.walk_max_triangles, 3);
        assert_eq!(stats.walk_max_sp_edges, 5);
    }
}
