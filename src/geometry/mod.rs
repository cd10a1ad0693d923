//! Planar primitives: points, segments, orientation and intersection tests.
//!
//! Orientation comes in two flavors selectable per run: adaptive exact
//! predicates, and plain doubles with the operands brought into a canonical
//! order before subtraction so that the computed determinant is identical
//! under any permutation of the same three points.

use robust::{orient2d, Coord};

/// Arithmetic mode for orientation tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arithmetic {
    /// Adaptive exact predicates; zero is trustworthy.
    Exact,
    /// Plain doubles with canonical operand ordering; small determinants
    /// may round to either sign.
    Double,
}

/// How two segments relate to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intersection {
    None,
    /// Proper crossing of the two open segments.
    Edge,
    /// An endpoint of one segment lies (within epsilon) on the other.
    Vertex,
}

/// Determinants below this are treated as zero in non-precise
/// intersection tests. Also keeps vertices a little away from edges.
pub const EPS_INT: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by a vector.
    #[inline]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    #[inline]
    pub fn distance_to_origin(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// A directed value-typed segment. Helper segments of a translation are
/// plain values like this one, never entities of the triangulation.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.a.distance_to(self.b)
    }

    /// Angle of the segment seen from `a`, in (-pi, pi].
    #[inline]
    pub fn angle_from_a(self) -> f64 {
        (self.b.y - self.a.y).atan2(self.b.x - self.a.x)
    }
}

/// Lexicographic comparison by x, then y.
#[inline]
fn lex_less(a: Point, b: Point) -> bool {
    a.x < b.x || (a.x == b.x && a.y < b.y)
}

/// Determinant of the shifted 2x2 matrix; `a` is moved to the origin to
/// reduce the number of operations carrying rounding error.
#[inline]
fn det(a: Point, b: Point, c: Point) -> f64 {
    let bx = b.x - a.x;
    let by = b.y - a.y;
    let cx = c.x - a.x;
    let cy = c.y - a.y;
    cy * bx - by * cx
}

/// Twice the signed area of triangle `(a, b, c)`; positive for
/// counterclockwise order.
///
/// In `Double` mode the three points are brought into lexicographic order
/// first and the sign is restored from the permutation parity, so that the
/// same three points always produce the same bits no matter how a caller
/// orders them.
pub fn orientation(mode: Arithmetic, a: Point, b: Point, c: Point) -> f64 {
    match mode {
        Arithmetic::Exact => orient2d(
            Coord { x: a.x, y: a.y },
            Coord { x: b.x, y: b.y },
            Coord { x: c.x, y: c.y },
        ),
        Arithmetic::Double => {
            if lex_less(a, b) && lex_less(a, c) {
                if lex_less(b, c) {
                    det(a, b, c)
                } else {
                    -det(a, c, b)
                }
            } else if lex_less(b, a) && lex_less(b, c) {
                if lex_less(a, c) {
                    -det(b, a, c)
                } else {
                    det(b, c, a)
                }
            } else if lex_less(a, b) {
                det(c, a, b)
            } else {
                -det(c, b, a)
            }
        }
    }
}

/// True if both values carry the same sign bit. Distinguishes -0.0 from
/// 0.0 on purpose: callers that care about exact zeros test those first.
#[inline]
pub fn same_sign(a: f64, b: f64) -> bool {
    a.is_sign_negative() == b.is_sign_negative()
}

/// True if `p` lies between the endpoints of `s` along the longer axis of
/// the segment's bounding rectangle. Only meaningful for points close to
/// the supporting line of `s`.
pub fn between(s: Segment, p: Point) -> bool {
    let dx = (s.a.x - s.b.x).abs();
    let dy = (s.a.y - s.b.y).abs();

    if dx >= dy {
        let (lo, hi) = if s.a.x <= s.b.x { (s.a.x, s.b.x) } else { (s.b.x, s.a.x) };
        lo <= p.x && p.x <= hi
    } else {
        let (lo, hi) = if s.a.y <= s.b.y { (s.a.y, s.b.y) } else { (s.b.y, s.a.y) };
        lo <= p.y && p.y <= hi
    }
}

/// Classify the intersection of two segments.
///
/// Four orientations are computed, one per endpoint against the other
/// segment. A single near-zero orientation whose endpoint lies inside the
/// other segment's bounding rectangle is a `Vertex` hit; strictly opposite
/// orientation signs on both segments is an `Edge` crossing.
///
/// With `precise` the epsilon is zero: endpoint grazes are never reported
/// and only proper crossings count.
pub fn intersect(mode: Arithmetic, e0: Segment, e1: Segment, precise: bool) -> Intersection {
    let eps = if precise { 0.0 } else { EPS_INT };

    let d00 = orientation(mode, e1.a, e1.b, e0.a);
    if d00.abs() < eps && between(e1, e0.a) {
        return Intersection::Vertex;
    }
    let d01 = orientation(mode, e1.a, e1.b, e0.b);
    if d01.abs() < eps && between(e1, e0.b) {
        return Intersection::Vertex;
    }
    let d10 = orientation(mode, e0.a, e0.b, e1.a);
    if d10.abs() < eps && between(e0, e1.a) {
        return Intersection::Vertex;
    }
    let d11 = orientation(mode, e0.a, e0.b, e1.b);
    if d11.abs() < eps && between(e0, e1.b) {
        return Intersection::Vertex;
    }

    if !same_sign(d00, d01) && !same_sign(d10, d11) {
        return Intersection::Edge;
    }

    Intersection::None
}

/// Intersection point of the supporting lines of two segments, or `None`
/// if they are parallel.
pub fn intersection_point(e0: Segment, e1: Segment) -> Option<Point> {
    let r_x = e0.b.x - e0.a.x;
    let r_y = e0.b.y - e0.a.y;
    let s_x = e1.b.x - e1.a.x;
    let s_y = e1.b.y - e1.a.y;

    let denom = r_x * s_y - r_y * s_x;
    if denom == 0.0 {
        return None;
    }

    let t = ((e1.a.x - e0.a.x) * s_y - (e1.a.y - e0.a.y) * s_x) / denom;

    Some(Point::new(e0.a.x + t * r_x, e0.a.y + t * r_y))
}

/// True if `p` lies strictly inside triangle `(a, b, c)` (any orientation).
pub fn inside_triangle(mode: Arithmetic, a: Point, b: Point, c: Point, p: Point) -> bool {
    let area0 = orientation(mode, a, b, p);
    let area1 = orientation(mode, b, c, p);
    if !same_sign(area0, area1) {
        return false;
    }
    let area2 = orientation(mode, c, a, p);
    same_sign(area0, area2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        for mode in [Arithmetic::Exact, Arithmetic::Double] {
            assert!(orientation(mode, p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)) > 0.0);
            assert!(orientation(mode, p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)) < 0.0);
        }
    }

    #[test]
    fn orientation_is_permutation_stable_in_double_mode() {
        let (a, b, c) = (p(0.1, 0.7), p(-0.3, 0.2), p(0.5, -0.9));
        let base = orientation(Arithmetic::Double, a, b, c);

        // Even permutations reproduce the exact bits, odd ones the negation.
        assert_eq!(base, orientation(Arithmetic::Double, b, c, a));
        assert_eq!(base, orientation(Arithmetic::Double, c, a, b));
        assert_eq!(-base, orientation(Arithmetic::Double, b, a, c));
        assert_eq!(-base, orientation(Arithmetic::Double, a, c, b));
        assert_eq!(-base, orientation(Arithmetic::Double, c, b, a));
    }

    #[test]
    fn exact_orientation_reports_collinear_as_zero() {
        assert_eq!(orientation(Arithmetic::Exact, p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)), 0.0);
    }

    #[test]
    fn crossing_segments() {
        let e0 = Segment::new(p(-1.0, 0.0), p(1.0, 0.0));
        let e1 = Segment::new(p(0.0, -1.0), p(0.0, 1.0));
        assert_eq!(intersect(Arithmetic::Exact, e0, e1, false), Intersection::Edge);
    }

    #[test]
    fn disjoint_segments() {
        let e0 = Segment::new(p(0.0, 0.0), p(1.0, 0.0));
        let e1 = Segment::new(p(0.0, 1.0), p(1.0, 1.0));
        assert_eq!(intersect(Arithmetic::Exact, e0, e1, false), Intersection::None);
    }

    #[test]
    fn endpoint_on_segment_is_a_vertex_hit() {
        let e0 = Segment::new(p(-1.0, 0.0), p(1.0, 0.0));
        let e1 = Segment::new(p(0.0, 0.0), p(0.0, 1.0));
        assert_eq!(intersect(Arithmetic::Double, e0, e1, false), Intersection::Vertex);
    }

    #[test]
    fn intersect_is_symmetric() {
        let e0 = Segment::new(p(-1.0, -1.0), p(1.0, 1.0));
        let e1 = Segment::new(p(-1.0, 1.0), p(1.0, -1.0));
        for precise in [false, true] {
            assert_eq!(
                intersect(Arithmetic::Exact, e0, e1, precise),
                intersect(Arithmetic::Exact, e1, e0, precise)
            );
        }
    }

    #[test]
    fn intersection_point_of_crossing_lines() {
        let e0 = Segment::new(p(-1.0, 0.0), p(1.0, 0.0));
        let e1 = Segment::new(p(0.0, -1.0), p(0.0, 1.0));
        let ip = intersection_point(e0, e1).unwrap();
        assert_eq!((ip.x, ip.y), (0.0, 0.0));
    }

    #[test]
    fn parallel_lines_have_no_intersection_point() {
        let e0 = Segment::new(p(0.0, 0.0), p(1.0, 0.0));
        let e1 = Segment::new(p(0.0, 1.0), p(1.0, 1.0));
        assert!(intersection_point(e0, e1).is_none());
    }

    #[test]
    fn point_in_triangle() {
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        assert!(inside_triangle(Arithmetic::Exact, a, b, c, p(0.5, 0.5)));
        assert!(!inside_triangle(Arithmetic::Exact, a, b, c, p(2.0, 2.0)));
    }

    #[test]
    fn between_uses_the_longer_axis() {
        let s = Segment::new(p(0.0, 0.0), p(10.0, 1.0));
        assert!(between(s, p(5.0, 0.4)));
        assert!(!between(s, p(11.0, 0.5)));
    }
}
