use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Point / LineSegment
// ---------------------------------------------------------------------------

/// A point in P-T space: `x` is temperature (°C), `y` pressure (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Two endpoints defining an infinite line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: Point,
    pub p1: Point,
}

impl LineSegment {
    pub const fn new(p0: Point, p1: Point) -> Self {
        LineSegment { p0, p1 }
    }

    fn delta_x(&self) -> f64 {
        self.p0.x - self.p1.x
    }

    fn delta_y(&self) -> f64 {
        self.p0.y - self.p1.y
    }
}

// ---------------------------------------------------------------------------
// Determinant intersection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The lines are parallel or coincident.
    #[error("lines are parallel, no unique intersection")]
    NoIntersection,
}

fn det(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Denominator of the two-line intersection. Exactly `0.0` means parallel.
pub fn intersection_divisor(a: &LineSegment, b: &LineSegment) -> f64 {
    let xdiff = (a.delta_x(), b.delta_x());
    let ydiff = (a.delta_y(), b.delta_y());
    det(xdiff, ydiff)
}

/// Intersection of the infinite lines through `a` and `b`.
///
/// The result is not clipped to either segment. `div` must come from
/// [`intersection_divisor`] and be non-zero; use [`intersect`] for the
/// checked version.
pub fn line_intersection(a: &LineSegment, b: &LineSegment, div: f64) -> Point {
    let xdiff = (a.delta_x(), b.delta_x());
    let ydiff = (a.delta_y(), b.delta_y());
    let d = (
        det((a.p0.x, a.p0.y), (a.p1.x, a.p1.y)),
        det((b.p0.x, b.p0.y), (b.p1.x, b.p1.y)),
    );
    Point {
        x: det(d, xdiff) / div,
        y: det(d, ydiff) / div,
    }
}

/// Checked intersection: parallel lines and non-finite results are
/// reported as [`GeometryError::NoIntersection`].
pub fn intersect(a: &LineSegment, b: &LineSegment) -> Result<Point, GeometryError> {
    let div = intersection_divisor(a, b);
    if div == 0.0 {
        return Err(GeometryError::NoIntersection);
    }
    let p = line_intersection(a, b, div);
    if p.x.is_finite() && p.y.is_finite() {
        Ok(p)
    } else {
        Err(GeometryError::NoIntersection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
        LineSegment::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = seg(0.0, 0.0, 2.0, 2.0);
        let b = seg(0.0, 2.0, 2.0, 0.0);
        let div = intersection_divisor(&a, &b);
        assert!(div != 0.0);
        let p = line_intersection(&a, &b, div);
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn divisor_is_zero_for_parallel_lines() {
        let a = seg(0.0, 0.0, 1.0, 2.0);
        // same direction, scaled and shifted
        let b = seg(5.0, 1.0, 8.0, 7.0);
        assert_eq!(intersection_divisor(&a, &b), 0.0);
        // coincident
        assert_eq!(intersection_divisor(&a, &a), 0.0);
        assert_eq!(intersect(&a, &b), Err(GeometryError::NoIntersection));
    }

    #[test]
    fn divisor_is_nonzero_for_non_parallel_lines() {
        let a = seg(0.0, 0.0, 1.0, 2.0);
        let b = seg(0.0, 0.0, 2.0, 1.0);
        assert!(intersection_divisor(&a, &b) != 0.0);
    }

    #[test]
    fn intersection_is_not_bounded_by_segments() {
        // Horizontal line y = 1 far to the left of a vertical segment x = 10.
        let a = seg(0.0, 1.0, 1.0, 1.0);
        let b = seg(10.0, 5.0, 10.0, 6.0);
        let p = intersect(&a, &b).unwrap();
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_segment_has_no_intersection() {
        let a = seg(3.0, 3.0, 3.0, 3.0);
        let b = seg(0.0, 0.0, 1.0, 5.0);
        assert_eq!(intersect(&a, &b), Err(GeometryError::NoIntersection));
    }

    #[test]
    fn nan_input_is_reported_as_no_intersection() {
        let a = seg(f64::NAN, 0.0, 1.0, 1.0);
        let b = seg(0.0, 1.0, 1.0, 0.0);
        assert_eq!(intersect(&a, &b), Err(GeometryError::NoIntersection));
    }
}
