//! Geometric primitives over 2D landmark points.

use crate::error::{Error, Result};
use crate::types::Point;

/// Denominators below this are treated as degenerate.
pub const MIN_DENOMINATOR: f64 = 1e-6;

/// Value substituted for a degenerate denominator.
pub const DENOMINATOR_EPSILON: f64 = 1e-6;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(&b)
}

/// Arithmetic mean of a non-empty point sequence.
pub fn centroid(points: &[Point]) -> Result<Point> {
    if points.is_empty() {
        return Err(Error::EmptyPointSet);
    }
    let mut sum = Point::zero();
    for p in points {
        sum += *p;
    }
    Ok(sum * (1.0 / points.len() as f64))
}

/// Reflect a point about the vertical line `x = axis_x`.
pub fn mirror_across_vertical_axis(point: Point, axis_x: f64) -> Point {
    Point::new(2.0 * axis_x - point.x, point.y)
}

/// Saturate `value` into `[lo, hi]`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Width of the smallest vertical band containing every point.
pub fn horizontal_extent(points: &[Point]) -> Result<f64> {
    if points.is_empty() {
        return Err(Error::EmptyPointSet);
    }
    let (min_x, max_x) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });
    Ok(max_x - min_x)
}

/// Replace a near-zero (or negative) denominator with a small positive value.
pub fn safe_denominator(value: f64) -> f64 {
    if value < MIN_DENOMINATOR {
        DENOMINATOR_EPSILON
    } else {
        value
    }
}

/// Map a deviation from an ideal value to a score in `[0, 100]`.
///
/// Uses a Gaussian falloff: `100 * exp(-error^2 / (2 * tolerance^2))`. An error
/// of zero scores exactly 100 and the score decreases monotonically with
/// `|error|` towards zero.
pub fn score_from_error(error: f64, tolerance: f64) -> Result<f64> {
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(Error::InvalidTolerance(tolerance));
    }
    if error.is_nan() {
        return Err(Error::InvalidInput("error value is NaN".to_string()));
    }
    let score = 100.0 * (-(error * error) / (2.0 * tolerance * tolerance)).exp();
    Ok(clamp(score, 0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn centroid_of_square() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let c = centroid(&square).unwrap();
        assert!((c.x - 5.0).abs() < 1e-12);
        assert!((c.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_empty_fails() {
        assert!(matches!(centroid(&[]), Err(Error::EmptyPointSet)));
    }

    #[test]
    fn mirror() {
        let p = mirror_across_vertical_axis(Point::new(30.0, 7.0), 50.0);
        assert_eq!(p, Point::new(70.0, 7.0));

        // Mirroring twice is the identity
        let back = mirror_across_vertical_axis(p, 50.0);
        assert_eq!(back, Point::new(30.0, 7.0));
    }

    #[test]
    fn clamp_saturates() {
        assert_eq!(clamp(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(42.0, 0.0, 100.0), 42.0);
    }

    #[test]
    fn extent() {
        let pts = [Point::new(3.0, 0.0), Point::new(-2.0, 9.0), Point::new(8.0, 1.0)];
        assert!((horizontal_extent(&pts).unwrap() - 10.0).abs() < 1e-12);
        assert!(horizontal_extent(&[]).is_err());
    }

    #[test]
    fn safe_denominator_substitutes_epsilon() {
        assert_eq!(safe_denominator(0.0), DENOMINATOR_EPSILON);
        assert_eq!(safe_denominator(-3.0), DENOMINATOR_EPSILON);
        assert_eq!(safe_denominator(2.5), 2.5);
    }

    #[test]
    fn zero_error_scores_100() {
        for tol in [0.04, 0.15, 0.18, 0.25, 3.0] {
            assert_eq!(score_from_error(0.0, tol).unwrap(), 100.0);
        }
    }

    #[test]
    fn score_is_monotone_in_abs_error() {
        let tol = 0.15;
        let mut prev = score_from_error(0.0, tol).unwrap();
        for i in 1..200 {
            let e = i as f64 * 0.01;
            let s = score_from_error(e, tol).unwrap();
            assert!(s <= prev, "score increased at error {}", e);
            assert!((0.0..=100.0).contains(&s));
            assert_eq!(s, score_from_error(-e, tol).unwrap());
            prev = s;
        }
    }

    #[test]
    fn score_at_one_tolerance() {
        // exp(-1/2) ~ 0.6065
        let s = score_from_error(0.25, 0.25).unwrap();
        assert!((s - 60.653_065_971).abs() < 1e-6);
    }

    #[test]
    fn score_of_infinite_error_is_zero() {
        assert_eq!(score_from_error(f64::INFINITY, 0.1).unwrap(), 0.0);
    }

    #[test]
    fn invalid_tolerance() {
        assert!(matches!(score_from_error(0.1, 0.0), Err(Error::InvalidTolerance(_))));
        assert!(matches!(score_from_error(0.1, -1.0), Err(Error::InvalidTolerance(_))));
        assert!(score_from_error(0.1, f64::NAN).is_err());
        assert!(score_from_error(f64::NAN, 0.1).is_err());
    }
}
