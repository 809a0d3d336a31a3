//! Curve smoothing for line charts
//!
//! Follows the Chart.js `tension` model: every interior point gets two
//! Bézier control points placed along the line joining its neighbours,
//! scaled by the relative distance to each neighbour.

type Point = (f64, f64);

/// Sample a smoothed path through `points`
///
/// The result starts at the first point, passes through every input point
/// (at indices that are multiples of `steps`) and ends at the last one.
/// Control points are computed with both axes scaled to the unit square so
/// that dates-by-index and prices in dollars weigh the same.
pub fn smooth_path(points: &[Point], tension: f64, steps: usize) -> Vec<Point> {
    if points.len() < 3 || tension <= 0.0 || steps == 0 {
        return points.to_vec();
    }

    let bounds = Bounds::of(points);
    let normalized: Vec<Point> = points.iter().map(|&p| bounds.to_unit(p)).collect();
    let controls = control_points(&normalized, tension);

    let mut path = Vec::with_capacity((points.len() - 1) * steps + 1);
    path.push(points[0]);

    for i in 0..normalized.len() - 1 {
        let p0 = normalized[i];
        let p1 = controls[i].1;
        let p2 = controls[i + 1].0;
        let p3 = normalized[i + 1];

        for step in 1..steps {
            let t = step as f64 / steps as f64;
            path.push(bounds.from_unit(cubic_bezier(p0, p1, p2, p3, t)));
        }
        // Land exactly on the data point rather than on a rounded sample
        path.push(points[i + 1]);
    }

    path
}

/// (incoming, outgoing) control point for every point
fn control_points(points: &[Point], tension: f64) -> Vec<(Point, Point)> {
    let last = points.len() - 1;

    (0..points.len())
        .map(|i| {
            let current = points[i];
            let previous = if i == 0 { current } else { points[i - 1] };
            let next = if i == last { current } else { points[i + 1] };

            let d01 = distance(previous, current);
            let d12 = distance(current, next);
            let total = d01 + d12;

            let (s01, s12) = if total > 0.0 {
                (d01 / total, d12 / total)
            } else {
                (0.0, 0.0)
            };

            let fa = tension * s01;
            let fb = tension * s12;
            let dx = next.0 - previous.0;
            let dy = next.1 - previous.1;

            (
                (current.0 - fa * dx, current.1 - fa * dy),
                (current.0 + fb * dx, current.1 + fb * dy),
            )
        })
        .collect()
}

fn distance(a: Point, b: Point) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

struct Bounds {
    min_x: f64,
    span_x: f64,
    min_y: f64,
    span_y: f64,
}

impl Bounds {
    fn of(points: &[Point]) -> Self {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        // Flat axes keep a unit span so scaling never divides by zero
        let span = |lo: f64, hi: f64| if hi > lo { hi - lo } else { 1.0 };

        Bounds {
            min_x,
            span_x: span(min_x, max_x),
            min_y,
            span_y: span(min_y, max_y),
        }
    }

    fn to_unit(&self, (x, y): Point) -> Point {
        ((x - self.min_x) / self.span_x, (y - self.min_y) / self.span_y)
    }

    fn from_unit(&self, (x, y): Point) -> Point {
        (x * self.span_x + self.min_x, y * self.span_y + self.min_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_short_or_straight_paths_are_unchanged() {
        let two = vec![(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(smooth_path(&two, 0.4, 10), two);

        let three = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)];
        assert_eq!(smooth_path(&three, 0.0, 10), three);
    }

    #[test]
    fn test_path_passes_through_every_point() {
        let points = vec![(0.0, 2301.15), (1.0, 2290.4), (2.0, 2312.0), (3.0, 2308.7)];
        let steps = 8;
        let path = smooth_path(&points, 0.4, steps);

        assert_eq!(path.len(), (points.len() - 1) * steps + 1);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(path[i * steps], *point);
        }
    }

    #[test]
    fn test_collinear_points_stay_on_the_line() {
        let points: Vec<Point> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let path = smooth_path(&points, 0.4, 6);

        for (x, y) in path {
            assert!(approx(y, 2.0 * x + 1.0), "({}, {}) left the line", x, y);
        }
    }

    #[test]
    fn test_flat_series_does_not_produce_nan() {
        let points = vec![(0.0, 25.5), (1.0, 25.5), (2.0, 25.5)];
        let path = smooth_path(&points, 0.4, 4);

        assert!(path.iter().all(|(x, y)| x.is_finite() && approx(*y, 25.5)));
    }
}
