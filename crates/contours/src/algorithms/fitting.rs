//! Enclosing and best-fit shapes: minimum-area rectangle, minimum enclosing
//! circle and least-squares ellipse.

use geo_types::{Coord, MultiPoint, Point};
use nalgebra::{Matrix2, Matrix3, SymmetricEigen, Vector3};
use tracing::debug;

use crate::{
    algorithms::{hull::convex_hull, simplification::to_coord},
    types::{Circle, RotatedRect},
};

/// Fewest points the conic fit accepts
pub const MIN_ELLIPSE_POINTS: usize = 5;

/// Smallest-area rectangle of any orientation containing every point.
///
/// Hulls of three or more points go through geo's rotating search over hull
/// edges; points and segments are handled directly.
pub fn min_area_rect(points: &[[f32; 2]]) -> RotatedRect {
    use geo::MinimumRotatedRect;

    let hull = convex_hull(points);
    let segment = match hull.as_slice() {
        [] => return RotatedRect::default(),
        [p] => {
            return RotatedRect {
                center: *p,
                size: [0.0, 0.0],
                angle: 0.0,
            }
        }
        [a, b] => (*a, *b),
        _ => {
            let corners = MultiPoint::new(hull.iter().map(|&p| Point::from(to_coord(p))).collect())
                .minimum_rotated_rect()
                .map(|rect| rect.exterior().coords().copied().collect::<Vec<Coord<f64>>>());
            match corners {
                Some(corners) if corners.len() >= 4 => return rect_from_corners(&corners),
                // collinear hull: its two farthest points span it
                _ => farthest_pair(&hull),
            }
        }
    };

    let (a, b) = segment;
    let (dx, dy) = ((b[0] - a[0]) as f64, (b[1] - a[1]) as f64);
    RotatedRect {
        center: [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        size: [dx.hypot(dy) as f32, 0.0],
        angle: normalize_angle(dy.atan2(dx).to_degrees()) as f32,
    }
}

/// Center, side lengths and orientation of a rectangle given by consecutive corners
fn rect_from_corners(corners: &[Coord<f64>]) -> RotatedRect {
    let (c0, c1, c2) = (corners[0], corners[1], corners[2]);
    let side = c1 - c0;
    let next = c2 - c1;
    RotatedRect {
        center: [((c0.x + c2.x) / 2.0) as f32, ((c0.y + c2.y) / 2.0) as f32],
        size: [side.x.hypot(side.y) as f32, next.x.hypot(next.y) as f32],
        angle: normalize_angle(side.y.atan2(side.x).to_degrees()) as f32,
    }
}

fn farthest_pair(points: &[[f32; 2]]) -> ([f32; 2], [f32; 2]) {
    let mut best = (points[0], points[0]);
    let mut best_dist = -1.0f32;
    for (i, &p) in points.iter().enumerate() {
        for &q in &points[i + 1..] {
            let d = (q[0] - p[0]).hypot(q[1] - p[1]);
            if d > best_dist {
                best_dist = d;
                best = (p, q);
            }
        }
    }
    best
}

/// Smallest circle containing every point (Welzl, in its incremental form)
pub fn min_enclosing_circle(points: &[[f32; 2]]) -> Circle {
    if points.is_empty() {
        return Circle::default();
    }

    let mut pts: Vec<[f64; 2]> = points.iter().map(|p| p.map(f64::from)).collect();
    deterministic_shuffle(&mut pts);

    let mut circle = (pts[0], 0.0);
    for i in 1..pts.len() {
        if contains(circle, pts[i]) {
            continue;
        }
        circle = (pts[i], 0.0);
        for j in 0..i {
            if contains(circle, pts[j]) {
                continue;
            }
            circle = circle_from_two(pts[i], pts[j]);
            for k in 0..j {
                if !contains(circle, pts[k]) {
                    circle = circle_from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    let ([cx, cy], radius) = circle;
    Circle {
        center: [cx as f32, cy as f32],
        radius: radius as f32,
    }
}

/// Least-squares ellipse through the points, as its bounding rotated rectangle.
///
/// Uses the direct conic fit of Halíř and Flusser on normalised coordinates.
/// Fewer than [`MIN_ELLIPSE_POINTS`] points, or points no ellipse fits, give
/// the minimum-area rectangle instead.
pub fn fit_ellipse(points: &[[f32; 2]]) -> RotatedRect {
    if points.len() < MIN_ELLIPSE_POINTS {
        return min_area_rect(points);
    }

    match fit_conic_ellipse(points) {
        Some(rect) => rect,
        None => {
            debug!(points = points.len(), "ellipse fit degenerate, using minimum-area rectangle");
            min_area_rect(points)
        }
    }
}

fn fit_conic_ellipse(points: &[[f32; 2]]) -> Option<RotatedRect> {
    let n = points.len() as f64;
    let (mx, my) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &[x, y]| (sx + x as f64, sy + y as f64));
    let (mx, my) = (mx / n, my / n);
    let scale = points
        .iter()
        .map(|&[x, y]| (x as f64 - mx).abs().max((y as f64 - my).abs()))
        .fold(0.0, f64::max);
    if scale == 0.0 {
        return None;
    }

    // scatter matrices of the quadratic [x², xy, y²] and linear [x, y, 1] parts
    let mut s1 = Matrix3::<f64>::zeros();
    let mut s2 = Matrix3::<f64>::zeros();
    let mut s3 = Matrix3::<f64>::zeros();
    for &[x, y] in points {
        let x = (x as f64 - mx) / scale;
        let y = (y as f64 - my) / scale;
        let d1 = Vector3::new(x * x, x * y, y * y);
        let d2 = Vector3::new(x, y, 1.0);
        s1 += d1 * d1.transpose();
        s2 += d1 * d2.transpose();
        s3 += d2 * d2.transpose();
    }

    // collinear points span no area
    let spread = s3[(0, 0)] * s3[(1, 1)] - s3[(0, 1)] * s3[(0, 1)];
    if spread <= 1e-12 * n * n {
        return None;
    }

    let t = -(s3.try_inverse()? * s2.transpose());
    let m = s1 + s2 * t;
    // premultiply by the inverse of the ellipse constraint matrix
    let m = Matrix3::from_rows(&[
        m.row(2) / 2.0,
        -m.row(1),
        m.row(0) / 2.0,
    ]);

    let eigenvalues = m.eigenvalues()?;
    let a1 = eigenvalues
        .iter()
        .filter_map(|&lambda| null_vector(&(m - Matrix3::identity() * lambda)))
        .find(|v| 4.0 * v[0] * v[2] - v[1] * v[1] > 0.0)?;
    let a2 = t * a1;

    let (a, b, c) = (a1[0], a1[1], a1[2]);
    let (d, e, f) = (a2[0], a2[1], a2[2]);

    let den = b * b - 4.0 * a * c;
    if den >= 0.0 {
        return None;
    }
    let x0 = (2.0 * c * d - b * e) / den;
    let y0 = (2.0 * a * e - b * d) / den;
    let f_center = a * x0 * x0 + b * x0 * y0 + c * y0 * y0 + d * x0 + e * y0 + f;

    let eigen = SymmetricEigen::new(Matrix2::new(a, b / 2.0, b / 2.0, c));
    let mut axes = [0.0; 2];
    for (axis, &lambda) in axes.iter_mut().zip(eigen.eigenvalues.iter()) {
        let squared = -f_center / lambda;
        if squared.is_nan() || squared <= 0.0 {
            return None;
        }
        *axis = squared.sqrt();
    }

    // quadratic-form eigenvalues may share either sign, so compare the axes
    let (major, minor, column) = if axes[0] >= axes[1] {
        (axes[0], axes[1], 0)
    } else {
        (axes[1], axes[0], 1)
    };
    let direction = eigen.eigenvectors.column(column);
    let angle = normalize_angle(direction[1].atan2(direction[0]).to_degrees());

    Some(RotatedRect {
        center: [(mx + x0 * scale) as f32, (my + y0 * scale) as f32],
        size: [(2.0 * major * scale) as f32, (2.0 * minor * scale) as f32],
        angle: angle as f32,
    })
}

/// A unit vector spanning the null space of a rank-2 matrix
fn null_vector(matrix: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows = [
        matrix.row(0).transpose(),
        matrix.row(1).transpose(),
        matrix.row(2).transpose(),
    ];
    let candidate = [
        rows[0].cross(&rows[1]),
        rows[0].cross(&rows[2]),
        rows[1].cross(&rows[2]),
    ]
    .into_iter()
    .max_by(|p, q| p.norm().total_cmp(&q.norm()))?;

    let norm = candidate.norm();
    (norm > f64::EPSILON).then(|| candidate / norm)
}

fn normalize_angle(degrees: f64) -> f64 {
    let angle = degrees.rem_euclid(180.0);
    if angle >= 180.0 { 0.0 } else { angle }
}

type RawCircle = ([f64; 2], f64);

fn contains((center, radius): RawCircle, p: [f64; 2]) -> bool {
    let dist = ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2)).sqrt();
    dist <= radius + 1e-7 * (1.0 + radius)
}

fn circle_from_two(a: [f64; 2], b: [f64; 2]) -> RawCircle {
    let center = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
    let radius = ((a[0] - center[0]).powi(2) + (a[1] - center[1]).powi(2)).sqrt();
    (center, radius)
}

fn circle_from_three(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> RawCircle {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if d.abs() <= f64::EPSILON {
        // collinear: the two farthest apart span the circle
        let pairs = [(a, b), (a, c), (b, c)];
        let (p, q) = pairs
            .into_iter()
            .max_by(|(p1, q1), (p2, q2)| {
                let d1 = (p1[0] - q1[0]).powi(2) + (p1[1] - q1[1]).powi(2);
                let d2 = (p2[0] - q2[0]).powi(2) + (p2[1] - q2[1]).powi(2);
                d1.total_cmp(&d2)
            })
            .unwrap_or((a, b));
        return circle_from_two(p, q);
    }

    let a_sq = a[0] * a[0] + a[1] * a[1];
    let b_sq = b[0] * b[0] + b[1] * b[1];
    let c_sq = c[0] * c[0] + c[1] * c[1];
    let cx = (a_sq * (b[1] - c[1]) + b_sq * (c[1] - a[1]) + c_sq * (a[1] - b[1])) / d;
    let cy = (a_sq * (c[0] - b[0]) + b_sq * (a[0] - c[0]) + c_sq * (b[0] - a[0])) / d;
    let radius = ((a[0] - cx).powi(2) + (a[1] - cy).powi(2)).sqrt();
    ([cx, cy], radius)
}

/// Coordinate-seeded shuffle; breaks sorted worst cases while staying reproducible
fn deterministic_shuffle(points: &mut [[f64; 2]]) {
    for i in (1..points.len()).rev() {
        let [x, y] = points[i];
        let hash = ((x.abs() * 1000.0) as usize)
            .wrapping_mul(31)
            .wrapping_add((y.abs() * 1000.0) as usize)
            .wrapping_add(i);
        points.swap(i, hash % (i + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ellipse(center: [f32; 2], a: f32, b: f32, rotation_deg: f32, n: usize) -> Vec<[f32; 2]> {
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32 * std::f32::consts::TAU;
                let (u, v) = (a * t.cos(), b * t.sin());
                [center[0] + u * cos - v * sin, center[1] + u * sin + v * cos]
            })
            .collect()
    }

    fn angle_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(180.0);
        d.min(180.0 - d)
    }

    #[test]
    fn test_min_area_rect_of_rotated_square() {
        let diamond = [[10.0, 0.0], [20.0, 10.0], [10.0, 20.0], [0.0, 10.0]];
        let rect = min_area_rect(&diamond);
        assert!((rect.area() - 200.0).abs() < 1e-3);
        assert!((rect.center[0] - 10.0).abs() < 1e-4);
        assert!((rect.center[1] - 10.0).abs() < 1e-4);
        assert!(angle_distance(rect.angle, 45.0) < 1e-3 || angle_distance(rect.angle, 135.0) < 1e-3);
    }

    #[test]
    fn test_min_area_rect_of_axis_aligned_rect() {
        let rect = min_area_rect(&[[0.0, 0.0], [30.0, 0.0], [30.0, 10.0], [0.0, 10.0], [15.0, 5.0]]);
        assert!((rect.area() - 300.0).abs() < 1e-3);
        assert_eq!(rect.center, [15.0, 5.0]);
    }

    #[test]
    fn test_min_area_rect_degenerate() {
        assert_eq!(min_area_rect(&[]), RotatedRect::default());
        let single = min_area_rect(&[[4.0, 5.0]]);
        assert_eq!(single.center, [4.0, 5.0]);
        assert_eq!(single.size, [0.0, 0.0]);
        let segment = min_area_rect(&[[0.0, 0.0], [10.0, 0.0]]);
        assert_eq!(segment.center, [5.0, 0.0]);
        assert!((segment.size[0].max(segment.size[1]) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_enclosing_circle_of_square() {
        let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [5.0, 5.0]];
        let circle = min_enclosing_circle(&square);
        assert!((circle.center[0] - 5.0).abs() < 1e-4);
        assert!((circle.center[1] - 5.0).abs() < 1e-4);
        assert!((circle.radius - 50f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_enclosing_circle_contains_every_point() {
        let points = ellipse([40.0, 30.0], 25.0, 8.0, 30.0, 60);
        let circle = min_enclosing_circle(&points);
        for [x, y] in points {
            let d = ((x - circle.center[0]).powi(2) + (y - circle.center[1]).powi(2)).sqrt();
            assert!(d <= circle.radius + 1e-3);
        }
        assert!((circle.radius - 25.0).abs() < 0.1);
    }

    #[test]
    fn test_enclosing_circle_trivial_inputs() {
        assert_eq!(min_enclosing_circle(&[]), Circle::default());
        let circle = min_enclosing_circle(&[[2.0, 3.0]]);
        assert_eq!(circle.center, [2.0, 3.0]);
        assert_eq!(circle.radius, 0.0);
    }

    #[test]
    fn test_fit_ellipse_recovers_axes() {
        let points = ellipse([50.0, 40.0], 30.0, 10.0, 0.0, 36);
        let rect = fit_ellipse(&points);
        assert!((rect.center[0] - 50.0).abs() < 1e-2);
        assert!((rect.center[1] - 40.0).abs() < 1e-2);
        assert!((rect.size[0] - 60.0).abs() < 1e-2);
        assert!((rect.size[1] - 20.0).abs() < 1e-2);
        assert!(angle_distance(rect.angle, 0.0) < 0.1);
    }

    #[test]
    fn test_fit_ellipse_recovers_rotation() {
        let points = ellipse([0.0, 0.0], 20.0, 5.0, 60.0, 48);
        let rect = fit_ellipse(&points);
        assert!(angle_distance(rect.angle, 60.0) < 0.1);
        assert!((rect.size[0] - 40.0).abs() < 1e-2);
    }

    #[test]
    fn test_fit_ellipse_falls_back_below_five_points() {
        let points = [[0.0, 0.0], [30.0, 0.0], [30.0, 10.0], [0.0, 10.0]];
        assert_eq!(fit_ellipse(&points), min_area_rect(&points));
    }

    #[test]
    fn test_fit_ellipse_falls_back_on_collinear_points() {
        let points: Vec<[f32; 2]> = (0..6).map(|i| [i as f32, 2.0 * i as f32]).collect();
        assert_eq!(fit_ellipse(&points), min_area_rect(&points));
    }
}
