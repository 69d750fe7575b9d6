use geo_types::LineString;

use crate::types::{to_coords, Moments};

/// Moments of the region bounded by a closed polygon, by Green's theorem
pub fn polygon_moments(points: &[[f32; 2]]) -> Moments {
    let n = points.len();
    let mut m = Moments::default();
    if n < 3 {
        return m;
    }

    for i in 0..n {
        let [xi, yi] = points[i].map(f64::from);
        let [xj, yj] = points[(i + 1) % n].map(f64::from);
        let cross = xi * yj - xj * yi;

        m.m00 += cross;
        m.m10 += cross * (xi + xj);
        m.m01 += cross * (yi + yj);
        m.m20 += cross * (xi * xi + xi * xj + xj * xj);
        m.m02 += cross * (yi * yi + yi * yj + yj * yj);
        m.m11 += cross * (xi * yj + 2.0 * xi * yi + 2.0 * xj * yj + xj * yi);
    }

    m.m00 /= 2.0;
    m.m10 /= 6.0;
    m.m01 /= 6.0;
    m.m20 /= 12.0;
    m.m02 /= 12.0;
    m.m11 /= 24.0;

    // orientation only flips the sign
    if m.m00 < 0.0 {
        m = Moments {
            m00: -m.m00,
            m10: -m.m10,
            m01: -m.m01,
            m20: -m.m20,
            m11: -m.m11,
            m02: -m.m02,
        };
    }
    m
}

/// Length of the closed boundary through every point
pub fn arc_length(points: &[[f32; 2]]) -> f64 {
    use geo::EuclideanLength;

    if points.len() < 2 {
        return 0.0;
    }

    let mut ring = LineString::new(to_coords(points));
    ring.close();
    ring.euclidean_length()
}

/// Mean of the points
pub fn average(points: &[[f32; 2]]) -> Option<[f32; 2]> {
    if points.is_empty() {
        return None;
    }
    let (sx, sy) = points
        .iter()
        .fold((0.0f64, 0.0f64), |(sx, sy), &[x, y]| (sx + x as f64, sy + y as f64));
    let n = points.len() as f64;
    Some([(sx / n) as f32, (sy / n) as f32])
}
