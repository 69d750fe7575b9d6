use geo::{EuclideanDistance, SimplifyIdx};
use geo_types::{Coord, LineString, Point};

use crate::traits::PolygonSimplifier;

/// Douglas-Peucker simplifier for closed polygons.
///
/// The ring is split at two mutually distant vertices and each of the two
/// chains is simplified on its own with `geo`, so the split points are real
/// extremes of the shape rather than whichever vertex happens to come first.
#[derive(Debug, Clone, Default)]
pub struct DouglasPeuckerSimplifier;

impl PolygonSimplifier for DouglasPeuckerSimplifier {
    fn simplify(&self, polygon: &[[f32; 2]], epsilon: f64) -> Vec<[f32; 2]> {
        let n = polygon.len();
        if n < 3 {
            return polygon.to_vec();
        }

        let first = farthest_from(polygon, 0);
        let second = farthest_from(polygon, first);
        if distance(polygon[first], polygon[second]) == 0.0 {
            // every point coincides
            return vec![polygon[0]];
        }

        let mut keep = vec![false; n];
        for (start, end) in [(first, second), (second, first)] {
            let chain = wrapping_chain(n, start, end);
            let line: LineString<f64> = chain.iter().map(|&i| to_coord(polygon[i])).collect();
            for kept in line.simplify_idx(&epsilon) {
                keep[chain[kept]] = true;
            }
        }

        keep.iter()
            .zip(polygon)
            .filter_map(|(&k, &p)| k.then_some(p))
            .collect()
    }
}

/// Indices running forward from `start` to `end` inclusive, wrapping past the last point
fn wrapping_chain(n: usize, start: usize, end: usize) -> Vec<usize> {
    let span = (end + n - start) % n;
    (0..=span).map(|step| (start + step) % n).collect()
}

fn farthest_from(points: &[[f32; 2]], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_dist = 0.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

pub(crate) fn to_coord([x, y]: [f32; 2]) -> Coord<f64> {
    Coord { x: x as f64, y: y as f64 }
}

fn distance(a: [f32; 2], b: [f32; 2]) -> f64 {
    Point::from(to_coord(a)).euclidean_distance(&Point::from(to_coord(b)))
}
