use geo::EuclideanDistance;
use geo_types::{Line, LineString, Point};
use crate::{
    algorithms::simplification::to_coord,
    types::{to_coords, ConvexityDefect},
};

/// Convex hull of a point set, counter-clockwise, without a closing point.
///
/// Fewer than three points are returned as they are.
pub fn convex_hull(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    use geo::ConvexHull;

    if points.len() < 3 {
        return points.to_vec();
    }

    let hull = LineString::new(to_coords(points)).convex_hull();
    let mut result: Vec<[f32; 2]> = hull
        .exterior()
        .coords()
        .map(|coord| [coord.x as f32, coord.y as f32])
        .collect();

    // geo closes the ring
    if result.len() > 1 && result.first() == result.last() {
        result.pop();
    }
    result
}

/// Deepest contour point between the ends of each hull edge, for every edge
/// that leaves part of the contour behind
pub fn convexity_defects(points: &[[f32; 2]]) -> Vec<ConvexityDefect> {
    let hull = convex_hull(points);

    let mut indices: Vec<usize> = hull
        .iter()
        .filter_map(|vertex| points.iter().position(|p| p == vertex))
        .collect();
    indices.sort_unstable();
    indices.dedup();

    if indices.len() < 3 {
        return Vec::new();
    }

    let n = points.len();
    let mut defects = Vec::new();

    for (k, &start) in indices.iter().enumerate() {
        let end = indices[(k + 1) % indices.len()];
        let span = (end + n - start) % n;

        let edge = Line::new(to_coord(points[start]), to_coord(points[end]));
        let mut depth = 0.0;
        let mut farthest = start;
        for step in 1..span {
            let i = (start + step) % n;
            let d = Point::from(to_coord(points[i])).euclidean_distance(&edge);
            if d > depth {
                depth = d;
                farthest = i;
            }
        }

        if depth > 0.0 {
            defects.push(ConvexityDefect {
                start,
                end,
                farthest,
                depth: depth as f32,
            });
        }
    }

    defects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_drops_interior_points() {
        let points = [[0.0, 0.0], [10.0, 0.0], [5.0, 5.0], [10.0, 10.0], [0.0, 10.0]];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&[5.0, 5.0]));
    }

    #[test]
    fn test_hull_of_tiny_inputs() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[[1.0, 2.0], [3.0, 4.0]]).len(), 2);
    }

    #[test]
    fn test_notch_is_a_defect() {
        // a square with a V cut into its top edge
        let points = [
            [0.0, 0.0],
            [20.0, 0.0],
            [20.0, 20.0],
            [12.0, 20.0],
            [10.0, 12.0],
            [8.0, 20.0],
            [0.0, 20.0],
        ];
        let defects = convexity_defects(&points);
        assert_eq!(defects.len(), 1);
        let defect = defects[0];
        assert_eq!(defect.farthest, 4);
        assert!((defect.depth - 8.0).abs() < 1e-4);
        assert!(defect.start < 4 && defect.end > 4);
    }

    #[test]
    fn test_convex_shape_has_no_defects() {
        let points = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        assert!(convexity_defects(&points).is_empty());
    }
}
