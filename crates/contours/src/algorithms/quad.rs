//! Quadrilateral fitting by binary search over the simplification tolerance.
//!
//! Vertex count falls monotonically (but not in closed form) as the tolerance
//! grows, so the search brackets the tolerance that leaves exactly four
//! vertices: doubling until the count drops below the target, then bisecting.

use serde::Serialize;
use tracing::{debug, trace};

use crate::traits::PolygonSimplifier;

pub const QUAD_VERTICES: usize = 4;
pub const MAX_QUAD_ITERATIONS: u32 = 16;
/// Starting tolerance; a good guess at typical pixel scales
pub const INITIAL_QUAD_EPSILON: f64 = 16.0;

/// One simplification attempt of the search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadSearchStep {
    pub epsilon: f64,
    pub vertex_count: usize,
    /// Bracket after this step's update
    pub min_epsilon: f64,
    pub max_epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadFit {
    pub points: Vec<[f32; 2]>,
    /// Tolerance that produced `points` (0 when the hull was returned as is)
    pub epsilon: f64,
    pub iterations: u32,
    /// `points` has exactly four vertices
    pub converged: bool,
    pub steps: Vec<QuadSearchStep>,
}

/// Simplify a convex hull down to four vertices.
///
/// Hulls of four points or fewer come back unchanged. If no tolerance within
/// the iteration budget gives exactly four vertices, the last attempt is
/// returned as is.
pub fn fit_quad<S>(hull: &[[f32; 2]], simplifier: &S) -> Vec<[f32; 2]>
where
    S: PolygonSimplifier + ?Sized,
{
    fit_quad_with_trace(hull, simplifier).points
}

/// [`fit_quad`], also reporting the tolerance found and every search step
pub fn fit_quad_with_trace<S>(hull: &[[f32; 2]], simplifier: &S) -> QuadFit
where
    S: PolygonSimplifier + ?Sized,
{
    if hull.len() <= QUAD_VERTICES {
        return QuadFit {
            points: hull.to_vec(),
            epsilon: 0.0,
            iterations: 0,
            converged: hull.len() == QUAD_VERTICES,
            steps: Vec::new(),
        };
    }

    let mut min_epsilon = 0.0;
    let mut max_epsilon = f64::INFINITY;
    let mut cur_epsilon = INITIAL_QUAD_EPSILON;
    let mut quad = hull.to_vec();
    let mut epsilon = cur_epsilon;
    let mut steps = Vec::new();

    for _ in 0..MAX_QUAD_ITERATIONS {
        quad = simplifier.simplify(hull, cur_epsilon);
        epsilon = cur_epsilon;
        let vertex_count = quad.len();

        if vertex_count > QUAD_VERTICES {
            min_epsilon = cur_epsilon;
            cur_epsilon = if max_epsilon == f64::INFINITY {
                cur_epsilon * 2.0
            } else {
                (min_epsilon + max_epsilon) / 2.0
            };
        } else if vertex_count < QUAD_VERTICES {
            max_epsilon = cur_epsilon;
            cur_epsilon = (min_epsilon + max_epsilon) / 2.0;
        }

        steps.push(QuadSearchStep {
            epsilon,
            vertex_count,
            min_epsilon,
            max_epsilon,
        });
        trace!(epsilon, vertex_count, min_epsilon, max_epsilon, "quad search step");

        if vertex_count == QUAD_VERTICES {
            break;
        }
    }

    let converged = quad.len() == QUAD_VERTICES;
    if !converged {
        debug!(
            hull_points = hull.len(),
            vertices = quad.len(),
            "quad search did not converge"
        );
    }

    QuadFit {
        points: quad,
        epsilon,
        iterations: steps.len() as u32,
        converged,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::DouglasPeuckerSimplifier;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn circle(n: usize, radius: f32) -> Vec<[f32; 2]> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32 * std::f32::consts::TAU;
                [200.0 + radius * t.cos(), 200.0 + radius * t.sin()]
            })
            .collect()
    }

    /// Returns a prefix of the polygon whose length depends only on epsilon
    struct StepSimplifier {
        count_for: fn(f64) -> usize,
        calls: AtomicU32,
    }

    impl StepSimplifier {
        fn new(count_for: fn(f64) -> usize) -> Self {
            Self { count_for, calls: AtomicU32::new(0) }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl PolygonSimplifier for StepSimplifier {
        fn simplify(&self, polygon: &[[f32; 2]], epsilon: f64) -> Vec<[f32; 2]> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let count = (self.count_for)(epsilon).min(polygon.len());
            polygon[..count].to_vec()
        }
    }

    #[test]
    fn test_quad_is_returned_unchanged() {
        let quad = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let fit = fit_quad_with_trace(&quad, &DouglasPeuckerSimplifier);
        assert_eq!(fit.points, quad.to_vec());
        assert_eq!(fit.iterations, 0);
        assert!(fit.converged);
    }

    #[test]
    fn test_triangle_is_returned_unchanged() {
        let triangle = [[0.0, 0.0], [10.0, 0.0], [5.0, 8.0]];
        let simplifier = StepSimplifier::new(|_| 1);
        assert_eq!(fit_quad(&triangle, &simplifier), triangle.to_vec());
        assert_eq!(simplifier.calls(), 0);
    }

    #[test]
    fn test_degenerate_hulls_pass_through() {
        let simplifier = DouglasPeuckerSimplifier;
        assert!(fit_quad(&[], &simplifier).is_empty());
        assert_eq!(fit_quad(&[[1.0, 1.0]], &simplifier), vec![[1.0, 1.0]]);
    }

    #[test]
    fn test_circle_reduces_to_four_points() {
        let hull = circle(100, 100.0);
        let fit = fit_quad_with_trace(&hull, &DouglasPeuckerSimplifier);
        assert_eq!(fit.points.len(), 4);
        assert!(fit.converged);
        assert!(fit.iterations <= MAX_QUAD_ITERATIONS);
        for step in &fit.steps {
            assert!(step.min_epsilon <= step.max_epsilon);
        }
        assert!(fit.points.iter().all(|p| hull.contains(p)));
    }

    #[test]
    fn test_output_is_idempotent() {
        let hull = circle(100, 100.0);
        let quad = fit_quad(&hull, &DouglasPeuckerSimplifier);
        assert_eq!(fit_quad(&quad, &DouglasPeuckerSimplifier), quad);
    }

    #[test]
    fn test_near_collinear_point_is_discarded() {
        let hull = [[0.0, 0.0], [50.0, -1.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];
        let fit = fit_quad_with_trace(&hull, &DouglasPeuckerSimplifier);
        assert_eq!(fit.points, vec![[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]);
        assert!(fit.iterations <= MAX_QUAD_ITERATIONS);
        assert_eq!(fit.epsilon, INITIAL_QUAD_EPSILON);
    }

    #[test]
    fn test_search_bisects_after_overshoot() {
        let hull = circle(8, 50.0);
        let simplifier = StepSimplifier::new(|epsilon| match epsilon {
            e if e >= 12.0 => 3,
            e if e >= 10.0 => 4,
            _ => 5,
        });
        let fit = fit_quad_with_trace(&hull, &simplifier);

        let tried: Vec<f64> = fit.steps.iter().map(|s| s.epsilon).collect();
        assert_eq!(tried, vec![16.0, 8.0, 12.0, 10.0]);
        assert_eq!(fit.points.len(), 4);
        assert_eq!(fit.epsilon, 10.0);
        assert_eq!(simplifier.calls(), 4);
    }

    #[test]
    fn test_bracket_shrinks_once_bounded() {
        let hull = circle(8, 50.0);
        // never hits four: five below 20, three from 20 up
        let simplifier = StepSimplifier::new(|epsilon| if epsilon < 20.0 { 5 } else { 3 });
        let fit = fit_quad_with_trace(&hull, &simplifier);

        assert!(!fit.converged);
        assert_eq!(fit.iterations, MAX_QUAD_ITERATIONS);
        assert_eq!(simplifier.calls(), MAX_QUAD_ITERATIONS);

        let mut previous_width = f64::INFINITY;
        for step in &fit.steps {
            assert!(step.min_epsilon <= step.max_epsilon);
            if step.max_epsilon.is_finite() {
                let width = step.max_epsilon - step.min_epsilon;
                assert!(width < previous_width);
                previous_width = width;
            }
        }
        let last = fit.steps.last().unwrap();
        assert_eq!(fit.points.len(), last.vertex_count);
    }

    #[test]
    fn test_expanding_search_doubles_until_bounded() {
        let hull = circle(8, 50.0);
        let simplifier = StepSimplifier::new(|epsilon| if epsilon < 100.0 { 6 } else { 4 });
        let fit = fit_quad_with_trace(&hull, &simplifier);
        let tried: Vec<f64> = fit.steps.iter().map(|s| s.epsilon).collect();
        assert_eq!(tried, vec![16.0, 32.0, 64.0, 128.0]);
        assert!(fit.converged);
    }

    #[test]
    fn test_simpler_hull_needs_no_larger_epsilon() {
        let square = [[0.0, 0.0], [50.0, -1.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];
        let round = circle(100, 100.0);
        let square_fit = fit_quad_with_trace(&square, &DouglasPeuckerSimplifier);
        let round_fit = fit_quad_with_trace(&round, &DouglasPeuckerSimplifier);
        assert!(square_fit.epsilon <= round_fit.epsilon);
    }
}
