use image::GrayImage;

use crate::{
    algorithms::{self, DouglasPeuckerSimplifier},
    config::{ChainApproximation, ContourMode},
    error::Result,
    traits::{GeometryBackend, PolygonSimplifier},
    types::{to_geo_polygon, Circle, ConvexityDefect, Moments, Rect, RotatedRect, TracedBorder},
};

/// Default geometry backend: imageproc for border following, geo for
/// areas and hulls, the crate's own fitters for the rest
#[derive(Debug, Clone, Default)]
pub struct ImageprocGeoBackend {
    simplifier: DouglasPeuckerSimplifier,
}

impl ImageprocGeoBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolygonSimplifier for ImageprocGeoBackend {
    fn simplify(&self, polygon: &[[f32; 2]], epsilon: f64) -> Vec<[f32; 2]> {
        self.simplifier.simplify(polygon, epsilon)
    }
}

impl GeometryBackend for ImageprocGeoBackend {
    fn extract_contours(
        &self,
        binary: &GrayImage,
        mode: ContourMode,
        chain: ChainApproximation,
    ) -> Result<Vec<TracedBorder>> {
        Ok(algorithms::find_contours(binary, mode, chain))
    }

    fn area(&self, points: &[[f32; 2]]) -> f64 {
        use geo::Area;
        to_geo_polygon(points).unsigned_area()
    }

    fn perimeter(&self, points: &[[f32; 2]]) -> f64 {
        algorithms::arc_length(points)
    }

    fn convex_hull(&self, points: &[[f32; 2]]) -> Vec<[f32; 2]> {
        algorithms::convex_hull(points)
    }

    fn moments(&self, points: &[[f32; 2]]) -> Moments {
        algorithms::polygon_moments(points)
    }

    fn bounding_rect(&self, points: &[[f32; 2]]) -> Rect {
        Rect::from_pixels(points)
    }

    fn min_area_rect(&self, points: &[[f32; 2]]) -> RotatedRect {
        algorithms::min_area_rect(points)
    }

    fn min_enclosing_circle(&self, points: &[[f32; 2]]) -> Circle {
        algorithms::min_enclosing_circle(points)
    }

    fn fit_ellipse(&self, points: &[[f32; 2]]) -> RotatedRect {
        algorithms::fit_ellipse(points)
    }

    fn convexity_defects(&self, points: &[[f32; 2]]) -> Vec<ConvexityDefect> {
        algorithms::convexity_defects(points)
    }
}
