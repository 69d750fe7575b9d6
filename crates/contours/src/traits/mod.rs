use image::GrayImage;
use crate::{
    config::{ChainApproximation, ContourMode},
    error::Result,
    types::{Circle, ConvexityDefect, Moments, Rect, RotatedRect, TracedBorder},
};

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image (e.g., blur)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for polygon simplification with a single tolerance knob
pub trait PolygonSimplifier: Send + Sync {
    /// Reduce the vertex count of a closed polygon so that no dropped vertex
    /// lies farther than `epsilon` from the simplified boundary
    fn simplify(&self, polygon: &[[f32; 2]], epsilon: f64) -> Vec<[f32; 2]>;
}

/// The vision-geometry capabilities the contour finder depends on
pub trait GeometryBackend: PolygonSimplifier {
    /// Trace borders in a binary image (non-zero pixels are foreground).
    ///
    /// Area filtering, ordering and bounding boxes all go through [`Self::area`]
    /// and [`Self::bounding_rect`] afterwards.
    fn extract_contours(
        &self,
        binary: &GrayImage,
        mode: ContourMode,
        chain: ChainApproximation,
    ) -> Result<Vec<TracedBorder>>;

    /// Unsigned enclosed area
    fn area(&self, points: &[[f32; 2]]) -> f64;

    /// Length of the closed boundary
    fn perimeter(&self, points: &[[f32; 2]]) -> f64;

    fn convex_hull(&self, points: &[[f32; 2]]) -> Vec<[f32; 2]>;

    fn moments(&self, points: &[[f32; 2]]) -> Moments;

    fn bounding_rect(&self, points: &[[f32; 2]]) -> Rect;

    fn min_area_rect(&self, points: &[[f32; 2]]) -> RotatedRect;

    fn min_enclosing_circle(&self, points: &[[f32; 2]]) -> Circle;

    /// Best-fit ellipse, as the rectangle it is inscribed in
    fn fit_ellipse(&self, points: &[[f32; 2]]) -> RotatedRect;

    fn convexity_defects(&self, points: &[[f32; 2]]) -> Vec<ConvexityDefect>;
}

/// Assigns persistent labels to bounding rectangles across successive frames
pub trait RectTracker {
    /// Label each rectangle; the result has one label per input rectangle
    fn track(&mut self, rects: &[Rect]) -> Vec<u32>;
}

/// Produces frames one at a time
pub trait FrameSource {
    /// The next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<GrayImage>>;
}
