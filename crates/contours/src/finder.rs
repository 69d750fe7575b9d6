use image::GrayImage;
use tracing::debug;

use crate::{
    algorithms::{self, binarize, QuadFit},
    backend::ImageprocGeoBackend,
    config::FinderConfig,
    error::{ContourError, Result},
    traits::GeometryBackend,
    types::{BlobSummary, Circle, Contour, ConvexityDefect, Rect, RotatedRect, TracedBorder},
};

/// Finds, filters and sorts contours in grayscale frames
#[derive(Debug, Clone, Default)]
pub struct ContourFinder<B = ImageprocGeoBackend> {
    backend: B,
}

impl ContourFinder<ImageprocGeoBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: GeometryBackend> ContourFinder<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Threshold `image`, trace its contours and apply the area filters and
    /// ordering of `config`. The image itself is left untouched.
    pub fn find_contours(&self, image: &GrayImage, config: &FinderConfig) -> Result<ContourSet<'_, B>> {
        let binary = binarize(image, config.threshold, config.invert);
        let mut contours: Vec<Contour> = self
            .backend
            .extract_contours(&binary, config.mode, config.chain)?
            .into_iter()
            .map(|border| Contour::measure(border, &self.backend))
            .collect();
        let found = contours.len();

        let frame_area = image.width() as f64 * image.height() as f64;
        let (min_area, max_area) = config.area_limits(frame_area);
        if min_area.is_some() || max_area.is_some() {
            contours.retain(|contour| {
                min_area.map_or(true, |min| contour.area >= min)
                    && max_area.map_or(true, |max| contour.area <= max)
            });
        }

        if config.sort_by_size {
            contours.sort_by(|a, b| b.area.total_cmp(&a.area));
        }

        debug!(
            found,
            kept = contours.len(),
            ?min_area,
            ?max_area,
            "extracted contours"
        );

        Ok(ContourSet {
            backend: &self.backend,
            contours,
            image_width: image.width(),
            image_height: image.height(),
        })
    }
}

/// The contours of one frame, with per-contour descriptors
#[derive(Debug, Clone)]
pub struct ContourSet<'a, B = ImageprocGeoBackend> {
    backend: &'a B,
    contours: Vec<Contour>,
    pub image_width: u32,
    pub image_height: u32,
}

impl<'a, B: GeometryBackend> ContourSet<'a, B> {
    /// Measure borders that were traced elsewhere, unfiltered and in their given order
    pub fn from_borders(backend: &'a B, borders: Vec<TracedBorder>, image_width: u32, image_height: u32) -> Self {
        Self {
            backend,
            contours: borders
                .into_iter()
                .map(|border| Contour::measure(border, backend))
                .collect(),
            image_width,
            image_height,
        }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn into_contours(self) -> Vec<Contour> {
        self.contours
    }

    pub fn contour(&self, i: usize) -> Result<&Contour> {
        self.contours.get(i).ok_or(ContourError::IndexOutOfRange {
            index: i,
            len: self.contours.len(),
        })
    }

    fn points(&self, i: usize) -> Result<&[[f32; 2]]> {
        Ok(&self.contour(i)?.points)
    }

    pub fn bounding_rects(&self) -> Vec<Rect> {
        self.contours.iter().map(|c| c.bounding_rect).collect()
    }

    pub fn bounding_rect(&self, i: usize) -> Result<Rect> {
        Ok(self.contour(i)?.bounding_rect)
    }

    /// Center of the bounding box; the steadiest of the three centers
    pub fn center(&self, i: usize) -> Result<[f32; 2]> {
        Ok(self.bounding_rect(i)?.center())
    }

    /// Center of mass of the enclosed region.
    ///
    /// A contour enclosing no area (a point or a line) has no center of mass;
    /// the bounding box center stands in for it.
    pub fn centroid(&self, i: usize) -> Result<[f32; 2]> {
        let points = self.points(i)?;
        match self.backend.moments(points).centroid() {
            Some([x, y]) => Ok([x as f32, y as f32]),
            None => {
                debug!(index = i, "zero-area contour, centroid falls back to bounding box center");
                self.center(i)
            }
        }
    }

    /// Mean of the contour's vertices; the least steady center
    pub fn average(&self, i: usize) -> Result<[f32; 2]> {
        let points = self.points(i)?;
        Ok(algorithms::average(points).unwrap_or_default())
    }

    /// Offset of the centroid from the bounding box center
    pub fn balance(&self, i: usize) -> Result<[f32; 2]> {
        let centroid = self.centroid(i)?;
        let center = self.center(i)?;
        Ok([centroid[0] - center[0], centroid[1] - center[1]])
    }

    /// The area the filters and ordering were applied to
    pub fn contour_area(&self, i: usize) -> Result<f64> {
        Ok(self.contour(i)?.area)
    }

    pub fn arc_length(&self, i: usize) -> Result<f64> {
        Ok(self.backend.perimeter(self.points(i)?))
    }

    pub fn convex_hull(&self, i: usize) -> Result<Vec<[f32; 2]>> {
        Ok(self.backend.convex_hull(self.points(i)?))
    }

    pub fn convexity_defects(&self, i: usize) -> Result<Vec<ConvexityDefect>> {
        Ok(self.backend.convexity_defects(self.points(i)?))
    }

    pub fn min_area_rect(&self, i: usize) -> Result<RotatedRect> {
        Ok(self.backend.min_area_rect(self.points(i)?))
    }

    pub fn min_enclosing_circle(&self, i: usize) -> Result<Circle> {
        Ok(self.backend.min_enclosing_circle(self.points(i)?))
    }

    /// Best-fit ellipse; contours too short to fit give their minimum-area rectangle
    pub fn fit_ellipse(&self, i: usize) -> Result<RotatedRect> {
        Ok(self.backend.fit_ellipse(self.points(i)?))
    }

    /// Four-vertex simplification of the contour's convex hull
    pub fn fit_quad(&self, i: usize) -> Result<Vec<[f32; 2]>> {
        Ok(self.fit_quad_with_trace(i)?.points)
    }

    pub fn fit_quad_with_trace(&self, i: usize) -> Result<QuadFit> {
        let hull = self.convex_hull(i)?;
        Ok(algorithms::fit_quad_with_trace(&hull, self.backend))
    }

    pub fn blob(&self, i: usize) -> Result<BlobSummary> {
        let contour = self.contour(i)?;
        Ok(BlobSummary {
            index: i,
            area: contour.area,
            arc_length: self.arc_length(i)?,
            centroid: self.centroid(i)?,
            bounding_rect: contour.bounding_rect,
            point_count: contour.len(),
            is_hole: contour.is_hole,
        })
    }

    pub fn blobs(&self) -> Result<Vec<BlobSummary>> {
        (0..self.len()).map(|i| self.blob(i)).collect()
    }
}
