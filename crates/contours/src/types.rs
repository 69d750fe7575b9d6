use geo_types::{Coord, LineString, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::traits::GeometryBackend;

/// Axis-aligned rectangle.
///
/// [`Rect::from_points`] gives coordinate extents; contour boxes come from
/// [`Rect::from_pixels`], which counts pixels inclusively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Smallest rectangle containing every point, or the zero rect for no points
    pub fn from_points(points: &[[f32; 2]]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for &[x, y] in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Rectangle covering every pixel a contour passes through.
    ///
    /// Pixels are counted inclusively, so a contour through columns 10 to 30
    /// is 21 wide and its center falls at 20.5.
    pub fn from_pixels(points: &[[f32; 2]]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let extent = Self::from_points(points);
        Self {
            width: extent.width + 1.0,
            height: extent.height + 1.0,
            ..extent
        }
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.width / 2.0, self.y + self.height / 2.0]
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Rectangle of arbitrary orientation. `angle` is in degrees, in `[0, 180)`,
/// and gives the direction of the side of length `size[0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RotatedRect {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub angle: f32,
}

impl RotatedRect {
    pub fn area(&self) -> f32 {
        self.size[0] * self.size[1]
    }

    /// Corner points in counter-clockwise order
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let hw = self.size[0] / 2.0;
        let hh = self.size[1] / 2.0;
        let [cx, cy] = self.center;
        let corner = |u: f32, v: f32| [cx + u * cos - v * sin, cy + u * sin + v * cos];
        [corner(-hw, -hh), corner(hw, -hh), corner(hw, hh), corner(-hw, hh)]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Circle {
    pub center: [f32; 2],
    pub radius: f32,
}

/// Polygon moments up to second order, with `m00` kept non-negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
}

impl Moments {
    /// Center of mass, or `None` when the polygon encloses no area
    pub fn centroid(&self) -> Option<[f64; 2]> {
        if self.m00.abs() <= f64::EPSILON {
            return None;
        }
        Some([self.m10 / self.m00, self.m01 / self.m00])
    }
}

/// A point of a contour lying inside its convex hull.
///
/// `start`, `end` and `farthest` index the contour's points: the hull edge
/// runs from `start` to `end` and `farthest` is the deepest point between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub farthest: usize,
    pub depth: f32,
}

/// A border as the tracer reported it, before any measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedBorder {
    pub points: Vec<[f32; 2]>,
    /// Border of a hole rather than of a foreground region
    pub is_hole: bool,
}

impl TracedBorder {
    pub fn new(points: Vec<[f32; 2]>, is_hole: bool) -> Self {
        Self { points, is_hole }
    }
}

/// A closed boundary found in a binary frame, with its measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[f32; 2]>,
    pub bounding_rect: Rect,
    /// Unsigned enclosed area
    pub area: f64,
    /// Border of a hole rather than of a foreground region
    pub is_hole: bool,
}

impl Contour {
    /// Area and bounding box of `border`, as `backend` measures them
    pub fn measure<B>(border: TracedBorder, backend: &B) -> Self
    where
        B: GeometryBackend + ?Sized,
    {
        Self {
            bounding_rect: backend.bounding_rect(&border.points),
            area: backend.area(&border.points),
            points: border.points,
            is_hole: border.is_hole,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Per-contour summary suitable for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobSummary {
    pub index: usize,
    pub area: f64,
    pub arc_length: f64,
    pub centroid: [f32; 2],
    pub bounding_rect: Rect,
    pub point_count: usize,
    pub is_hole: bool,
}

pub(crate) fn to_coords(points: &[[f32; 2]]) -> Vec<Coord<f64>> {
    points
        .iter()
        .map(|&[x, y]| Coord { x: x as f64, y: y as f64 })
        .collect()
}

/// Polygon whose exterior is the (implicitly closed) point sequence
pub(crate) fn to_geo_polygon(points: &[[f32; 2]]) -> Polygon<f64> {
    Polygon::new(LineString::new(to_coords(points)), vec![])
}
