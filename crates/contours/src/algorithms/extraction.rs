use image::GrayImage;
use imageproc::contours::BorderType;

use crate::{
    config::{ChainApproximation, ContourMode},
    types::TracedBorder,
};

/// Border following (Suzuki-Abe) via imageproc.
///
/// Non-zero pixels are foreground. In `External` mode only borders without a
/// parent are kept; `List` keeps every border and flags the hole borders.
pub fn find_contours(binary: &GrayImage, mode: ContourMode, chain: ChainApproximation) -> Vec<TracedBorder> {
    let contours = imageproc::contours::find_contours::<i32>(binary);

    contours
        .into_iter()
        .filter(|contour| match mode {
            ContourMode::External => contour.parent.is_none(),
            ContourMode::List => true,
        })
        .map(|contour| {
            let points: Vec<[f32; 2]> = contour
                .points
                .iter()
                .map(|p| [p.x as f32, p.y as f32])
                .collect();
            let points = match chain {
                ChainApproximation::Full => points,
                ChainApproximation::Simple => compress_chain(&points),
            };
            TracedBorder::new(points, contour.border_type == BorderType::Hole)
        })
        .collect()
}

/// Drop every point that continues a straight horizontal, vertical or
/// diagonal run, keeping only where the step direction changes
pub fn compress_chain(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    points
        .iter()
        .enumerate()
        .filter(|&(i, &p)| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, p) != step(p, next)
        })
        .map(|(_, &p)| p)
        .collect()
}

fn step(from: [f32; 2], to: [f32; 2]) -> (i8, i8) {
    let sign = |d: f32| if d > 0.0 { 1 } else if d < 0.0 { -1 } else { 0 };
    (sign(to[0] - from[0]), sign(to[1] - from[1]))
}
