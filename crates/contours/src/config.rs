use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Which borders the finder reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContourMode {
    /// Outermost borders only
    #[default]
    External,
    /// Every border, including the borders of holes
    List,
}

/// How many border pixels each contour keeps
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChainApproximation {
    /// Every border pixel
    Full,
    /// Straight horizontal, vertical and diagonal runs collapse to their end points
    #[default]
    Simple,
}

/// An area limit, expressed in one of three units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum AreaBound {
    /// Square pixels
    Pixels(f64),
    /// Area of a circle with this radius
    Radius(f64),
    /// Fraction of the frame area, between 0 and 1
    Normalized(f64),
}

impl AreaBound {
    /// The bound in square pixels for a frame of `frame_area` pixels
    pub fn resolve(&self, frame_area: f64) -> f64 {
        match *self {
            Self::Pixels(area) => area,
            Self::Radius(radius) => std::f64::consts::PI * radius * radius,
            Self::Normalized(fraction) => fraction * frame_area,
        }
    }
}

/// Settings for a single contour extraction.
///
/// Passed by reference into every call, so consecutive frames never share
/// hidden state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FinderConfig {
    /// Pixels brighter than this are foreground
    pub threshold: u8,
    /// Look for dark regions instead of bright ones
    pub invert: bool,
    pub mode: ContourMode,
    pub chain: ChainApproximation,
    /// Order contours by decreasing area
    pub sort_by_size: bool,
    pub min_area: Option<AreaBound>,
    pub max_area: Option<AreaBound>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            invert: false,
            mode: ContourMode::External,
            chain: ChainApproximation::Simple,
            sort_by_size: false,
            min_area: None,
            max_area: None,
        }
    }
}

impl FinderConfig {
    /// Resolved `(min, max)` limits, or `None` for a limit that filters nothing
    pub fn area_limits(&self, frame_area: f64) -> (Option<f64>, Option<f64>) {
        let min = self
            .min_area
            .map(|bound| bound.resolve(frame_area))
            .filter(|&area| area > 0.0);
        let max = self
            .max_area
            .map(|bound| bound.resolve(frame_area))
            .filter(|area| area.is_finite());
        (min, max)
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_mode(mut self, mode: ContourMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_chain(mut self, chain: ChainApproximation) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_sort_by_size(mut self, sort_by_size: bool) -> Self {
        self.sort_by_size = sort_by_size;
        self
    }

    pub fn with_min_area(mut self, bound: AreaBound) -> Self {
        self.min_area = Some(bound);
        self
    }

    pub fn with_max_area(mut self, bound: AreaBound) -> Self {
        self.max_area = Some(bound);
        self
    }
}
