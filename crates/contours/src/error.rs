use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContourError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Contour index {index} out of range ({len} contours)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No readable frames in {0}")]
    EmptyFrameSource(String),

    #[error("Tracker returned {labels} labels for {rects} rectangles")]
    TrackerLabelMismatch { labels: usize, rects: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContourError>;
