//! # Contour Finder
//!
//! Finds the outlines of bright (or dark) regions in grayscale frames and
//! describes them: bounding boxes, centers, areas, hulls, enclosing shapes,
//! fitted ellipses and four-corner approximations.
//!
//! Every geometric capability comes from a [`GeometryBackend`], so the finder
//! itself holds no vision library types. [`ImageprocGeoBackend`] is the
//! default, built on `imageproc` and `geo`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contours::{AreaBound, ContourFinder, FinderConfig};
//! use image::open;
//!
//! let finder = ContourFinder::new();
//! let config = FinderConfig::default()
//!     .with_threshold(100)
//!     .with_min_area(AreaBound::Radius(10.0))
//!     .with_sort_by_size(true);
//!
//! let image = open("frame.png")?.to_luma8();
//! let found = finder.find_contours(&image, &config)?;
//! for i in 0..found.len() {
//!     println!("{i}: centroid {:?}, quad {:?}", found.centroid(i)?, found.fit_quad(i)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipelines and sessions
//!
//! ```rust,no_run
//! use contours::{ImageSequenceSource, Pipeline, Session};
//!
//! let pipeline = Pipeline::builder()
//!     .with_gaussian_blur(2.0)
//!     .build();
//!
//! let source = ImageSequenceSource::open("frames/")?;
//! let mut session = Session::new(pipeline, source);
//! while let Some(report) = session.step()? {
//!     println!("frame {}: {} blobs", report.index, report.blobs.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod backend;
pub mod finder;
pub mod pipeline;
pub mod tracking;
pub mod io;

pub use error::{ContourError, Result};
pub use types::*;
pub use config::{AreaBound, ChainApproximation, ContourMode, FinderConfig};
pub use traits::*;
pub use algorithms::{fit_quad, fit_quad_with_trace, QuadFit, QuadSearchStep};
pub use backend::ImageprocGeoBackend;
pub use finder::{ContourFinder, ContourSet};
pub use pipeline::{builder::PipelineBuilder, Pipeline};
pub use tracking::{FrameReport, ImageSequenceSource, Session};
