pub mod builder;

use image::GrayImage;
use crate::{
    backend::ImageprocGeoBackend,
    config::FinderConfig,
    error::Result,
    finder::{ContourFinder, ContourSet},
    traits::{GeometryBackend, ImagePreprocessor},
};

/// Preprocessing stages followed by contour extraction with a fixed configuration
pub struct Pipeline<B = ImageprocGeoBackend> {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    finder: ContourFinder<B>,
    config: FinderConfig,
}

impl Pipeline<ImageprocGeoBackend> {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }
}

impl<B: GeometryBackend> Pipeline<B> {
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        finder: ContourFinder<B>,
        config: FinderConfig,
    ) -> Self {
        Self {
            preprocessors,
            finder,
            config,
        }
    }

    /// Process a frame through every stage. The frame itself is not modified.
    pub fn process(&self, image: &GrayImage) -> Result<ContourSet<'_, B>> {
        let mut processed_image = image.clone();
        for preprocessor in &self.preprocessors {
            processed_image = preprocessor.preprocess(&processed_image)?;
        }

        self.finder.find_contours(&processed_image, &self.config)
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn finder(&self) -> &ContourFinder<B> {
        &self.finder
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} preprocessors, threshold {}, mode {}, chain {}",
            self.preprocessors.len(),
            self.config.threshold,
            self.config.mode,
            self.config.chain,
        )
    }
}
