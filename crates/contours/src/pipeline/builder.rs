use crate::{
    algorithms::{BoxBlurPreprocessor, GaussianBlurPreprocessor},
    backend::ImageprocGeoBackend,
    config::FinderConfig,
    finder::ContourFinder,
    pipeline::Pipeline,
    traits::{GeometryBackend, ImagePreprocessor},
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder<B = ImageprocGeoBackend> {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    backend: B,
    config: FinderConfig,
}

impl PipelineBuilder<ImageprocGeoBackend> {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            backend: ImageprocGeoBackend::new(),
            config: FinderConfig::default(),
        }
    }
}

impl<B: GeometryBackend> PipelineBuilder<B> {
    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    pub fn with_gaussian_blur(self, sigma: f32) -> Self {
        self.add_preprocessor(GaussianBlurPreprocessor { sigma })
    }

    pub fn with_box_blur(self, radius: u32) -> Self {
        self.add_preprocessor(BoxBlurPreprocessor { radius })
    }

    /// Set the finder configuration (replaces any existing one)
    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the geometry backend
    pub fn with_backend<C: GeometryBackend>(self, backend: C) -> PipelineBuilder<C> {
        PipelineBuilder {
            preprocessors: self.preprocessors,
            backend,
            config: self.config,
        }
    }

    pub fn build(self) -> Pipeline<B> {
        Pipeline::new(
            self.preprocessors,
            ContourFinder::with_backend(self.backend),
            self.config,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
