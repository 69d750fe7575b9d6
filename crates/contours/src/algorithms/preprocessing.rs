use image::GrayImage;
use crate::{error::Result, traits::ImagePreprocessor};

/// Pixels above `threshold` become 255, the rest 0; swapped when `invert` is set
pub fn binarize(image: &GrayImage, threshold: u8, invert: bool) -> GrayImage {
    let mut binary = imageproc::contrast::threshold(image, threshold);
    if invert {
        image::imageops::invert(&mut binary);
    }
    binary
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }
}

/// Mean filter over a square window of side `2 * radius + 1`
#[derive(Debug, Clone)]
pub struct BoxBlurPreprocessor {
    pub radius: u32,
}

impl Default for BoxBlurPreprocessor {
    fn default() -> Self {
        Self { radius: 5 }
    }
}

impl ImagePreprocessor for BoxBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.radius == 0 {
            return Ok(image.clone());
        }
        Ok(imageproc::filter::box_filter(image, self.radius, self.radius))
    }
}
