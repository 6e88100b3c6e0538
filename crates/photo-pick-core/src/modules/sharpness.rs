//! Sharpness classification via Laplacian response variance.
//!
//! The focus measure is the variance of a 3x3 Laplacian filter response
//! over the luminance channel. Sharp images have strong second-derivative
//! edge responses and therefore high variance; blurry or featureless
//! images concentrate near zero.

use image::{DynamicImage, GrayImage};

/// Default variance threshold on the 8-bit luminance scale.
pub const DEFAULT_SHARPNESS_THRESHOLD: f64 = 100.0;

/// Configuration for the sharpness classifier.
#[derive(Debug, Clone)]
pub struct SharpnessConfig {
    /// Variance threshold on the 8-bit luminance scale. Images at or
    /// above this are declared sharp.
    pub threshold: f64,
}

impl Default for SharpnessConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SHARPNESS_THRESHOLD,
        }
    }
}

/// Computes the variance of the Laplacian response over interior pixels.
///
/// Uses the 4-neighbour kernel (0,1,0 / 1,-4,1 / 0,1,0). Images smaller
/// than 3x3 have no interior and return 0.0.
#[must_use]
pub fn laplacian_variance(luma: &GrayImage) -> f64 {
    let (width, height) = luma.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let at = |x: u32, y: u32| f64::from(luma.get_pixel(x, y).0[0]);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let count = f64::from((width - 2) * (height - 2));

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let response =
                at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let mean = sum / count;
    sum_sq / count - mean * mean
}

/// Declares an image sharp when its focus measure reaches the threshold.
///
/// Pure and deterministic; a malformed or featureless image yields a
/// variance near zero and is treated as blurry, not as an error.
#[must_use]
pub fn is_sharp(image: &DynamicImage, config: &SharpnessConfig) -> bool {
    laplacian_variance(&image.to_luma8()) >= config.threshold
}
