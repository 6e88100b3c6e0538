//! Synthetic image builders for testing.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

/// Builder for synthetic test images with known sharpness properties.
pub struct SyntheticImage;

impl SyntheticImage {
    /// A high-contrast checkerboard (maximal Laplacian response; sharp).
    #[must_use]
    pub fn sharp(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// A uniform gray frame (zero Laplacian response; blurry).
    #[must_use]
    pub fn blurry(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |_, _| Luma([128u8]));
        DynamicImage::ImageLuma8(img)
    }

    /// A smooth horizontal gradient (near-zero response; blurry).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            Luma([((u32::from(u8::MAX) * x) / width.max(1)) as u8])
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Writes an image under `dir` and returns its path.
    ///
    /// # Panics
    ///
    /// Panics if the image cannot be saved (test helper).
    #[allow(clippy::expect_used)]
    pub fn save(dir: &Path, name: &str, image: &DynamicImage) -> std::path::PathBuf {
        let path = dir.join(name);
        image.save(&path).expect("failed to save synthetic image");
        path
    }

    /// Writes a file of junk bytes that no decoder accepts.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written (test helper).
    #[allow(clippy::expect_used)]
    pub fn save_corrupt(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"not an image at all").expect("failed to write corrupt file");
        path
    }
}
