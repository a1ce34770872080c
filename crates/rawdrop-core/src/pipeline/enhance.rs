//! Contrast enhancement.

use image::{DynamicImage, GenericImageView, RgbImage};

/// Applies a contrast-enhancement transform to a pixel buffer.
pub trait Enhancer: Send + Sync {
    fn enhance(&self, image: DynamicImage) -> DynamicImage;
}

/// Percentile levels stretch.
///
/// Finds the luminance values below which `clip` of the pixels fall at each
/// end of the histogram and maps that range onto 0..=255, per channel.
#[derive(Debug, Clone, Copy)]
pub struct AutoContrast {
    clip: f32,
}

impl Default for AutoContrast {
    fn default() -> Self {
        Self { clip: 0.005 }
    }
}

impl AutoContrast {
    pub fn new(clip: f32) -> Self {
        Self {
            clip: clip.clamp(0.0, 0.49),
        }
    }

    /// Low and high luminance cut points for `image`.
    fn levels(&self, image: &DynamicImage) -> (u8, u8) {
        let mut histogram = [0u64; 256];
        for pixel in image.to_luma8().pixels() {
            histogram[pixel.0[0] as usize] += 1;
        }

        let (width, height) = image.dimensions();
        let total = u64::from(width) * u64::from(height);
        let cut = (total as f64 * f64::from(self.clip)) as u64;

        let mut low = 0u8;
        let mut seen = 0u64;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > cut {
                low = value as u8;
                break;
            }
        }

        let mut high = 255u8;
        seen = 0;
        for (value, &count) in histogram.iter().enumerate().rev() {
            seen += count;
            if seen > cut {
                high = value as u8;
                break;
            }
        }

        (low, high)
    }
}

impl Enhancer for AutoContrast {
    fn enhance(&self, image: DynamicImage) -> DynamicImage {
        let (low, high) = self.levels(&image);
        if high <= low || (low == 0 && high == 255) {
            return image;
        }

        let scale = 255.0 / f32::from(high - low);
        let mut lut = [0u8; 256];
        for (value, slot) in lut.iter_mut().enumerate() {
            let stretched = (value as f32 - f32::from(low)) * scale;
            *slot = stretched.round().clamp(0.0, 255.0) as u8;
        }

        let mut rgb: RgbImage = image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = lut[*channel as usize];
            }
        }
        DynamicImage::ImageRgb8(rgb)
    }
}
