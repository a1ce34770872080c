//! Fit-to-box resizing.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Dimensions of `(width, height)` scaled uniformly to fit a `box_size` square.
///
/// The factor is `min(box/width, box/height)`, so the longer side lands on
/// `box_size` and the aspect ratio is kept. Smaller images are scaled up.
/// Each side is rounded and never drops below one pixel.
pub fn fit_to_box(width: u32, height: u32, box_size: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let box_size = f64::from(box_size);
    let factor = (box_size / f64::from(width)).min(box_size / f64::from(height));

    let scale = |side: u32| ((f64::from(side) * factor).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Resize `image` to fit within a `box_size` square.
pub fn resize_to_box(image: DynamicImage, box_size: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_to_box(width, height, box_size);
    if (new_width, new_height) == (width, height) {
        return image;
    }

    tracing::trace!(
        "Resizing {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_fits_width() {
        assert_eq!(fit_to_box(6000, 4000, 1920), (1920, 1280));
    }

    #[test]
    fn test_portrait_fits_height() {
        assert_eq!(fit_to_box(4000, 6000, 1920), (1280, 1920));
    }

    #[test]
    fn test_square() {
        assert_eq!(fit_to_box(5000, 5000, 1920), (1920, 1920));
    }

    #[test]
    fn test_small_image_is_scaled_up() {
        assert_eq!(fit_to_box(960, 640, 1920), (1920, 1280));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_to_box(100_000, 10, 100), (100, 1));
    }

    #[test]
    fn test_box_property_over_many_shapes() {
        let shapes = [
            (6016, 4016),
            (4016, 6016),
            (7360, 4912),
            (3000, 2000),
            (1234, 987),
            (333, 777),
            (1, 1),
        ];
        for &box_size in &[64u32, 500, 1080, 1920, 4096] {
            for &(w, h) in &shapes {
                let (nw, nh) = fit_to_box(w, h, box_size);
                let longest = nw.max(nh);
                assert!(
                    longest.abs_diff(box_size) <= 1,
                    "{w}x{h} in {box_size}: got {nw}x{nh}"
                );
                assert!(nw <= box_size && nh <= box_size);

                // Aspect ratio within the error one pixel of rounding allows
                let original = f64::from(w) / f64::from(h);
                let resized = f64::from(nw) / f64::from(nh);
                let tolerance = original * (1.0 / f64::from(nw.min(nh)).max(1.0)) * 2.0;
                assert!(
                    (original - resized).abs() <= tolerance.max(original * 0.01),
                    "{w}x{h} in {box_size}: ratio {original} vs {resized}"
                );
            }
        }
    }

    #[test]
    fn test_resize_to_box_changes_buffer() {
        let image = DynamicImage::new_rgb8(300, 200);
        let resized = resize_to_box(image, 150);
        assert_eq!(resized.dimensions(), (150, 100));
    }
}
