//! Aspect-preserving resize into the target dimension range

use image::{imageops, RgbImage};

/// Resize an image into `[target_min, target_max]` while keeping the
/// aspect ratio.
///
/// A single scale factor is computed from whichever bound is violated:
/// upscaling brings the smaller side up to `target_min`, downscaling
/// brings the larger side down to `target_max`. Images already in range
/// are returned unchanged. Upscaling uses Lanczos interpolation to avoid
/// artifacts; downscaling uses an averaging filter to avoid aliasing.
pub fn smart_resize(image: &RgbImage, target_min: u32, target_max: u32) -> RgbImage {
    let (width, height) = image.dimensions();

    let smallest_side = width.min(height);
    let largest_side = width.max(height);

    if smallest_side >= target_min && largest_side <= target_max {
        // Already in optimal range
        return image.clone();
    }

    let scale = if smallest_side < target_min {
        target_min as f64 / smallest_side as f64
    } else {
        target_max as f64 / largest_side as f64
    };

    let new_width = ((width as f64 * scale) as u32).max(1);
    let new_height = ((height as f64 * scale) as u32).max(1);

    let filter = if scale > 1.0 {
        imageops::FilterType::Lanczos3
    } else {
        // Triangle with scaled support averages source pixels when shrinking
        imageops::FilterType::Triangle
    };

    imageops::resize(image, new_width, new_height, filter)
}
