//! Lookup-table gamma correction

use image::RgbImage;

/// Apply gamma correction to adjust brightness.
///
/// Builds a 256-entry lookup table `i -> round(255 * (i/255)^(1/gamma))`
/// and applies it identically to every channel. Gamma > 1 brightens,
/// gamma < 1 darkens.
pub fn apply_gamma_correction(image: &RgbImage, gamma: f32) -> RgbImage {
    let table = gamma_lut(gamma);

    let mut corrected = image.clone();
    for pixel in corrected.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = table[*channel as usize];
        }
    }

    corrected
}

/// Build the 256-entry remap table for a gamma value.
fn gamma_lut(gamma: f32) -> [u8; 256] {
    // Planner output is clamped to [0.5, 1.5]; guard anyway so a direct
    // caller can never divide by zero
    let inverse_gamma = 1.0 / f64::from(gamma.max(0.01));

    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let value = (i as f64 / 255.0).powf(inverse_gamma);
        *entry = (value * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_gamma_is_identity() {
        let table = gamma_lut(1.0);
        for (i, &entry) in table.iter().enumerate() {
            assert_eq!(entry as usize, i);
        }
    }

    #[test]
    fn test_gamma_above_one_brightens_midtones() {
        let table = gamma_lut(1.2);
        assert!(table[128] > 128);
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
    }

    #[test]
    fn test_gamma_below_one_darkens_midtones() {
        let table = gamma_lut(0.8);
        assert!(table[128] < 128);
        assert_eq!(table[0], 0);
        assert_eq!(table[255], 255);
    }

    #[test]
    fn test_lut_is_monotonic() {
        for gamma in [0.5f32, 0.9, 1.1, 1.5] {
            let table = gamma_lut(gamma);
            for window in table.windows(2) {
                assert!(window[1] >= window[0], "gamma {} not monotonic", gamma);
            }
        }
    }
}
