//! Grid-based luminance analysis
//!
//! Detects globally wrong exposure and uneven lighting. The image is split
//! into an NxN grid and each cell's mean is compared against the global
//! mean; cells deviating by more than the configured fraction count as
//! dark or bright.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::round2;
use crate::config::AnalysisDefaults;

/// Result of the grid luminance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuminanceResult {
    /// Overall average brightness (0-255)
    pub global_mean: f64,
    /// Number of cells significantly darker than the global mean
    pub dark_cells: u32,
    /// Number of cells significantly brighter than the global mean
    pub bright_cells: u32,
    /// True if too dark, too bright, or unevenly lit
    pub warning: bool,
    /// Warning message if applicable
    pub message: Option<String>,
}

/// Check image brightness and uneven lighting.
///
/// The last grid row/column absorb any remainder pixels so every pixel is
/// covered exactly once. Only one message is produced even when several
/// conditions hold; priority is too_dark, too_bright, uneven_lighting.
pub fn analyze_luminance(gray: &GrayImage, defaults: &AnalysisDefaults) -> LuminanceResult {
    let (width, height) = gray.dimensions();
    let pixels = gray.as_raw();

    let global_mean = if pixels.is_empty() {
        0.0
    } else {
        pixels.iter().map(|&v| v as u64).sum::<u64>() as f64 / pixels.len() as f64
    };

    let grid_size = defaults.luminance_grid_size.max(1);
    let cell_height = height / grid_size;
    let cell_width = width / grid_size;

    let dark_threshold = global_mean * (1.0 - defaults.luminance_cell_threshold);
    let bright_threshold = global_mean * (1.0 + defaults.luminance_cell_threshold);

    let mut dark_cells = 0u32;
    let mut bright_cells = 0u32;

    for row in 0..grid_size {
        for col in 0..grid_size {
            let y_start = row * cell_height;
            // last cell includes any remainder pixels
            let y_end = if row < grid_size - 1 {
                (row + 1) * cell_height
            } else {
                height
            };
            let x_start = col * cell_width;
            let x_end = if col < grid_size - 1 {
                (col + 1) * cell_width
            } else {
                width
            };

            let mut sum = 0u64;
            let mut count = 0u64;
            for y in y_start..y_end {
                let row_base = y as usize * width as usize;
                for x in x_start..x_end {
                    sum += pixels[row_base + x as usize] as u64;
                    count += 1;
                }
            }
            // cells can be empty when the image is smaller than the grid
            if count == 0 {
                continue;
            }

            let cell_mean = sum as f64 / count as f64;
            if cell_mean < dark_threshold {
                dark_cells += 1;
            } else if cell_mean > bright_threshold {
                bright_cells += 1;
            }
        }
    }

    let too_dark = global_mean < defaults.luminance_too_dark;
    let too_bright = global_mean > defaults.luminance_too_bright;
    let total_cells = (grid_size * grid_size) as f64;
    let uneven_lighting = dark_cells as f64 > total_cells * defaults.luminance_uneven_cell_ratio
        || bright_cells as f64 > total_cells * defaults.luminance_uneven_cell_ratio;

    let warning = too_dark || too_bright || uneven_lighting;

    let message = if too_dark {
        Some("Image is very dark (may result in incomplete line art)".to_string())
    } else if too_bright {
        Some("Image is very bright (may result in weak lines)".to_string())
    } else if uneven_lighting {
        Some("Image has uneven lighting (some areas may be over/under exposed)".to_string())
    } else {
        None
    };

    LuminanceResult {
        global_mean: round2(global_mean),
        dark_cells,
        bright_cells,
        warning,
        message,
    }
}
