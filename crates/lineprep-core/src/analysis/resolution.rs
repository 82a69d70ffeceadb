//! Resolution adequacy check

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisDefaults;

/// Result of the resolution check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// True if the resolution is too low
    pub warning: bool,
    /// Warning message if applicable
    pub message: Option<String>,
}

/// Check whether the image resolution is adequate for line-art generation.
pub fn check_resolution(color: &RgbImage, defaults: &AnalysisDefaults) -> ResolutionResult {
    let (width, height) = color.dimensions();

    let min_dimension = defaults.resolution_min_dimension;
    let too_small = width < min_dimension || height < min_dimension;

    let message = if too_small {
        Some(format!(
            "Resolution is low ({}x{}), recommend at least {}x{}",
            width, height, min_dimension, min_dimension
        ))
    } else {
        None
    };

    ResolutionResult {
        width,
        height,
        warning: too_small,
        message,
    }
}
