//! Global contrast analysis

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::round2;
use crate::config::AnalysisDefaults;

/// Result of the contrast check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastResult {
    /// Population standard deviation of pixel intensities
    pub std_dev: f64,
    /// True if contrast is below the configured threshold
    pub low_contrast: bool,
    /// Description of the contrast level
    pub message: String,
}

/// Check image contrast level from intensity dispersion.
pub fn check_contrast(gray: &GrayImage, defaults: &AnalysisDefaults) -> ContrastResult {
    let pixels = gray.as_raw();

    let std_dev = if pixels.is_empty() {
        0.0
    } else {
        let mean = pixels.iter().map(|&v| v as f64).sum::<f64>() / pixels.len() as f64;
        let variance = pixels
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / pixels.len() as f64;
        variance.sqrt()
    };

    let low_contrast = std_dev < defaults.contrast_threshold;

    let message = if std_dev < defaults.contrast_very_low {
        "Very low contrast - enhancement recommended".to_string()
    } else if std_dev < defaults.contrast_threshold {
        "Low contrast - may benefit from enhancement".to_string()
    } else {
        "Contrast is acceptable".to_string()
    };

    ContrastResult {
        std_dev: round2(std_dev),
        low_contrast,
        message,
    }
}
