//! Image quality analysis
//!
//! Four independent checks run over one decoded image and their results
//! are merged into a single report:
//! - `luminance`: global brightness and uneven lighting via a spatial grid
//! - `blur`: dual-method sharpness classification (FFT + local Laplacian)
//! - `contrast`: global intensity dispersion
//! - `resolution`: minimum usable size
//!
//! Every check is a total function over decoded images: degenerate inputs
//! produce benign zero-count results, never errors.

mod blur;
mod contrast;
mod luminance;
mod resolution;


pub use blur::{detect_blur, BlurResult};
pub use contrast::{check_contrast, ContrastResult};
pub use luminance::{analyze_luminance, LuminanceResult};
pub use resolution::{check_resolution, ResolutionResult};

/// Minimum number of scan windows to trigger parallel processing
pub(crate) const PARALLEL_WINDOW_THRESHOLD: usize = 64;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisDefaults;
use crate::decoders::DecodedImage;

/// Aggregated quality report for one image.
///
/// Built once per image and never mutated afterwards. `warnings` collects
/// the messages of flagged checks in fixed order: luminance, blur,
/// resolution, contrast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub luminance: LuminanceResult,
    pub blur: BlurResult,
    pub resolution: ResolutionResult,
    pub contrast: ContrastResult,
    pub warnings: Vec<String>,
    pub has_warnings: bool,
}

/// Run all four checks on an image and merge their flags into one report.
pub fn analyze_image(image: &DecodedImage, defaults: &AnalysisDefaults) -> AnalysisReport {
    let luminance = analyze_luminance(&image.gray, defaults);
    let blur = detect_blur(&image.gray, defaults);
    let resolution = check_resolution(&image.color, defaults);
    let contrast = check_contrast(&image.gray, defaults);

    // Collection order is fixed: luminance, blur, resolution, contrast.
    let mut warnings = Vec::new();
    if luminance.warning {
        if let Some(message) = &luminance.message {
            warnings.push(message.clone());
        }
    }
    if blur.is_blurry {
        warnings.push(blur.message.clone());
    }
    if resolution.warning {
        if let Some(message) = &resolution.message {
            warnings.push(message.clone());
        }
    }
    if contrast.low_contrast {
        warnings.push(contrast.message.clone());
    }

    let has_warnings = !warnings.is_empty();

    AnalysisReport {
        luminance,
        blur,
        resolution,
        contrast,
        warnings,
        has_warnings,
    }
}

/// Round to two decimal places for report output
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places for report output
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
