//! Analysis-to-enhancement pipeline
//!
//! Ties the stages together: analyze the decoded image, plan corrections
//! from the report, apply the plan. Every stage is a pure, synchronous,
//! CPU-bound computation; intermediates are scoped to one invocation.

use image::RgbImage;

use crate::analysis::{analyze_image, AnalysisReport};
use crate::config::AnalysisDefaults;
use crate::decoders::DecodedImage;
use crate::enhance::{apply_enhancements, plan_enhancements};
use crate::models::{EnhancementPlan, Style};
use crate::verbose_println;

/// Result of preparing one image for the line-art generator.
pub struct PreparedImage {
    /// The enhanced raster, or the untouched input when nothing was applied
    pub image: RgbImage,

    /// Full analysis report, exposed so callers can surface warnings
    /// without re-running analysis
    pub report: AnalysisReport,

    /// The corrections that were selected
    pub plan: EnhancementPlan,

    /// Names of the steps actually applied, in execution order
    pub applied: Vec<&'static str>,
}

/// Analyze an image and conditionally enhance it for line-art generation.
///
/// With `skip_enhancement` the analysis still runs (callers want the
/// warnings either way) but the input buffer is returned untouched.
pub fn prepare_image(
    decoded: &DecodedImage,
    style: Style,
    skip_enhancement: bool,
    defaults: &AnalysisDefaults,
) -> PreparedImage {
    let report = analyze_image(decoded, defaults);
    verbose_println!(
        "[lineprep] analysis: mean={} std={} hf={} blur_ratio={}",
        report.luminance.global_mean,
        report.contrast.std_dev,
        report.blur.fft_high_freq,
        report.blur.blur_ratio
    );

    if skip_enhancement {
        return PreparedImage {
            image: decoded.color.clone(),
            report,
            plan: EnhancementPlan::default(),
            applied: Vec::new(),
        };
    }

    let plan = plan_enhancements(&report, style, defaults);
    verbose_println!("[lineprep] plan: {:?}", plan.step_names());

    let image = apply_enhancements(&decoded.color, &plan, defaults);
    let applied = plan.step_names();

    PreparedImage {
        image,
        report,
        plan,
        applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::DecodedImage;
    use image::Rgb;

    fn gray_square(side: u32, value: u8) -> DecodedImage {
        let mut color = RgbImage::new(side, side);
        for pixel in color.pixels_mut() {
            *pixel = Rgb([value, value, value]);
        }
        DecodedImage::from_rgb(color)
    }

    #[test]
    fn test_prepare_runs_full_chain() {
        let decoded = gray_square(256, 127);
        let defaults = AnalysisDefaults::default();

        let prepared = prepare_image(&decoded, Style::Contour, false, &defaults);

        assert!(prepared.report.has_warnings);
        assert_eq!(prepared.applied, vec!["resize", "clahe"]);
        assert_eq!(prepared.image.dimensions(), (512, 512));
    }

    #[test]
    fn test_skip_enhancement_returns_untouched_input() {
        let decoded = gray_square(256, 40);
        let defaults = AnalysisDefaults::default();

        let prepared = prepare_image(&decoded, Style::Contour, true, &defaults);

        assert!(prepared.plan.is_empty());
        assert!(prepared.applied.is_empty());
        assert_eq!(prepared.image.as_raw(), decoded.color.as_raw());
        // The analysis still ran
        assert!(prepared.report.luminance.warning);
    }
}
