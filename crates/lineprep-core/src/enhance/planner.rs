//! Enhancement planning
//!
//! Pure decision rules mapping an analysis report to corrections. The
//! rules are evaluated independently; they are not mutually exclusive.

use crate::analysis::AnalysisReport;
use crate::config::AnalysisDefaults;
use crate::models::{EnhancementPlan, EnhancementStep, Style};

/// Decide how strong gamma correction should be from the average brightness.
///
/// `gamma = 1.0 + ((127 - mean) / 255) * 0.5`, clamped to [0.5, 1.5] to
/// avoid over-correction. The applier raises intensities to `1/gamma`, so
/// dark images (gamma > 1) are brightened and bright images (gamma < 1)
/// are darkened.
pub fn calculate_gamma(mean_brightness: f64) -> f32 {
    let gamma = 1.0 + ((127.0 - mean_brightness) / 255.0) * 0.5;
    gamma.clamp(0.5, 1.5) as f32
}

/// Map an analysis report and style hint to an ordered list of corrections.
///
/// Never fails: any report, even a default one, produces at least an
/// empty plan.
pub fn plan_enhancements(
    report: &AnalysisReport,
    style: Style,
    defaults: &AnalysisDefaults,
) -> EnhancementPlan {
    let mut steps = Vec::new();

    let smallest_side = report.resolution.width.min(report.resolution.height);
    let largest_side = report.resolution.width.max(report.resolution.height);
    if smallest_side < defaults.resize_target_min || largest_side > defaults.resize_target_max {
        steps.push(EnhancementStep::Resize);
    }

    // Line-preserving styles get geometric normalization only
    if style.is_line_preserving() {
        return EnhancementPlan { steps };
    }

    let mean = report.luminance.global_mean;
    if mean < defaults.gamma_low_mean || mean > defaults.gamma_high_mean {
        steps.push(EnhancementStep::GammaCorrection {
            gamma: calculate_gamma(mean),
        });
    }

    if report.contrast.low_contrast || report.luminance.warning {
        steps.push(EnhancementStep::Clahe);
    }

    EnhancementPlan { steps }
}
