//! Adaptive enhancement
//!
//! The planner is a pure decision function mapping an analysis report
//! (plus a style hint) to a set of corrections; the applier executes them
//! in a fixed order:
//! 1. resize, so every later correction operates on final pixel dimensions
//! 2. gamma, so contrast equalization sees a normalized brightness range
//! 3. CLAHE

mod clahe;
mod gamma;
mod planner;
mod resize;

#[cfg(test)]
mod tests;

pub use clahe::apply_clahe;
pub use gamma::apply_gamma_correction;
pub use planner::{calculate_gamma, plan_enhancements};
pub use resize::smart_resize;

use image::RgbImage;

use crate::config::AnalysisDefaults;
use crate::models::EnhancementPlan;

/// Execute a plan's operations in the fixed order resize -> gamma -> CLAHE.
///
/// The plan is treated as a set of requested operations, not a schedule:
/// insertion order never changes execution order. Each stage produces a
/// new buffer, so there is no partial-application state.
pub fn apply_enhancements(
    image: &RgbImage,
    plan: &EnhancementPlan,
    defaults: &AnalysisDefaults,
) -> RgbImage {
    let mut processed = image.clone();

    if plan.wants_resize() {
        processed = smart_resize(
            &processed,
            defaults.resize_target_min,
            defaults.resize_target_max,
        );
    }

    if let Some(gamma) = plan.gamma() {
        processed = apply_gamma_correction(&processed, gamma);
    }

    if plan.wants_clahe() {
        processed = apply_clahe(
            &processed,
            defaults.clahe_clip_limit,
            defaults.clahe_grid_size,
        );
    }

    processed
}
