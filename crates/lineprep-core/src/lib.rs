//! Lineprep Core Library
//!
//! Image quality analysis and adaptive enhancement for photographs headed
//! into a line-art generator.

pub mod analysis;
pub mod color;
pub mod config;
pub mod decoders;
pub mod enhance;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use analysis::{
    analyze_image, AnalysisReport, BlurResult, ContrastResult, LuminanceResult, ResolutionResult,
};
pub use config::AnalysisDefaults;
pub use decoders::{decode_image, DecodedImage};
pub use enhance::{apply_enhancements, plan_enhancements};
pub use models::{EnhancementPlan, EnhancementStep, Style};
pub use pipeline::{prepare_image, PreparedImage};
