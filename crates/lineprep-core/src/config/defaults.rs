//! Default analysis/enhancement threshold values and their validation.

use serde::Deserialize;

/// Default threshold values for analysis and enhancement.
///
/// Every threshold the analyzers and the enhancement planner consult lives
/// here, so tuning never requires touching algorithm code. Values can be
/// overridden independently via `lineprep.yml` (see `config::load_config`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Global mean below this (0-255) flags the image as too dark
    pub luminance_too_dark: f64,
    /// Global mean above this (0-255) flags the image as too bright
    pub luminance_too_bright: f64,
    /// Image is split into an NxN grid for local luminance analysis
    pub luminance_grid_size: u32,
    /// Relative deviation from the global mean that classifies a cell as dark/bright
    pub luminance_cell_threshold: f64,
    /// Fraction of dark (or bright) cells that flags uneven lighting
    pub luminance_uneven_cell_ratio: f64,

    /// Width the grayscale image is resized to before blur analysis,
    /// so the blur thresholds are scale-invariant
    pub blur_standard_width: u32,
    /// High-frequency energy below this is considered blurry
    pub blur_fft_threshold: f64,
    /// Window size for the local Laplacian-variance scan
    pub blur_block_size: u32,
    /// Per-window Laplacian variance below this marks the window blurry
    pub blur_block_lap_threshold: f64,
    /// Ratio of blurry windows above this flags local blur
    pub blur_block_blurry_ratio: f64,

    /// Intensity standard deviation below this is low contrast
    pub contrast_threshold: f64,
    /// Stricter bound selecting the "very low contrast" message
    pub contrast_very_low: f64,

    /// Images smaller than this in either dimension may produce poor results
    pub resolution_min_dimension: u32,

    /// Gamma correction is planned only when the global mean leaves
    /// the neutral band [gamma_low_mean, gamma_high_mean]
    pub gamma_low_mean: f64,
    pub gamma_high_mean: f64,
    /// Resize targets: the smaller side is upscaled to at least `resize_target_min`,
    /// the larger side downscaled to at most `resize_target_max`
    pub resize_target_min: u32,
    pub resize_target_max: u32,
    /// CLAHE contrast limiting threshold
    pub clahe_clip_limit: f64,
    /// CLAHE tile grid is clahe_grid_size x clahe_grid_size
    pub clahe_grid_size: u32,
}

impl AnalysisDefaults {
    pub(crate) fn sanitize(&mut self) {
        self.luminance_too_dark = self.luminance_too_dark.clamp(0.0, 255.0);
        self.luminance_too_bright = self
            .luminance_too_bright
            .clamp(self.luminance_too_dark, 255.0);
        self.luminance_grid_size = self.luminance_grid_size.clamp(1, 64);
        self.luminance_cell_threshold = self.luminance_cell_threshold.clamp(0.0, 1.0);
        self.luminance_uneven_cell_ratio = self.luminance_uneven_cell_ratio.clamp(0.0, 1.0);

        self.blur_standard_width = self.blur_standard_width.clamp(64, 4096);
        self.blur_block_size = self.blur_block_size.clamp(8, self.blur_standard_width);
        self.blur_block_blurry_ratio = self.blur_block_blurry_ratio.clamp(0.0, 1.0);
        self.blur_block_lap_threshold = self.blur_block_lap_threshold.max(0.0);
        self.blur_fft_threshold = self.blur_fft_threshold.max(0.0);

        self.contrast_threshold = self.contrast_threshold.max(0.0);
        self.contrast_very_low = self.contrast_very_low.clamp(0.0, self.contrast_threshold);

        self.resolution_min_dimension = self.resolution_min_dimension.max(1);

        self.gamma_low_mean = self.gamma_low_mean.clamp(0.0, 255.0);
        self.gamma_high_mean = self.gamma_high_mean.clamp(self.gamma_low_mean, 255.0);
        self.resize_target_min = self.resize_target_min.max(1);
        self.resize_target_max = self.resize_target_max.max(self.resize_target_min);
        self.clahe_clip_limit = self.clahe_clip_limit.max(1.0);
        self.clahe_grid_size = self.clahe_grid_size.clamp(1, 64);
    }
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            luminance_too_dark: 50.0,
            luminance_too_bright: 200.0,
            luminance_grid_size: 8,
            luminance_cell_threshold: 0.25,
            luminance_uneven_cell_ratio: 0.2,

            blur_standard_width: 512,
            blur_fft_threshold: 6.9,
            blur_block_size: 64,
            blur_block_lap_threshold: 55.0,
            blur_block_blurry_ratio: 0.5,

            contrast_threshold: 50.0,
            contrast_very_low: 30.0,

            resolution_min_dimension: 512,

            gamma_low_mean: 80.0,
            gamma_high_mean: 180.0,
            resize_target_min: 512,
            resize_target_max: 2048,
            clahe_clip_limit: 2.0,
            clahe_grid_size: 8,
        }
    }
}
