//! Dual-method blur detection
//!
//! Two independent signals are combined by consensus:
//! 1. Frequency-domain: blurry images lack high-frequency energy
//!    regardless of blur type (motion, bokeh, defocus).
//! 2. Spatial: per-window Laplacian variance catches regional blur even
//!    when some areas keep sharp edges.
//!
//! The image is flagged blurry only when BOTH methods agree; a single
//! metric either misses regional blur or is fooled by exposure and noise.

use image::{imageops, GrayImage, ImageBuffer, Luma};
use imageproc::filter::filter3x3;
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use super::{round2, round3, PARALLEL_WINDOW_THRESHOLD};
use crate::config::AnalysisDefaults;

type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// 3x3 Gaussian kernel, normalized. Kills sensor noise that would trick
/// the edge metrics into reading the image as sharper than it is.
const GAUSSIAN_3X3: [f32; 9] = [
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    4.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
];

/// 3x3 Laplacian kernel (4-neighbor second derivative)
const LAPLACIAN_3X3: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

/// Result of the blur check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlurResult {
    /// Mean log-magnitude over the high-frequency corners of the spectrum
    pub fft_high_freq: f64,
    /// Ratio of scan windows whose Laplacian variance is below threshold
    pub blur_ratio: f64,
    /// True only when both methods agree
    pub is_blurry: bool,
    /// Human-readable verdict
    pub message: String,
}

/// Detect blur using FFT frequency analysis plus local block Laplacian.
///
/// The grayscale image is first resized to a standard width so that all
/// thresholds are scale-invariant, then lightly smoothed.
pub fn detect_blur(gray: &GrayImage, defaults: &AnalysisDefaults) -> BlurResult {
    let (width, height) = gray.dimensions();

    // Normalize by resizing to a fixed width, preserving aspect ratio
    let standard_width = defaults.blur_standard_width;
    let scale = standard_width as f64 / width as f64;
    let standard_height = ((height as f64 * scale) as u32).max(1);
    let standardized = imageops::resize(
        gray,
        standard_width,
        standard_height,
        imageops::FilterType::Triangle,
    );

    let smoothed: GrayF32 = filter3x3(&to_f32(&standardized), &GAUSSIAN_3X3);

    let hf_energy = high_frequency_energy(&smoothed);
    let fft_blurry = hf_energy < defaults.blur_fft_threshold;

    let blur_ratio = blurry_window_ratio(&smoothed, defaults);
    let local_blurry = blur_ratio > defaults.blur_block_blurry_ratio;

    // Consensus rule: both methods must agree (avoids false positives)
    let is_blurry = fft_blurry && local_blurry;

    let message = if is_blurry {
        "Image is blurry".to_string()
    } else if fft_blurry || local_blurry {
        "Image has minor blur (borderline)".to_string()
    } else {
        "Image sharpness is acceptable".to_string()
    };

    BlurResult {
        fft_high_freq: round2(hf_energy),
        blur_ratio: round3(blur_ratio),
        is_blurry,
        message,
    }
}

/// Convert an 8-bit grayscale buffer to f32 samples (0-255 range)
fn to_f32(image: &GrayImage) -> GrayF32 {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y).0[0] as f32])
    })
}

/// High-frequency energy score from the centered magnitude spectrum.
///
/// The image is normalized to 0-1, transformed with a 2-D FFT, the
/// zero-frequency component shifted to the center, and the log-compressed
/// magnitude sampled at the four spectrum corners (the highest spatial
/// frequencies). Returns the average of the four corner-patch means.
fn high_frequency_energy(image: &GrayF32) -> f64 {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let patch_size = 64usize.min(height / 8).min(width / 8);
    if patch_size == 0 {
        // Too small for a meaningful spectrum sample
        return 0.0;
    }

    let mut spectrum: Vec<Complex<f32>> = image
        .as_raw()
        .iter()
        .map(|&v| Complex::new(v / 255.0, 0.0))
        .collect();

    // Row pass, then column pass
    let mut planner = FftPlanner::new();
    let row_fft = planner.plan_fft_forward(width);
    for row in spectrum.chunks_exact_mut(width) {
        row_fft.process(row);
    }

    let col_fft = planner.plan_fft_forward(height);
    let mut column = vec![Complex::new(0.0f32, 0.0); height];
    for x in 0..width {
        for (y, value) in column.iter_mut().enumerate() {
            *value = spectrum[y * width + x];
        }
        col_fft.process(&mut column);
        for (y, value) in column.iter().enumerate() {
            spectrum[y * width + x] = *value;
        }
    }

    // Log-compressed magnitude with the zero frequency shifted to the center
    let half_w = width / 2;
    let half_h = height / 2;
    let magnitude = |y: usize, x: usize| -> f64 {
        let src_y = (y + height - half_h) % height;
        let src_x = (x + width - half_w) % width;
        20.0 * (spectrum[src_y * width + src_x].norm() as f64 + 1.0).ln()
    };

    let corners: [(usize, usize); 4] = [
        (0, 0),
        (0, width - patch_size),
        (height - patch_size, 0),
        (height - patch_size, width - patch_size),
    ];

    let mut energy = 0.0;
    for (cy, cx) in corners {
        let mut sum = 0.0;
        for y in cy..cy + patch_size {
            for x in cx..cx + patch_size {
                sum += magnitude(y, x);
            }
        }
        energy += sum / (patch_size * patch_size) as f64;
    }

    energy / corners.len() as f64
}

/// Ratio of scan windows whose Laplacian variance falls below threshold.
///
/// Windows of `blur_block_size` slide with 50% overlap. Images smaller
/// than one window yield zero windows and a ratio of 0.
fn blurry_window_ratio(image: &GrayF32, defaults: &AnalysisDefaults) -> f64 {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let block = (defaults.blur_block_size as usize).max(1);
    let stride = (block / 2).max(1);

    let response: GrayF32 = filter3x3(image, &LAPLACIAN_3X3);
    let response = response.as_raw();

    let mut origins = Vec::new();
    let mut y = 0;
    while y + block < height {
        let mut x = 0;
        while x + block < width {
            origins.push((x, y));
            x += stride;
        }
        y += stride;
    }

    if origins.is_empty() {
        return 0.0;
    }

    let threshold = defaults.blur_block_lap_threshold;
    let count_blurry = |&(x, y): &(usize, usize)| -> usize {
        let variance = window_variance(response, width, x, y, block);
        usize::from(variance < threshold)
    };

    let blurry = if origins.len() >= PARALLEL_WINDOW_THRESHOLD {
        origins.par_iter().map(count_blurry).sum::<usize>()
    } else {
        origins.iter().map(count_blurry).sum::<usize>()
    };

    blurry as f64 / origins.len() as f64
}

/// Population variance of a square window of the Laplacian response
fn window_variance(response: &[f32], width: usize, x0: usize, y0: usize, block: usize) -> f64 {
    let count = (block * block) as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;

    for y in y0..y0 + block {
        let row = &response[y * width + x0..y * width + x0 + block];
        for &v in row {
            let v = v as f64;
            sum += v;
            sum_sq += v * v;
        }
    }

    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}
