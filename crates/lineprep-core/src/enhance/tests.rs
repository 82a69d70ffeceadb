//! Tests for enhancement planning and application

use super::*;
use crate::analysis::analyze_image;
use crate::config::AnalysisDefaults;
use crate::decoders::DecodedImage;
use crate::models::{EnhancementPlan, EnhancementStep, Style};
use image::{Rgb, RgbImage};

fn uniform_image(width: u32, height: u32, value: u8) -> DecodedImage {
    let mut color = RgbImage::new(width, height);
    for pixel in color.pixels_mut() {
        *pixel = Rgb([value, value, value]);
    }
    DecodedImage::from_rgb(color)
}

fn noise_image(width: u32, height: u32) -> DecodedImage {
    let mut color = RgbImage::new(width, height);
    for (x, y, pixel) in color.enumerate_pixels_mut() {
        let mixed = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)).wrapping_mul(2_654_435_761);
        let value = (mixed >> 16) as u8;
        *pixel = Rgb([value, value, value]);
    }
    DecodedImage::from_rgb(color)
}

#[test]
fn test_gamma_bounds_and_neutral_point() {
    assert!((calculate_gamma(127.0) - 1.0).abs() < 1e-6);

    for mean in [0.0, 10.0, 64.0, 127.0, 180.0, 255.0] {
        let gamma = calculate_gamma(mean);
        assert!(
            (0.5..=1.5).contains(&gamma),
            "gamma {} out of range for mean {}",
            gamma,
            mean
        );
    }
}

#[test]
fn test_gamma_monotonically_decreasing_in_brightness() {
    let mut previous = f32::MAX;
    for mean in (0..=255).step_by(5) {
        let gamma = calculate_gamma(mean as f64);
        assert!(
            gamma <= previous,
            "gamma must not increase with brightness (mean {})",
            mean
        );
        previous = gamma;
    }
}

#[test]
fn test_plan_for_small_flat_image() {
    // 256x256 uniform gray 127: needs resize and CLAHE but no gamma
    let image = uniform_image(256, 256, 127);
    let defaults = AnalysisDefaults::default();

    let report = analyze_image(&image, &defaults);
    let plan = plan_enhancements(&report, Style::Contour, &defaults);

    assert!(plan.wants_resize());
    assert!(plan.wants_clahe());
    assert!(plan.gamma().is_none());
}

#[test]
fn test_plan_for_dark_image() {
    // 1024x1024 with mean 40: gamma correction, no resize
    let image = uniform_image(1024, 1024, 40);
    let defaults = AnalysisDefaults::default();

    let report = analyze_image(&image, &defaults);
    assert!(report.luminance.warning);

    let plan = plan_enhancements(&report, Style::Contour, &defaults);

    assert!(!plan.wants_resize());
    let gamma = plan.gamma().expect("dark image must plan gamma");
    let expected = 1.0 + ((127.0 - 40.0) / 255.0) * 0.5;
    assert!(
        (gamma - expected as f32).abs() < 1e-4,
        "gamma {} vs expected {}",
        gamma,
        expected
    );
}

#[test]
fn test_line_preserving_style_stops_after_resize() {
    // Dark AND small: contour would get gamma + CLAHE, anime only resize
    let image = uniform_image(256, 256, 40);
    let defaults = AnalysisDefaults::default();

    let report = analyze_image(&image, &defaults);
    let plan = plan_enhancements(&report, Style::Anime, &defaults);

    assert_eq!(plan.steps, vec![EnhancementStep::Resize]);
}

#[test]
fn test_clean_image_gets_empty_plan_and_untouched_buffer() {
    // In-range size, neutral mean, high contrast: nothing to do
    let image = noise_image(1024, 768);
    let defaults = AnalysisDefaults::default();

    let report = analyze_image(&image, &defaults);
    let plan = plan_enhancements(&report, Style::Contour, &defaults);
    assert!(plan.is_empty(), "unexpected plan: {:?}", plan.steps);

    let enhanced = apply_enhancements(&image.color, &plan, &defaults);
    assert_eq!(enhanced.as_raw(), image.color.as_raw());
}

#[test]
fn test_resize_upscales_to_minimum() {
    let image = uniform_image(256, 384, 127);
    let resized = smart_resize(&image.color, 512, 2048);
    assert_eq!(resized.dimensions(), (512, 768));
}

#[test]
fn test_resize_downscales_to_maximum() {
    let image = uniform_image(4096, 1024, 127);
    let resized = smart_resize(&image.color, 512, 2048);
    assert_eq!(resized.dimensions(), (2048, 512));
}

#[test]
fn test_resize_is_idempotent_in_range() {
    let image = uniform_image(1000, 800, 64);
    let resized = smart_resize(&image.color, 512, 2048);
    assert_eq!(resized.dimensions(), (1000, 800));
    assert_eq!(resized.as_raw(), image.color.as_raw());
}

#[test]
fn test_gamma_application_brightens_dark_image() {
    let image = uniform_image(64, 64, 60);
    let corrected = apply_gamma_correction(&image.color, calculate_gamma(60.0));

    let before = image.color.get_pixel(0, 0).0[0];
    let after = corrected.get_pixel(0, 0).0[0];
    assert!(after > before, "expected brightening: {} -> {}", before, after);
}

#[test]
fn test_clahe_preserves_neutral_chroma() {
    let image = uniform_image(128, 128, 127);
    let enhanced = apply_clahe(&image.color, 2.0, 8);

    for pixel in enhanced.pixels() {
        let [r, g, b] = pixel.0;
        let spread = r.max(g).max(b) - r.min(g).min(b);
        assert!(spread <= 2, "chroma drifted on gray input: {:?}", pixel.0);
    }
}

#[test]
fn test_clahe_stretches_low_contrast_band() {
    // Narrow 100..139 ramp: local equalization must widen the dispersion
    let mut color = RgbImage::new(512, 512);
    for (x, _, pixel) in color.enumerate_pixels_mut() {
        let value = 100 + (x * 40 / 512) as u8;
        *pixel = Rgb([value, value, value]);
    }
    let image = DecodedImage::from_rgb(color);
    let defaults = AnalysisDefaults::default();

    let before = crate::analysis::check_contrast(&image.gray, &defaults).std_dev;

    let enhanced = DecodedImage::from_rgb(apply_clahe(&image.color, 2.0, 8));
    let after = crate::analysis::check_contrast(&enhanced.gray, &defaults).std_dev;

    println!("std before={} after={}", before, after);
    assert!(
        after > before * 1.5,
        "contrast not improved: {} -> {}",
        before,
        after
    );
}

#[test]
fn test_apply_order_ignores_plan_order() {
    let image = uniform_image(256, 256, 50);
    let defaults = AnalysisDefaults::default();

    let ordered = EnhancementPlan {
        steps: vec![
            EnhancementStep::Resize,
            EnhancementStep::GammaCorrection { gamma: 1.15 },
            EnhancementStep::Clahe,
        ],
    };
    let shuffled = EnhancementPlan {
        steps: vec![
            EnhancementStep::Clahe,
            EnhancementStep::GammaCorrection { gamma: 1.15 },
            EnhancementStep::Resize,
        ],
    };

    let a = apply_enhancements(&image.color, &ordered, &defaults);
    let b = apply_enhancements(&image.color, &shuffled, &defaults);

    assert_eq!(a.dimensions(), (512, 512));
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn test_plan_replay_reproduces_identical_output() {
    let image = uniform_image(300, 300, 40);
    let defaults = AnalysisDefaults::default();

    let report = analyze_image(&image, &defaults);
    let plan = plan_enhancements(&report, Style::Contour, &defaults);
    assert!(!plan.is_empty());

    let json = serde_json::to_string(&plan).unwrap();
    let replayed: EnhancementPlan = serde_json::from_str(&json).unwrap();

    let first = apply_enhancements(&image.color, &plan, &defaults);
    let second = apply_enhancements(&image.color, &replayed, &defaults);
    assert_eq!(first.as_raw(), second.as_raw());
}
