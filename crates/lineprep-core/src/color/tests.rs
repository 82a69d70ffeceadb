//! Tests for sRGB <-> LAB conversions

use super::*;

#[test]
fn test_white_maps_to_l100() {
    let lab = srgb_to_lab(255, 255, 255);
    assert!((lab.l - 100.0).abs() < 0.1, "expected L~100, got {}", lab.l);
    assert!(lab.a.abs() < 0.5);
    assert!(lab.b.abs() < 0.5);
}

#[test]
fn test_black_maps_to_l0() {
    let lab = srgb_to_lab(0, 0, 0);
    assert!(lab.l.abs() < 0.1, "expected L~0, got {}", lab.l);
}

#[test]
fn test_neutral_gray_has_no_chroma() {
    let lab = srgb_to_lab(127, 127, 127);
    assert!(lab.a.abs() < 0.5, "expected a~0, got {}", lab.a);
    assert!(lab.b.abs() < 0.5, "expected b~0, got {}", lab.b);
}

#[test]
fn test_round_trip_within_quantization() {
    // 8-bit quantization allows at most one step of drift per channel
    for &(r, g, b) in &[(12u8, 200u8, 99u8), (250, 3, 127), (64, 64, 200)] {
        let lab = srgb_to_lab(r, g, b);
        let (r2, g2, b2) = lab_to_srgb(lab);
        assert!((r as i16 - r2 as i16).abs() <= 1, "r: {} -> {}", r, r2);
        assert!((g as i16 - g2 as i16).abs() <= 1, "g: {} -> {}", g, g2);
        assert!((b as i16 - b2 as i16).abs() <= 1, "b: {} -> {}", b, b2);
    }
}

#[test]
fn test_lightness_ordering() {
    let dark = srgb_to_lab(30, 30, 30);
    let light = srgb_to_lab(220, 220, 220);
    assert!(dark.l < light.l);
}
