//! Contrast-limited adaptive histogram equalization (CLAHE)
//!
//! Equalization runs on the Lab lightness channel only; chroma is left
//! untouched so the correction never shifts colors. Each tile's histogram
//! is clipped at the configured limit before building its mapping, and
//! pixel values are bilinearly interpolated between the mappings of the
//! neighboring tiles to avoid visible tile seams.

use image::RgbImage;

use crate::color::{lab_to_srgb, srgb_to_lab};

/// Improve local contrast on the lightness channel.
pub fn apply_clahe(image: &RgbImage, clip_limit: f64, grid_size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let mut lab: Vec<_> = image
        .pixels()
        .map(|p| srgb_to_lab(p.0[0], p.0[1], p.0[2]))
        .collect();

    // Quantize L (0-100) to the 0-255 histogram domain
    let l_channel: Vec<u8> = lab
        .iter()
        .map(|l| (l.l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8)
        .collect();

    let equalized = equalize_tiles(
        &l_channel,
        width as usize,
        height as usize,
        clip_limit,
        grid_size,
    );

    for (pixel, &l) in lab.iter_mut().zip(equalized.iter()) {
        pixel.l = l * 100.0 / 255.0;
    }

    let mut enhanced = RgbImage::new(width, height);
    for (dst, src) in enhanced.pixels_mut().zip(lab.iter()) {
        let (r, g, b) = lab_to_srgb(*src);
        dst.0 = [r, g, b];
    }
    enhanced
}

/// Tile-based equalization with bilinear interpolation between mappings.
fn equalize_tiles(
    l_channel: &[u8],
    width: usize,
    height: usize,
    clip_limit: f64,
    grid_size: u32,
) -> Vec<f32> {
    // Never let a tile be empty: degenerate images get fewer tiles
    let tiles_x = (grid_size as usize).min(width);
    let tiles_y = (grid_size as usize).min(height);

    let bounds_x = tile_bounds(width, tiles_x);
    let bounds_y = tile_bounds(height, tiles_y);

    let mut maps = vec![[0f32; 256]; tiles_x * tiles_y];
    for (ty, &(y0, y1)) in bounds_y.iter().enumerate() {
        for (tx, &(x0, x1)) in bounds_x.iter().enumerate() {
            let mut hist = [0u32; 256];
            for y in y0..y1 {
                let row = &l_channel[y * width + x0..y * width + x1];
                for &value in row {
                    hist[value as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as u32;
            maps[ty * tiles_x + tx] = tile_mapping(&hist, area, clip_limit);
        }
    }

    let lerp_x = interpolation_coords(width, &bounds_x);
    let lerp_y = interpolation_coords(height, &bounds_y);

    let mut out = vec![0f32; width * height];
    for y in 0..height {
        let (ty0, ty1, wy) = lerp_y[y];
        for x in 0..width {
            let (tx0, tx1, wx) = lerp_x[x];
            let value = l_channel[y * width + x] as usize;

            let top = maps[ty0 * tiles_x + tx0][value] * (1.0 - wx)
                + maps[ty0 * tiles_x + tx1][value] * wx;
            let bottom = maps[ty1 * tiles_x + tx0][value] * (1.0 - wx)
                + maps[ty1 * tiles_x + tx1][value] * wx;

            out[y * width + x] = top * (1.0 - wy) + bottom * wy;
        }
    }
    out
}

/// Partition an extent into tiles; the last tile absorbs remainder pixels.
fn tile_bounds(extent: usize, tiles: usize) -> Vec<(usize, usize)> {
    let size = extent / tiles;
    (0..tiles)
        .map(|i| {
            let start = i * size;
            let end = if i == tiles - 1 { extent } else { (i + 1) * size };
            (start, end)
        })
        .collect()
}

/// Clipped-histogram mapping for one tile.
///
/// Histogram counts above the clip threshold are redistributed evenly
/// across all bins, then the cumulative distribution is scaled to 0-255.
fn tile_mapping(hist: &[u32; 256], area: u32, clip_limit: f64) -> [f32; 256] {
    let mut hist = *hist;
    let clip = ((clip_limit * area as f64 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    let bonus = excess / 256;
    let residual = (excess % 256) as usize;
    for count in hist.iter_mut() {
        *count += bonus;
    }
    for count in hist.iter_mut().take(residual) {
        *count += 1;
    }

    // Redistribution conserves the total, so the CDF tops out at `area`
    let scale = 255.0 / area as f64;
    let mut cdf = 0u64;
    let mut map = [0f32; 256];
    for (count, entry) in hist.iter().zip(map.iter_mut()) {
        cdf += *count as u64;
        *entry = ((cdf as f64 * scale).round()).clamp(0.0, 255.0) as f32;
    }
    map
}

/// For each coordinate, the two neighboring tile indices and the blend
/// weight toward the second one. Coordinates outside the first/last tile
/// centers clamp to the edge mapping.
fn interpolation_coords(extent: usize, bounds: &[(usize, usize)]) -> Vec<(usize, usize, f32)> {
    let centers: Vec<f32> = bounds.iter().map(|&(s, e)| (s + e) as f32 / 2.0).collect();
    let last = centers.len() - 1;

    (0..extent)
        .map(|coord| {
            let c = coord as f32;
            if c <= centers[0] {
                return (0, 0, 0.0);
            }
            if c >= centers[last] {
                return (last, last, 0.0);
            }
            let hi = centers.partition_point(|&center| center <= c);
            let lo = hi - 1;
            let weight = (c - centers[lo]) / (centers[hi] - centers[lo]);
            (lo, hi, weight)
        })
        .collect()
}
