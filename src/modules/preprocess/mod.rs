//! Image binarization ahead of OCR.
//!
//! Photographed ledgers are low-contrast; tesseract does much better on a
//! clean black-on-white bitmap. Three methods are offered, selected via the
//! `PREPROCESS` env var: a fixed-threshold pass with contrast stretching,
//! a windowed adaptive threshold, and Otsu's global threshold.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{GrayImage, ImageReader};

use crate::domain::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessMethod {
    None,
    Basic,
    Adaptive,
    Otsu,
}

impl FromStr for PreprocessMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PreprocessMethod::None),
            "basic" => Ok(PreprocessMethod::Basic),
            "adaptive" => Ok(PreprocessMethod::Adaptive),
            "otsu" => Ok(PreprocessMethod::Otsu),
            other => Err(format!("Unknown preprocess method: {}", other)),
        }
    }
}

/// Binarize `input` into a temp PNG next to it and return the new path.
/// `PreprocessMethod::None` is a pass-through and returns `None`.
pub fn preprocess_to_temp(
    input: &Path,
    method: PreprocessMethod,
) -> Result<Option<PathBuf>, AppError> {
    if method == PreprocessMethod::None {
        return Ok(None);
    }

    let gray = ImageReader::open(input)
        .map_err(|e| AppError::Io(format!("Failed to open image: {}", e)))?
        .decode()
        .map_err(|e| AppError::Io(format!("Failed to decode image: {}", e)))?
        .to_luma8();

    let result = binarize(&gray, method);

    let output = input.with_file_name(format!("preprocessed_{}.png", uuid::Uuid::new_v4()));
    result
        .save(&output)
        .map_err(|e| AppError::Io(format!("Failed to save preprocessed image: {}", e)))?;

    Ok(Some(output))
}

pub fn binarize(gray: &GrayImage, method: PreprocessMethod) -> GrayImage {
    match method {
        PreprocessMethod::None => gray.clone(),
        PreprocessMethod::Basic => threshold(&stretch_contrast(gray), 150),
        PreprocessMethod::Adaptive => adaptive_threshold(&image::imageops::blur(gray, 1.0), 11, 2),
        PreprocessMethod::Otsu => {
            let blurred = image::imageops::blur(gray, 1.0);
            let t = otsu_level(&blurred);
            threshold(&blurred, t)
        }
    }
}

/// Linear stretch of the observed intensity range to the full 0..=255 range.
fn stretch_contrast(gray: &GrayImage) -> GrayImage {
    let (mut lo, mut hi) = (255u8, 0u8);
    for p in gray.pixels() {
        lo = lo.min(p.0[0]);
        hi = hi.max(p.0[0]);
    }
    if hi <= lo {
        return gray.clone();
    }
    let range = (hi - lo) as u32;
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = (((p.0[0] - lo) as u32 * 255) / range) as u8;
    }
    out
}

fn threshold(gray: &GrayImage, level: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] > level { 255 } else { 0 };
    }
    out
}

/// Mean-of-neighborhood threshold over a `window`-sized square, offset by
/// `c`. Uses an integral image so the cost is independent of window size.
fn adaptive_threshold(gray: &GrayImage, window: u32, c: i32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }

    // integral[y][x] = sum of all pixels above-left of (x, y), inclusive
    let mut integral = vec![vec![0u64; w as usize + 1]; h as usize + 1];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += gray.get_pixel(x, y).0[0] as u64;
            integral[y as usize + 1][x as usize + 1] = integral[y as usize][x as usize + 1] + row_sum;
        }
    }

    let half = (window / 2) as i64;
    let mut out = gray.clone();
    for y in 0..h {
        for x in 0..w {
            let x0 = (x as i64 - half).max(0) as usize;
            let y0 = (y as i64 - half).max(0) as usize;
            let x1 = ((x as i64 + half + 1).min(w as i64)) as usize;
            let y1 = ((y as i64 + half + 1).min(h as i64)) as usize;

            let count = ((x1 - x0) * (y1 - y0)) as u64;
            let sum = integral[y1][x1] + integral[y0][x0] - integral[y0][x1] - integral[y1][x0];
            let mean = (sum / count) as i32;

            let p = gray.get_pixel(x, y).0[0] as i32;
            out.get_pixel_mut(x, y).0[0] = if p > mean - c { 255 } else { 0 };
        }
    }
    out
}

/// Otsu's method: pick the threshold maximizing between-class variance.
fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 128;
    }

    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum();

    let mut sum_bg = 0.0f64;
    let mut weight_bg = 0u64;
    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;

    for level in 0..256usize {
        weight_bg += histogram[level];
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0 {
            break;
        }

        sum_bg += level as f64 * histogram[level] as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (sum_all - sum_bg) / weight_fg as f64;

        let variance =
            weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn two_tone(dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Luma([dark])
            } else {
                Luma([light])
            }
        })
    }

    #[test]
    fn parse_method_names() {
        assert_eq!("otsu".parse::<PreprocessMethod>(), Ok(PreprocessMethod::Otsu));
        assert_eq!(
            "Adaptive".parse::<PreprocessMethod>(),
            Ok(PreprocessMethod::Adaptive)
        );
        assert!("blur".parse::<PreprocessMethod>().is_err());
    }

    #[test]
    fn otsu_separates_two_tone_image() {
        let img = two_tone(40, 200);
        let level = otsu_level(&img);
        assert!(level >= 40 && level < 200, "level was {}", level);

        let bin = threshold(&img, level);
        assert_eq!(bin.get_pixel(0, 0).0[0], 0);
        assert_eq!(bin.get_pixel(15, 0).0[0], 255);
    }

    #[test]
    fn basic_produces_pure_black_and_white() {
        let bin = binarize(&two_tone(90, 130), PreprocessMethod::Basic);
        for p in bin.pixels() {
            assert!(p.0[0] == 0 || p.0[0] == 255);
        }
        // Contrast stretch pushes 90 to 0 and 130 to 255, so both tones survive
        assert_eq!(bin.get_pixel(0, 0).0[0], 0);
        assert_eq!(bin.get_pixel(15, 0).0[0], 255);
    }

    #[test]
    fn adaptive_keeps_uniform_regions_white() {
        // A flat image has per-window mean equal to the pixel value, and the
        // `c` offset keeps every pixel above the cutoff.
        let img = GrayImage::from_pixel(16, 16, Luma([120]));
        let bin = adaptive_threshold(&img, 11, 2);
        for p in bin.pixels() {
            assert_eq!(p.0[0], 255);
        }
    }
}
