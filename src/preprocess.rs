/*!
 * Image preprocessing for OCR.
 *
 * Normalizes a captured bitmap before recognition: optional crop, luma
 * conversion, median denoise, contrast stretch, and adaptive thresholding.
 * The transformation is deterministic and never mutates its input.
 */

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

use crate::errors::OcrError;

/// Median denoise window radius (3x3 window)
const DENOISE_RADIUS: u32 = 1;

/// Adaptive threshold window radius (11x11 window)
const THRESHOLD_RADIUS: u32 = 5;

/// Offset subtracted from the local mean before thresholding
const THRESHOLD_OFFSET: f32 = 2.0;

/// Sub-rectangle of an image, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Decode an image from raw bytes
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    image::load_from_memory(bytes).map_err(|e| OcrError::ImageDecode(e.to_string()))
}

/// Decode an image from a file on disk
pub fn decode_file(path: &Path) -> Result<DynamicImage, OcrError> {
    let bytes = std::fs::read(path)
        .map_err(|e| OcrError::ImageDecode(format!("failed to read {}: {}", path.display(), e)))?;
    decode_bytes(&bytes)
}

/// Prepare an image for recognition.
///
/// Steps, in order: crop (if a sub-rectangle is supplied), luma conversion,
/// denoise, contrast stretch, adaptive binarization.
pub fn preprocess(image: &DynamicImage, crop: Option<CropRect>) -> GrayImage {
    let cropped = match crop.and_then(|rect| clamp_crop(image, rect)) {
        Some(rect) => image.crop_imm(rect.x, rect.y, rect.width, rect.height),
        None => image.clone(),
    };

    let luma = to_luma(&cropped);
    let denoised = median_filter(&luma);
    let stretched = contrast_stretch(&denoised);
    adaptive_threshold(&stretched)
}

/// Clamp a crop rectangle to the image bounds. Returns None when nothing
/// of the rectangle remains inside the image.
fn clamp_crop(image: &DynamicImage, rect: CropRect) -> Option<CropRect> {
    let (width, height) = (image.width(), image.height());
    if rect.x >= width || rect.y >= height {
        return None;
    }

    let clamped = CropRect {
        x: rect.x,
        y: rect.y,
        width: rect.width.min(width - rect.x),
        height: rect.height.min(height - rect.y),
    };

    if clamped.width == 0 || clamped.height == 0 {
        return None;
    }
    Some(clamped)
}

fn to_luma(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut luma = GrayImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        // Composite over white so transparent captures keep dark glyphs
        let alpha = a as f32 / 255.0;
        let r = r as f32 * alpha + 255.0 * (1.0 - alpha);
        let g = g as f32 * alpha + 255.0 * (1.0 - alpha);
        let b = b as f32 * alpha + 255.0 * (1.0 - alpha);
        let value = (0.299 * r + 0.587 * g + 0.114 * b).round() as u8;
        luma.put_pixel(x, y, Luma([value]));
    }

    luma
}

fn median_filter(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut output = GrayImage::new(width, height);
    let mut window = Vec::with_capacity(((2 * DENOISE_RADIUS + 1) * (2 * DENOISE_RADIUS + 1)) as usize);

    for y in 0..height {
        for x in 0..width {
            window.clear();
            let x0 = x.saturating_sub(DENOISE_RADIUS);
            let y0 = y.saturating_sub(DENOISE_RADIUS);
            let x1 = (x + DENOISE_RADIUS + 1).min(width);
            let y1 = (y + DENOISE_RADIUS + 1).min(height);
            for wy in y0..y1 {
                for wx in x0..x1 {
                    window.push(image.get_pixel(wx, wy)[0]);
                }
            }
            window.sort_unstable();
            output.put_pixel(x, y, Luma([window[window.len() / 2]]));
        }
    }

    output
}

fn contrast_stretch(image: &GrayImage) -> GrayImage {
    let mut min = 255u8;
    let mut max = 0u8;
    for pixel in image.pixels() {
        let value = pixel[0];
        min = min.min(value);
        max = max.max(value);
    }

    if max <= min {
        return image.clone();
    }

    let scale = 255.0 / (max as f32 - min as f32);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let stretched = ((pixel[0].saturating_sub(min)) as f32 * scale).round() as u8;
        pixel[0] = stretched;
    }
    output
}

/// Binarize against the mean of a local window, offset to keep faint
/// strokes: pixels brighter than (mean - offset) become white.
fn adaptive_threshold(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let stride = width as usize + 1;

    // Summed-area table with a zero border row/column
    let mut integral = vec![0u64; stride * (height as usize + 1)];
    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + (x + 1)] = integral[y * stride + (x + 1)] + row_sum;
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let x0 = x.saturating_sub(THRESHOLD_RADIUS) as usize;
            let y0 = y.saturating_sub(THRESHOLD_RADIUS) as usize;
            let x1 = (x + THRESHOLD_RADIUS + 1).min(width) as usize;
            let y1 = (y + THRESHOLD_RADIUS + 1).min(height) as usize;

            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((x1 - x0) * (y1 - y0)) as f32;
            let mean = sum as f32 / count;

            let value = if (image.get_pixel(x, y)[0] as f32) > mean - THRESHOLD_OFFSET {
                255u8
            } else {
                0u8
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}
