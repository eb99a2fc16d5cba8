//! Shared test utilities for the tinyimg test suite.
//!
//! Builds small, real JPEG and PNG files in memory so engine and handle tests
//! never depend on fixtures checked into the repo.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = write_png(tmp.path(), "gradient.png", 200, 153);
//! let image = Image::from_file(&path).unwrap();
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// In-memory encoders
// =========================================================================

/// Opaque gradient: pixel `(x, y)` is `[x, y, 128]` (wrapping at 256).
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]))
}

/// Lossless RGB PNG of [`gradient`].
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// RGBA PNG whose left half is fully transparent and right half opaque red.
///
/// Pixel `(0, 0)` is always transparent.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let half = width.div_ceil(2);
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < half {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([255, 0, 0, 255])
        }
    });
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

/// Baseline JPEG of [`gradient`] at quality 90.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

// =========================================================================
// File writers
// =========================================================================

/// Write [`png_bytes`] to `dir/name` and return the path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).unwrap();
    path
}

/// Write [`jpeg_bytes`] to `dir/name` and return the path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}
