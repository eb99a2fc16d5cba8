//! Pure Rust graphics engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (bytes) | `image::load_from_memory_with_format` |
//! | Decode (file) | signature peek, then `ImageReader::with_format` |
//! | Resize | `DynamicImage::resize_exact` with the configured [`ResampleFilter`] |
//! | Crop | `DynamicImage::crop_imm` |
//! | Background fill | `imageops::overlay` onto an opaque canvas |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped) |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, adaptive filtering |

use super::backend::{Capabilities, Dimensions, EngineError, GraphicsEngine};
use super::format::{ImageFormat, detect_from_bytes};
use super::params::{Compression, Quality, Rgb};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Resampling filter used for every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    /// Bicubic; the closest match to classic libgd resampling.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
    }
}

/// Pure Rust engine using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustEngine {
    filter: ResampleFilter,
}

impl RustEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

impl GraphicsEngine for RustEngine {
    type Pixels = DynamicImage;

    fn capabilities(&self) -> Capabilities {
        Capabilities { file_decode: true }
    }

    fn decode(&self, data: &[u8], format: ImageFormat) -> Result<DynamicImage, EngineError> {
        debug!(len = data.len(), %format, "decoding from memory");
        image::load_from_memory_with_format(data, codec_format(format))
            .map_err(|e| EngineError::Decode(format!("{format} data: {e}")))
    }

    fn decode_file(&self, path: &Path) -> Result<DynamicImage, EngineError> {
        let mut reader = BufReader::new(File::open(path)?);
        // Peek without consuming so the decoder still starts at byte 0
        let format = detect_from_bytes(reader.fill_buf()?).map_err(|_| {
            EngineError::UnsupportedFormat(format!(
                "{} is neither JPEG nor PNG",
                path.display()
            ))
        })?;

        debug!(path = %path.display(), %format, "decoding from file");
        ImageReader::with_format(reader, codec_format(format))
            .decode()
            .map_err(|e| {
                EngineError::Decode(format!("Failed to decode {}: {}", path.display(), e))
            })
    }

    fn dimensions(&self, pixels: &DynamicImage) -> Dimensions {
        Dimensions {
            width: pixels.width(),
            height: pixels.height(),
        }
    }

    fn resize_exact(
        &self,
        pixels: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, EngineError> {
        debug!(width, height, filter = ?self.filter, "resampling");
        Ok(pixels.resize_exact(width, height, self.filter.into()))
    }

    fn crop(
        &self,
        pixels: &DynamicImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, EngineError> {
        if u64::from(x) + u64::from(width) > u64::from(pixels.width())
            || u64::from(y) + u64::from(height) > u64::from(pixels.height())
        {
            return Err(EngineError::ProcessingFailed(format!(
                "crop {width}x{height}+{x}+{y} outside {}x{} buffer",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(pixels.crop_imm(x, y, width, height))
    }

    fn fill_background(
        &self,
        pixels: &DynamicImage,
        color: Rgb,
    ) -> Result<DynamicImage, EngineError> {
        let background = Rgba([color.r, color.g, color.b, 255]);
        let mut canvas = RgbaImage::from_pixel(pixels.width(), pixels.height(), background);
        imageops::overlay(&mut canvas, &pixels.to_rgba8(), 0, 0);
        Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()))
    }

    fn encode_jpeg(
        &self,
        pixels: &DynamicImage,
        quality: Quality,
    ) -> Result<Vec<u8>, EngineError> {
        // JPEG has no alpha channel; the encoder rejects RGBA input
        let rgb = DynamicImage::ImageRgb8(pixels.to_rgb8());
        let mut buf = Vec::new();
        // libjpeg treats 0 as 1; this encoder needs 1..=100
        let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value().max(1));
        rgb.write_with_encoder(encoder)
            .map_err(|e| EngineError::Encode(format!("JPEG encode failed: {e}")))?;
        Ok(buf)
    }

    fn encode_png(
        &self,
        pixels: &DynamicImage,
        compression: Option<Compression>,
    ) -> Result<Vec<u8>, EngineError> {
        let compression = match compression.map(Compression::level) {
            None => CompressionType::Default,
            Some(0..=3) => CompressionType::Fast,
            Some(4..=6) => CompressionType::Default,
            Some(_) => CompressionType::Best,
        };
        let mut buf = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilter::Adaptive);
        pixels
            .write_with_encoder(encoder)
            .map_err(|e| EngineError::Encode(format!("PNG encode failed: {e}")))?;
        Ok(buf)
    }
}
