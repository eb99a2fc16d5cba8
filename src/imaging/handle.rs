//! The [`Image`] handle: a decoded raster plus the engine that owns its pixels.
//!
//! Every transform comes in two flavors. The `_in_place` form mutates the
//! receiver and returns `&mut Self` so calls chain; the plain form deep-copies
//! first and returns the transformed copy, leaving the receiver untouched.
//!
//! Geometry is planned with the pure functions in
//! [`calculations`](super::calculations) before the engine sees anything, so
//! argument errors never reach the engine and a failure at any step leaves
//! the image exactly as it was.

use super::backend::{Dimensions, GraphicsEngine};
use super::calculations::{plan_crop, plan_exact, plan_fill, plan_fit, plan_proportional};
use super::error::{ImageError, Result};
use super::format::{ImageFormat, detect_from_bytes, detect_from_filename};
use super::params::{Compression, CropRequest, EncodeOptions, Quality, ResizeSpec, Rgb};
use super::rust_backend::RustEngine;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A decoded image.
///
/// `width` and `height` always match the engine's view of `pixels`; both are
/// at least 1. Dropping the handle releases the pixel buffer.
pub struct Image<E: GraphicsEngine = RustEngine> {
    engine: E,
    pixels: E::Pixels,
    width: u32,
    height: u32,
}

impl<E: GraphicsEngine + Clone> Clone for Image<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            pixels: self.pixels.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<E: GraphicsEngine> fmt::Debug for Image<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Image<RustEngine> {
    /// Load a JPEG or PNG file with the default engine.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_file_with(RustEngine::new(), path)
    }

    /// Decode an in-memory JPEG or PNG with the default engine.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::load_bytes_with(RustEngine::new(), data)
    }

    /// Read a stream to the end and decode it with the default engine.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Self::load_reader_with(RustEngine::new(), reader)
    }
}

impl<E: GraphicsEngine> Image<E> {
    /// Decode bytes with an explicit engine. The format comes from the
    /// leading signature, never from any name.
    pub fn load_bytes_with(engine: E, data: &[u8]) -> Result<Self> {
        let format = detect_from_bytes(data)?;
        debug!(%format, len = data.len(), "decoding image bytes");
        let pixels = engine.decode(data, format)?;
        Self::from_pixels(engine, pixels)
    }

    /// Load a file with an explicit engine.
    ///
    /// Engines advertising [`file_decode`](super::backend::Capabilities::file_decode)
    /// read the path themselves; otherwise the file is read into memory and
    /// decoded as bytes.
    pub fn load_file_with(engine: E, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if engine.capabilities().file_decode {
            debug!(path = %path.display(), "engine decoding file directly");
            let pixels = engine.decode_file(path)?;
            return Self::from_pixels(engine, pixels);
        }
        let data = fs::read(path)?;
        Self::load_bytes_with(engine, &data)
    }

    /// Drain `reader` and decode the bytes with an explicit engine.
    pub fn load_reader_with(engine: E, mut reader: impl Read) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes_with(engine, &data)
    }

    fn from_pixels(engine: E, pixels: E::Pixels) -> Result<Self> {
        let Dimensions { width, height } = engine.dimensions(&pixels);
        if width == 0 || height == 0 {
            return Err(ImageError::Decode(format!(
                "decoded image has no pixels ({width}x{height})"
            )));
        }
        debug!(width, height, "image loaded");
        Ok(Self {
            engine,
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The engine's pixel buffer.
    pub fn pixels(&self) -> &E::Pixels {
        &self.pixels
    }

    fn replace_pixels(&mut self, pixels: E::Pixels) {
        let Dimensions { width, height } = self.engine.dimensions(&pixels);
        self.pixels = pixels;
        self.width = width;
        self.height = height;
    }

    // =====================================================================
    // In-place transforms
    // =====================================================================

    /// Resample to exactly `width` x `height`.
    pub fn resize_exact_in_place(&mut self, width: u32, height: u32) -> Result<&mut Self> {
        let (width, height) = plan_exact(width, height)?;
        debug!(
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            "resizing"
        );
        let pixels = self.engine.resize_exact(&self.pixels, width, height)?;
        self.replace_pixels(pixels);
        Ok(self)
    }

    /// Resize to explicit dimensions, or to one dimension with the other
    /// derived from the current aspect ratio.
    pub fn resize_in_place(&mut self, spec: ResizeSpec) -> Result<&mut Self> {
        let (width, height) = match spec {
            ResizeSpec::Exact { width, height } | ResizeSpec::ByBoth { width, height } => {
                (width, height)
            }
            ResizeSpec::ByWidth(_) | ResizeSpec::ByHeight(_) => {
                plan_proportional(self.dimensions(), spec.request())?
            }
        };
        self.resize_exact_in_place(width, height)
    }

    /// Scale to fit inside `width` x `height`, preserving aspect ratio.
    pub fn resize_to_fit_in_place(&mut self, width: u32, height: u32) -> Result<&mut Self> {
        let (width, height) = plan_fit(self.dimensions(), (width, height))?;
        self.resize_exact_in_place(width, height)
    }

    /// Scale to cover `width` x `height`, preserving aspect ratio. The result
    /// may overshoot the box in one dimension.
    pub fn resize_to_fill_in_place(&mut self, width: u32, height: u32) -> Result<&mut Self> {
        let (width, height) = plan_fill(self.dimensions(), (width, height))?;
        self.resize_exact_in_place(width, height)
    }

    /// Keep only the requested region. Omitted fields default to the full
    /// image; a region reaching past either edge is [`ImageError::OutOfBounds`].
    pub fn crop_in_place(&mut self, request: &CropRequest) -> Result<&mut Self> {
        let region = plan_crop(self.dimensions(), request)?;
        debug!(?region, "cropping");
        let pixels = self.engine.crop(
            &self.pixels,
            region.x,
            region.y,
            region.width,
            region.height,
        )?;
        self.replace_pixels(pixels);
        Ok(self)
    }

    /// Composite over an opaque `color`, removing all transparency.
    pub fn fill_transparent_color_in_place(&mut self, color: Rgb) -> Result<&mut Self> {
        debug!(?color, "filling transparent pixels");
        let pixels = self.engine.fill_background(&self.pixels, color)?;
        self.replace_pixels(pixels);
        Ok(self)
    }

    // =====================================================================
    // Encoding
    // =====================================================================

    /// Encode into `format`, taking the matching setting from `options`.
    pub fn encode(&self, format: ImageFormat, options: &EncodeOptions) -> Result<Vec<u8>> {
        debug!(%format, "encoding");
        let data = match format {
            ImageFormat::Jpeg => self.engine.encode_jpeg(&self.pixels, options.jpeg_quality)?,
            ImageFormat::Png => self
                .engine
                .encode_png(&self.pixels, options.png_compression)?,
        };
        Ok(data)
    }

    /// Encode as JPEG. `None` means quality 75; above 100 is rejected.
    pub fn to_jpeg(&self, quality: Option<u8>) -> Result<Vec<u8>> {
        let jpeg_quality = quality.map(Quality::new).transpose()?.unwrap_or_default();
        self.encode(
            ImageFormat::Jpeg,
            &EncodeOptions {
                jpeg_quality,
                ..EncodeOptions::default()
            },
        )
    }

    /// Encode as PNG. `None` leaves compression to the engine; above 9 is
    /// rejected.
    pub fn to_png(&self, compression: Option<u8>) -> Result<Vec<u8>> {
        let png_compression = compression.map(Compression::new).transpose()?;
        self.encode(
            ImageFormat::Png,
            &EncodeOptions {
                png_compression,
                ..EncodeOptions::default()
            },
        )
    }

    /// Write to `path` with default encoder settings.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, &EncodeOptions::default())
    }

    /// Write to `path`, choosing the format from its extension.
    ///
    /// The extension is checked before any encoding, so an unsupported name
    /// fails without touching the filesystem.
    pub fn save_with(&self, path: impl AsRef<Path>, options: &EncodeOptions) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .ok_or_else(|| ImageError::UnsupportedFormat(path.display().to_string()))?;
        let format = detect_from_filename(&name)?;
        let data = self.encode(format, options)?;
        fs::write(path, &data)?;
        debug!(path = %path.display(), bytes = data.len(), "saved");
        Ok(())
    }
}

impl<E: GraphicsEngine + Clone> Image<E> {
    /// Resized copy; see [`resize_exact_in_place`](Self::resize_exact_in_place).
    pub fn resize_exact(&self, width: u32, height: u32) -> Result<Self> {
        let mut copy = self.clone();
        copy.resize_exact_in_place(width, height)?;
        Ok(copy)
    }

    /// Resized copy; see [`resize_in_place`](Self::resize_in_place).
    pub fn resize(&self, spec: ResizeSpec) -> Result<Self> {
        let mut copy = self.clone();
        copy.resize_in_place(spec)?;
        Ok(copy)
    }

    pub fn resize_to_fit(&self, width: u32, height: u32) -> Result<Self> {
        let mut copy = self.clone();
        copy.resize_to_fit_in_place(width, height)?;
        Ok(copy)
    }

    pub fn resize_to_fill(&self, width: u32, height: u32) -> Result<Self> {
        let mut copy = self.clone();
        copy.resize_to_fill_in_place(width, height)?;
        Ok(copy)
    }

    pub fn crop(&self, request: &CropRequest) -> Result<Self> {
        let mut copy = self.clone();
        copy.crop_in_place(request)?;
        Ok(copy)
    }

    pub fn fill_transparent_color(&self, color: Rgb) -> Result<Self> {
        let mut copy = self.clone();
        copy.fill_transparent_color_in_place(color)?;
        Ok(copy)
    }
}
