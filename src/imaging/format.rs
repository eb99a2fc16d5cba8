//! Format detection by byte signature or filename extension.
//!
//! Only JPEG and PNG are recognized. Detection is pure: it never touches the
//! filesystem, so `detect_from_filename("missing.png")` succeeds even when the
//! file does not exist.

use super::error::{ImageError, Result};
use serde::Serialize;
use std::fmt;

const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Image container formats tinyimg can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => f.write_str("JPEG"),
            ImageFormat::Png => f.write_str("PNG"),
        }
    }
}

/// Classify a buffer by its leading bytes.
pub fn detect_from_bytes(data: &[u8]) -> Result<ImageFormat> {
    if data.starts_with(&JPEG_SIGNATURE) {
        Ok(ImageFormat::Jpeg)
    } else if data.starts_with(&PNG_SIGNATURE) {
        Ok(ImageFormat::Png)
    } else {
        Err(ImageError::UnsupportedFormat(
            "only JPEG and PNG files are supported".into(),
        ))
    }
}

/// Classify a filename by the text after its last `.`, case-insensitively.
///
/// A name with no `.` at all has no extension and is rejected.
pub fn detect_from_filename(name: &str) -> Result<ImageFormat> {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        _ => Err(ImageError::UnsupportedFormat(format!(
            "cannot determine image type from filename {name:?}"
        ))),
    }
}
