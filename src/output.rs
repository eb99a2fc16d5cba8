//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Format: JPEG (image/jpeg)
//!     Dimensions: 200x153
//!     Size: 12.4 KiB
//! ```
//!
//! ## Transforms
//!
//! ```text
//! fit photo.jpg (200x153) → thumb.png (100x76)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::ImageFormat;
use serde::Serialize;
use std::path::Path;

/// Everything `info` reports about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub path: String,
    pub format: ImageFormat,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    /// Size of the file on disk, in bytes.
    pub bytes: u64,
}

impl ImageInfo {
    pub fn new(path: &Path, format: ImageFormat, dimensions: (u32, u32), bytes: u64) -> Self {
        Self {
            path: path.display().to_string(),
            format,
            mime_type: format.mime_type(),
            width: dimensions.0,
            height: dimensions.1,
            bytes,
        }
    }
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Binary-prefixed size with one decimal above 1 KiB.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn format_dims((width, height): (u32, u32)) -> String {
    format!("{width}x{height}")
}

// ============================================================================
// info
// ============================================================================

/// Human-readable summary of one image.
pub fn format_info(info: &ImageInfo) -> Vec<String> {
    vec![
        info.path.clone(),
        format!("{}Format: {} ({})", indent(1), info.format, info.mime_type),
        format!(
            "{}Dimensions: {}",
            indent(1),
            format_dims((info.width, info.height))
        ),
        format!("{}Size: {}", indent(1), format_bytes(info.bytes)),
    ]
}

pub fn print_info(info: &ImageInfo) {
    for line in format_info(info) {
        println!("{}", line);
    }
}

/// Pretty-printed JSON for `info --json`.
pub fn format_info_json(info: &ImageInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(info)
}

// ============================================================================
// Transforms
// ============================================================================

/// One-line summary of a transform that wrote a file.
pub fn format_transform(
    operation: &str,
    input: &Path,
    before: (u32, u32),
    output: &Path,
    after: (u32, u32),
) -> String {
    format!(
        "{} {} ({}) → {} ({})",
        operation,
        input.display(),
        format_dims(before),
        output.display(),
        format_dims(after)
    )
}

pub fn print_transform(
    operation: &str,
    input: &Path,
    before: (u32, u32),
    output: &Path,
    after: (u32, u32),
) {
    println!("{}", format_transform(operation, input, before, output, after));
}
