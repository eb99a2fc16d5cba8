//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. Loose input (CLI
//! strings, JSON objects) is validated here, once, and turned into typed
//! values; nothing downstream re-inspects the shape of a request.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (0–100, default 75). Rejected when out of range.
//! - [`Compression`]: PNG compression level (0–9). Optional; engine default when absent.
//! - [`EncodeOptions`]: Per-format encoder knobs handed to the engine.
//! - [`Rgb`]: Opaque background color used when flattening transparency.
//! - [`ResizeRequest`]: Key-based partial size (`width` and/or `height`).
//! - [`ResizeSpec`]: The resolved resize shape: positional exact, or keyed.
//! - [`CropRequest`]: Crop offset and size, each field defaulting against the image.

use super::error::{ImageError, Result};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Quality setting for JPEG encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub const DEFAULT: Quality = Quality(75);

    pub fn new(value: u8) -> Result<Self> {
        if value > 100 {
            return Err(ImageError::InvalidArgument(format!(
                "quality must be between 0 and 100, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// PNG compression level (0 = store, 9 = smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression(u8);

impl Compression {
    pub fn new(level: u8) -> Result<Self> {
        if level > 9 {
            return Err(ImageError::InvalidArgument(format!(
                "compression must be between 0 and 9, got {level}"
            )));
        }
        Ok(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

/// Encoder settings for both output formats.
///
/// Only the field matching the chosen output format is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub jpeg_quality: Quality,
    pub png_compression: Option<Compression>,
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parses `RRGGBB`, with or without a leading `#`.
impl FromStr for Rgb {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ImageError::InvalidArgument(format!(
                "color must be six hex digits (RRGGBB), got {s:?}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ImageError::InvalidArgument(e.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Key-based resize request: either dimension may be omitted, not both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeRequest {
    #[serde(default, deserialize_with = "positive_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "positive_dimension")]
    pub height: Option<u32>,
}

impl ResizeRequest {
    /// Parse a JSON object with `width` and/or `height` keys.
    ///
    /// Anything else is an [`ImageError::InvalidArgument`]: a non-object,
    /// an unknown key, a value that is not a positive integer fitting `u32`,
    /// or an object with neither key.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        // Derived structs also accept sequences, so `[w, h]` must be caught here
        if !value.is_object() {
            return Err(ImageError::InvalidArgument(format!(
                "resize request must be an object, got {value}"
            )));
        }
        let request = ResizeRequest::deserialize(value)
            .map_err(|e| ImageError::InvalidArgument(format!("invalid resize request: {e}")))?;

        if request.width.is_none() && request.height.is_none() {
            return Err(ImageError::InvalidArgument(
                "resize request needs a width, a height, or both".into(),
            ));
        }
        Ok(request)
    }
}

/// A present key must hold an integer in `1..=u32::MAX`; `null` is rejected.
fn positive_dimension<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => Err(de::Error::invalid_value(
            Unexpected::Unsigned(0),
            &"a positive integer",
        )),
        n => Ok(Some(n)),
    }
}

/// How to resize, resolved once at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSpec {
    /// Two positional dimensions; aspect ratio is ignored.
    Exact { width: u32, height: u32 },
    /// Only a width was given; height follows the aspect ratio.
    ByWidth(u32),
    /// Only a height was given; width follows the aspect ratio.
    ByHeight(u32),
    /// Both keys were given; behaves like `Exact`.
    ByBoth { width: u32, height: u32 },
}

impl ResizeSpec {
    pub fn exact(width: u32, height: u32) -> Self {
        ResizeSpec::Exact { width, height }
    }

    /// The keyed request this spec corresponds to.
    pub fn request(self) -> ResizeRequest {
        match self {
            ResizeSpec::Exact { width, height } | ResizeSpec::ByBoth { width, height } => {
                ResizeRequest {
                    width: Some(width),
                    height: Some(height),
                }
            }
            ResizeSpec::ByWidth(width) => ResizeRequest {
                width: Some(width),
                height: None,
            },
            ResizeSpec::ByHeight(height) => ResizeRequest {
                width: None,
                height: Some(height),
            },
        }
    }
}

impl TryFrom<ResizeRequest> for ResizeSpec {
    type Error = ImageError;

    fn try_from(request: ResizeRequest) -> Result<Self> {
        match (request.width, request.height) {
            (Some(width), Some(height)) => Ok(ResizeSpec::ByBoth { width, height }),
            (Some(width), None) => Ok(ResizeSpec::ByWidth(width)),
            (None, Some(height)) => Ok(ResizeSpec::ByHeight(height)),
            (None, None) => Err(ImageError::InvalidArgument(
                "resize request needs a width, a height, or both".into(),
            )),
        }
    }
}

/// Parses `WxH` (exact), `Wx` (by width), `xH` (by height), or a JSON
/// object such as `{"width": 100}`.
impl FromStr for ResizeSpec {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('{') {
            let value: serde_json::Value = serde_json::from_str(s)
                .map_err(|e| ImageError::InvalidArgument(format!("invalid JSON: {e}")))?;
            return ResizeRequest::from_json(&value)?.try_into();
        }

        let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| {
            ImageError::InvalidArgument(format!(
                "invalid size {s:?}; expected WxH, Wx, xH or a JSON object"
            ))
        })?;
        match (parse_dimension(w)?, parse_dimension(h)?) {
            (Some(width), Some(height)) => Ok(ResizeSpec::Exact { width, height }),
            (Some(width), None) => Ok(ResizeSpec::ByWidth(width)),
            (None, Some(height)) => Ok(ResizeSpec::ByHeight(height)),
            (None, None) => Err(ImageError::InvalidArgument(
                "at least one dimension must be specified".into(),
            )),
        }
    }
}

fn parse_dimension(s: &str) -> Result<Option<u32>> {
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ImageError::InvalidArgument(format!(
            "dimension must be a positive integer, got {s:?}"
        ))),
    }
}

impl fmt::Display for ResizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeSpec::Exact { width, height } | ResizeSpec::ByBoth { width, height } => {
                write!(f, "{width}x{height}")
            }
            ResizeSpec::ByWidth(width) => write!(f, "{width}x"),
            ResizeSpec::ByHeight(height) => write!(f, "x{height}"),
        }
    }
}

/// Crop region request. Omitted fields default to the full image:
/// `x = 0`, `y = 0`, `width = image width`, `height = image height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRequest {
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CropRequest {
    /// A fully specified region.
    pub fn region(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quality_rejects_out_of_range() {
        assert_eq!(Quality::new(0).unwrap().value(), 0);
        assert_eq!(Quality::new(100).unwrap().value(), 100);
        assert!(matches!(
            Quality::new(101),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn quality_default_is_75() {
        assert_eq!(Quality::default().value(), 75);
        assert_eq!(EncodeOptions::default().jpeg_quality.value(), 75);
        assert_eq!(EncodeOptions::default().png_compression, None);
    }

    #[test]
    fn compression_rejects_above_nine() {
        assert_eq!(Compression::new(9).unwrap().level(), 9);
        assert!(matches!(
            Compression::new(10),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rgb_parses_hex() {
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("FFFFFF".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn request_from_json_width_only() {
        let req = ResizeRequest::from_json(&json!({"width": 100})).unwrap();
        assert_eq!(req.width, Some(100));
        assert_eq!(req.height, None);
    }

    #[test]
    fn request_from_json_rejects_no_keys() {
        let result = ResizeRequest::from_json(&json!({}));
        assert!(matches!(result, Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn request_from_json_rejects_unknown_key() {
        let result = ResizeRequest::from_json(&json!({"width": 100, "depth": 3}));
        assert!(matches!(result, Err(ImageError::InvalidArgument(m)) if m.contains("depth")));
    }

    #[test]
    fn request_from_json_rejects_non_integer_values() {
        for bad in [
            json!({"width": 100.5}),
            json!({"width": "100"}),
            json!({"height": -1}),
            json!({"height": 0}),
            json!({"width": null}),
            json!({"width": 5_000_000_000u64}),
        ] {
            assert!(
                matches!(
                    ResizeRequest::from_json(&bad),
                    Err(ImageError::InvalidArgument(_))
                ),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn request_from_json_rejects_zero_or_null_beside_a_valid_key() {
        let result = ResizeRequest::from_json(&json!({"width": 100, "height": 0}));
        assert!(matches!(result, Err(ImageError::InvalidArgument(m)) if m.contains("positive")));
        let result = ResizeRequest::from_json(&json!({"width": null, "height": 5}));
        assert!(matches!(result, Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn request_from_json_both_keys() {
        let req = ResizeRequest::from_json(&json!({"height": 20, "width": 10})).unwrap();
        assert_eq!(
            req,
            ResizeRequest {
                width: Some(10),
                height: Some(20)
            }
        );
    }

    #[test]
    fn request_from_json_rejects_non_object() {
        let result = ResizeRequest::from_json(&json!([100, 100]));
        assert!(matches!(result, Err(ImageError::InvalidArgument(_))));
    }

    #[test]
    fn spec_from_request_picks_variant() {
        let both = ResizeRequest {
            width: Some(10),
            height: Some(20),
        };
        assert_eq!(
            ResizeSpec::try_from(both).unwrap(),
            ResizeSpec::ByBoth {
                width: 10,
                height: 20
            }
        );
        assert_eq!(
            ResizeSpec::try_from(ResizeRequest {
                width: None,
                height: Some(20)
            })
            .unwrap(),
            ResizeSpec::ByHeight(20)
        );
        assert!(ResizeSpec::try_from(ResizeRequest::default()).is_err());
    }

    #[test]
    fn spec_parses_size_strings() {
        assert_eq!(
            "100x76".parse::<ResizeSpec>().unwrap(),
            ResizeSpec::exact(100, 76)
        );
        assert_eq!(
            "100x".parse::<ResizeSpec>().unwrap(),
            ResizeSpec::ByWidth(100)
        );
        assert_eq!(
            "x100".parse::<ResizeSpec>().unwrap(),
            ResizeSpec::ByHeight(100)
        );
        assert_eq!(
            "640X480".parse::<ResizeSpec>().unwrap(),
            ResizeSpec::exact(640, 480)
        );
    }

    #[test]
    fn spec_parses_json_strings() {
        assert_eq!(
            r#"{"height": 100}"#.parse::<ResizeSpec>().unwrap(),
            ResizeSpec::ByHeight(100)
        );
        assert!(matches!(
            r#"{"width": 100, "colour": "red"}"#.parse::<ResizeSpec>(),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn spec_rejects_malformed_strings() {
        for bad in ["x", "100", "0x100", "-5x10", "1.5x2", "axb", "{not json"] {
            assert!(
                matches!(bad.parse::<ResizeSpec>(), Err(ImageError::InvalidArgument(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn spec_display_round_trips_through_parse() {
        for spec in [
            ResizeSpec::exact(3, 4),
            ResizeSpec::ByWidth(3),
            ResizeSpec::ByHeight(4),
        ] {
            assert_eq!(spec.to_string().parse::<ResizeSpec>().unwrap(), spec);
        }
    }
}
