//! Encoder and resampler configuration.
//!
//! Handles loading and validating `tinyimg.toml`. Every key is optional; an
//! absent file means stock defaults.
//!
//! ## Config File Location
//!
//! Pass `--config PATH` on the command line, or place `tinyimg.toml` in the
//! working directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [jpeg]
//! quality = 75              # 0 (smallest) to 100 (best)
//!
//! [png]
//! # compression = 6         # 0 (fastest) to 9 (smallest); omit for encoder default
//!
//! [resize]
//! filter = "catmull-rom"    # nearest | triangle | catmull-rom | gaussian | lanczos3
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Compression, EncodeOptions, Quality, ResampleFilter, RustEngine};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "tinyimg.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `tinyimg.toml`.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TinyimgConfig {
    pub jpeg: JpegConfig,
    pub png: PngConfig,
    pub resize: ResizeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegConfig {
    /// JPEG quality (0-100).
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            quality: Quality::DEFAULT.value(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PngConfig {
    /// zlib level (0-9). `None` leaves the choice to the encoder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub filter: ResampleFilter,
}

impl TinyimgConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.encode_options().map(|_| ())
    }

    /// Typed encoder settings for [`Image::encode`](crate::imaging::Image::encode)
    /// and [`Image::save_with`](crate::imaging::Image::save_with).
    pub fn encode_options(&self) -> Result<EncodeOptions, ConfigError> {
        let jpeg_quality = Quality::new(self.jpeg.quality)
            .map_err(|_| ConfigError::Validation("jpeg.quality must be 0-100".into()))?;
        let png_compression = self
            .png
            .compression
            .map(Compression::new)
            .transpose()
            .map_err(|_| ConfigError::Validation("png.compression must be 0-9".into()))?;
        Ok(EncodeOptions {
            jpeg_quality,
            png_compression,
        })
    }

    /// Engine configured with the chosen resampling filter.
    pub fn engine(&self) -> RustEngine {
        RustEngine::with_filter(self.resize.filter)
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<TinyimgConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: TinyimgConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `tinyimg.toml` from `dir`, or stock defaults if it does not exist.
pub fn load_config_in(dir: &Path) -> Result<TinyimgConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(TinyimgConfig::default());
    }
    load_config(&path)
}

/// Returns a fully-commented stock `tinyimg.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tinyimg Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# JPEG output
# ---------------------------------------------------------------------------
[jpeg]
# Encoding quality (0 = smallest file, 100 = best quality).
quality = 75

# ---------------------------------------------------------------------------
# PNG output
# ---------------------------------------------------------------------------
[png]
# zlib compression level (0 = fastest, 9 = smallest file).
# Leave unset to use the encoder's default.
# compression = 6

# ---------------------------------------------------------------------------
# Resampling
# ---------------------------------------------------------------------------
[resize]
# Filter used by resize, fit and fill.
# One of: nearest, triangle, catmull-rom, gaussian, lanczos3
filter = "catmull-rom"
"##
}
