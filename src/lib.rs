//! # tinyimg
//!
//! A small facade for the four things most image pipelines actually do with a
//! JPEG or PNG: load it, resize it, crop it, and write it back out.
//!
//! ```no_run
//! use tinyimg::imaging::{Image, ResizeSpec};
//!
//! let image = Image::from_file("photo.jpg")?;
//! image.resize(ResizeSpec::ByWidth(800))?.save("photo-800.jpg")?;
//!
//! let mut thumb = image.clone();
//! thumb.resize_to_fill_in_place(200, 200)?.save("thumb.png")?;
//! # Ok::<(), tinyimg::imaging::ImageError>(())
//! ```
//!
//! # Architecture: Plan, Then Execute
//!
//! Every transform runs in two steps:
//!
//! ```text
//! 1. Plan      request + current size  →  target geometry   (pure math)
//! 2. Execute   target geometry + pixels →  new pixels       (graphics engine)
//! ```
//!
//! Planning lives in [`imaging::calculations`] and never touches pixels, so the
//! fit/fill/crop arithmetic is unit tested without decoding a single image.
//! Execution goes through the [`imaging::GraphicsEngine`] trait, so the
//! orchestration in [`imaging::Image`] is tested against a recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Format detection, geometry planning, the engine trait, and the [`Image`] handle |
//! | [`config`] | `tinyimg.toml` loading and validation (JPEG quality, PNG compression, filter) |
//! | [`output`] | CLI output formatting for `info` and the transform commands |
//!
//! # Design Decisions
//!
//! ## Content Decides the Input Format, the Name Decides the Output
//!
//! Loaded data is classified by its leading bytes (`FF D8 FF` for JPEG, the
//! 8-byte PNG signature for PNG), never by its filename, so a mislabelled
//! file still opens. Saving goes the other way: the extension of the
//! destination picks the encoder, and an unknown extension fails before any
//! encoding work is done.
//!
//! ## Copying and In-Place Variants
//!
//! Each transform has a copying form (`resize`, `crop`, ...) that leaves the
//! receiver untouched, and an `_in_place` form that mutates it and returns
//! `&mut Self` for chaining. A transform that fails partway leaves the image
//! exactly as it was: the new buffer is computed first and swapped in only on
//! success.
//!
//! ## Truncating Geometry
//!
//! Derived dimensions are truncated, not rounded: a 200x153 image resized to
//! width 100 becomes 100x76. Fit and fill compare aspect ratios strictly, so
//! equal ratios take the height-anchored branch in both.

pub mod config;
pub mod imaging;
pub mod output;

pub use imaging::Image;

#[cfg(test)]
pub(crate) mod test_helpers;
