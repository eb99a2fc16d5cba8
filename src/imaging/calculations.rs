//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images. They
//! take the current `(width, height)` of an image and a request, and return
//! the exact pixel dimensions (or crop region) to hand to the engine.
//!
//! Fit and fill compare aspect ratios with strict `>` / `<`. When the source
//! and target ratios are equal, both modes take the height-anchored branch.

use super::error::{ImageError, Result};
use super::params::{CropRequest, ResizeRequest};

/// A crop region with every default applied and every bound checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Validate an exact resize target. Both dimensions must be positive.
pub fn plan_exact(width: u32, height: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "width and height must both be positive integers, got {width}x{height}"
        )));
    }
    Ok((width, height))
}

/// Fill in the missing dimension of a partial request, preserving aspect ratio.
///
/// The missing side is `current_missing * provided / current_provided`,
/// floored. With both sides given this is [`plan_exact`].
///
/// # Examples
/// ```
/// # use tinyimg::imaging::{plan_proportional, ResizeRequest};
/// // 200x153 scaled to width 100 → 153 * 100 / 200 = 76.5 → 76
/// let req = ResizeRequest { width: Some(100), height: None };
/// assert_eq!(plan_proportional((200, 153), req).unwrap(), (100, 76));
/// ```
pub fn plan_proportional(current: (u32, u32), request: ResizeRequest) -> Result<(u32, u32)> {
    let (cur_w, cur_h) = current;

    match (request.width, request.height) {
        (Some(w), Some(h)) => plan_exact(w, h),
        (Some(w), None) => {
            positive("width", w)?;
            plan_exact(w, scale("height", cur_h, w, cur_w)?)
        }
        (None, Some(h)) => {
            positive("height", h)?;
            plan_exact(scale("width", cur_w, h, cur_h)?, h)
        }
        (None, None) => Err(ImageError::InvalidArgument(
            "resize request needs a width, a height, or both".into(),
        )),
    }
}

/// `value * numerator / denominator` with floor division, computed in u64.
/// A result that does not fit a `u32` dimension is rejected.
fn scale(name: &str, value: u32, numerator: u32, denominator: u32) -> Result<u32> {
    positive("source dimension", denominator)?;
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).map_err(|_| {
        ImageError::InvalidArgument(format!(
            "derived {name} {scaled} exceeds the maximum image dimension"
        ))
    })
}

fn positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "{name} must be a positive integer"
        )));
    }
    Ok(())
}

/// Largest size that fits entirely inside `target` while keeping the
/// source aspect ratio.
///
/// # Examples
/// ```
/// # use tinyimg::imaging::plan_fit;
/// assert_eq!(plan_fit((200, 153), (100, 100)).unwrap(), (100, 76));
/// assert_eq!(plan_fit((200, 153), (1000, 100)).unwrap(), (130, 100));
/// ```
pub fn plan_fit(current: (u32, u32), target: (u32, u32)) -> Result<(u32, u32)> {
    plan_aspect(current, target, |old_ratio, new_ratio| old_ratio > new_ratio)
}

/// Smallest size that fully covers `target` while keeping the source aspect
/// ratio. One side matches the target; the other usually overflows it and
/// is left for the caller to crop.
///
/// # Examples
/// ```
/// # use tinyimg::imaging::plan_fill;
/// assert_eq!(plan_fill((200, 153), (1000, 100)).unwrap(), (1000, 765));
/// assert_eq!(plan_fill((200, 153), (100, 100)).unwrap(), (130, 100));
/// ```
pub fn plan_fill(current: (u32, u32), target: (u32, u32)) -> Result<(u32, u32)> {
    plan_aspect(current, target, |old_ratio, new_ratio| old_ratio < new_ratio)
}

/// Shared body of fit and fill. `anchor_width` decides, from the source and
/// target aspect ratios, whether the target width is kept.
fn plan_aspect(
    current: (u32, u32),
    target: (u32, u32),
    anchor_width: impl Fn(f64, f64) -> bool,
) -> Result<(u32, u32)> {
    let (cur_w, cur_h) = current;
    let (tgt_w, tgt_h) = plan_exact(target.0, target.1)?;
    if cur_w == 0 || cur_h == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "source dimensions must be positive, got {cur_w}x{cur_h}"
        )));
    }

    let old_ratio = cur_w as f64 / cur_h as f64;
    let new_ratio = tgt_w as f64 / tgt_h as f64;

    let (w, h) = if anchor_width(old_ratio, new_ratio) {
        // Width matches the target, height follows (truncated)
        let h = (cur_h as f64 * (tgt_w as f64 / cur_w as f64)) as u32;
        (tgt_w, h)
    } else {
        // Height matches the target, width follows (truncated)
        let w = (cur_w as f64 * (tgt_h as f64 / cur_h as f64)) as u32;
        (w, tgt_h)
    };

    plan_exact(w, h)
}

/// Resolve a crop request against the current image size.
///
/// Omitted fields default to the whole image. The region must be non-empty
/// and lie entirely inside the image; anything else is
/// [`ImageError::OutOfBounds`].
pub fn plan_crop(current: (u32, u32), request: &CropRequest) -> Result<CropRegion> {
    let (cur_w, cur_h) = current;
    let region = CropRegion {
        x: request.x.unwrap_or(0),
        y: request.y.unwrap_or(0),
        width: request.width.unwrap_or(cur_w),
        height: request.height.unwrap_or(cur_h),
    };

    if region.width == 0 || region.height == 0 {
        return Err(ImageError::OutOfBounds(
            "width and height must both be positive integers".into(),
        ));
    }

    // Widen to u64 so x + width cannot wrap
    if u64::from(region.x) + u64::from(region.width) > u64::from(cur_w) {
        return Err(ImageError::OutOfBounds(format!(
            "x + width ({} + {}) is greater than the image width ({cur_w})",
            region.x, region.width
        )));
    }
    if u64::from(region.y) + u64::from(region.height) > u64::from(cur_h) {
        return Err(ImageError::OutOfBounds(format!(
            "y + height ({} + {}) is greater than the image height ({cur_h})",
            region.y, region.height
        )));
    }

    Ok(region)
}
