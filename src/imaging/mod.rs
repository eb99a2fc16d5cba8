//! Image processing: JPEG and PNG in, JPEG and PNG out.
//!
//! | Operation | Where |
//! |---|---|
//! | **Format detection** | signature / extension match in [`format`] |
//! | **Geometry** | pure planners in [`calculations`] |
//! | **Pixels** | [`GraphicsEngine`] trait, [`RustEngine`] on the `image` crate |
//! | **Handle** | [`Image`] ties an engine to one decoded buffer |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Validated request and encoder types
//! - **Backend**: [`GraphicsEngine`] trait + [`RustEngine`]
//! - **Handle**: [`Image`], combining calculations + engine

pub mod backend;
pub mod calculations;
mod error;
pub mod format;
mod handle;
pub mod params;
pub mod rust_backend;

pub use backend::{Capabilities, Dimensions, EngineError, GraphicsEngine};
pub use calculations::{
    CropRegion, plan_crop, plan_exact, plan_fill, plan_fit, plan_proportional,
};
pub use error::{ImageError, Result};
pub use format::{ImageFormat, detect_from_bytes, detect_from_filename};
pub use handle::Image;
pub use params::{
    Compression, CropRequest, EncodeOptions, Quality, ResizeRequest, ResizeSpec, Rgb,
};
pub use rust_backend::{ResampleFilter, RustEngine};
