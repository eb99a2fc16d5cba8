//! Graphics engine trait and shared types.
//!
//! The [`GraphicsEngine`] trait is the narrow interface tinyimg delegates all
//! pixel work to: decode, exact resize, crop, background fill, and the two
//! encoders. Everything above it (format detection, geometry, validation)
//! is engine-agnostic.
//!
//! The production implementation is
//! [`RustEngine`](super::rust_backend::RustEngine), built on the `image` crate.
//!
//! ## Ownership
//!
//! An engine hands out `Pixels` values and never keeps references to them.
//! The [`Image`](super::Image) that receives a `Pixels` owns it
//! exclusively; dropping it releases the buffer. `Pixels: Clone` must be a
//! true deep copy, since non-mutating transforms clone before they mutate.

use super::format::ImageFormat;
use super::params::{Compression, Quality, Rgb};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The data is not JPEG or PNG.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    /// The engine does not implement an optional operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Width and height of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Optional operations an engine supports.
///
/// Read once per load; callers branch on the flags instead of probing the
/// engine with calls that may fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// [`GraphicsEngine::decode_file`] reads directly from a path.
    pub file_decode: bool,
}

/// Trait for pixel-processing engines.
///
/// All operations are synchronous and take the source buffer by reference,
/// returning a fresh buffer. Callers swap the result in only after success,
/// so a failing engine call never leaves an image half-transformed.
pub trait GraphicsEngine {
    /// Opaque pixel buffer. `clone()` must copy the pixel data.
    type Pixels: Clone;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Decode an in-memory buffer already classified as `format`.
    fn decode(&self, data: &[u8], format: ImageFormat) -> Result<Self::Pixels, EngineError>;

    /// Decode straight from a file. Only called when
    /// [`Capabilities::file_decode`] is set.
    fn decode_file(&self, _path: &Path) -> Result<Self::Pixels, EngineError> {
        Err(EngineError::Unsupported("decode_file"))
    }

    fn dimensions(&self, pixels: &Self::Pixels) -> Dimensions;

    /// Resample to exactly `width` x `height`, ignoring aspect ratio.
    fn resize_exact(
        &self,
        pixels: &Self::Pixels,
        width: u32,
        height: u32,
    ) -> Result<Self::Pixels, EngineError>;

    /// Copy out a region. The caller guarantees it lies inside the buffer.
    fn crop(
        &self,
        pixels: &Self::Pixels,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self::Pixels, EngineError>;

    /// Composite the buffer over an opaque background, removing transparency.
    fn fill_background(
        &self,
        pixels: &Self::Pixels,
        color: Rgb,
    ) -> Result<Self::Pixels, EngineError>;

    fn encode_jpeg(&self, pixels: &Self::Pixels, quality: Quality) -> Result<Vec<u8>, EngineError>;

    /// Encode as PNG; `None` uses the engine's default compression.
    fn encode_png(
        &self,
        pixels: &Self::Pixels,
        compression: Option<Compression>,
    ) -> Result<Vec<u8>, EngineError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock engine that records operations and fakes pixel buffers.
    ///
    /// Clones share one operation log (behind `Arc<Mutex<_>>`) so an image and
    /// its deep copies report into the same place.
    #[derive(Clone, Default)]
    pub struct MockEngine {
        pub operations: Arc<Mutex<Vec<RecordedOp>>>,
        pub file_decode: bool,
        /// Dimensions every decode reports.
        pub decoded: Option<Dimensions>,
        pub fail_decode: bool,
        pub fail_resize: bool,
    }

    /// Stand-in pixel buffer: just a size and an identity for copy tracking.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockPixels {
        pub width: u32,
        pub height: u32,
        pub generation: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode {
            len: usize,
            format: ImageFormat,
        },
        DecodeFile(String),
        Resize {
            width: u32,
            height: u32,
        },
        Crop {
            x: u32,
            y: u32,
            width: u32,
            height: u32,
        },
        FillBackground(Rgb),
        EncodeJpeg {
            quality: u8,
        },
        EncodePng {
            compression: Option<u8>,
        },
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                decoded: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }

        fn decoded_pixels(&self) -> Result<MockPixels, EngineError> {
            if self.fail_decode {
                return Err(EngineError::Decode("mock refuses to decode".into()));
            }
            let dims = self
                .decoded
                .ok_or_else(|| EngineError::Decode("No mock dimensions".into()))?;
            Ok(MockPixels {
                width: dims.width,
                height: dims.height,
                generation: 0,
            })
        }
    }

    impl GraphicsEngine for MockEngine {
        type Pixels = MockPixels;

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                file_decode: self.file_decode,
            }
        }

        fn decode(&self, data: &[u8], format: ImageFormat) -> Result<MockPixels, EngineError> {
            self.record(RecordedOp::Decode {
                len: data.len(),
                format,
            });
            self.decoded_pixels()
        }

        fn decode_file(&self, path: &Path) -> Result<MockPixels, EngineError> {
            self.record(RecordedOp::DecodeFile(path.to_string_lossy().to_string()));
            self.decoded_pixels()
        }

        fn dimensions(&self, pixels: &MockPixels) -> Dimensions {
            Dimensions {
                width: pixels.width,
                height: pixels.height,
            }
        }

        fn resize_exact(
            &self,
            pixels: &MockPixels,
            width: u32,
            height: u32,
        ) -> Result<MockPixels, EngineError> {
            self.record(RecordedOp::Resize { width, height });
            if self.fail_resize {
                return Err(EngineError::ProcessingFailed("mock resize failure".into()));
            }
            Ok(MockPixels {
                width,
                height,
                generation: pixels.generation + 1,
            })
        }

        fn crop(
            &self,
            pixels: &MockPixels,
            x: u32,
            y: u32,
            width: u32,
            height: u32,
        ) -> Result<MockPixels, EngineError> {
            self.record(RecordedOp::Crop {
                x,
                y,
                width,
                height,
            });
            Ok(MockPixels {
                width,
                height,
                generation: pixels.generation + 1,
            })
        }

        fn fill_background(
            &self,
            pixels: &MockPixels,
            color: Rgb,
        ) -> Result<MockPixels, EngineError> {
            self.record(RecordedOp::FillBackground(color));
            Ok(MockPixels {
                generation: pixels.generation + 1,
                ..pixels.clone()
            })
        }

        fn encode_jpeg(
            &self,
            _pixels: &MockPixels,
            quality: Quality,
        ) -> Result<Vec<u8>, EngineError> {
            self.record(RecordedOp::EncodeJpeg {
                quality: quality.value(),
            });
            Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
        }

        fn encode_png(
            &self,
            _pixels: &MockPixels,
            compression: Option<Compression>,
        ) -> Result<Vec<u8>, EngineError> {
            self.record(RecordedOp::EncodePng {
                compression: compression.map(Compression::level),
            });
            Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
        }
    }

    #[test]
    fn mock_records_decode() {
        let engine = MockEngine::with_dimensions(800, 600);

        let pixels = engine.decode(&[1, 2, 3], ImageFormat::Png).unwrap();
        assert_eq!(
            engine.dimensions(&pixels),
            Dimensions {
                width: 800,
                height: 600
            }
        );

        let ops = engine.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Decode {
                len: 3,
                format: ImageFormat::Png
            }
        ));
    }

    #[test]
    fn mock_without_dimensions_fails_decode() {
        let engine = MockEngine::new();
        let result = engine.decode(&[], ImageFormat::Jpeg);
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }

    #[test]
    fn default_decode_file_is_unsupported() {
        struct Minimal;
        impl GraphicsEngine for Minimal {
            type Pixels = ();
            fn decode(&self, _: &[u8], _: ImageFormat) -> Result<(), EngineError> {
                Ok(())
            }
            fn dimensions(&self, _: &()) -> Dimensions {
                Dimensions {
                    width: 1,
                    height: 1,
                }
            }
            fn resize_exact(&self, _: &(), _: u32, _: u32) -> Result<(), EngineError> {
                Ok(())
            }
            fn crop(&self, _: &(), _: u32, _: u32, _: u32, _: u32) -> Result<(), EngineError> {
                Ok(())
            }
            fn fill_background(&self, _: &(), _: Rgb) -> Result<(), EngineError> {
                Ok(())
            }
            fn encode_jpeg(&self, _: &(), _: Quality) -> Result<Vec<u8>, EngineError> {
                Ok(Vec::new())
            }
            fn encode_png(&self, _: &(), _: Option<Compression>) -> Result<Vec<u8>, EngineError> {
                Ok(Vec::new())
            }
        }

        assert_eq!(Minimal.capabilities(), Capabilities::default());
        assert!(matches!(
            Minimal.decode_file(Path::new("/x.png")),
            Err(EngineError::Unsupported("decode_file"))
        ));
    }

    #[test]
    fn mock_records_resize_and_bumps_generation() {
        let engine = MockEngine::with_dimensions(200, 153);
        let pixels = engine.decode(&[0], ImageFormat::Png).unwrap();

        let resized = engine.resize_exact(&pixels, 100, 76).unwrap();
        assert_eq!((resized.width, resized.height), (100, 76));
        assert_eq!(resized.generation, 1);

        let ops = engine.get_operations();
        assert!(matches!(
            ops.last(),
            Some(RecordedOp::Resize {
                width: 100,
                height: 76
            })
        ));
    }
}
