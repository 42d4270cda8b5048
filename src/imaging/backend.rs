//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the five operations the resize pipeline
//! needs: decode, convert, resize, measure and encode. The pixel buffer is an
//! associated type, so the rest of the crate never sees what a backend holds.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! and `webp` crates.

use super::params::{EncodeOptions, OutputFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Conversion to {format} failed: {reason}")]
    Convert {
        format: OutputFormat,
        reason: String,
    },
    #[error("Resize to {width}x{height} failed: {reason}")]
    Resize {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(OutputFormat),
}

/// Measured pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codec backends.
///
/// Every operation returns a fresh image rather than mutating in place, so a
/// failed step leaves the caller's previous image untouched.
pub trait ImageCodec {
    /// Opaque decoded image owned by the backend.
    type Image;

    /// Decode raw file bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, CodecError>;

    /// Convert pixels into a layout the target format's encoder accepts.
    fn convert(&self, image: Self::Image, format: OutputFormat) -> Result<Self::Image, CodecError>;

    /// Resize to exact dimensions.
    fn resize(&self, image: &Self::Image, width: u32, height: u32)
    -> Result<Self::Image, CodecError>;

    /// Measure the actual pixel dimensions.
    fn measure(&self, image: &Self::Image) -> Result<Dimensions, CodecError>;

    /// Encode into the bytes of the output file.
    fn encode(&self, image: &Self::Image, options: &EncodeOptions) -> Result<Vec<u8>, CodecError>;
}
