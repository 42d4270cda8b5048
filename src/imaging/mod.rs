//! Image processing: pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode → WebP** | `webp` crate (lossy) |
//! | **Encode → JPEG / PNG / AVIF** | `image` crate encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for step and dimension math (unit testable)
//! - **Parameters**: Data structures describing what to produce
//! - **Backend**: [`ImageCodec`] trait + [`RustBackend`]
//! - **Operations**: The resize pipeline combining calculations + codec

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, Dimensions, ImageCodec};
pub use calculations::{StepSize, plan_step_sizes, resolve_steps, steps_for_min_width};
pub use operations::{Variant, create_variants, encode_variants};
pub use params::{EncodeOptions, OutputFormat, Quality, ResizePlan, StepPolicy};
pub use rust_backend::RustBackend;
