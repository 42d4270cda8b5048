//! High-level image operations.
//!
//! These functions combine calculations with codec execution: read a source,
//! decode it, convert it to the target layout, then produce every step
//! variant largest first. Nothing here touches the output directory.

use super::backend::{CodecError, ImageCodec};
use super::calculations::{StepSize, plan_step_sizes, resolve_steps};
use super::params::{OutputFormat, ResizePlan};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// One resized copy of a source image, held in memory until it is written.
pub struct Variant<I> {
    pub image: I,
    /// Measured after resizing, never the requested value.
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl<I> std::fmt::Debug for Variant<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variant")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Decode `source` and produce its resized variants, largest first.
///
/// Any failure aborts the whole file: callers receive either every variant
/// or an error, never a partial list.
pub fn create_variants<C: ImageCodec>(
    codec: &C,
    source: &Path,
    plan: &ResizePlan,
) -> Result<Vec<Variant<C::Image>>> {
    let bytes = std::fs::read(source)?;
    let decoded = codec.decode(&bytes)?;
    let image = codec.convert(decoded, plan.options.format)?;

    let original = codec.measure(&image)?;
    let steps = resolve_steps(plan.steps, original.width);
    let sizes = plan_step_sizes((original.width, original.height), steps);

    let mut variants = Vec::with_capacity(sizes.len());
    for StepSize { width, height, .. } in sizes {
        let resized = codec.resize(&image, width, height)?;
        let measured = codec.measure(&resized)?;
        variants.push(Variant {
            image: resized,
            width: measured.width,
            height: measured.height,
            format: plan.options.format,
        });
    }

    Ok(variants)
}

/// Encode every variant, failing before anything is written if any one fails.
pub fn encode_variants<C: ImageCodec>(
    codec: &C,
    variants: Vec<Variant<C::Image>>,
    plan: &ResizePlan,
) -> Result<Vec<(Variant<C::Image>, Vec<u8>)>> {
    variants
        .into_iter()
        .map(|variant| -> Result<(Variant<C::Image>, Vec<u8>)> {
            let bytes = codec.encode(&variant.image, &plan.options)?;
            Ok((variant, bytes))
        })
        .collect()
}
