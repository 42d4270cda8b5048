//! Pure Rust image codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate decoders, format sniffed from content |
//! | Convert | `DynamicImage::to_rgb8` / `to_rgba8` per encoder requirements |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp) |
//! | Encode → JPEG / PNG | `image::codecs::{jpeg, png}` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//!
//! When metadata is not stripped, the source ICC profile is carried into
//! encoders that accept one (JPEG, PNG). Other metadata is never copied.

use super::backend::{CodecError, Dimensions, ImageCodec};
use super::params::{EncodeOptions, OutputFormat};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageReader};
use std::io::Cursor;

/// AVIF encoder speed (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;

/// Decoded image plus the color profile it arrived with.
pub struct RustImage {
    pixels: DynamicImage,
    icc_profile: Option<Vec<u8>>,
}

impl RustImage {
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, CodecError> {
    let encoder = webp::Encoder::from_image(image)
        .map_err(|e| CodecError::Encode(format!("WebP: {e}")))?;
    Ok(encoder.encode(quality).to_vec())
}

fn encode_with<E: ImageEncoder>(
    image: &DynamicImage,
    mut encoder: E,
    icc_profile: Option<&Vec<u8>>,
) -> Result<(), CodecError> {
    if let Some(icc) = icc_profile {
        if let Err(e) = encoder.set_icc_profile(icc.clone()) {
            tracing::debug!("ICC profile not carried over: {e}");
        }
    }
    image
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

impl ImageCodec for RustBackend {
    type Image = RustImage;

    fn decode(&self, bytes: &[u8]) -> Result<RustImage, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(CodecError::Io)?;
        if reader.format().is_none() {
            return Err(CodecError::Decode("unrecognized image format".into()));
        }
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let icc_profile = decoder.icc_profile().ok().flatten();
        let pixels =
            DynamicImage::from_decoder(decoder).map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(RustImage {
            pixels,
            icc_profile,
        })
    }

    fn convert(&self, image: RustImage, format: OutputFormat) -> Result<RustImage, CodecError> {
        let RustImage {
            pixels,
            icc_profile,
        } = image;
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CodecError::Convert {
                format,
                reason: "image has no pixels".into(),
            });
        }
        // JPEG has no alpha channel; the other encoders take RGB or RGBA 8-bit
        let has_alpha = pixels.color().has_alpha();
        let pixels = match format {
            OutputFormat::Jpeg => DynamicImage::ImageRgb8(pixels.to_rgb8()),
            _ if has_alpha => DynamicImage::ImageRgba8(pixels.to_rgba8()),
            _ => DynamicImage::ImageRgb8(pixels.to_rgb8()),
        };
        Ok(RustImage {
            pixels,
            icc_profile,
        })
    }

    fn resize(&self, image: &RustImage, width: u32, height: u32) -> Result<RustImage, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::Resize {
                width,
                height,
                reason: "target dimensions must be non-zero".into(),
            });
        }
        let pixels = if (width, height) == (image.pixels.width(), image.pixels.height()) {
            image.pixels.clone()
        } else {
            image.pixels.resize_exact(width, height, FilterType::Lanczos3)
        };
        Ok(RustImage {
            pixels,
            icc_profile: image.icc_profile.clone(),
        })
    }

    fn measure(&self, image: &RustImage) -> Result<Dimensions, CodecError> {
        Ok(Dimensions {
            width: image.pixels.width(),
            height: image.pixels.height(),
        })
    }

    fn encode(&self, image: &RustImage, options: &EncodeOptions) -> Result<Vec<u8>, CodecError> {
        let quality = options.quality.value();
        let icc = if options.strip_metadata {
            None
        } else {
            image.icc_profile.as_ref()
        };

        let mut buf = Vec::new();
        match options.format {
            OutputFormat::WebP => return encode_webp(&image.pixels, quality as f32),
            OutputFormat::Jpeg => encode_with(
                &image.pixels,
                JpegEncoder::new_with_quality(&mut buf, quality as u8),
                icc,
            )?,
            OutputFormat::Png => encode_with(&image.pixels, PngEncoder::new(&mut buf), icc)?,
            OutputFormat::Avif => encode_with(
                &image.pixels,
                AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality as u8),
                None,
            )?,
        }
        Ok(buf)
    }
}
