//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between the [`operations`](super::operations) module (which decides which
//! variants to create) and the [`backend`](super::backend) (which does the pixel
//! work), so a mock backend can stand in for the real one in tests.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`OutputFormat`]: Target container, resolved from the configured extension.
//! - [`EncodeOptions`]: Format, quality and metadata policy handed to `encode`.
//! - [`StepPolicy`]: Fixed step count, or a minimum width the count is derived from.
//! - [`ResizePlan`]: Everything the pipeline needs for one run.

use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Encoded output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Jpeg,
    Png,
    Avif,
}

impl OutputFormat {
    /// Resolve a format from an extension, with or without the leading dot.
    ///
    /// Matching is case-insensitive: `".webp"`, `"WEBP"` and `"webp"` are the same.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "webp" => Some(Self::WebP),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// Whether the encoder honours the quality setting.
    pub fn is_lossy(self) -> bool {
        !matches!(self, Self::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Avif => "avif",
        };
        f.write_str(name)
    }
}

/// Options applied when a variant is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub format: OutputFormat,
    pub quality: Quality,
    /// Drop embedded color profiles and other metadata from the output.
    pub strip_metadata: bool,
}

/// How many variants to produce per source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Exactly this many variants.
    Fixed(u32),
    /// Derive the count so the smallest variant lands near this width.
    MinWidth(u32),
}

/// Everything the resize pipeline needs, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub steps: StepPolicy,
    pub options: EncodeOptions,
}
