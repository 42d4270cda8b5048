//! # optimg
//!
//! Batch image resizer for responsive web images. Every source image is
//! decoded once and written as a ladder of smaller copies into an output
//! folder next to it, with the measured width in each file name:
//!
//! ```text
//! photos/cat.jpg  →  photos/processed/cat1000w.webp
//!                    photos/processed/cat750w.webp
//!                    photos/processed/cat500w.webp
//!                    photos/processed/cat250w.webp
//! ```
//!
//! Optionally a srcset descriptor line is printed per image, ready to paste
//! into an `<img srcset>` attribute.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds candidate files and directories under an input root |
//! | [`reserve`] | Claims output names and directories, by probing or by exclusive creation |
//! | [`outdir`] | Creates, reuses or clears the output folder of a directory |
//! | [`imaging`] | Codec trait, `image`/`webp` backend, step sizing and the resize pipeline |
//! | [`naming`] | Collision-free `<stem><width>w[<n>]<ext>` file names |
//! | [`srcset`] | Srcset descriptor lines |
//! | [`process`] | Runs a batch over the input roots and reports progress |
//! | [`types`] | Run state: processed sources and prepared output folders |
//! | [`config`] | Defaults, TOML file and command-line layering, validation |
//! | [`output`] | CLI output formatting for progress events and the run summary |
//!
//! # Design Decisions
//!
//! ## Steps, Not Breakpoints
//!
//! Variant sizes are fractions of the source width: with `S` steps, variant
//! `i` is `floor(width * i / S)` wide, from `S` down to 1. The largest variant
//! is always the original size. A minimum width instead of a step count picks
//! `S = round(width / min_width)` per image, so small sources get fewer
//! variants.
//!
//! ## Never Overwrite
//!
//! Output folders accumulate across runs unless clearing is requested. A
//! name that is already taken gets a numeric suffix (`cat1000w1.webp`), so a
//! re-run never destroys earlier output. Clearing happens at most once per
//! folder per run, before its first write.
//!
//! ## Swappable Codec
//!
//! The pipeline only sees the [`imaging::ImageCodec`] trait. Tests drive the
//! whole batch with a recording mock; the production backend is pure Rust
//! (`image` for decoding, resizing and JPEG/PNG/AVIF, `webp` for lossy WebP).

pub mod config;
pub mod imaging;
pub mod naming;
pub mod outdir;
pub mod output;
pub mod process;
pub mod reserve;
pub mod scan;
pub mod srcset;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Install the global `tracing` subscriber, logging to stderr.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug
/// output for this crate when `verbose` is true.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "optimg=debug" } else { "optimg=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
