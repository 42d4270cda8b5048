//! Shared test utilities for the optimg test suite.
//!
//! Fixture builders for source trees and synthetic images, plus small
//! lookup helpers for asserting on output folders.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_mock_image(&tmp.path().join("photos/cat.jpg"), 1000, 800);
//! // ... run a batch ...
//! assert_eq!(file_names(&tmp.path().join("photos/processed")), vec!["cat1000w.webp"]);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::fs;
use std::path::Path;

use crate::imaging::backend::tests::mock_source;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create an empty file, creating parent directories as needed.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Write a source file the mock backend decodes as a `width`×`height` image.
pub fn write_mock_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, mock_source(width, height)).unwrap();
}

// =========================================================================
// Synthetic images
// =========================================================================

/// A gradient RGB JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..width * height)
        .flat_map(|i| {
            let x = i % width;
            let y = i / width;
            [(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128]
        })
        .collect();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// A half-transparent RGBA PNG of the given size.
pub fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..width * height)
        .flat_map(|i| [200, 40, (i % 256) as u8, 128])
        .collect();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Sorted names of the entries directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
