//! Output filename construction for resized variants.
//!
//! Variant files are named after their source with the measured pixel width
//! and a `w` appended to the stem:
//!
//! - `photo.jpg` at 750px → `photo750w.webp`
//! - second `photo.jpg` at 750px in the same folder → `photo750w1.webp`
//! - third → `photo750w2.webp`
//!
//! The numeric attempt suffix resolves collisions from repeated runs into a
//! non-cleared output folder, and from two steps that round to the same width.

use crate::reserve::Reserver;
use std::io;
use std::path::Path;

/// Upper bound on attempt suffixes before giving up on a name.
const MAX_ATTEMPTS: u32 = 100_000;

/// File name without its final extension.
///
/// `"photo.jpg"` → `"photo"`, `"archive.tar.gz"` → `"archive.tar"`,
/// `".hidden"` → `".hidden"`.
pub fn strip_extension(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Build the candidate name for one attempt. Attempt 0 carries no suffix.
///
/// `extension` is appended verbatim and should include its leading dot.
pub fn variant_file_name(stem: &str, width: u32, attempt: u32, extension: &str) -> String {
    if attempt == 0 {
        format!("{stem}{width}w{extension}")
    } else {
        format!("{stem}{width}w{attempt}{extension}")
    }
}

/// Find the first free variant name in `output_dir`.
///
/// Candidates are offered to `reserver` in attempt order; the first one it
/// accepts is returned. With a probing reserver the name is not held, so a
/// concurrent writer can still take it before the caller writes.
pub fn resolve_name(
    reserver: &dyn Reserver,
    source_file_name: &str,
    width: u32,
    output_dir: &Path,
    extension: &str,
) -> io::Result<String> {
    let stem = strip_extension(source_file_name);
    for attempt in 0..MAX_ATTEMPTS {
        let candidate = variant_file_name(stem, width, attempt, extension);
        if reserver.reserve_file(&output_dir.join(&candidate))? {
            if attempt > 0 {
                tracing::debug!(
                    "{} taken {} time(s), using {}",
                    variant_file_name(stem, width, 0, extension),
                    attempt,
                    candidate
                );
            }
            return Ok(candidate);
        }
    }
    Err(io::Error::other(format!(
        "no free name for {stem}{width}w{extension} after {MAX_ATTEMPTS} attempts in {}",
        output_dir.display()
    )))
}
