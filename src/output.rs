//! CLI output formatting.
//!
//! # Streams
//!
//! stdout carries only machine-usable output: srcset descriptor lines and
//! the dry-run file listing, so it can be piped straight into a file.
//! Progress, per-item failures and the final summary go to stderr.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! photos (2 images)
//!     created photos/processed
//!     cat.jpg
//!         1000w: photos/processed/cat1000w.webp
//!         500w: photos/processed/cat500w.webp
//!     dog.png
//!         1000w: photos/processed/dog1000w.webp
//!         500w: photos/processed/dog500w.webp
//! Error: photos/broken.jpg: Decode failed: ...
//! Processed 2 images, 4 variants written, 1 failed
//! ```
//!
//! ## Dry run
//!
//! ```text
//! photos/cat.jpg
//! photos/dog.png
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes it. Format functions are
//! pure: no I/O, no side effects.

use crate::process::{PlannedRoot, ProcessEvent, RunSummary};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Run progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::RootMissing { root } => {
            vec![format!("Not found: {}", root.display())]
        }
        ProcessEvent::Skipped { path } => {
            vec![format!("Skipped {} (not an input image)", path.display())]
        }
        ProcessEvent::DirectoryStarted { dir, image_count } => {
            vec![format!("{} ({})", dir.display(), plural(*image_count, "image"))]
        }
        ProcessEvent::OutputPrepared { dir, action } => {
            vec![format!("{}{} {}", indent(1), action, dir.display())]
        }
        ProcessEvent::ImageProcessed { source, variants } => {
            let mut lines = vec![format!("{}{}", indent(1), file_name(source))];
            for variant in variants {
                lines.push(format!(
                    "{}{}w: {}",
                    indent(2),
                    variant.width,
                    variant.path.display()
                ));
            }
            lines
        }
        ProcessEvent::AlreadyProcessed { source } => {
            vec![format!(
                "{}{}: already processed",
                indent(1),
                file_name(source)
            )]
        }
        ProcessEvent::Failed { path, error } => {
            vec![format!("Error: {}: {}", path.display(), error)]
        }
        ProcessEvent::SrcSet { line } => vec![line.clone()],
    }
}

/// Print an event: srcset lines to stdout, everything else to stderr.
pub fn print_process_event(event: &ProcessEvent) {
    let lines = format_process_event(event);
    if matches!(event, ProcessEvent::SrcSet { .. }) {
        for line in lines {
            println!("{}", line);
        }
    } else {
        for line in lines {
            eprintln!("{}", line);
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-run summary line.
///
/// ```text
/// Processed 3 images, 12 variants written, 1 already processed, 1 failed
/// ```
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut parts = vec![
        format!("Processed {}", plural(summary.images_processed, "image")),
        format!("{} written", plural(summary.variants_written, "variant")),
    ];
    if summary.already_processed > 0 {
        parts.push(format!("{} already processed", summary.already_processed));
    }
    if summary.failures > 0 {
        parts.push(format!("{} failed", summary.failures));
    }
    if summary.missing_roots > 0 {
        parts.push(format!(
            "{} of {} not found",
            summary.missing_roots,
            plural(summary.roots, "input")
        ));
    }
    vec![parts.join(", ")]
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Dry run
// ============================================================================

/// Format a dry run as `(listing, problems)`: candidate file paths for
/// stdout, unreadable or missing roots for stderr.
pub fn format_dry_run(planned: &[PlannedRoot]) -> (Vec<String>, Vec<String>) {
    let mut listing = Vec::new();
    let mut problems = Vec::new();
    for root in planned {
        match &root.files {
            Ok(files) => listing.extend(files.iter().map(|f| f.display().to_string())),
            Err(e) => problems.push(format!("Error: {}", e)),
        }
    }
    (listing, problems)
}

pub fn print_dry_run(planned: &[PlannedRoot]) {
    let (listing, problems) = format_dry_run(planned);
    for line in listing {
        println!("{}", line);
    }
    for line in problems {
        eprintln!("{}", line);
    }
}
