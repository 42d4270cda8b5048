//! Responsive-image descriptors.
//!
//! One line per source image, pairing each written variant with its width:
//!
//! ```text
//! photos/cat.jpg:photos/processed/cat1000w.webp 1000w photos/processed/cat500w.webp 500w
//! ```
//!
//! Every variant is followed by a single space, including the last one.

use std::fmt;
use std::path::{Path, PathBuf};

/// A source path and its variants in production order (largest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcSetEntry {
    pub source: PathBuf,
    pub variants: Vec<(PathBuf, u32)>,
}

impl SrcSetEntry {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            variants: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, width: u32) {
        self.variants.push((path.into(), width));
    }
}

impl fmt::Display for SrcSetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.source.display())?;
        for (path, width) in &self.variants {
            write!(f, "{} {}w ", path.display(), width)?;
        }
        Ok(())
    }
}

/// Build the descriptor string for `source` and its `(path, width)` variants.
///
/// ```
/// use std::path::{Path, PathBuf};
///
/// let variants = vec![
///     (PathBuf::from("img/processed/cat800w.webp"), 800),
///     (PathBuf::from("img/processed/cat400w.webp"), 400),
/// ];
/// assert_eq!(
///     optimg::srcset::build(Path::new("img/cat.jpg"), &variants),
///     "img/cat.jpg:img/processed/cat800w.webp 800w img/processed/cat400w.webp 400w "
/// );
/// ```
pub fn build(source: &Path, variants: &[(PathBuf, u32)]) -> String {
    SrcSetEntry {
        source: source.to_path_buf(),
        variants: variants.to_vec(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lists_variants_in_order() {
        let line = build(
            Path::new("img/cat.jpg"),
            &[
                ("img/processed/cat1000w.webp".into(), 1000),
                ("img/processed/cat500w.webp".into(), 500),
            ],
        );
        assert_eq!(
            line,
            "img/cat.jpg:img/processed/cat1000w.webp 1000w img/processed/cat500w.webp 500w "
        );
    }

    #[test]
    fn descriptor_without_variants_is_just_source() {
        assert_eq!(build(Path::new("a.png"), &[]), "a.png:");
    }

    #[test]
    fn entry_display_matches_build() {
        let mut entry = SrcSetEntry::new("a.png");
        entry.push("out/a10w1.webp", 10);
        assert_eq!(entry.to_string(), "a.png:out/a10w1.webp 10w ");
        assert_eq!(entry.to_string(), build(&entry.source, &entry.variants));
    }
}
