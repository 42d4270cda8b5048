//! Input discovery.
//!
//! Turns an input root into the files and directories a run will visit.
//!
//! ## Rules
//!
//! - A root that is a file is a candidate when its extension is allowed.
//! - A directory root yields its direct children, or its whole tree when
//!   recursing.
//! - Directories whose name is in the ignore list are pruned with their whole
//!   subtree. The root itself is never pruned, whatever its name.
//! - Extension matching is case-insensitive and accepts configured extensions
//!   with or without a leading dot.
//! - Results are sorted by file name so runs are deterministic. A symlink to
//!   a file is a candidate like the file itself; symlinked directories are
//!   not followed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input path not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
        ScanError::Io { path, source }
    }
}

/// Whether `path`'s extension is one of `extensions`.
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn is_ignored(entry: &DirEntry, ignore_dirs: &[&str]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| ignore_dirs.contains(&name))
}

/// Regular files, and symlinks resolving to one. Linked directories are
/// never entered.
fn is_file_or_link_to_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn stat(root: &Path) -> Result<fs::Metadata, ScanError> {
    fs::metadata(root).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ScanError::NotFound(root.to_path_buf())
        } else {
            ScanError::Io {
                path: root.to_path_buf(),
                source,
            }
        }
    })
}

/// Every candidate file under `root`.
///
/// - file root → itself if its extension is allowed, otherwise nothing
/// - directory root, `recursive == false` → allowed files directly inside
/// - directory root, `recursive == true` → allowed files at any depth,
///   skipping directories named in `ignore_dirs`
pub fn collect(
    root: &Path,
    extensions: &[String],
    recursive: bool,
    ignore_dirs: &[&str],
) -> Result<Vec<PathBuf>, ScanError> {
    let meta = stat(root)?;
    if !meta.is_dir() {
        return Ok(if has_allowed_extension(root, extensions) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }
    if !recursive {
        return list_images(root, extensions);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, ignore_dirs));
    for entry in walker {
        let entry = entry?;
        if is_file_or_link_to_file(&entry) && has_allowed_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Allowed files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    let read_err = |source: io::Error| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_file() && has_allowed_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `root` and every directory below it, minus ignored names and their subtrees.
pub fn collect_directories(root: &Path, ignore_dirs: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    if !stat(root)?.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, ignore_dirs));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::touch;
    use tempfile::TempDir;

    fn default_exts() -> Vec<String> {
        [".webp", ".png", ".jpg", ".jpeg"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    /// ```text
    /// root/
    /// ├── a.jpg
    /// ├── b.PNG
    /// ├── notes.txt
    /// ├── processed/old.webp
    /// └── sub/
    ///     ├── c.jpeg
    ///     ├── processed/older.webp
    ///     └── deep/d.webp
    /// ```
    fn tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for f in [
            "a.jpg",
            "b.PNG",
            "notes.txt",
            "processed/old.webp",
            "sub/c.jpeg",
            "sub/processed/older.webp",
            "sub/deep/d.webp",
        ] {
            touch(&tmp.path().join(f));
        }
        tmp
    }

    // =========================================================================
    // has_allowed_extension
    // =========================================================================

    #[test]
    fn extension_match_is_case_insensitive() {
        let exts = default_exts();
        assert!(has_allowed_extension(Path::new("x.JPG"), &exts));
        assert!(has_allowed_extension(Path::new("x.webp"), &exts));
        assert!(!has_allowed_extension(Path::new("x.gif"), &exts));
        assert!(!has_allowed_extension(Path::new("jpg"), &exts));
    }

    #[test]
    fn extension_config_without_dot() {
        let exts = vec!["tiff".to_string()];
        assert!(has_allowed_extension(Path::new("scan.tiff"), &exts));
    }

    // =========================================================================
    // collect
    // =========================================================================

    #[test]
    fn collect_single_file() {
        let tmp = tree();
        let file = tmp.path().join("a.jpg");
        assert_eq!(
            collect(&file, &default_exts(), false, &["processed"]).unwrap(),
            vec![file]
        );
    }

    #[test]
    fn collect_single_file_with_wrong_extension() {
        let tmp = tree();
        let file = tmp.path().join("notes.txt");
        assert!(
            collect(&file, &default_exts(), true, &["processed"])
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn collect_flat_directory() {
        let tmp = tree();
        let files = collect(tmp.path(), &default_exts(), false, &["processed"]).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["a.jpg", "b.PNG"]);
    }

    #[test]
    fn collect_recursive_skips_ignored_at_any_depth() {
        let tmp = tree();
        let files = collect(tmp.path(), &default_exts(), true, &["processed"]).unwrap();
        assert_eq!(
            names(tmp.path(), &files),
            vec!["a.jpg", "b.PNG", "sub/c.jpeg", "sub/deep/d.webp"]
        );
    }

    #[test]
    fn collect_recursive_without_ignore_sees_everything() {
        let tmp = tree();
        let files = collect(tmp.path(), &default_exts(), true, &[]).unwrap();
        assert_eq!(files.len(), 6);
    }

    #[test]
    fn collect_missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = collect(&tmp.path().join("nope"), &default_exts(), true, &[]);
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn root_named_like_ignore_dir_is_still_walked() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("processed");
        touch(&root.join("x.jpg"));

        let files = collect(&root, &default_exts(), true, &["processed"]).unwrap();
        assert_eq!(files, vec![root.join("x.jpg")]);
    }

    // =========================================================================
    // list_images / collect_directories
    // =========================================================================

    #[test]
    fn list_images_ignores_directories_with_image_names() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("real.jpg"));
        fs::create_dir(tmp.path().join("folder.jpg")).unwrap();

        let files = list_images(tmp.path(), &default_exts()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["real.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_candidates() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let album = tmp.path().join("album");
        touch(&tmp.path().join("store/real.jpg"));
        touch(&tmp.path().join("store/nested/deep.jpg"));
        fs::create_dir_all(album.join("sub")).unwrap();
        symlink(tmp.path().join("store/real.jpg"), album.join("linked.jpg")).unwrap();
        symlink(tmp.path().join("store/nested"), album.join("sub/linked-dir")).unwrap();
        symlink(tmp.path().join("store/gone.jpg"), album.join("dangling.jpg")).unwrap();

        let flat = list_images(&album, &default_exts()).unwrap();
        assert_eq!(names(&album, &flat), vec!["linked.jpg"]);

        let deep = collect(&album, &default_exts(), true, &[]).unwrap();
        assert_eq!(names(&album, &deep), vec!["linked.jpg"]);
    }

    #[test]
    fn list_images_missing_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = list_images(&tmp.path().join("gone"), &default_exts());
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[test]
    fn collect_directories_excludes_ignored_names() {
        let tmp = tree();
        let dirs = collect_directories(tmp.path(), &["processed"]).unwrap();
        assert_eq!(names(tmp.path(), &dirs), vec!["", "sub", "sub/deep"]);
    }

    #[test]
    fn collect_directories_honours_every_ignored_name() {
        let tmp = tree();
        let dirs = collect_directories(tmp.path(), &["processed", "deep"]).unwrap();
        assert_eq!(names(tmp.path(), &dirs), vec!["", "sub"]);
    }

    #[test]
    fn collect_directories_of_file_is_empty() {
        let tmp = tree();
        assert!(
            collect_directories(&tmp.path().join("a.jpg"), &[])
                .unwrap()
                .is_empty()
        );
    }
}
