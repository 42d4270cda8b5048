//! Claiming output names and directories.
//!
//! Every check-then-act step against the output tree goes through a
//! [`Reserver`]: the name resolver asks it whether a candidate file name is
//! free, and the output-directory manager asks it to create directories.
//!
//! | Strategy | Files | Directories | Atomic |
//! |---|---|---|---|
//! | [`ProbeReserver`] | `exists()` probe, written later | probe, then `create_dir` | no |
//! | [`ExclusiveReserver`] | `create_new` placeholder | `create_dir`, `AlreadyExists` = taken | yes |
//!
//! The probe strategy leaves a window between the check and the write in
//! which another process can take the same name. The exclusive strategy
//! closes it by creating an empty placeholder that the writer then fills.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

pub trait Reserver {
    /// Try to claim `path` as a new file. `Ok(true)` means the caller owns it.
    fn reserve_file(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` as a directory, copying the permission mode of
    /// `mode_source` on unix. `Ok(false)` means it already existed.
    fn reserve_dir(&self, path: &Path, mode_source: &Path) -> io::Result<bool>;
}

/// Which [`Reserver`] a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    #[default]
    Probe,
    Exclusive,
}

impl NamingStrategy {
    pub fn reserver(self) -> Box<dyn Reserver> {
        match self {
            Self::Probe => Box::new(ProbeReserver),
            Self::Exclusive => Box::new(ExclusiveReserver),
        }
    }
}

/// Existence probe, then act. Any directory entry counts as taken.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbeReserver;

/// Exclusive creation: the filesystem arbitrates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExclusiveReserver;

fn entry_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create a single directory with the mode of `mode_source`.
fn create_dir_like(path: &Path, mode_source: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
        let mode = fs::metadata(mode_source)?.permissions().mode();
        builder.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode_source;
    builder.create(path)
}

impl Reserver for ProbeReserver {
    fn reserve_file(&self, path: &Path) -> io::Result<bool> {
        Ok(!entry_exists(path)?)
    }

    fn reserve_dir(&self, path: &Path, mode_source: &Path) -> io::Result<bool> {
        if entry_exists(path)? {
            return Ok(false);
        }
        create_dir_like(path, mode_source)?;
        Ok(true)
    }
}

impl Reserver for ExclusiveReserver {
    fn reserve_file(&self, path: &Path) -> io::Result<bool> {
        match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn reserve_dir(&self, path: &Path, mode_source: &Path) -> io::Result<bool> {
        match create_dir_like(path, mode_source) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e),
        }
    }
}
