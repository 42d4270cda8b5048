//! Output directory lifecycle.
//!
//! Each processed source directory gets one output subfolder
//! (`<base>/<output_dir_name>`). Before the first file of a directory is
//! written, [`ensure_output_dir`] decides what to do with that folder:
//!
//! | Folder | `clear` | Fresh this run | Action |
//! |---|---|---|---|
//! | absent | any | – | create with the base directory's mode |
//! | exists | no | any | reuse, new files merge in |
//! | exists | yes | no | remove recursively, recreate empty |
//! | exists | yes | yes | reuse |
//!
//! "Fresh" means this run already created or cleared the folder, or already
//! processed a file in the base directory. A run can reach the same base
//! directory more than once (explicit root plus recursive discovery), and
//! clearing must happen at most once, before the first write.

use crate::reserve::Reserver;
use crate::types::RunState;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputDirError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Output path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// What [`ensure_output_dir`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDirAction {
    Created,
    Cleared,
    Reused,
}

impl fmt::Display for OutputDirAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Cleared => "cleared",
            Self::Reused => "reused",
        })
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> OutputDirError + '_ {
    move |source| OutputDirError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Make sure `base_dir/output_dir_name` exists and is ready for writes.
///
/// Directories this call creates or clears are recorded in `state.prepared`.
pub fn ensure_output_dir(
    reserver: &dyn Reserver,
    base_dir: &Path,
    output_dir_name: &str,
    clear_requested: bool,
    state: &mut RunState,
) -> Result<OutputDirAction, OutputDirError> {
    let full = base_dir.join(output_dir_name);

    let existing = match fs::symlink_metadata(&full) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(io_err(&full)(e)),
    };

    let action = match existing {
        None => {
            if reserver.reserve_dir(&full, base_dir).map_err(io_err(&full))? {
                OutputDirAction::Created
            } else {
                // someone else created it between the stat and the mkdir
                OutputDirAction::Reused
            }
        }
        Some(meta) if !meta.is_dir() => return Err(OutputDirError::NotADirectory(full)),
        Some(_) if !clear_requested => OutputDirAction::Reused,
        Some(_) if state.is_fresh(base_dir, &full) => {
            tracing::debug!("{} written earlier this run, not clearing", full.display());
            OutputDirAction::Reused
        }
        Some(_) => {
            tracing::info!("clearing stale output directory {}", full.display());
            fs::remove_dir_all(&full).map_err(io_err(&full))?;
            reserver.reserve_dir(&full, base_dir).map_err(io_err(&full))?;
            OutputDirAction::Cleared
        }
    };

    if action != OutputDirAction::Reused {
        state.prepared.insert(full);
    }
    Ok(action)
}
