//! Batch orchestration.
//!
//! Drives a run over every input root: discovers files, prepares output
//! folders, runs the resize pipeline, names and writes the variants, and
//! builds srcset descriptors.
//!
//! ## Per root
//!
//! | Root | Handling |
//! |---|---|
//! | missing | reported, counted, next root |
//! | file, allowed extension | its directory's output folder is prepared, the file processed |
//! | file, other extension | reported as skipped |
//! | directory | processed as one directory |
//! | directory, recursive | it and every non-ignored subdirectory processed separately |
//!
//! ## Per directory
//!
//! ```text
//! photos/
//! ├── cat.jpg
//! ├── dog.png
//! └── processed/               # output folder, prepared once per run
//!     ├── cat1000w.webp
//!     ├── cat750w.webp
//!     ├── ...
//!     └── dog250w.webp
//! ```
//!
//! A directory without matching images gets no output folder. If the output
//! folder cannot be prepared, that directory is skipped. Every file goes
//! through the pipeline at most once per run, keyed by its canonical path, so
//! overlapping roots do not produce duplicates.
//!
//! ## Failures
//!
//! Only an invalid configuration stops a run. Everything else is reported as
//! a [`ProcessEvent::Failed`] for the file or directory concerned, counted in
//! the [`RunSummary`], and the run moves on.
//!
//! Progress is reported through an optional [`mpsc::Sender`]; the run itself
//! is sequential.

use crate::config::{ConfigError, ResizeConfig};
use crate::imaging::{CodecError, ImageCodec, ResizePlan, create_variants, encode_variants};
use crate::naming;
use crate::outdir::{OutputDirAction, OutputDirError, ensure_output_dir};
use crate::reserve::Reserver;
use crate::scan::{self, ScanError};
use crate::srcset::{self, SrcSetEntry};
use crate::types::RunState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    OutputDir(#[from] OutputDirError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No output name available in {dir}: {source}")]
    Name {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A variant file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenVariant {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Progress events emitted while a batch runs.
///
/// Sent through an optional channel so the caller can display progress as
/// files complete.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// An input root does not exist.
    RootMissing { root: PathBuf },
    /// A file root whose extension is not an input extension.
    Skipped { path: PathBuf },
    /// A directory with images is about to be processed.
    DirectoryStarted { dir: PathBuf, image_count: usize },
    /// An output folder was created or cleared.
    OutputPrepared {
        dir: PathBuf,
        action: OutputDirAction,
    },
    /// All variants of an image were written.
    ImageProcessed {
        source: PathBuf,
        variants: Vec<WrittenVariant>,
    },
    /// A file reached a second time in this run.
    AlreadyProcessed { source: PathBuf },
    /// A file, directory or root could not be handled.
    Failed { path: PathBuf, error: String },
    /// Srcset descriptor for a processed image.
    SrcSet { line: String },
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub roots: usize,
    pub missing_roots: usize,
    pub images_processed: usize,
    pub variants_written: usize,
    pub already_processed: usize,
    pub failures: usize,
}

impl RunSummary {
    /// True when roots were given and none of them exist.
    pub fn all_roots_missing(&self) -> bool {
        self.roots > 0 && self.missing_roots == self.roots
    }
}

/// Result of [`Batch::run`].
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    /// One entry per processed image, in processing order.
    pub srcsets: Vec<SrcSetEntry>,
}

/// One run over a list of roots. Holds the run state; nothing is global.
pub struct Batch<'a, C: ImageCodec> {
    codec: &'a C,
    config: &'a ResizeConfig,
    plan: ResizePlan,
    extension: String,
    reserver: Box<dyn Reserver>,
    events: Option<Sender<ProcessEvent>>,
    state: RunState,
    report: RunReport,
}

impl<'a, C: ImageCodec> Batch<'a, C> {
    /// Validate `config` and set up an empty run.
    pub fn new(
        codec: &'a C,
        config: &'a ResizeConfig,
        events: Option<Sender<ProcessEvent>>,
    ) -> Result<Self, ProcessError> {
        config.validate()?;
        Ok(Self {
            codec,
            config,
            plan: config.plan()?,
            extension: config.extension(),
            reserver: config.naming.reserver(),
            events,
            state: RunState::new(),
            report: RunReport::default(),
        })
    }

    /// Process every root in order and report what happened.
    pub fn run(mut self, roots: &[PathBuf]) -> RunReport {
        for root in roots {
            self.run_root(root);
        }
        tracing::debug!(
            "run finished: {} image(s) from {} root(s)",
            self.report.summary.images_processed,
            self.report.summary.roots
        );
        self.report
    }

    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }

    fn fail(&mut self, path: &Path, error: ProcessError) {
        tracing::debug!("{}: {:?}", path.display(), error);
        self.report.summary.failures += 1;
        self.emit(ProcessEvent::Failed {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn run_root(&mut self, root: &Path) {
        self.report.summary.roots += 1;
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("input path not found: {}", root.display());
                self.report.summary.missing_roots += 1;
                self.emit(ProcessEvent::RootMissing {
                    root: root.to_path_buf(),
                });
                return;
            }
            Err(source) => {
                let error = ScanError::Io {
                    path: root.to_path_buf(),
                    source,
                };
                self.fail(root, error.into());
                return;
            }
        };

        if !meta.is_dir() {
            if scan::has_allowed_extension(root, &self.config.input_extensions) {
                let dir = root.parent().unwrap_or(Path::new(""));
                if let Some(base) = self.prepare_output(dir) {
                    self.run_file(root, dir, &base);
                }
            } else {
                tracing::debug!("skipping {}: not an input extension", root.display());
                self.emit(ProcessEvent::Skipped {
                    path: root.to_path_buf(),
                });
            }
            return;
        }

        if !self.config.recursive {
            self.run_directory(root);
            return;
        }
        let config = self.config;
        match scan::collect_directories(root, &config.ignore_dirs()) {
            Ok(dirs) => {
                for dir in dirs {
                    self.run_directory(&dir);
                }
            }
            Err(e) => self.fail(root, e.into()),
        }
    }

    fn run_directory(&mut self, dir: &Path) {
        let images = match scan::list_images(dir, &self.config.input_extensions) {
            Ok(images) => images,
            Err(e) => {
                self.fail(dir, e.into());
                return;
            }
        };
        if images.is_empty() {
            tracing::debug!("no images in {}", dir.display());
            return;
        }

        self.emit(ProcessEvent::DirectoryStarted {
            dir: dir.to_path_buf(),
            image_count: images.len(),
        });
        let Some(base) = self.prepare_output(dir) else {
            return;
        };
        for image in &images {
            self.run_file(image, dir, &base);
        }
    }

    /// Prepare `dir`'s output folder. Returns the canonical form of `dir`,
    /// or `None` after reporting a failure.
    fn prepare_output(&mut self, dir: &Path) -> Option<PathBuf> {
        let out_dir = dir.join(&self.config.output_dir);
        let base = match canonical_dir(dir) {
            Ok(base) => base,
            Err(source) => {
                let error = OutputDirError::Io {
                    path: dir.to_path_buf(),
                    source,
                };
                self.fail(&out_dir, error.into());
                return None;
            }
        };

        match ensure_output_dir(
            self.reserver.as_ref(),
            &base,
            &self.config.output_dir,
            self.config.clear_output,
            &mut self.state,
        ) {
            Ok(OutputDirAction::Reused) => {
                tracing::debug!("reusing {}", out_dir.display());
                Some(base)
            }
            Ok(action) => {
                self.emit(ProcessEvent::OutputPrepared {
                    dir: out_dir,
                    action,
                });
                Some(base)
            }
            Err(e) => {
                self.fail(&out_dir, e.into());
                None
            }
        }
    }

    /// Process one file of `dir` (as given by the user), whose canonical
    /// form is `base`.
    fn run_file(&mut self, source: &Path, dir: &Path, base: &Path) {
        let Some(file_name) = source.file_name() else {
            return;
        };
        if !self.state.processed.insert(base.join(file_name)) {
            tracing::debug!("{} already processed this run", source.display());
            self.report.summary.already_processed += 1;
            self.emit(ProcessEvent::AlreadyProcessed {
                source: source.to_path_buf(),
            });
            return;
        }

        tracing::debug!("processing {}", source.display());
        match self.write_variants(source, dir) {
            Ok(entry) => {
                self.report.summary.images_processed += 1;
                tracing::info!(
                    "{}: {} variant(s) written",
                    source.display(),
                    entry.variants.len()
                );
                if self.config.srcset {
                    self.emit(ProcessEvent::SrcSet {
                        line: srcset::build(&entry.source, &entry.variants),
                    });
                }
                self.report.srcsets.push(entry);
            }
            Err(e) => self.fail(source, e),
        }
    }

    fn write_variants(&mut self, source: &Path, dir: &Path) -> Result<SrcSetEntry, ProcessError> {
        let variants = create_variants(self.codec, source, &self.plan)?;
        let encoded = encode_variants(self.codec, variants, &self.plan)?;

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out_dir = dir.join(&self.config.output_dir);
        let mut entry = SrcSetEntry::new(source);
        let mut written = Vec::with_capacity(encoded.len());

        for (variant, bytes) in encoded {
            let name = naming::resolve_name(
                self.reserver.as_ref(),
                &file_name,
                variant.width,
                &out_dir,
                &self.extension,
            )
            .map_err(|source| ProcessError::Name {
                dir: out_dir.clone(),
                source,
            })?;
            let path = out_dir.join(name);
            write_claimed(&path, &bytes)?;
            self.report.summary.variants_written += 1;

            entry.push(path.clone(), variant.width);
            written.push(WrittenVariant {
                path,
                width: variant.width,
                height: variant.height,
            });
        }

        self.emit(ProcessEvent::ImageProcessed {
            source: source.to_path_buf(),
            variants: written,
        });
        Ok(entry)
    }
}

/// Write a variant to a name claimed by the reserver. On failure the claimed
/// entry is removed so the name is free again for later runs.
fn write_claimed(path: &Path, bytes: &[u8]) -> Result<(), ProcessError> {
    fs::write(path, bytes).map_err(|source| {
        fs::remove_file(path).ok();
        ProcessError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn canonical_dir(dir: &Path) -> io::Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        fs::canonicalize(".")
    } else {
        fs::canonicalize(dir)
    }
}

/// Run a batch over `roots`. Fails only on an invalid configuration.
pub fn process<C: ImageCodec>(
    codec: &C,
    config: &ResizeConfig,
    roots: &[PathBuf],
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    Ok(Batch::new(codec, config, events)?.run(roots))
}

/// Files a run would consider for one root.
#[derive(Debug)]
pub struct PlannedRoot {
    pub root: PathBuf,
    pub files: Result<Vec<PathBuf>, ScanError>,
}

/// List the candidate files under each root without writing anything.
pub fn plan(config: &ResizeConfig, roots: &[PathBuf]) -> Vec<PlannedRoot> {
    let ignore = config.ignore_dirs();
    roots
        .iter()
        .map(|root| PlannedRoot {
            root: root.clone(),
            files: scan::collect(root, &config.input_extensions, config.recursive, &ignore),
        })
        .collect()
}
