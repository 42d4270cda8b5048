//! Run configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. stock defaults ([`ResizeConfig::default`])
//! 2. an optional TOML file passed with `--config`
//! 3. command-line flags ([`Overrides`])
//!
//! The result is validated once and then applied uniformly to every image in
//! the run. A configuration error is the only fatal error: nothing is touched
//! on disk before it is resolved.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # steps = 4              # number of variants (takes priority over min_width)
//! # min_width = 300        # derive steps so the smallest variant is about this wide
//! quality = 80             # lossy encoding quality (1-100)
//! strip_metadata = false   # drop color profiles from the output
//! output_extension = ".webp"
//! output_dir = "processed" # created inside every processed directory
//! # ignore_dir = "processed"  # extra directory name skipped when recursing
//! input_extensions = [".webp", ".png", ".jpg", ".jpeg"]
//! recursive = false
//! clear_output = false     # purge output folders left by earlier runs
//! srcset = false           # print srcset descriptors to stdout
//! naming = "probe"         # or "exclusive" to claim names atomically
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EncodeOptions, OutputFormat, Quality, ResizePlan, StepPolicy};
use crate::reserve::NamingStrategy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Variant count when neither `steps` nor `min_width` is configured.
pub const DEFAULT_STEPS: u32 = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Immutable per-run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Number of variants per image. Wins over `min_width` when both are set.
    pub steps: Option<u32>,
    /// Smallest desired variant width; steps become `round(width / min_width)`.
    pub min_width: Option<u32>,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Drop embedded color profiles from the output.
    pub strip_metadata: bool,
    /// Output file extension, which also selects the encoder.
    pub output_extension: String,
    /// Name of the output folder created inside each processed directory.
    pub output_dir: String,
    /// Additional directory name pruned when recursing.
    pub ignore_dir: Option<String>,
    /// Source extensions to pick up, matched case-insensitively.
    pub input_extensions: Vec<String>,
    /// Descend into subdirectories of directory roots.
    pub recursive: bool,
    /// Purge output folders that predate this run.
    pub clear_output: bool,
    /// Print a srcset descriptor line per processed image.
    pub srcset: bool,
    /// How output names are claimed.
    pub naming: NamingStrategy,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            steps: None,
            min_width: None,
            quality: Quality::default().value(),
            strip_metadata: false,
            output_extension: ".webp".to_string(),
            output_dir: "processed".to_string(),
            ignore_dir: None,
            input_extensions: [".webp", ".png", ".jpg", ".jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recursive: false,
            clear_output: false,
            srcset: false,
            naming: NamingStrategy::default(),
        }
    }
}

fn validate_dir_name(key: &str, name: &str) -> Result<(), ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{key} must be a plain directory name, got {name:?}"
        )));
    }
    Ok(())
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.steps == Some(0) {
            return Err(ConfigError::Validation("steps must be at least 1".into()));
        }
        if self.min_width == Some(0) {
            return Err(ConfigError::Validation(
                "min_width must be at least 1".into(),
            ));
        }
        validate_dir_name("output_dir", &self.output_dir)?;
        if let Some(ignore) = &self.ignore_dir {
            validate_dir_name("ignore_dir", ignore)?;
        }
        self.output_format()?;
        if self.input_extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::Validation(
                "input_extensions must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Encoder selected by `output_extension`.
    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        OutputFormat::from_extension(&self.output_extension).ok_or_else(|| {
            ConfigError::Validation(format!(
                "unsupported output_extension {:?} (expected .webp, .jpg, .jpeg, .png or .avif)",
                self.output_extension
            ))
        })
    }

    /// Output extension as written into file names: lowercase, leading dot.
    pub fn extension(&self) -> String {
        format!(
            ".{}",
            self.output_extension
                .trim()
                .trim_start_matches('.')
                .to_ascii_lowercase()
        )
    }

    pub fn step_policy(&self) -> StepPolicy {
        match (self.steps, self.min_width) {
            (Some(steps), _) => StepPolicy::Fixed(steps),
            (None, Some(min)) => StepPolicy::MinWidth(min),
            (None, None) => StepPolicy::Fixed(DEFAULT_STEPS),
        }
    }

    /// Directory names pruned when recursing: the output folder and the
    /// ignore directory, if different.
    pub fn ignore_dirs(&self) -> Vec<&str> {
        let mut dirs = vec![self.output_dir.as_str()];
        if let Some(ignore) = self.ignore_dir.as_deref()
            && ignore != self.output_dir
        {
            dirs.push(ignore);
        }
        dirs
    }

    /// Resolve the pipeline plan. Fails on an unknown output extension.
    pub fn plan(&self) -> Result<ResizePlan, ConfigError> {
        Ok(ResizePlan {
            steps: self.step_policy(),
            options: EncodeOptions {
                format: self.output_format()?,
                quality: Quality::new(self.quality),
                strip_metadata: self.strip_metadata,
            },
        })
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.steps.is_some() {
            self.steps = overrides.steps;
        }
        if overrides.min_width.is_some() {
            self.min_width = overrides.min_width;
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(ext) = overrides.output_extension {
            self.output_extension = ext;
        }
        if overrides.ignore_dir.is_some() {
            self.ignore_dir = overrides.ignore_dir;
        }
        self.recursive |= overrides.recursive;
        self.clear_output |= overrides.clear_output;
        self.strip_metadata |= overrides.strip_metadata;
        self.srcset |= overrides.srcset;
        if overrides.exclusive_names {
            self.naming = NamingStrategy::Exclusive;
        }
        self
    }
}

/// Values given on the command line. `None` / `false` leave the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub steps: Option<u32>,
    pub min_width: Option<u32>,
    pub quality: Option<u32>,
    pub output_dir: Option<String>,
    pub output_extension: Option<String>,
    pub ignore_dir: Option<String>,
    pub recursive: bool,
    pub clear_output: bool,
    pub strip_metadata: bool,
    pub srcset: bool,
    pub exclusive_names: bool,
}

/// Parse a TOML config string (sparse: unset keys keep their defaults).
pub fn parse_config(content: &str) -> Result<ResizeConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load the file layer. `None` yields the stock defaults.
///
/// Validation is left to the caller so command-line overrides can fix a
/// value the file got wrong.
pub fn load_config(path: Option<&Path>) -> Result<ResizeConfig, ConfigError> {
    match path {
        Some(path) => parse_config(&fs::read_to_string(path)?),
        None => Ok(ResizeConfig::default()),
    }
}

/// Resolve the final configuration from all layers and validate it.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<ResizeConfig, ConfigError> {
    let config = load_config(path)?.with_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// A documented config file with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# optimg configuration
# All options are optional; the values below are the defaults.

# Number of variants per image. Variant i of S is scaled to i/S.
# Takes priority over min_width. Defaults to 4 when neither is set.
# steps = 4

# Derive the number of steps per image as round(width / min_width).
# min_width = 300

# Lossy encoding quality (1-100). Ignored for .png output.
quality = 80

# Drop embedded color profiles from the output.
strip_metadata = false

# Output format, chosen by extension: .webp, .jpg, .jpeg, .png or .avif
output_extension = ".webp"

# Folder created inside every processed directory.
output_dir = "processed"

# Additional directory name to skip when recursing.
# The output folder is always skipped.
# ignore_dir = "processed"

# Source files to pick up (case-insensitive).
input_extensions = [".webp", ".png", ".jpg", ".jpeg"]

# Descend into subdirectories.
recursive = false

# Purge output folders left over from earlier runs before writing.
clear_output = false

# Print a srcset descriptor line per processed image to stdout.
srcset = false

# How output names are claimed: "probe" checks then writes,
# "exclusive" creates each file atomically.
naming = "probe"
"#
}
