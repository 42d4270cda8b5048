use clap::Parser;
use optimg::config::{self, Overrides};
use optimg::imaging::RustBackend;
use optimg::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let hash = env!("OPTIMG_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "optimg")]
#[command(about = "Resize images into width-tagged variants for responsive web pages")]
#[command(long_about = "\
Resize images into width-tagged variants for responsive web pages

Every input image is written as a ladder of smaller copies into an output
folder next to it. With 4 steps, a 1000px photo becomes:

  photos/
  ├── cat.jpg
  └── processed/
      ├── cat1000w.webp
      ├── cat750w.webp
      ├── cat500w.webp
      └── cat250w.webp

Existing files are never overwritten: a taken name gets a numeric suffix
(cat1000w1.webp). Use --clear to start each output folder from scratch.

Run with --srcset to print a srcset descriptor per image on stdout.
Run 'optimg --print-config' for a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "INPUT", required_unless_present = "print_config")]
    inputs: Vec<PathBuf>,

    /// Number of variants per image (default 4; takes priority over --min-width)
    #[arg(short = 's', long)]
    steps: Option<u32>,

    /// Derive the step count so the smallest variant is about this wide
    #[arg(short = 'm', long, value_name = "PX")]
    min_width: Option<u32>,

    /// Lossy encoding quality, 1-100 [default: 80]
    #[arg(short = 'q', long)]
    quality: Option<u32>,

    /// Name of the output folder created in each directory [default: processed]
    #[arg(short = 'o', long, value_name = "NAME")]
    output: Option<String>,

    /// Output file extension: .webp, .jpg, .jpeg, .png or .avif [default: .webp]
    #[arg(short = 't', long = "type", value_name = "EXT")]
    output_type: Option<String>,

    /// Additional directory name to skip when recursing
    #[arg(short = 'i', long, value_name = "NAME")]
    ignore: Option<String>,

    /// Descend into subdirectories
    #[arg(short = 'r', long)]
    recurse: bool,

    /// Purge output folders left by earlier runs
    #[arg(short = 'c', long)]
    clear: bool,

    /// Drop embedded color profiles from the output
    #[arg(long)]
    strip: bool,

    /// Print a srcset descriptor line per image to stdout
    #[arg(long)]
    srcset: bool,

    /// Claim output names with exclusive file creation
    #[arg(long)]
    exclusive_names: bool,

    /// TOML config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the files that would be processed, then exit
    #[arg(long)]
    dry_run: bool,

    /// Print a stock config file with all options documented
    #[arg(long)]
    print_config: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            steps: self.steps,
            min_width: self.min_width,
            quality: self.quality,
            output_dir: self.output.clone(),
            output_extension: self.output_type.clone(),
            ignore_dir: self.ignore.clone(),
            recursive: self.recurse,
            clear_output: self.clear,
            strip_metadata: self.strip,
            srcset: self.srcset,
            exclusive_names: self.exclusive_names,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    optimg::init_tracing(cli.verbose);

    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    let config = match config::resolve_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    tracing::debug!("resolved config: {:?}", config);

    if cli.dry_run {
        output::print_dry_run(&process::plan(&config, &cli.inputs));
        return ExitCode::SUCCESS;
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });

    let result = process::process(&RustBackend::new(), &config, &cli.inputs, Some(tx));
    if printer.join().is_err() {
        tracing::warn!("progress printer panicked");
    }

    match result {
        Ok(report) => {
            output::print_summary(&report.summary);
            if report.summary.all_roots_missing() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
