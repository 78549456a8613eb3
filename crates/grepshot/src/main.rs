//! grepshot - OCR every screenshot in a folder into one JSON file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use grepshot::config::{load_config, validate_config, Config};
use grepshot::logging::init_logging;
use grepshot::pipeline::{LogProgress, Pipeline, PipelineConfig};
use grepshot::processor::TesseractEngine;

/// Extract text from screenshots and images with Tesseract OCR
#[derive(Parser, Debug)]
#[command(
    name = "grepshot",
    version,
    about = "Extract text from screenshots and images with Tesseract OCR",
    after_help = "EXAMPLES:\n    \
        grepshot\n    \
        grepshot -d ~/Pictures/Screenshots -o shots.json -w 4\n    \
        grepshot --config grepshot.json --lang eng --lang deu"
)]
struct CliArgs {
    /// JSON config file (flags below override its values)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to scan recursively for images
    #[arg(short = 'd', long, value_name = "DIR")]
    directory: Option<String>,

    /// Output JSON file mapping image paths to extracted text
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Also write a JSON file mapping failed image paths to their errors
    #[arg(long, value_name = "FILE")]
    failures: Option<String>,

    /// Number of OCR worker threads (defaults to the CPU count)
    #[arg(short = 'w', long, value_name = "NUM")]
    workers: Option<usize>,

    /// Tesseract language (can be repeated)
    #[arg(short = 'l', long = "lang", value_name = "LANG", action = clap::ArgAction::Append)]
    languages: Vec<String>,

    /// Directory containing Tesseract's tessdata files
    #[arg(long, value_name = "DIR")]
    tessdata: Option<String>,

    /// Image extension to include (can be repeated, replaces the defaults)
    #[arg(long = "ext", value_name = "EXT", action = clap::ArgAction::Append)]
    extensions: Vec<String>,

    /// Directory for run log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// Verbose output (per-worker debug logging)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl CliArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(directory) = &self.directory {
            config.input_directory = directory.clone();
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(failures) = &self.failures {
            config.failures_file = Some(failures.clone());
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if !self.languages.is_empty() {
            config.ocr.languages = self.languages.clone();
        }
        if let Some(tessdata) = &self.tessdata {
            config.ocr.data_path = Some(tessdata.clone());
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_directory = log_dir.clone();
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    validate_config(&config).context("Invalid configuration")?;

    // Closed when dropped at the end of the run, after persistence.
    let log_session =
        init_logging(&config.log_path(), args.verbose).context("Failed to set up logging")?;

    info!("Starting grepshot v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after the images in progress...");
        shutdown_flag.store(true, Ordering::Relaxed);
    })
    .context("Failed to install Ctrl-C handler")?;

    let engine = TesseractEngine::new(&config.ocr.languages, config.ocr.data_path.clone())
        .context("Failed to start the OCR engine")?;
    info!("Using Tesseract with languages: {}", engine.languages());

    let pipeline =
        Pipeline::with_shutdown(PipelineConfig::from_config(&config), engine, shutdown);
    let summary = pipeline.run(&LogProgress::new())?;

    info!(
        "Found {} image files in {}",
        summary.discovered,
        pipeline.config().input_directory.display()
    );
    info!(
        "Successfully extracted text from {} images ({} failed)",
        summary.succeeded,
        summary.failures.len()
    );
    info!("Log written to {}", log_session.path().display());

    drop(log_session);
    Ok(())
}
