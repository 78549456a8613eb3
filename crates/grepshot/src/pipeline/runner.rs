use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, info_span, warn};

use crate::processor::OcrEngine;
use crate::storage;
use crate::worker::job::FailedFile;
use crate::worker::{DirectoryScanner, WorkerPool};

use super::aggregator::ResultAggregator;
use super::config::PipelineConfig;
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter};

/// Counters handed to the caller once a run has been persisted.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub discovered: usize,
    pub succeeded: usize,
    pub failures: Vec<FailedFile>,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Discover → OCR → aggregate → persist, for one root directory.
pub struct Pipeline<E: OcrEngine> {
    config: PipelineConfig,
    scanner: DirectoryScanner,
    pool: WorkerPool<E>,
}

impl<E: OcrEngine> Pipeline<E> {
    pub fn new(config: PipelineConfig, engine: E) -> Self {
        Self::with_shutdown(config, engine, Arc::new(AtomicBool::new(false)))
    }

    /// Like [`new`](Self::new), stopping early once `shutdown` is set.
    pub fn with_shutdown(config: PipelineConfig, engine: E, shutdown: Arc<AtomicBool>) -> Self {
        let scanner =
            DirectoryScanner::with_extensions(&config.input_directory, &config.extensions);
        let pool = WorkerPool::with_shutdown(engine, config.worker_count, shutdown);

        Self {
            config,
            scanner,
            pool,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, progress: &dyn ProgressReporter) -> Result<RunSummary, PipelineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let _span = info_span!("run", run_id = %run_id).entered();
        let started = Instant::now();

        info!(
            "Scanning {} for images",
            self.config.input_directory.display()
        );
        let candidates = self.scanner.scan()?;
        let discovered = candidates.len();
        progress.report(ProgressEvent::Discovered { count: discovered });

        let aggregator = ResultAggregator::new();
        let report = self.pool.run(candidates, &aggregator, progress)?;

        if report.cancelled {
            return Err(PipelineError::Cancelled {
                processed: report.processed,
                total: discovered,
            });
        }

        // A worker that died took its remaining images with it.
        if report.panicked_workers > 0 || report.processed != discovered {
            return Err(PipelineError::Incomplete {
                processed: report.processed,
                total: discovered,
                panicked_workers: report.panicked_workers,
            });
        }

        let snapshot = aggregator.into_snapshot();
        storage::write_results(&self.config.output_file, &snapshot)?;
        info!(
            "Image text data written to {}",
            self.config.output_file.display()
        );

        if let Some(failures_file) = &self.config.failures_file {
            // The main record is already in place; a failed side report is not fatal.
            match storage::write_failures(failures_file, &report.failures) {
                Ok(()) => info!("Failure report written to {}", failures_file.display()),
                Err(e) => warn!("Could not write failure report: {}", e),
            }
        }

        let summary = RunSummary {
            run_id,
            discovered,
            succeeded: snapshot.len(),
            failures: report.failures,
            output_path: self.config.output_file.clone(),
            elapsed: started.elapsed(),
        };

        progress.report(ProgressEvent::Finished {
            summary: summary.clone(),
        });

        Ok(summary)
    }
}
