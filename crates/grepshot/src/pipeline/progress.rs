use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;

use super::runner::RunSummary;

/// Events emitted while a run is in progress.
/// Extracted text is omitted (can be large).
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Discovered {
        count: usize,
    },
    FileSucceeded {
        path: PathBuf,
        chars: usize,
    },
    FileFailed {
        path: PathBuf,
        error: String,
    },
    Finished {
        summary: RunSummary,
    },
}

/// Receives run events. Called concurrently from worker threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Logs a running `done/total` counter and the final summary.
#[derive(Default)]
pub struct LogProgress {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn tick(&self) -> (usize, usize) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        (done, self.total.load(Ordering::Relaxed))
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Discovered { count } => {
                self.total.store(count, Ordering::Relaxed);
                self.done.store(0, Ordering::Relaxed);
            }
            ProgressEvent::FileSucceeded { path, chars } => {
                let (done, total) = self.tick();
                info!("[{}/{}] {} ({} chars)", done, total, path.display(), chars);
            }
            ProgressEvent::FileFailed { path, error } => {
                let (done, total) = self.tick();
                info!("[{}/{}] {} failed: {}", done, total, path.display(), error);
            }
            ProgressEvent::Finished { summary } => {
                info!(
                    "Run {} finished in {:.2?}: {} of {} images yielded text, results in {}",
                    summary.run_id,
                    summary.elapsed,
                    summary.succeeded,
                    summary.discovered,
                    summary.output_path.display()
                );
            }
        }
    }
}
