use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use log::{debug, error, info, warn};

use crate::error::{OcrError, WorkerError};
use crate::pipeline::aggregator::ResultAggregator;
use crate::pipeline::progress::{ProgressEvent, ProgressReporter};
use crate::processor::{OcrEngine, OcrSession};
use crate::worker::job::{CandidatePath, ExtractionOutcome, FailedFile};

/// What the workers did during one [`WorkerPool::run`].
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failures: Vec<FailedFile>,
    /// Set when the shutdown flag stopped workers before the queue drained.
    pub cancelled: bool,
    pub panicked_workers: usize,
}

impl DispatchReport {
    fn merge(&mut self, stats: DispatchReport) {
        self.processed += stats.processed;
        self.succeeded += stats.succeeded;
        self.failures.extend(stats.failures);
        self.cancelled |= stats.cancelled;
        self.panicked_workers += stats.panicked_workers;
    }
}

/// Fixed-size pool of OCR worker threads draining a pre-loaded queue.
pub struct WorkerPool<E: OcrEngine> {
    engine: E,
    worker_count: usize,
    shutdown: Arc<AtomicBool>,
}

impl<E: OcrEngine> WorkerPool<E> {
    /// A `worker_count` of zero is treated as one.
    pub fn new(engine: E, worker_count: usize) -> Self {
        Self::with_shutdown(engine, worker_count, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a pool whose workers stop dequeuing once `shutdown` is set.
    pub fn with_shutdown(engine: E, worker_count: usize, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            engine,
            worker_count: worker_count.max(1),
            shutdown,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn shutdown(&self) {
        info!("Shutting down worker pool...");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Runs OCR over every candidate and blocks until all workers have
    /// returned. Successful texts are recorded into `aggregator`.
    pub fn run(
        &self,
        candidates: Vec<CandidatePath>,
        aggregator: &ResultAggregator,
        progress: &dyn ProgressReporter,
    ) -> Result<DispatchReport, WorkerError> {
        let total = candidates.len();
        if total == 0 {
            debug!("No candidates, skipping worker startup");
            return Ok(DispatchReport::default());
        }

        let worker_count = self.worker_count.min(total);

        // Load everything up front, then drop the sender so workers see a
        // closed queue once it is drained.
        let (job_sender, job_receiver) = bounded::<CandidatePath>(total);
        for candidate in candidates {
            job_sender
                .send(candidate)
                .map_err(|_| WorkerError::ChannelClosed)?;
        }
        drop(job_sender);

        info!("Using {} workers for {} images", worker_count, total);

        let mut report = DispatchReport::default();

        thread::scope(|scope| -> Result<(), WorkerError> {
            let mut workers = Vec::with_capacity(worker_count);

            for worker_id in 0..worker_count {
                let job_rx = job_receiver.clone();
                let spawned = thread::Builder::new()
                    .name(format!("grepshot-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        run_worker(
                            worker_id,
                            job_rx,
                            &self.engine,
                            aggregator,
                            progress,
                            &self.shutdown,
                        )
                    });

                match spawned {
                    Ok(handle) => workers.push(handle),
                    Err(e) => {
                        // Running workers still drain the whole queue.
                        error!("Failed to spawn worker {}: {}", worker_id, e);
                        if worker_id == 0 {
                            return Err(WorkerError::SpawnFailed(e.to_string()));
                        }
                        break;
                    }
                }
            }

            for (i, worker) in workers.into_iter().enumerate() {
                match worker.join() {
                    Ok(stats) => {
                        debug!("Worker {} finished after {} images", i, stats.processed);
                        report.merge(stats);
                    }
                    Err(e) => {
                        error!("Worker {} panicked: {:?}", i, e);
                        report.panicked_workers += 1;
                    }
                }
            }

            Ok(())
        })?;

        info!(
            "All workers have stopped: {} processed, {} succeeded, {} failed",
            report.processed,
            report.succeeded,
            report.failures.len()
        );

        Ok(report)
    }
}

fn run_worker<E: OcrEngine>(
    worker_id: usize,
    job_receiver: Receiver<CandidatePath>,
    engine: &E,
    aggregator: &ResultAggregator,
    progress: &dyn ProgressReporter,
    shutdown: &AtomicBool,
) -> DispatchReport {
    debug!("Worker {} started", worker_id);

    // Dropped when the worker returns, whichever way the loop ends.
    let mut session = match acquire_session(engine) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Worker {}: {}; retrying per image", worker_id, e);
            None
        }
    };

    let mut stats = DispatchReport::default();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Worker {} received shutdown signal", worker_id);
            stats.cancelled = !job_receiver.is_empty();
            break;
        }

        let candidate = match job_receiver.recv() {
            Ok(candidate) => candidate,
            Err(_) => {
                debug!("Worker {} job queue drained", worker_id);
                break;
            }
        };

        debug!("Worker {} processing {}", worker_id, candidate.path().display());

        let key = candidate.key();
        let result = recognize(engine, &mut session, candidate.path());
        let outcome = ExtractionOutcome::from_result(candidate, result);
        stats.processed += 1;

        match outcome {
            ExtractionOutcome::Success { path, text } => {
                let chars = text.chars().count();
                info!(
                    "Worker {}: Extracted {} characters of text from {}",
                    worker_id,
                    chars,
                    path.display()
                );
                aggregator.record(key, text);
                stats.succeeded += 1;
                progress.report(ProgressEvent::FileSucceeded { path, chars });
            }
            ExtractionOutcome::Failure { path, cause } => {
                warn!("Worker {}: {}", worker_id, cause);
                let failed = FailedFile::new(path, &cause);
                progress.report(ProgressEvent::FileFailed {
                    path: failed.path.clone(),
                    error: failed.error.clone(),
                });
                stats.failures.push(failed);
            }
        }
    }

    debug!("Worker {} stopped", worker_id);
    stats
}

/// Acquires a session, treating a panic inside the engine as a failed
/// initialization.
fn acquire_session<E: OcrEngine>(engine: &E) -> Result<E::Session, OcrError> {
    match panic::catch_unwind(AssertUnwindSafe(|| engine.acquire())) {
        Ok(result) => result,
        Err(_) => Err(OcrError::CapabilityInit(
            "OCR engine panicked while starting a session".to_string(),
        )),
    }
}

/// Runs one recognition, acquiring a session first if the worker has none.
/// A panicking session is discarded and re-acquired for the next image.
fn recognize<E: OcrEngine>(
    engine: &E,
    slot: &mut Option<E::Session>,
    path: &Path,
) -> Result<String, OcrError> {
    let mut session = match slot.take() {
        Some(session) => session,
        None => acquire_session(engine)?,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| session.recognize(path))) {
        Ok(result) => {
            *slot = Some(session);
            result
        }
        Err(_) => Err(OcrError::Recognition {
            path: path.to_path_buf(),
            reason: "OCR engine panicked".to_string(),
        }),
    }
}
