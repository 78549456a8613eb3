use thiserror::Error;

/// Errors that end a run. Per-file OCR failures never surface here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] crate::error::DiscoveryError),

    #[error("Worker pool failed: {0}")]
    Worker(#[from] crate::error::WorkerError),

    #[error("Failed to persist results: {0}")]
    Persistence(#[from] crate::error::PersistenceError),

    #[error("Run cancelled after {processed} of {total} images; results were not written")]
    Cancelled { processed: usize, total: usize },

    #[error(
        "Only {processed} of {total} images were processed ({panicked_workers} workers panicked); results were not written"
    )]
    Incomplete {
        processed: usize,
        total: usize,
        panicked_workers: usize,
    },
}
