pub mod job;
pub mod pool;
pub mod scanner;

pub use job::{CandidatePath, ExtractionOutcome, FailedFile};
pub use pool::{DispatchReport, WorkerPool};
pub use scanner::DirectoryScanner;
