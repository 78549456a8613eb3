pub mod aggregator;
pub mod config;
pub mod error;
pub mod progress;
pub mod runner;

pub use aggregator::{ResultAggregator, ResultSnapshot};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{Pipeline, RunSummary};
