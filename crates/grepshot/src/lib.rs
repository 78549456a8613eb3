//! Batch OCR over image folders.
//!
//! A run scans a directory tree for images, fans them out to a pool of OCR
//! workers, collects the recognized text per file and writes it to a single
//! JSON file.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod storage;
pub mod worker;

pub use config::{load_config, Config};
pub use error::{
    ConfigError, DiscoveryError, GrepshotError, OcrError, PersistenceError, Result, WorkerError,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RunSummary};
pub use processor::{OcrEngine, OcrSession, TesseractEngine};
