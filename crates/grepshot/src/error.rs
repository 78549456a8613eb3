use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrepshotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] crate::logging::LoggingError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Fatal errors raised before any file is processed.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Root directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to access root directory '{path}': {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file and engine errors raised by an OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to initialize OCR session: {0}")]
    CapabilityInit(String),

    #[error("Failed to load image '{path}': {reason}")]
    LoadImage { path: PathBuf, reason: String },

    #[error("Text recognition failed for '{path}': {reason}")]
    Recognition { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("Work queue closed unexpectedly")]
    ChannelClosed,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode results: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode results from '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GrepshotError>;
