use std::path::{Path, PathBuf};

use crate::error::OcrError;

/// An image file selected for OCR by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePath {
    path: PathBuf,
    /// Lowercased extension without the leading dot.
    extension: String,
}

impl CandidatePath {
    /// Returns `None` for paths without a UTF-8 extension.
    pub fn new(path: PathBuf) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Some(Self { path, extension })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Key under which this file's text is stored in the output record.
    pub fn key(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Result of running OCR over a single candidate.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Success { path: PathBuf, text: String },
    Failure { path: PathBuf, cause: OcrError },
}

impl ExtractionOutcome {
    pub fn from_result(candidate: CandidatePath, result: Result<String, OcrError>) -> Self {
        let path = candidate.into_path();
        match result {
            Ok(text) => Self::Success { path, text },
            Err(cause) => Self::Failure { path, cause },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Success { path, .. } | Self::Failure { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A file whose OCR failed, kept for the run summary and failures report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

impl FailedFile {
    pub fn new(path: PathBuf, cause: &OcrError) -> Self {
        Self {
            path,
            error: cause.to_string(),
        }
    }
}
