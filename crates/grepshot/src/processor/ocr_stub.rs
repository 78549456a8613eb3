//! Placeholder engine used when the "tesseract" feature is disabled.
//!
//! Keeps the public API identical so the binary builds without the native
//! Tesseract and Leptonica libraries; construction always fails.

use std::path::Path;

use crate::error::OcrError;
use crate::processor::{OcrEngine, OcrSession};

const NOT_ENABLED: &str = "grepshot was built without the `tesseract` feature";

#[derive(Debug, Clone)]
pub struct TesseractEngine {
    languages: String,
}

impl TesseractEngine {
    pub fn new(_languages: &[String], _data_path: Option<String>) -> Result<Self, OcrError> {
        Err(OcrError::Unavailable(NOT_ENABLED.to_string()))
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

impl OcrEngine for TesseractEngine {
    type Session = TesseractSession;

    fn acquire(&self) -> Result<TesseractSession, OcrError> {
        Err(OcrError::CapabilityInit(NOT_ENABLED.to_string()))
    }
}

pub struct TesseractSession;

impl OcrSession for TesseractSession {
    fn recognize(&mut self, _path: &Path) -> Result<String, OcrError> {
        Err(OcrError::Unavailable(NOT_ENABLED.to_string()))
    }
}
