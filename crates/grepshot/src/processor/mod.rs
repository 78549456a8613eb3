//! OCR capability used by the worker pool.
//!
//! An [`OcrEngine`] is shared by all workers and hands out one
//! [`OcrSession`] per worker. Sessions are never shared between threads and
//! are released when dropped.

#[cfg(feature = "tesseract")]
pub mod ocr;

#[cfg(not(feature = "tesseract"))]
pub mod ocr_stub;

use std::path::Path;

use crate::error::OcrError;

#[cfg(feature = "tesseract")]
pub use ocr::{TesseractEngine, TesseractSession};

#[cfg(not(feature = "tesseract"))]
pub use ocr_stub::{TesseractEngine, TesseractSession};

/// A single OCR instance owned by one worker.
pub trait OcrSession {
    fn recognize(&mut self, path: &Path) -> Result<String, OcrError>;
}

/// Factory for per-worker OCR sessions.
pub trait OcrEngine: Send + Sync {
    type Session: OcrSession;

    /// Acquires a fresh session. Called on the worker thread that will use it.
    fn acquire(&self) -> Result<Self::Session, OcrError>;
}

/// Joins Tesseract language codes, falling back to English.
pub fn language_spec(languages: &[String]) -> String {
    if languages.is_empty() {
        "eng".to_string()
    } else {
        languages.join("+")
    }
}
