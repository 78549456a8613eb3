use std::io::Cursor;
use std::path::Path;

use crate::error::OcrError;
use crate::processor::{language_spec, OcrEngine, OcrSession};

/// Tesseract-backed engine. Each worker gets its own `LepTess` handle.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    languages: String,
    data_path: Option<String>,
}

impl TesseractEngine {
    /// Builds the engine and checks once that Tesseract can be initialized
    /// with the requested languages.
    pub fn new(languages: &[String], data_path: Option<String>) -> Result<Self, OcrError> {
        let engine = Self {
            languages: language_spec(languages),
            data_path,
        };

        engine
            .acquire()
            .map_err(|e| OcrError::Unavailable(e.to_string()))?;

        Ok(engine)
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

impl OcrEngine for TesseractEngine {
    type Session = TesseractSession;

    fn acquire(&self) -> Result<TesseractSession, OcrError> {
        let lt = leptess::LepTess::new(self.data_path.as_deref(), &self.languages).map_err(|e| {
            OcrError::CapabilityInit(format!("Failed to initialize Tesseract: {}", e))
        })?;

        Ok(TesseractSession { lt })
    }
}

pub struct TesseractSession {
    lt: leptess::LepTess,
}

impl OcrSession for TesseractSession {
    fn recognize(&mut self, path: &Path) -> Result<String, OcrError> {
        let _span = tracing::info_span!("processor.ocr", path = %path.display()).entered();

        let load_error = |reason: String| OcrError::LoadImage {
            path: path.to_path_buf(),
            reason,
        };

        let image_data =
            std::fs::read(path).map_err(|e| load_error(format!("Failed to read file: {}", e)))?;

        // Normalize to PNG so Leptonica sees one format regardless of input.
        let img = image::load_from_memory(&image_data)
            .map_err(|e| load_error(format!("Failed to decode image: {}", e)))?;

        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| load_error(format!("Failed to convert image: {}", e)))?;

        self.lt
            .set_image_from_mem(&png_data)
            .map_err(|e| load_error(format!("Failed to set image for OCR: {}", e)))?;

        self.lt
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
