//! Fake OCR engine for driving the pipeline without Tesseract.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use grepshot::{OcrEngine, OcrError, OcrSession};

/// Answers by file name: scripted text, scripted failure, or a default.
/// Records every path it is asked to recognize.
#[derive(Default)]
pub struct ScriptedEngine {
    answers: HashMap<String, Result<String, String>>,
    default_text: Option<String>,
    seen: Mutex<Vec<PathBuf>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files without a scripted answer succeed with `text`.
    pub fn with_default_text(mut self, text: &str) -> Self {
        self.default_text = Some(text.to_string());
        self
    }

    pub fn text(mut self, file_name: &str, text: &str) -> Self {
        self.answers
            .insert(file_name.to_string(), Ok(text.to_string()));
        self
    }

    pub fn fail(mut self, file_name: &str, reason: &str) -> Self {
        self.answers
            .insert(file_name.to_string(), Err(reason.to_string()));
        self
    }

    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

pub struct ScriptedSession<'a> {
    engine: &'a ScriptedEngine,
}

impl Drop for ScriptedSession<'_> {
    fn drop(&mut self) {
        self.engine.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl OcrSession for ScriptedSession<'_> {
    fn recognize(&mut self, path: &Path) -> Result<String, OcrError> {
        self.engine.seen.lock().unwrap().push(path.to_path_buf());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let answer = self
            .engine
            .answers
            .get(&name)
            .cloned()
            .or_else(|| self.engine.default_text.clone().map(Ok));

        match answer {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(OcrError::Recognition {
                path: path.to_path_buf(),
                reason,
            }),
            None => Err(OcrError::Recognition {
                path: path.to_path_buf(),
                reason: "no scripted answer".to_string(),
            }),
        }
    }
}

impl<'e> OcrEngine for &'e ScriptedEngine {
    type Session = ScriptedSession<'e>;

    fn acquire(&self) -> Result<ScriptedSession<'e>, OcrError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession { engine: *self })
    }
}
