//! Shared test utilities for grepshot integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against a temp directory tree
//! - `ScriptedEngine`, a fake OCR engine with per-file answers

pub mod fake_ocr;
pub mod harness;

pub use fake_ocr::ScriptedEngine;
pub use harness::TestHarness;
