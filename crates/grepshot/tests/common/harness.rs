//! Test harness for isolated pipeline runs.
//!
//! Each `TestHarness` owns a temporary directory with a `shots/` input tree
//! and an output path next to it.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use grepshot::pipeline::{NoopProgress, Pipeline, PipelineConfig, PipelineError, RunSummary};
use grepshot::storage::read_results;
use grepshot::OcrEngine;

use super::ScriptedEngine;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Root directory scanned by the pipeline.
    pub root: PathBuf,
    /// Destination of the JSON record.
    pub output: PathBuf,
    /// Directories whose permissions must be restored before cleanup.
    locked: Vec<PathBuf>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("shots");
        std::fs::create_dir_all(&root).expect("Failed to create input dir");
        let output = temp_dir.path().join("grepshot_data.json");

        Self {
            temp_dir,
            root,
            output,
            locked: Vec::new(),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a file below the root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Output key for a file below the root.
    pub fn key(&self, relative: &str) -> String {
        self.root.join(relative).to_string_lossy().to_string()
    }

    pub fn config(&self, worker_count: usize) -> PipelineConfig {
        PipelineConfig {
            input_directory: self.root.clone(),
            output_file: self.output.clone(),
            failures_file: None,
            worker_count,
            extensions: grepshot::config::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    pub fn run<E: OcrEngine>(
        &self,
        engine: E,
        worker_count: usize,
    ) -> Result<RunSummary, PipelineError> {
        Pipeline::new(self.config(worker_count), engine).run(&NoopProgress)
    }

    pub fn run_scripted(
        &self,
        engine: &ScriptedEngine,
        worker_count: usize,
    ) -> Result<RunSummary, PipelineError> {
        self.run(engine, worker_count)
    }

    pub fn read_output(&self) -> std::collections::HashMap<String, String> {
        read_results(&self.output).expect("Failed to read output")
    }

    /// Makes a directory unreadable. Returns false when permissions are not
    /// enforced (running as root), in which case the directory stays readable.
    #[cfg(unix)]
    pub fn lock_dir(&mut self, relative: &str) -> bool {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.join(relative);
        std::fs::create_dir_all(&path).expect("Failed to create locked dir");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000))
            .expect("Failed to lock dir");
        self.locked.push(path.clone());

        std::fs::read_dir(&path).is_err()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            for path in &self.locked {
                let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755));
            }
        }
    }
}
