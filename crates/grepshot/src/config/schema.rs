use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Image extensions picked up when the config does not list its own.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

pub const CONFIG_VERSION: &str = "1.0";

/// Upper bound on worker threads, matching the schema's `maximum`.
pub const MAX_WORKERS: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_input_directory")]
    pub input_directory: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Optional side report listing files whose OCR failed.
    #[serde(default)]
    pub failures_file: Option<String>,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default = "default_log_directory")]
    pub log_directory: String,
}

fn default_input_directory() -> String {
    dirs::picture_dir()
        .map(|p| p.join("Screenshots").to_string_lossy().to_string())
        .unwrap_or_else(|| "~/Pictures/Screenshots".to_string())
}

fn default_output_file() -> String {
    "~/.grepshot_data.json".to_string()
}

fn default_worker_count() -> usize {
    worker_count_for(num_cpus::get())
}

/// One worker per CPU, within `1..=MAX_WORKERS`.
pub fn worker_count_for(cpus: usize) -> usize {
    cpus.clamp(1, MAX_WORKERS)
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            input_directory: default_input_directory(),
            output_file: default_output_file(),
            failures_file: None,
            worker_count: default_worker_count(),
            extensions: default_extensions(),
            ocr: OcrConfig::default(),
            log_directory: default_log_directory(),
        }
    }
}

impl Config {
    pub fn input_path(&self) -> PathBuf {
        expand_home(&self.input_directory)
    }

    pub fn output_path(&self) -> PathBuf {
        expand_home(&self.output_file)
    }

    pub fn failures_path(&self) -> Option<PathBuf> {
        self.failures_file.as_deref().map(expand_home)
    }

    pub fn log_path(&self) -> PathBuf {
        expand_home(&self.log_directory)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Directory holding the `tessdata` language files. Tesseract's own
    /// lookup is used when unset.
    #[serde(default)]
    pub data_path: Option<String>,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            data_path: None,
        }
    }
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
