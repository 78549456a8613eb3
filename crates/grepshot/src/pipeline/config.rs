use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_directory: PathBuf,
    pub output_file: PathBuf,
    pub failures_file: Option<PathBuf>,
    pub worker_count: usize,
    pub extensions: Vec<String>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            input_directory: config.input_path(),
            output_file: config.output_path(),
            failures_file: config.failures_path(),
            worker_count: config.worker_count,
            extensions: config.extensions.clone(),
        }
    }
}
