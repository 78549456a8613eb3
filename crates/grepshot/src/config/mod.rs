pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, validate_config};
pub use schema::{
    expand_home, worker_count_for, Config, OcrConfig, DEFAULT_EXTENSIONS, MAX_WORKERS,
};
