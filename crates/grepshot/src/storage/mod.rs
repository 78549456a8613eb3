pub mod writer;

pub use writer::{read_results, write_failures, write_json_atomic, write_results};
