use std::path::Path;

use crate::config::schema::{Config, CONFIG_VERSION, MAX_WORKERS};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

/// Semantic checks that also apply to configs assembled from CLI overrides.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.worker_count == 0 || config.worker_count > MAX_WORKERS {
        return Err(ConfigError::Validation {
            message: format!(
                "worker_count must be between 1 and {}, got {}",
                MAX_WORKERS, config.worker_count
            ),
        });
    }

    if config.extensions.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one image extension is required".to_string(),
        });
    }

    for ext in &config.extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Validation {
                message: format!("Invalid extension '{}': use a bare name such as 'png'", ext),
            });
        }
    }

    if config.input_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "input_directory must not be empty".to_string(),
        });
    }

    if config.output_file.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "output_file must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "input_directory": "/input",
            "output_file": "/output/data.json",
            "worker_count": 4,
            "extensions": ["png", "jpg"],
            "ocr": { "languages": ["eng", "deu"] }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.input_directory, "/input");
        assert_eq!(config.output_file, "/output/data.json");
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.extensions, vec!["png", "jpg"]);
        assert_eq!(config.ocr.languages, vec!["eng", "deu"]);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();

        assert!(config.worker_count >= 1);
        assert_eq!(config.extensions.len(), 6);
        assert_eq!(config.output_file, "~/.grepshot_data.json");
        assert_eq!(config.log_directory, "logs");
        assert!(config.failures_file.is_none());
    }

    #[test]
    fn test_invalid_version() {
        let result = load_config_from_str(r#"{ "version": "2.0" }"#);

        match result {
            Err(ConfigError::Validation { message }) => {
                assert!(message.contains("Unsupported config version"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_workers_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "version": "1.0", "worker_count": 0 }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "version": "1.0", "output_directory": "/out" }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let result = load_config_from_str(r#"{ "version": "1.0", "extensions": [".png"] }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_validate_config_catches_cli_overrides() {
        let mut config = Config::default();
        config.worker_count = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));

        let mut config = Config::default();
        config.extensions = vec![".jpg".to_string()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));

        let mut config = Config::default();
        config.extensions.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = load_config_from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = load_config("/nonexistent/grepshot.json");
        match result {
            Err(ConfigError::ReadFile { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/grepshot.json"));
            }
            other => panic!("Expected ReadFile error, got {:?}", other),
        }
    }
}
