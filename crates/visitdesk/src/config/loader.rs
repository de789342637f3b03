use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/visitdesk-config-v1.json");

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

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.queue.event_capacity == 0 {
        return Err(ConfigError::Validation {
            message: "queue.event_capacity must be greater than zero".to_string(),
        });
    }

    let catalog = &config.catalog;

    let mut seen = HashSet::new();
    for teacher in &catalog.teachers {
        if !seen.insert(teacher.id.as_str()) {
            return Err(ConfigError::InvalidCatalog {
                entry: teacher.id.clone(),
                reason: "duplicate teacher id".to_string(),
            });
        }
        if teacher.name.trim().is_empty() {
            return Err(ConfigError::InvalidCatalog {
                entry: teacher.id.clone(),
                reason: "teacher name is empty".to_string(),
            });
        }
    }

    if let Some(blank) = catalog.purposes.iter().find(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidCatalog {
            entry: blank.clone(),
            reason: "purpose is empty".to_string(),
        });
    }

    if !catalog.grades.contains(&catalog.class_required_grade) {
        return Err(ConfigError::InvalidCatalog {
            entry: catalog.class_required_grade.clone(),
            reason: "class-required grade is not one of the listed grades".to_string(),
        });
    }

    if catalog.class_numbers.is_empty() {
        return Err(ConfigError::InvalidCatalog {
            entry: "class_numbers".to_string(),
            reason: "at least one class number is needed for the class-required grade"
                .to_string(),
        });
    }

    Ok(())
}
