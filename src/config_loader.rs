//! Configuration loading and validation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::{default_configuration, CONFIGURATION_FILE_NAME};
use crate::error::CoreDeskError;
use crate::models::{CoreDeskConfiguration, SlaPolicy};

/// Load the configuration from disk.
///
/// # Arguments
///
/// * `path` - Path to the configuration file.
///
/// # Errors
///
/// Returns `CoreDeskError::Configuration` if the configuration is invalid.
pub fn load_configuration(path: &Path) -> Result<CoreDeskConfiguration, CoreDeskError> {
    let contents = fs::read_to_string(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            CoreDeskError::Configuration("configuration file not found".to_string())
        } else {
            CoreDeskError::Io(error.to_string())
        }
    })?;

    let raw_value: Value = if contents.trim().is_empty() {
        Value::Mapping(Mapping::new())
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|error| CoreDeskError::Configuration(map_configuration_error(&error)))?
    };
    let merged_value = merge_with_defaults(raw_value)?;
    let configuration: CoreDeskConfiguration = serde_yaml::from_value(merged_value)
        .map_err(|error| CoreDeskError::Configuration(map_configuration_error(&error)))?;

    let errors = validate_configuration(&configuration);
    if !errors.is_empty() {
        return Err(CoreDeskError::Configuration(errors.join("; ")));
    }

    debug!(path = %path.display(), sectors = configuration.sectors.len(), "loaded configuration");
    Ok(configuration)
}

/// Load `.coredesk.yml` from a directory, falling back to defaults when absent.
///
/// # Errors
///
/// Returns `CoreDeskError` if the file exists but cannot be loaded.
pub fn load_configuration_or_default(root: &Path) -> Result<CoreDeskConfiguration, CoreDeskError> {
    let path = root.join(CONFIGURATION_FILE_NAME);
    if !path.exists() {
        debug!(root = %root.display(), "no configuration file, using defaults");
        return Ok(default_configuration());
    }
    load_configuration(&path)
}

/// Validate configuration rules beyond schema validation.
///
/// # Arguments
///
/// * `configuration` - Loaded configuration.
///
/// # Returns
///
/// A list of validation errors.
pub fn validate_configuration(configuration: &CoreDeskConfiguration) -> Vec<String> {
    let mut errors = Vec::new();

    if configuration.sla.urgent_limit_hours == 0 || configuration.sla.high_limit_hours == 0 {
        errors.push("sla limits must be positive".to_string());
    }

    let sla = &configuration.sla;
    if [sla.urgent_limit_hours, sla.high_limit_hours, sla.severe_after_hours]
        .iter()
        .any(|hours| *hours > SlaPolicy::MAX_HOURS)
    {
        errors.push(format!(
            "sla hours must not exceed {}",
            SlaPolicy::MAX_HOURS
        ));
    }

    if configuration.sla.urgent_limit_hours > configuration.sla.high_limit_hours {
        errors.push("urgent limit must not exceed high limit".to_string());
    }

    if configuration.sectors.is_empty() {
        errors.push("sectors must not be empty".to_string());
    }

    let mut seen = HashSet::new();
    for sector in &configuration.sectors {
        if sector.id.trim().is_empty() {
            errors.push("sector id must not be empty".to_string());
            break;
        }
        if sector.id == "all" {
            errors.push("sector id 'all' is reserved".to_string());
            break;
        }
        if !seen.insert(sector.id.as_str()) {
            errors.push("duplicate sector id".to_string());
            break;
        }
    }

    errors
}

fn map_configuration_error(error: &serde_yaml::Error) -> String {
    let message = error.to_string();
    if message.contains("unknown field") {
        return "unknown configuration fields".to_string();
    }
    message
}

fn merge_with_defaults(value: Value) -> Result<Value, CoreDeskError> {
    let mut defaults = serde_yaml::to_value(default_configuration())
        .map_err(|error| CoreDeskError::Io(error.to_string()))?;
    let overrides = match value {
        Value::Null => Mapping::new(),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(CoreDeskError::Configuration(
                "configuration must be a mapping".to_string(),
            ))
        }
    };

    if let Value::Mapping(ref mut default_map) = defaults {
        for (key, value) in overrides {
            default_map.insert(key, value);
        }
    }
    Ok(defaults)
}
