//! Default configuration for CoreDesk.

use std::path::Path;

use crate::error::CoreDeskError;
use crate::models::{CoreDeskConfiguration, Sector, SlaPolicy};

/// Name of the configuration file looked up in the working directory.
pub const CONFIGURATION_FILE_NAME: &str = ".coredesk.yml";

fn sector(id: &str, name: &str, color: &str) -> Sector {
    Sector {
        id: id.to_string(),
        name: name.to_string(),
        color: Some(color.to_string()),
    }
}

/// Return the default configuration.
pub fn default_configuration() -> CoreDeskConfiguration {
    CoreDeskConfiguration {
        sla: SlaPolicy::default(),
        sectors: vec![
            sector("suporte-n1", "Suporte N1", "blue"),
            sector("suporte-n2", "Suporte N2", "cyan"),
            sector("suporte-n3", "Suporte N3", "magenta"),
            sector("desenvolvimento", "Desenvolvimento", "yellow"),
            sector("financeiro", "Financeiro", "green"),
        ],
        tickets_path: None,
    }
}

/// Write the default configuration to disk.
///
/// # Arguments
///
/// * `path` - Path to the .coredesk.yml file.
///
/// # Errors
///
/// Returns `CoreDeskError::Io` if writing fails.
pub fn write_default_configuration(path: &Path) -> Result<(), CoreDeskError> {
    let configuration = default_configuration();
    let contents = serde_yaml::to_string(&configuration)
        .map_err(|error| CoreDeskError::Io(error.to_string()))?;
    std::fs::write(path, contents).map_err(|error| CoreDeskError::Io(error.to_string()))
}
