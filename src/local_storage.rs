//! Key-value store standing in for the browser's `localStorage`.
//!
//! Values are strings, exactly as the browser stores them; structured
//! entries hold serialized JSON. The store is persisted as a single JSON
//! object so the CLI can remember the signed-in user and view preference
//! between invocations.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreDeskError;

/// Key holding the signed-in customer.
pub const CUSTOMER_KEY: &str = "coredesk_customer";
/// Key holding the signed-in staff user.
pub const USER_KEY: &str = "coredesk_user";
/// Key holding the dashboard view preference.
pub const VIEW_MODE_KEY: &str = "dashboard-view-mode";

/// Default location of the store, relative to the working directory.
pub const LOCAL_STORAGE_FILE: &str = ".coredesk/local_storage.json";

/// String key-value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalStorage {
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

/// Load `LocalStorage` from a JSON file.
///
/// Returns `Default::default()` if the file does not exist (not an error).
pub fn load_storage(path: &Path) -> Result<LocalStorage, CoreDeskError> {
    if !path.exists() {
        return Ok(LocalStorage::default());
    }
    let json = std::fs::read_to_string(path).map_err(|e| CoreDeskError::Io(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| CoreDeskError::Io(e.to_string()))
}

/// Persist `LocalStorage` to a JSON file.
///
/// Creates parent directories if they do not exist.
pub fn save_storage(path: &Path, storage: &LocalStorage) -> Result<(), CoreDeskError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CoreDeskError::Io(e.to_string()))?;
    }
    let json =
        serde_json::to_string_pretty(storage).map_err(|e| CoreDeskError::Io(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| CoreDeskError::Io(e.to_string()))
}

/// Dashboard layout preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Cards,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::List => "list",
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CoreDeskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cards" => Ok(ViewMode::Cards),
            "list" => Ok(ViewMode::List),
            other => Err(CoreDeskError::InvalidAction(format!(
                "unknown view mode '{other}'"
            ))),
        }
    }
}

/// Stored view preference; unknown values fall back to cards.
pub fn view_mode(storage: &LocalStorage) -> ViewMode {
    storage
        .get(VIEW_MODE_KEY)
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

pub fn set_view_mode(storage: &mut LocalStorage, mode: ViewMode) {
    storage.set(VIEW_MODE_KEY, mode.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_default_when_missing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("local_storage.json");
        let storage = load_storage(&path).unwrap();
        assert_eq!(storage, LocalStorage::default());
        assert_eq!(view_mode(&storage), ViewMode::Cards);
    }

    #[test]
    fn saves_and_loads_entries() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache").join("local_storage.json");
        let mut storage = LocalStorage::default();
        set_view_mode(&mut storage, ViewMode::List);
        storage.set(CUSTOMER_KEY, r#"{"username":"maria"}"#);
        save_storage(&path, &storage).unwrap();
        let loaded = load_storage(&path).unwrap();
        assert_eq!(loaded, storage);
        assert_eq!(view_mode(&loaded), ViewMode::List);
    }

    #[test]
    fn unknown_view_mode_falls_back_to_cards() {
        let mut storage = LocalStorage::default();
        storage.set(VIEW_MODE_KEY, "grid");
        assert_eq!(view_mode(&storage), ViewMode::Cards);
    }
}
