//! EspBind project configuration
//!
//! Defines the `espbind.json` manifest format used by the CLI to default
//! flags like the plugin document path and the script source directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "espbind.json";

/// The main project configuration file (espbind.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project name (used for display)
    pub name: String,

    /// Path to the plugin document being edited (default: "./mod.esp.json")
    #[serde(default = "default_plugin_path")]
    pub plugin: PathBuf,

    /// Directory containing Papyrus source files (default: "./scripts")
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,

    /// Game data folder containing the master files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_folder: Option<PathBuf>,
}

fn default_plugin_path() -> PathBuf {
    PathBuf::from("./mod.esp.json")
}

fn default_script_dir() -> PathBuf {
    PathBuf::from("./scripts")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "MyMod".to_string(),
            plugin: default_plugin_path(),
            script_dir: default_script_dir(),
            data_folder: None,
        }
    }
}

impl ProjectConfig {
    /// Load a config from the given directory, if `espbind.json` exists there.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let config: ProjectConfig = serde_json::from_str(&content)?;
        Ok(Some(config))
    }

    /// Write the config to the given directory as `espbind.json`.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::load_from_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            name: "FollowerMod".to_string(),
            data_folder: Some(PathBuf::from("/games/skyrim/Data")),
            ..Default::default()
        };
        config.save_to_dir(dir.path()).unwrap();

        let loaded = ProjectConfig::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.name, "FollowerMod");
        assert_eq!(loaded.script_dir, PathBuf::from("./scripts"));
        assert_eq!(loaded.data_folder, Some(PathBuf::from("/games/skyrim/Data")));
    }
}
