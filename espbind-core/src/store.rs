//! Plugin document persistence
//!
//! File-granularity load/save of [`PluginFile`] documents. Documents are
//! JSON; the binary plugin codec is an external tool's concern. Persistence
//! is always an explicit call — nothing in this crate saves implicitly.

use std::path::Path;

use crate::error::{BindError, Result};
use crate::types::PluginFile;

/// Load a plugin document from disk.
pub fn load_plugin(path: &Path) -> Result<PluginFile> {
    if !path.exists() {
        return Err(BindError::config_with(
            format!("Plugin document not found: {}", path.display()),
            None,
            &[
                "Check the --plugin path is correct",
                "Use 'espbind init' to set a default plugin path in espbind.json",
            ],
        ));
    }
    let content = std::fs::read_to_string(path)?;
    let plugin: PluginFile = serde_json::from_str(&content)?;
    tracing::debug!(
        "Loaded plugin {} ({} records, {} quests)",
        plugin.name,
        plugin.records.len(),
        plugin.quests.len()
    );
    Ok(plugin)
}

/// Save a plugin document to disk, overwriting any existing file.
pub fn save_plugin(plugin: &PluginFile, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(plugin)?;
    std::fs::write(path, content)?;
    tracing::debug!("Saved plugin {} to {}", plugin.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quest, Record, TypeFamily};

    #[test]
    fn test_load_missing_plugin_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_plugin(&dir.path().join("nope.esp.json")).unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_quests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mod.esp.json");

        let mut plugin = PluginFile::new("MyMod.esp");
        plugin.masters.push("Skyrim.esm".to_string());
        plugin.records.push(Record {
            editor_id: "MyKeyword".to_string(),
            id: 0x801,
            family: TypeFamily::Keyword,
        });
        plugin.quests.push(Quest::new("MQ01", 0x800));
        save_plugin(&plugin, &path).unwrap();

        let loaded = load_plugin(&path).unwrap();
        assert_eq!(loaded.name, "MyMod.esp");
        assert_eq!(loaded.masters, vec!["Skyrim.esm".to_string()]);
        assert!(loaded.quest("MQ01").is_some());
        assert!(loaded.quest("mq01").is_none(), "quest lookup is exact-match");
    }
}
