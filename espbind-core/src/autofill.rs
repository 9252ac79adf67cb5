//! Single-script auto-fill orchestration
//!
//! Extracts property declarations from a script's Papyrus source, resolves
//! each object-typed one against the load-order index, and binds the hits.
//! A miss on one property never aborts the run; every declaration lands in
//! exactly one of the Filled/Skipped/NotFound buckets and the categorized
//! outcome is the deliverable.

use std::path::Path;

use crate::error::{BindError, Result};
use crate::extract::extract_from_file;
use crate::index::{IndexCache, RecordIndex};
use crate::properties::{find_alias_script_mut, find_quest_script_mut};
use crate::resolve::{is_primitive, resolve, Resolution};
use crate::types::{PluginFile, PropertyValue, ScriptEntry, ScriptProperty};

/// Categorized result of one auto-fill run.
#[derive(Debug, Clone, Default)]
pub struct AutoFillOutcome {
    pub script_name: String,
    pub total: usize,
    pub filled: Vec<String>,
    pub skipped: Vec<String>,
    pub not_found: Vec<String>,
}

impl AutoFillOutcome {
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found.len()
    }
}

/// Auto-fill a script's properties from its Papyrus source.
///
/// Declarations are processed in file order. A declaration is Skipped when a
/// binding of that name already exists, when its type is primitive, or when
/// its type has no family mapping; it is NotFound when resolution misses in
/// every candidate family. Array hits bind an `ObjectList` with a single
/// element: the one resolved address.
pub fn auto_fill_script(
    script: &mut ScriptEntry,
    source_path: &Path,
    index: &RecordIndex,
) -> Result<AutoFillOutcome> {
    let declarations = extract_from_file(source_path)?;
    tracing::debug!(
        "Found {} properties in {}",
        declarations.len(),
        source_path.display()
    );

    let mut outcome = AutoFillOutcome {
        script_name: script.name.clone(),
        total: declarations.len(),
        ..Default::default()
    };

    for decl in declarations {
        if script
            .properties
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&decl.name))
        {
            tracing::debug!("Property '{}' already exists, skipping", decl.name);
            outcome.skipped.push(decl.name);
            continue;
        }

        if is_primitive(&decl.type_name) {
            tracing::debug!("Property '{}' is primitive type, skipping", decl.name);
            outcome.skipped.push(decl.name);
            continue;
        }

        let form = match resolve(index, &decl.name, &decl.type_name) {
            Resolution::Unsupported => {
                tracing::warn!(
                    "Unknown Papyrus type '{}' for property '{}'",
                    decl.type_name,
                    decl.name
                );
                outcome.skipped.push(decl.name);
                continue;
            }
            Resolution::NotFound => {
                tracing::debug!("Property '{}' not found in load order", decl.name);
                outcome.not_found.push(decl.name);
                continue;
            }
            Resolution::Found(form) => form,
        };

        let value = if decl.is_array {
            tracing::info!("Filled array property '{}' with 1 element: {form}", decl.name);
            PropertyValue::ObjectList(vec![form])
        } else {
            tracing::info!("Filled property '{}' with {form}", decl.name);
            PropertyValue::object(form)
        };
        script.properties.push(ScriptProperty {
            name: decl.name.clone(),
            value,
        });
        outcome.filled.push(decl.name);
    }

    Ok(outcome)
}

/// Auto-fill a quest-level script by quest editor ID and script name.
/// The quest, adapter and script are validated first; only then is the
/// record index obtained through the cache for the given data folder.
pub fn auto_fill_quest_script(
    plugin: &mut PluginFile,
    quest_id: &str,
    script_name: &str,
    source_path: &Path,
    cache: &IndexCache,
    data_folder: &Path,
) -> Result<AutoFillOutcome> {
    let quest = plugin.quest_mut(quest_id).ok_or_else(|| {
        BindError::config_with(
            format!("Quest '{quest_id}' not found"),
            None,
            &[
                "Use 'espbind analyze' to list all quests in the plugin",
                "Ensure the quest exists in the plugin document",
            ],
        )
    })?;

    if quest.adapter.is_none() {
        return Err(BindError::config_with(
            format!("Quest '{quest_id}' has no scripts attached"),
            None,
            &[format!(
                "Use 'espbind attach-script' to attach '{script_name}' to the quest first"
            )
            .as_str()],
        ));
    }

    let script = find_quest_script_mut(quest, script_name).ok_or_else(|| {
        BindError::config_with(
            format!("Script '{script_name}' not attached to quest '{quest_id}'"),
            None,
            &[format!(
                "Use 'espbind attach-script' to attach '{script_name}' to the quest"
            )
            .as_str()],
        )
    })?;

    let index = cache.get_or_build(data_folder, true, false)?;
    auto_fill_script(script, source_path, &index)
}

/// Auto-fill an alias script by quest editor ID, alias name and script name.
pub fn auto_fill_alias_script(
    plugin: &mut PluginFile,
    quest_id: &str,
    alias_name: &str,
    script_name: &str,
    source_path: &Path,
    cache: &IndexCache,
    data_folder: &Path,
) -> Result<AutoFillOutcome> {
    let quest = plugin
        .quest_mut(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest '{quest_id}' not found")))?;

    match &quest.adapter {
        Some(adapter) if !adapter.fragment_aliases.is_empty() => {}
        _ => {
            return Err(BindError::config_with(
                format!("Quest '{quest_id}' has no alias scripts"),
                None,
                &["Use 'espbind add-alias' and 'espbind attach-script' to create one"],
            ));
        }
    }

    let script = find_alias_script_mut(quest, alias_name, script_name).ok_or_else(|| {
        BindError::config(format!(
            "Script '{script_name}' not attached to alias '{alias_name}' on quest '{quest_id}'"
        ))
    })?;

    let index = cache.get_or_build(data_folder, true, false)?;
    auto_fill_script(script, source_path, &index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FormKey, Record, TypeFamily};

    fn index_with(records: Vec<Record>) -> RecordIndex {
        let mut plugin = PluginFile::new("Skyrim.esm");
        plugin.records = records;
        RecordIndex::build([&plugin])
    }

    fn record(editor_id: &str, id: u32, family: TypeFamily) -> Record {
        Record {
            editor_id: editor_id.to_string(),
            id,
            family,
        }
    }

    fn write_source(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_fills_object_and_skips_primitive() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            dir.path(),
            "MyScript.psc",
            "Keyword Property LocTypeInn Auto\nInt Property Counter Auto\n",
        );
        let index = index_with(vec![record("LocTypeInn", 0x100, TypeFamily::Keyword)]);

        let mut script = ScriptEntry::new("MyScript");
        let outcome = auto_fill_script(&mut script, &source, &index).unwrap();

        assert_eq!(outcome.filled, vec!["LocTypeInn"]);
        assert_eq!(outcome.skipped, vec!["Counter"]);
        assert!(outcome.not_found.is_empty());
        assert_eq!(
            script.properties[0].value,
            PropertyValue::object(FormKey::new("Skyrim.esm", 0x100))
        );
    }

    #[test]
    fn test_array_property_binds_single_element_list() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            dir.path(),
            "Globals.psc",
            "GlobalVariable[] Property AllGlobals Auto\n",
        );
        let index = index_with(vec![record("AllGlobals", 0x200, TypeFamily::Global)]);

        let mut script = ScriptEntry::new("Globals");
        let outcome = auto_fill_script(&mut script, &source, &index).unwrap();

        assert_eq!(outcome.filled, vec!["AllGlobals"]);
        assert_eq!(
            script.properties[0].value,
            PropertyValue::ObjectList(vec![FormKey::new("Skyrim.esm", 0x200)])
        );
    }

    #[test]
    fn test_every_declaration_lands_in_one_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            dir.path(),
            "Mixed.psc",
            "Keyword Property Known Auto\n\
             Keyword Property Unknown Auto\n\
             Int Property Counter Auto\n\
             Widget Property Weird Auto\n\
             \x20 Property Untyped Auto\n\
             Faction Property MissingFaction Auto\n",
        );
        let index = index_with(vec![record("Known", 0x1, TypeFamily::Keyword)]);

        let mut script = ScriptEntry::new("Mixed");
        let outcome = auto_fill_script(&mut script, &source, &index).unwrap();

        assert_eq!(outcome.total, 6);
        assert_eq!(
            outcome.filled_count() + outcome.skipped_count() + outcome.not_found_count(),
            outcome.total
        );
        assert_eq!(outcome.filled, vec!["Known"]);
        // Unknown type "Widget" is skipped, not counted as a miss.
        assert!(outcome.skipped.contains(&"Weird".to_string()));
        // An untyped declaration counts as primitive and is skipped.
        assert!(outcome.skipped.contains(&"Untyped".to_string()));
        assert_eq!(outcome.not_found, vec!["Unknown", "MissingFaction"]);
    }

    #[test]
    fn test_existing_binding_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), "S.psc", "Keyword Property Known Auto\n");
        let index = index_with(vec![record("Known", 0x1, TypeFamily::Keyword)]);

        let mut script = ScriptEntry::new("S");
        script.properties.push(ScriptProperty {
            name: "known".to_string(),
            value: PropertyValue::Int(3),
        });

        let outcome = auto_fill_script(&mut script, &source, &index).unwrap();
        assert_eq!(outcome.skipped, vec!["Known"]);
        assert_eq!(script.properties.len(), 1, "existing binding is untouched");
    }

    #[test]
    fn test_missing_source_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with(vec![]);
        let mut script = ScriptEntry::new("S");
        let err = auto_fill_script(&mut script, &dir.path().join("Nope.psc"), &index).unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
    }

    #[test]
    fn test_quest_script_variant_reports_structural_errors() {
        let dir = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        // Minimal valid data folder.
        let mut base = PluginFile::new("Skyrim.esm");
        base.records.push(record("Known", 0x1, TypeFamily::Keyword));
        crate::store::save_plugin(&base, &data.path().join("Skyrim.esm")).unwrap();

        let cache = IndexCache::new();
        let mut plugin = PluginFile::new("MyMod.esp");
        plugin.quests.push(crate::types::Quest::new("MQ01", 0x800));
        let source = write_source(dir.path(), "S.psc", "Keyword Property Known Auto\n");

        // Quest missing.
        let err = auto_fill_quest_script(
            &mut plugin, "Nope", "S", &source, &cache, data.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Nope"));

        // No adapter yet.
        let err = auto_fill_quest_script(
            &mut plugin, "MQ01", "S", &source, &cache, data.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no scripts attached"));

        // Attach and fill.
        plugin
            .quest_mut("MQ01")
            .unwrap()
            .adapter_mut()
            .scripts
            .push(ScriptEntry::new("S"));
        let outcome = auto_fill_quest_script(
            &mut plugin, "MQ01", "S", &source, &cache, data.path(),
        )
        .unwrap();
        assert_eq!(outcome.filled, vec!["Known"]);
    }

    #[test]
    fn test_structural_errors_win_over_bad_data_folder() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), "S.psc", "Keyword Property Known Auto\n");
        let cache = IndexCache::new();
        let mut plugin = PluginFile::new("MyMod.esp");

        // Both the quest and the data folder are wrong; the quest error is
        // the one reported.
        let bad_folder = Path::new("/not/a/real/folder");
        let err = auto_fill_quest_script(&mut plugin, "Nope", "S", &source, &cache, bad_folder)
            .unwrap_err();
        assert!(err.to_string().contains("Quest 'Nope' not found"));

        let err = auto_fill_alias_script(
            &mut plugin, "Nope", "Follower", "S", &source, &cache, bad_folder,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Quest 'Nope' not found"));
    }

    #[test]
    fn test_alias_script_variant() {
        let data = tempfile::tempdir().unwrap();
        let mut base = PluginFile::new("Skyrim.esm");
        base.records.push(record("Known", 0x1, TypeFamily::Keyword));
        crate::store::save_plugin(&base, &data.path().join("Skyrim.esm")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), "A.psc", "Keyword Property Known Auto\n");

        let cache = IndexCache::new();
        let mut plugin = PluginFile::new("MyMod.esp");
        plugin.quests.push(crate::types::Quest::new("MQ01", 0x800));
        crate::alias::add_reference_alias(&mut plugin, "MQ01", "Follower", 0).unwrap();
        crate::alias::attach_script_to_alias(&mut plugin, "MQ01", "Follower", "A").unwrap();

        let outcome = auto_fill_alias_script(
            &mut plugin, "MQ01", "Follower", "A", &source, &cache, data.path(),
        )
        .unwrap();
        assert_eq!(outcome.filled, vec!["Known"]);

        let err = auto_fill_alias_script(
            &mut plugin, "MQ01", "Follower", "Ghost", &source, &cache, data.path(),
        )
        .unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
    }
}
