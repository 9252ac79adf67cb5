//! Bulk auto-fill across a whole plugin
//!
//! Walks every quest's direct scripts and every (fragment, script) pair,
//! auto-filling each one whose Papyrus source exists next to the others in
//! the script directory. The index is built once and reused for the whole
//! run. Structural failures on one script are collected into the report and
//! never stop the walk; nothing is rolled back or saved here.

use std::path::Path;

use crate::autofill::auto_fill_script;
use crate::error::{BindError, Result};
use crate::index::{IndexCache, RecordIndex};
use crate::types::{PluginFile, ScriptEntry};

/// File extension of Papyrus source files the bulk walk looks for.
pub const SCRIPT_EXT: &str = "psc";

/// Aggregated report of one bulk run.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    /// Scripts with an available source that were processed
    pub total_scripts: usize,
    /// Scripts where at least one property was filled
    pub filled_scripts: usize,
    /// Scripts skipped because no source file was found
    pub skipped_scripts: usize,
    /// Properties filled across all scripts
    pub properties_filled: usize,
    pub details: Vec<String>,
    pub errors: Vec<String>,
}

/// Auto-fill every script attachment in the plugin.
pub fn auto_fill_all(
    plugin: &mut PluginFile,
    script_dir: &Path,
    data_folder: &Path,
    cache: &IndexCache,
) -> Result<BulkOutcome> {
    if !script_dir.is_dir() {
        return Err(BindError::config_with(
            format!("Script directory not found: {}", script_dir.display()),
            None,
            &[
                "Ensure the --script-dir path is correct",
                "Script source files (.psc) must be available for auto-fill",
            ],
        ));
    }

    // One index for the whole run; rebuilding per script would dominate the
    // runtime on any non-trivial plugin.
    let index = cache.get_or_build(data_folder, true, false)?;
    let mut outcome = BulkOutcome::default();

    tracing::info!("Starting bulk auto-fill for {}", plugin.name);

    for quest in plugin.quests.iter_mut() {
        let quest_id = quest.editor_id.clone();
        let Some(adapter) = quest.adapter.as_mut() else {
            continue;
        };

        for script in adapter.scripts.iter_mut() {
            let label = format!("Quest {quest_id}.{}", script.name);
            fill_one(script, &label, script_dir, &index, &mut outcome);
        }

        for fragment in adapter.fragment_aliases.iter_mut() {
            let alias_name = fragment.property.name.clone();
            for script in fragment.scripts.iter_mut() {
                let label = format!("Alias {quest_id}.{alias_name}.{}", script.name);
                fill_one(script, &label, script_dir, &index, &mut outcome);
            }
        }
    }

    tracing::info!(
        "Bulk auto-fill complete: {} of {} scripts filled, {} total properties",
        outcome.filled_scripts,
        outcome.total_scripts,
        outcome.properties_filled
    );
    Ok(outcome)
}

/// Auto-fill scripts on the named quests only. Unknown quest IDs become
/// error entries in the report, not failures.
pub fn auto_fill_quests(
    plugin: &mut PluginFile,
    quest_ids: &[String],
    script_dir: &Path,
    data_folder: &Path,
    cache: &IndexCache,
) -> Result<BulkOutcome> {
    if !script_dir.is_dir() {
        return Err(BindError::config_with(
            format!("Script directory not found: {}", script_dir.display()),
            None,
            &["Ensure the --script-dir path is correct"],
        ));
    }

    let index = cache.get_or_build(data_folder, true, false)?;
    let mut outcome = BulkOutcome::default();

    for quest_id in quest_ids {
        let Some(quest) = plugin.quest_mut(quest_id) else {
            outcome.errors.push(format!("Quest '{quest_id}' not found"));
            continue;
        };
        let Some(adapter) = quest.adapter.as_mut() else {
            outcome.errors.push(format!("Quest '{quest_id}' has no scripts"));
            continue;
        };

        for script in adapter.scripts.iter_mut() {
            let label = format!("Quest {quest_id}.{}", script.name);
            fill_one(script, &label, script_dir, &index, &mut outcome);
        }

        for fragment in adapter.fragment_aliases.iter_mut() {
            let alias_name = fragment.property.name.clone();
            for script in fragment.scripts.iter_mut() {
                let label = format!("Alias {quest_id}.{alias_name}.{}", script.name);
                fill_one(script, &label, script_dir, &index, &mut outcome);
            }
        }
    }

    Ok(outcome)
}

/// Process one script attachment, folding its outcome into the report.
fn fill_one(
    script: &mut ScriptEntry,
    label: &str,
    script_dir: &Path,
    index: &RecordIndex,
    outcome: &mut BulkOutcome,
) {
    let source_path = script_dir.join(format!("{}.{SCRIPT_EXT}", script.name));
    if !source_path.exists() {
        tracing::debug!("Source not found for {}, skipping", script.name);
        outcome.skipped_scripts += 1;
        outcome.details.push(format!("Skipped {label} (no source file)"));
        return;
    }

    outcome.total_scripts += 1;

    match auto_fill_script(script, &source_path, index) {
        Ok(fill) => {
            if fill.filled_count() > 0 {
                outcome.filled_scripts += 1;
                outcome.properties_filled += fill.filled_count();
                outcome.details.push(format!(
                    "{label}: {} filled, {} skipped, {} not found",
                    fill.filled_count(),
                    fill.skipped_count(),
                    fill.not_found_count()
                ));
            } else {
                outcome.details.push(format!("{label}: No properties filled"));
            }
        }
        Err(err) => {
            outcome.errors.push(format!("{label}: {err}"));
        }
    }
}
