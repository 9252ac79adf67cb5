//! Quest alias and fragment graph management
//!
//! Aliases live on the quest record; alias scripts live in a separate
//! fragment side-table on the VM adapter, keyed by alias index and/or name.
//! Every fragment created here carries the quest back-reference in its
//! anchor property; serialized quests without it are rejected downstream.

use crate::error::{BindError, Result};
use crate::types::{AliasKind, FragmentAlias, PluginFile, QuestAlias, ScriptEntry};

/// Add a reference alias to a quest. The new alias gets
/// `max(existing IDs) + 1`, or 0 for the first alias. Duplicate names are
/// permitted; lookups elsewhere are first-match.
pub fn add_reference_alias(
    plugin: &mut PluginFile,
    quest_id: &str,
    alias_name: &str,
    flags: u32,
) -> Result<QuestAlias> {
    let quest = plugin
        .quest_mut(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest not found: {quest_id}")))?;

    let next_id = quest
        .aliases
        .iter()
        .map(|a| a.id)
        .max()
        .map_or(0, |max| max + 1);

    let alias = QuestAlias {
        id: next_id,
        name: alias_name.to_string(),
        flags,
        kind: AliasKind::Reference,
    };
    quest.aliases.push(alias.clone());

    tracing::info!("Added alias '{alias_name}' (ID: {next_id}) to quest '{quest_id}'");
    Ok(alias)
}

/// Attach a script to a quest alias via the fragment side-table.
///
/// Idempotent: attaching the same script twice is a no-op success.
pub fn attach_script_to_alias(
    plugin: &mut PluginFile,
    quest_id: &str,
    alias_name: &str,
    script_name: &str,
) -> Result<()> {
    let plugin_name = plugin.name.clone();
    let quest = plugin
        .quest_mut(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest not found: {quest_id}")))?;

    let alias = quest
        .aliases
        .iter()
        .find(|a| a.name == alias_name)
        .ok_or_else(|| {
            BindError::config(format!(
                "Alias '{alias_name}' not found on quest '{quest_id}'"
            ))
        })?;
    let alias_index = alias.id as i32;
    let quest_key = quest.form_key(&plugin_name);

    let adapter = quest.adapter_mut();

    let existing = adapter.fragment_aliases.iter_mut().find(|fa| {
        fa.property.alias_index == alias_index || fa.property.name == alias_name
    });

    if let Some(fragment) = existing {
        if fragment.scripts.iter().any(|s| s.name == script_name) {
            tracing::info!("Script '{script_name}' already attached to alias '{alias_name}'");
            return Ok(());
        }
        fragment.scripts.push(ScriptEntry::new(script_name));
        tracing::info!("Added script '{script_name}' to existing fragment for '{alias_name}'");
        return Ok(());
    }

    let mut fragment = FragmentAlias::new(alias_name, alias_index, quest_key);
    fragment.scripts.push(ScriptEntry::new(script_name));
    adapter.fragment_aliases.push(fragment);

    tracing::info!(
        "Attached script '{script_name}' to alias '{alias_name}' (index {alias_index}) on quest '{quest_id}'"
    );
    Ok(())
}

/// Get the fragment for an alias, creating one (with the quest
/// back-reference) if none exists yet.
pub fn get_or_create_fragment<'a>(
    plugin: &'a mut PluginFile,
    quest_id: &str,
    alias_name: &str,
) -> Result<&'a mut FragmentAlias> {
    let plugin_name = plugin.name.clone();
    let quest = plugin
        .quest_mut(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest not found: {quest_id}")))?;

    let alias = quest
        .aliases
        .iter()
        .find(|a| a.name == alias_name)
        .ok_or_else(|| {
            BindError::config(format!(
                "Alias '{alias_name}' not found on quest '{quest_id}'"
            ))
        })?;
    let alias_index = alias.id as i32;
    let quest_key = quest.form_key(&plugin_name);

    let adapter = quest.adapter_mut();

    let pos = adapter.fragment_aliases.iter().position(|fa| {
        fa.property.alias_index == alias_index || fa.property.name == alias_name
    });

    let pos = match pos {
        Some(pos) => pos,
        None => {
            adapter
                .fragment_aliases
                .push(FragmentAlias::new(alias_name, alias_index, quest_key));
            adapter.fragment_aliases.len() - 1
        }
    };

    Ok(&mut adapter.fragment_aliases[pos])
}
