//! Script property binding
//!
//! All setters upsert-by-name: an existing binding with the same name
//! (case-insensitive) is removed before the new one is appended. The generic
//! string-valued setter parses before any mutation, so a bad value never
//! leaves a script half-edited.

use crate::error::{BindError, Result};
use crate::types::{FormKey, PropertyKind, PropertyValue, Quest, ScriptEntry, ScriptProperty};

/// Replace any same-named binding with the given value.
fn upsert(script: &mut ScriptEntry, name: &str, value: PropertyValue) {
    script
        .properties
        .retain(|p| !p.name.eq_ignore_ascii_case(name));
    script.properties.push(ScriptProperty {
        name: name.to_string(),
        value,
    });
}

/// Bind an object reference (a record address).
pub fn set_object_property(script: &mut ScriptEntry, name: &str, form: FormKey) {
    tracing::debug!("Set object property '{name}' = {form}");
    upsert(script, name, PropertyValue::object(form));
}

/// Bind a reference to an alias slot within the same quest. Stores the quest
/// back-reference plus the alias index rather than a direct record address;
/// the engine resolves the slot at runtime.
pub fn set_alias_property(
    script: &mut ScriptEntry,
    name: &str,
    quest: &Quest,
    plugin_name: &str,
    alias_name: &str,
) -> Result<()> {
    let alias = quest
        .aliases
        .iter()
        .find(|a| a.name == alias_name)
        .ok_or_else(|| BindError::config(format!("Alias not found: {alias_name}")))?;

    tracing::debug!("Set alias property '{name}' = alias [{}] {alias_name}", alias.id);
    upsert(
        script,
        name,
        PropertyValue::Object {
            form: quest.form_key(plugin_name),
            alias_index: alias.id as i32,
        },
    );
    Ok(())
}

pub fn set_int_property(script: &mut ScriptEntry, name: &str, value: i32) {
    tracing::debug!("Set int property '{name}' = {value}");
    upsert(script, name, PropertyValue::Int(value));
}

pub fn set_float_property(script: &mut ScriptEntry, name: &str, value: f32) {
    tracing::debug!("Set float property '{name}' = {value}");
    upsert(script, name, PropertyValue::Float(value));
}

pub fn set_bool_property(script: &mut ScriptEntry, name: &str, value: bool) {
    tracing::debug!("Set bool property '{name}' = {value}");
    upsert(script, name, PropertyValue::Bool(value));
}

pub fn set_string_property(script: &mut ScriptEntry, name: &str, value: &str) {
    tracing::debug!("Set string property '{name}' = '{value}'");
    upsert(script, name, PropertyValue::String(value.to_string()));
}

/// Set a property from a raw string, parsed per the declared kind.
/// Parsing happens before any mutation; a parse failure leaves the script
/// untouched. Object values use the `Plugin.esp|0xFormID` form-link shape.
pub fn set_property_from_str(
    script: &mut ScriptEntry,
    name: &str,
    raw: &str,
    kind: PropertyKind,
) -> Result<()> {
    let value = match kind {
        PropertyKind::Object => PropertyValue::object(FormKey::parse(raw)?),
        PropertyKind::Int => {
            let parsed = raw.parse::<i32>().map_err(|_| BindError::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
                expected: "integer",
            })?;
            PropertyValue::Int(parsed)
        }
        PropertyKind::Float => {
            let parsed = raw.parse::<f32>().map_err(|_| BindError::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
                expected: "float",
            })?;
            PropertyValue::Float(parsed)
        }
        PropertyKind::Bool => {
            let parsed = raw.parse::<bool>().map_err(|_| BindError::InvalidValue {
                name: name.to_string(),
                value: raw.to_string(),
                expected: "boolean",
            })?;
            PropertyValue::Bool(parsed)
        }
        PropertyKind::String => PropertyValue::String(raw.to_string()),
    };

    tracing::info!("Set {kind:?} property '{name}' = '{raw}' on script '{}'", script.name);
    upsert(script, name, value);
    Ok(())
}

/// Find a quest-level script by name (case-insensitive).
pub fn find_quest_script<'a>(quest: &'a Quest, script_name: &str) -> Option<&'a ScriptEntry> {
    quest
        .adapter
        .as_ref()?
        .scripts
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(script_name))
}

/// Find a quest-level script by name (case-insensitive), mutably.
pub fn find_quest_script_mut<'a>(
    quest: &'a mut Quest,
    script_name: &str,
) -> Option<&'a mut ScriptEntry> {
    quest
        .adapter
        .as_mut()?
        .scripts
        .iter_mut()
        .find(|s| s.name.eq_ignore_ascii_case(script_name))
}

/// Find a script on an alias by name. Alias scripts live in the fragment
/// side-table, looked up by the alias's index or name.
pub fn find_alias_script<'a>(
    quest: &'a Quest,
    alias_name: &str,
    script_name: &str,
) -> Option<&'a ScriptEntry> {
    let alias_index = quest
        .aliases
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(alias_name))
        .map(|a| a.id as i32)?;

    let adapter = quest.adapter.as_ref()?;
    let fragment = adapter.fragment_aliases.iter().find(|fa| {
        fa.property.alias_index == alias_index || fa.property.name.eq_ignore_ascii_case(alias_name)
    })?;

    fragment
        .scripts
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(script_name))
}

/// Find a script on an alias by name, mutably.
pub fn find_alias_script_mut<'a>(
    quest: &'a mut Quest,
    alias_name: &str,
    script_name: &str,
) -> Option<&'a mut ScriptEntry> {
    let alias_index = quest
        .aliases
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(alias_name))
        .map(|a| a.id as i32)?;

    let adapter = quest.adapter.as_mut()?;
    let fragment = adapter.fragment_aliases.iter_mut().find(|fa| {
        fa.property.alias_index == alias_index || fa.property.name.eq_ignore_ascii_case(alias_name)
    })?;

    fragment
        .scripts
        .iter_mut()
        .find(|s| s.name.eq_ignore_ascii_case(script_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{add_reference_alias, attach_script_to_alias};
    use crate::types::PluginFile;

    #[test]
    fn test_upsert_replaces_same_named_binding() {
        let mut script = ScriptEntry::new("MyScript");
        set_object_property(&mut script, "Target", FormKey::new("A.esp", 1));
        set_object_property(&mut script, "Target", FormKey::new("B.esp", 2));

        assert_eq!(script.properties.len(), 1);
        assert_eq!(
            script.properties[0].value,
            PropertyValue::object(FormKey::new("B.esp", 2))
        );
    }

    #[test]
    fn test_upsert_is_case_insensitive() {
        let mut script = ScriptEntry::new("MyScript");
        set_int_property(&mut script, "Counter", 1);
        set_int_property(&mut script, "COUNTER", 2);
        assert_eq!(script.properties.len(), 1);
        assert_eq!(script.properties[0].value, PropertyValue::Int(2));
    }

    #[test]
    fn test_scalar_setters() {
        let mut script = ScriptEntry::new("MyScript");
        set_int_property(&mut script, "I", 7);
        set_float_property(&mut script, "F", 1.5);
        set_bool_property(&mut script, "B", true);
        set_string_property(&mut script, "S", "hello");
        assert_eq!(script.properties.len(), 4);
    }

    #[test]
    fn test_alias_property_stores_back_reference_and_index() {
        let mut plugin = PluginFile::new("MyMod.esp");
        plugin.quests.push(crate::types::Quest::new("MQ01", 0x800));
        add_reference_alias(&mut plugin, "MQ01", "Follower", 0).unwrap();
        add_reference_alias(&mut plugin, "MQ01", "Target", 0).unwrap();

        let quest = plugin.quest("MQ01").unwrap().clone();
        let mut script = ScriptEntry::new("MyScript");
        set_alias_property(&mut script, "TargetAlias", &quest, "MyMod.esp", "Target").unwrap();

        assert_eq!(
            script.properties[0].value,
            PropertyValue::Object {
                form: FormKey::new("MyMod.esp", 0x800),
                alias_index: 1,
            }
        );
    }

    #[test]
    fn test_alias_property_missing_alias_fails() {
        let quest = crate::types::Quest::new("MQ01", 0x800);
        let mut script = ScriptEntry::new("MyScript");
        let err =
            set_alias_property(&mut script, "X", &quest, "MyMod.esp", "Ghost").unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
        assert!(script.properties.is_empty());
    }

    #[test]
    fn test_parse_before_mutate() {
        let mut script = ScriptEntry::new("MyScript");
        set_int_property(&mut script, "Counter", 1);

        let err =
            set_property_from_str(&mut script, "Counter", "not-a-number", PropertyKind::Int)
                .unwrap_err();
        assert!(matches!(err, BindError::InvalidValue { .. }));
        // The old binding survives a failed parse.
        assert_eq!(script.properties[0].value, PropertyValue::Int(1));
    }

    #[test]
    fn test_set_property_from_str_object_kind() {
        let mut script = ScriptEntry::new("MyScript");
        set_property_from_str(&mut script, "Target", "Skyrim.esm|0x800", PropertyKind::Object)
            .unwrap();
        assert_eq!(
            script.properties[0].value,
            PropertyValue::object(FormKey::new("Skyrim.esm", 0x800))
        );

        let err = set_property_from_str(&mut script, "Bad", "garbage", PropertyKind::Object)
            .unwrap_err();
        assert!(matches!(err, BindError::FormLink(_)));
    }

    #[test]
    fn test_find_helpers_are_case_insensitive() {
        let mut plugin = PluginFile::new("MyMod.esp");
        plugin.quests.push(crate::types::Quest::new("MQ01", 0x800));
        add_reference_alias(&mut plugin, "MQ01", "Follower", 0).unwrap();
        attach_script_to_alias(&mut plugin, "MQ01", "Follower", "AliasScript").unwrap();

        let quest = plugin.quest_mut("MQ01").unwrap();
        quest.adapter_mut().scripts.push(ScriptEntry::new("QuestScript"));

        let quest = plugin.quest("MQ01").unwrap();
        assert!(find_quest_script(quest, "questscript").is_some());
        assert!(find_quest_script(quest, "missing").is_none());
        assert!(find_alias_script(quest, "FOLLOWER", "aliasscript").is_some());
        assert!(find_alias_script(quest, "Follower", "missing").is_none());
        assert!(find_alias_script(quest, "Ghost", "AliasScript").is_none());
    }
}
