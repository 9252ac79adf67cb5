//! Quest records, aliases and the VM adapter attachment graph

use serde::{Deserialize, Serialize};

use super::{FormKey, ScriptEntry};

/// Quest record: the container owning an alias list and an optional VM
/// adapter carrying script attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub editor_id: String,

    /// Local form ID within the owning plugin
    pub id: u32,

    #[serde(default)]
    pub aliases: Vec<QuestAlias>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<QuestAdapter>,
}

impl Quest {
    pub fn new(editor_id: impl Into<String>, id: u32) -> Self {
        Self {
            editor_id: editor_id.into(),
            id,
            aliases: Vec::new(),
            adapter: None,
        }
    }

    /// The quest's own address, given the name of the plugin that owns it.
    pub fn form_key(&self, plugin_name: &str) -> FormKey {
        FormKey::new(plugin_name, self.id)
    }

    /// The VM adapter, created on first use.
    pub fn adapter_mut(&mut self) -> &mut QuestAdapter {
        self.adapter.get_or_insert_with(QuestAdapter::default)
    }
}

/// Named, integer-indexed slot on a quest representing a runtime-resolved
/// reference target. Duplicate names are permitted; lookups are first-match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestAlias {
    /// Small unique integer ID; also the index scripts reference the alias by
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub flags: u32,
    pub kind: AliasKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    Reference,
    Location,
}

/// VM adapter: two independent lists. Quest-level scripts live in `scripts`;
/// alias scripts live in the `fragment_aliases` side table, one entry per
/// alias with at least one script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestAdapter {
    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,

    #[serde(default)]
    pub fragment_aliases: Vec<FragmentAlias>,
}

/// Alias script side-table entry.
///
/// `property.object` must point back at the owning quest's own form key.
/// Downstream consumers of the serialized format reject fragments without
/// the back-reference, so it is written on every create path and never
/// inferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentAlias {
    #[serde(default = "default_fragment_version")]
    pub version: u16,

    #[serde(default = "default_object_format")]
    pub object_format: u16,

    /// Anchor identifying the alias this fragment belongs to
    pub property: FragmentProperty,

    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,
}

fn default_fragment_version() -> u16 {
    5
}

fn default_object_format() -> u16 {
    2
}

/// Anchor on a fragment alias: alias name, alias index, and the mandatory
/// back-reference to the owning quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentProperty {
    pub name: String,
    pub alias_index: i32,
    pub object: Option<FormKey>,
}

impl FragmentAlias {
    /// A fragment for the given alias, anchored to the owning quest.
    pub fn new(alias_name: impl Into<String>, alias_index: i32, quest_key: FormKey) -> Self {
        Self {
            version: default_fragment_version(),
            object_format: default_object_format(),
            property: FragmentProperty {
                name: alias_name.into(),
                alias_index,
                object: Some(quest_key),
            },
            scripts: Vec::new(),
        }
    }
}
